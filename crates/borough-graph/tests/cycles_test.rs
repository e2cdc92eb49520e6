use borough_graph::{CycleDetector, DependencyGraph, scc};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
    edges.iter().copied().collect()
}

/// Brute-force reference: `v` is cyclic iff some other node is both reachable from `v` and can
/// reach `v`.
fn reference_cyclic(g: &DependencyGraph) -> BTreeSet<String> {
    let reach = |start: &str| -> BTreeSet<String> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut todo: Vec<String> = vec![start.to_string()];
        while let Some(v) = todo.pop() {
            for w in g.targets(&v) {
                if seen.insert(w.to_string()) {
                    todo.push(w.to_string());
                }
            }
        }
        seen
    };

    let mut out = BTreeSet::new();
    for v in g.nodes() {
        let from_v = reach(v);
        if from_v
            .iter()
            .any(|w| w.as_str() != v && reach(w).contains(v))
        {
            out.insert(v.to_string());
        }
    }
    out
}

fn edge_list_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    (3usize..11).prop_flat_map(|n| prop::collection::vec((0..n, 0..n), 1..2 * n))
}

#[test]
fn acyclic_graph_has_no_cycles() {
    let g = graph(&[("a", "b"), ("b", "c"), ("a", "c")]);
    let d = CycleDetector::for_graph(&g);
    assert!(d.is_empty());
    assert!(!d.is_cyclic("a"));
    assert!(d.cycles_containing("a").is_empty());
}

#[test]
fn two_node_cycle_is_detected_once() {
    let g = graph(&[("A", "B"), ("B", "A")]);
    let d = CycleDetector::for_graph(&g);
    assert_eq!(d.cycles(), &[vec!["A".to_string(), "B".to_string()]]);
    assert!(d.is_cyclic("A"));
    assert!(d.is_cyclic("B"));
}

#[test]
fn self_loop_is_not_a_cycle() {
    let g = graph(&[("a", "a"), ("a", "b")]);
    let d = CycleDetector::for_graph(&g);
    assert!(d.is_empty());
    assert!(!d.is_cyclic("a"));
}

#[test]
fn disjoint_cycles_are_reported_separately() {
    let g = graph(&[("a", "b"), ("b", "a"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "c")]);
    let d = CycleDetector::for_graph(&g);
    assert_eq!(d.len(), 2);
    let cde: Vec<String> = ["c", "d", "e"].map(String::from).to_vec();
    let ab: Vec<String> = ["a", "b"].map(String::from).to_vec();
    assert_eq!(d.cycles_containing("d"), vec![cde.as_slice()]);
    assert_eq!(d.cycles_containing("a"), vec![ab.as_slice()]);
    assert!(d.cycles_containing("zzz").is_empty());
}

#[test]
fn cycle_members_are_listed_in_discovery_order() {
    let g = graph(&[("x", "y"), ("y", "z"), ("z", "x")]);
    let d = CycleDetector::for_graph(&g);
    assert_eq!(d.cycles(), &[vec!["x".to_string(), "y".to_string(), "z".to_string()]]);
}

#[test]
fn repeated_detection_is_identical() {
    let g = graph(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "c")]);
    let first = CycleDetector::for_graph(&g);
    let second = CycleDetector::for_graph(&g);
    assert_eq!(first.cycles(), second.cycles());
}

proptest! {
    #[test]
    fn detection_matches_a_brute_force_reference(edges in edge_list_strategy()) {
        let mut g = DependencyGraph::new();
        for (v, w) in edges {
            g.add_edge(&format!("n{v}"), &format!("n{w}"));
        }

        let d = CycleDetector::for_graph(&g);
        let expected = reference_cyclic(&g);
        for v in g.nodes() {
            prop_assert_eq!(d.is_cyclic(v), expected.contains(v), "mismatch for {}", v);
        }
    }
}

#[test]
fn from_adjacency_ignores_dependencies_outside_the_node_list() {
    let d = CycleDetector::from_adjacency([
        ("p.A", vec!["p.B", "q.C"]),
        ("p.B", vec!["p.A"]),
        ("p.D", vec!["q.C"]),
    ]);
    assert_eq!(d.cycles(), &[vec!["p.A".to_string(), "p.B".to_string()]]);
    assert!(!d.is_cyclic("q.C"));
    assert!(!d.is_cyclic("p.D"));
}

#[test]
fn long_chains_do_not_overflow_the_stack() {
    let n = 200_000;
    let sccs = scc::strongly_connected_components(n, |v| Some((v + 1) % n));
    assert_eq!(sccs.len(), 1);
    assert_eq!(sccs[0].len(), n);
    assert_eq!(sccs[0][0], 0);
}
