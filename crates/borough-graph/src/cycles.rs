use crate::graph::DependencyGraph;
use crate::scc;
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// The cycles of one graph snapshot.
///
/// A cycle is a strongly connected component with more than one member, listed in discovery
/// order. The detector is immutable once built; build a new one after the graph changes.
#[derive(Debug, Clone, Default)]
pub struct CycleDetector {
    cycles: Vec<Vec<String>>,
    membership: HashMap<String, Vec<usize>>,
}

impl CycleDetector {
    /// Detects the cycles of `graph`, visiting roots in the graph's insertion order.
    pub fn for_graph(graph: &DependencyGraph) -> Self {
        let components = scc::cycles(graph.node_count(), |v| {
            graph.successor_ids(v).iter().copied()
        });
        Self::from_cycles(components.into_iter().map(|component| {
            component
                .into_iter()
                .filter_map(|ix| graph.name(ix).map(str::to_string))
                .collect()
        }))
    }

    /// Detects the cycles among an explicit node list.
    ///
    /// Each entry is a node name and the names it depends on. Dependencies on names that are not
    /// part of the list are ignored, which makes this suitable for sibling-local detection.
    pub fn from_adjacency<'a, I, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, D)>,
        D: IntoIterator<Item = &'a str>,
    {
        let entries: Vec<(&str, Vec<&str>)> = entries
            .into_iter()
            .map(|(name, deps)| (name, deps.into_iter().collect()))
            .collect();

        let mut index: HashMap<&str, usize> = HashMap::default();
        for (ix, (name, _)) in entries.iter().enumerate() {
            index.entry(*name).or_insert(ix);
        }

        let components = scc::cycles(entries.len(), |v| {
            entries[v]
                .1
                .iter()
                .filter_map(|dep| index.get(dep).copied())
                .collect::<Vec<_>>()
        });
        Self::from_cycles(components.into_iter().map(|component| {
            component
                .into_iter()
                .map(|ix| entries[ix].0.to_string())
                .collect()
        }))
    }

    fn from_cycles(cycles: impl IntoIterator<Item = Vec<String>>) -> Self {
        let cycles: Vec<Vec<String>> = cycles.into_iter().collect();
        let mut membership: HashMap<String, Vec<usize>> = HashMap::default();
        for (cycle_ix, cycle) in cycles.iter().enumerate() {
            for name in cycle {
                membership.entry(name.clone()).or_default().push(cycle_ix);
            }
        }
        Self { cycles, membership }
    }

    pub fn is_cyclic(&self, name: &str) -> bool {
        self.membership.contains_key(name)
    }

    pub fn cycles_containing(&self, name: &str) -> Vec<&[String]> {
        self.membership
            .get(name)
            .map(|ixs| ixs.iter().map(|&ix| self.cycles[ix].as_slice()).collect())
            .unwrap_or_default()
    }

    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}
