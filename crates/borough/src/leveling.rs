//! Dependency leveling of sibling groups.
//!
//! For every package with more than one child, the raw graph edges between the children's
//! subtrees are collapsed into weighted sibling dependencies. Cycles among the siblings are
//! broken heuristically, then each child gets a level equal to the longest dependency chain
//! starting at it. Removal and leveling are separate phases: whether a removed edge pointed the
//! wrong way is only decided from the final levels.

use crate::graph::{CycleDetector, DependencyGraph};
use crate::tree::{ContainmentTree, NodeId};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::Serialize;

/// Sibling dependencies of one node: target sibling -> number of raw edges collapsed into it.
pub type DependencyMap = IndexMap<NodeId, usize, FxBuildHasher>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamedEdge {
    pub from: String,
    pub to: String,
}

impl NamedEdge {
    fn new(tree: &ContainmentTree, from: NodeId, to: NodeId) -> Self {
        Self {
            from: tree.node(from).qualified_name.clone(),
            to: tree.node(to).qualified_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelingReport {
    /// Every sibling dependency removed to break a cycle. Groups are reported bottom-up: the
    /// removals inside a package's children come before the package's own.
    pub removed_edges: Vec<NamedEdge>,
    /// Removed dependencies whose source did not end up above their target.
    pub wrong_direction: Vec<NamedEdge>,
}

/// The children of one package with a private working copy of their dependencies.
#[derive(Debug, Clone)]
pub struct SiblingGroup {
    members: Vec<NodeId>,
    position: FxHashMap<NodeId, usize>,
    dependencies: Vec<DependencyMap>,
}

impl SiblingGroup {
    /// Collects the dependencies among the children of `parent`.
    ///
    /// A raw edge `u -> v` counts towards `c -> s` when `u` is in the subtree of child `c` and
    /// `v` in the subtree of another child `s`. Edges leaving the group are ignored.
    pub fn collect(tree: &ContainmentTree, graph: &DependencyGraph, parent: NodeId) -> Self {
        let members: Vec<NodeId> = tree.children(parent).to_vec();
        let mut dependencies: Vec<DependencyMap> = vec![DependencyMap::default(); members.len()];

        for (pos, &member) in members.iter().enumerate() {
            for v in tree.descendants(member) {
                for target in graph.targets(&tree.node(v).qualified_name) {
                    let Some(t) = tree.get(target) else {
                        continue;
                    };
                    let Some(sibling) = tree.ancestor_under(t, parent) else {
                        continue;
                    };
                    if sibling == member {
                        continue;
                    }
                    *dependencies[pos].entry(sibling).or_insert(0) += 1;
                }
            }
        }

        Self::with_dependencies(members, dependencies)
    }

    fn with_dependencies(members: Vec<NodeId>, dependencies: Vec<DependencyMap>) -> Self {
        let position = members
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();
        Self {
            members,
            position,
            dependencies,
        }
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    pub fn dependencies(&self, id: NodeId) -> Option<&DependencyMap> {
        self.position.get(&id).map(|&pos| &self.dependencies[pos])
    }

    pub fn weight(&self, from: NodeId, to: NodeId) -> usize {
        self.dependencies(from)
            .and_then(|deps| deps.get(&to).copied())
            .unwrap_or(0)
    }

    fn successors(&self, pos: usize) -> Vec<usize> {
        self.dependencies[pos]
            .keys()
            .filter_map(|id| self.position.get(id).copied())
            .collect()
    }

    fn remove(&mut self, from: usize, to: usize) {
        let target = self.members[to];
        self.dependencies[from].shift_remove(&target);
    }

    /// Cycles among the members over the dependencies that are still present.
    fn detect_cycles(&self, tree: &ContainmentTree) -> CycleDetector {
        CycleDetector::from_adjacency(self.members.iter().zip(&self.dependencies).map(
            move |(&id, deps)| {
                let targets = deps
                    .keys()
                    .map(move |&dep| tree.node(dep).qualified_name.as_str());
                (tree.node(id).qualified_name.as_str(), targets)
            },
        ))
    }

    /// Removes dependencies until no cycle is left among the members.
    ///
    /// Each pass detects the cycles and drops one edge per cycle: the lightest edge between
    /// consecutive members (in discovery order), ties going to the source with the fewest
    /// outgoing dependencies. Zero-weight pairs are never candidates. A pass that cannot remove
    /// anything ends the loop, so this runs at most once per edge.
    pub fn remove_cyclic_dependencies(&mut self, tree: &ContainmentTree) -> Vec<(NodeId, NodeId)> {
        let mut removed: Vec<(NodeId, NodeId)> = Vec::new();

        loop {
            let detector = self.detect_cycles(tree);
            if detector.is_empty() {
                break;
            }

            let mut progressed = false;
            for names in detector.cycles() {
                let cycle: Vec<usize> = names
                    .iter()
                    .filter_map(|name| tree.get(name))
                    .filter_map(|id| self.position.get(&id).copied())
                    .collect();
                let Some((from, to)) = self.removal_candidate(&cycle) else {
                    tracing::warn!(cycle = ?names, "no candidate found to break a dependency cycle");
                    continue;
                };
                tracing::debug!(
                    from = %tree.node(self.members[from]).qualified_name,
                    to = %tree.node(self.members[to]).qualified_name,
                    "removing cyclic dependency"
                );
                self.remove(from, to);
                removed.push((self.members[from], self.members[to]));
                progressed = true;
            }

            if !progressed {
                break;
            }
        }

        removed
    }

    fn removal_candidate(&self, cycle: &[usize]) -> Option<(usize, usize)> {
        let mut candidates: Vec<(usize, usize)> = Vec::new();
        let mut min_weight = usize::MAX;

        for (j, &from) in cycle.iter().enumerate() {
            let to = cycle[(j + 1) % cycle.len()];
            if from == to {
                continue;
            }
            // Members need not be adjacent just because they are consecutive in the component.
            let weight = self.dependencies[from]
                .get(&self.members[to])
                .copied()
                .unwrap_or(0);
            if weight > 0 && weight < min_weight {
                candidates.clear();
                candidates.push((from, to));
                min_weight = weight;
            } else if weight == min_weight {
                candidates.push((from, to));
            }
        }

        candidates.into_iter().reduce(|l, r| {
            if self.dependencies[l.0].len() < self.dependencies[r.0].len() {
                l
            } else {
                r
            }
        })
    }

    /// Sets each member's level to the length of its longest remaining dependency chain.
    ///
    /// Members that already carry a positive level keep it. A cycle met on the current path
    /// drops the edge that closes it.
    pub fn assign_levels(&mut self, tree: &mut ContainmentTree) {
        let n = self.members.len();
        let mut levels: Vec<u32> = self.members.iter().map(|&id| tree.level(id)).collect();
        let mut done: Vec<bool> = levels.iter().map(|&level| level > 0).collect();
        let mut on_path: Vec<bool> = vec![false; n];

        struct Frame {
            pos: usize,
            successors: Vec<usize>,
            next: usize,
            level: u32,
        }

        for start in 0..n {
            if done[start] {
                continue;
            }

            on_path[start] = true;
            let mut frames: Vec<Frame> = vec![Frame {
                pos: start,
                successors: self.successors(start),
                next: 0,
                level: 0,
            }];

            while let Some(frame) = frames.last_mut() {
                if let Some(&dep) = frame.successors.get(frame.next) {
                    frame.next += 1;
                    if on_path[dep] {
                        tracing::warn!(
                            from = %tree.node(self.members[frame.pos]).qualified_name,
                            to = %tree.node(self.members[dep]).qualified_name,
                            "cycle found after cyclic dependencies were removed; dropping edge"
                        );
                        let from = frame.pos;
                        self.remove(from, dep);
                        continue;
                    }
                    if done[dep] {
                        frame.level = frame.level.max(levels[dep] + 1);
                        continue;
                    }
                    on_path[dep] = true;
                    let successors = self.successors(dep);
                    frames.push(Frame {
                        pos: dep,
                        successors,
                        next: 0,
                        level: 0,
                    });
                    continue;
                }

                let Frame { pos, level, .. } = *frame;
                frames.pop();
                levels[pos] = level;
                done[pos] = true;
                on_path[pos] = false;
                if let Some(parent) = frames.last_mut() {
                    parent.level = parent.level.max(level + 1);
                }
            }
        }

        for (pos, &id) in self.members.iter().enumerate() {
            tree.set_level(id, levels[pos]);
        }
    }
}

/// Levels the whole tree.
///
/// Every package with more than one child gets a cycle-breaking pass and a leveling pass over
/// its children; packages with a single child are only descended into.
pub fn levelize(tree: &mut ContainmentTree, graph: &DependencyGraph) -> LevelingReport {
    let mut report = LevelingReport::default();
    let root = tree.root();
    levelize_node(tree, graph, root, &mut report);
    report
}

fn levelize_node(
    tree: &mut ContainmentTree,
    graph: &DependencyGraph,
    id: NodeId,
    report: &mut LevelingReport,
) {
    let children: Vec<NodeId> = tree.children(id).to_vec();
    match children.len() {
        0 => return,
        1 => {
            levelize_node(tree, graph, children[0], report);
            return;
        }
        _ => {}
    }

    let mut group = SiblingGroup::collect(tree, graph, id);
    let removed = group.remove_cyclic_dependencies(tree);
    group.assign_levels(tree);

    for child in children {
        levelize_node(tree, graph, child, report);
    }

    for (from, to) in removed {
        let edge = NamedEdge::new(tree, from, to);
        if tree.level(from) <= tree.level(to) {
            tracing::debug!(from = %edge.from, to = %edge.to, "removed dependency points upward");
            report.wrong_direction.push(edge.clone());
        }
        report.removed_edges.push(edge);
    }
}
