//! Package/class containment tree built from dotted qualified names.
//!
//! `a.b.C` becomes package `a` containing package `a.b` containing class `a.b.C`. Nodes live in
//! an arena owned by [`ContainmentTree`] and are addressed by [`NodeId`]; qualified names are
//! unique across the tree and serve as node identity.

use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::hash::{Hash, Hasher};

pub const SEPARATOR: char = '.';

const ROOT_NAME: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Package,
    Class,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub qualified_name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Longest dependency chain below this node among its siblings. `0` until leveled.
    pub level: u32,
}

impl Node {
    pub fn is_package(&self) -> bool {
        self.kind == NodeKind::Package
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified_name.hash(state);
    }
}

#[derive(Debug, Clone)]
pub struct ContainmentTree {
    nodes: Vec<Node>,
    index: FxHashMap<String, NodeId>,
    promoted: Vec<NodeId>,
}

impl Default for ContainmentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainmentTree {
    /// Creates a tree holding only the root package (name `root`, empty qualified name).
    pub fn new() -> Self {
        let root = Node {
            id: NodeId(0),
            kind: NodeKind::Package,
            name: ROOT_NAME.to_string(),
            qualified_name: String::new(),
            parent: None,
            children: Vec::new(),
            level: 0,
        };
        let mut index = FxHashMap::default();
        index.insert(String::new(), NodeId(0));
        Self {
            nodes: vec![root],
            index,
            promoted: Vec::new(),
        }
    }

    pub fn build<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for name in names {
            tree.insert(name.as_ref())?;
        }
        Ok(tree)
    }

    /// Builds the tree for every name in `graph`: each source followed by its targets.
    pub fn from_graph(graph: &DependencyGraph) -> Result<Self> {
        let mut tree = Self::new();
        for source in graph.sources() {
            tree.insert(source)?;
            for target in graph.targets(source) {
                tree.insert(target)?;
            }
        }
        Ok(tree)
    }

    /// Inserts `qualified_name`, creating missing packages along the way.
    ///
    /// The last segment becomes a class. Inserting an existing name returns the existing node.
    /// A class that later turns out to have children is promoted to a package and loses its
    /// building; see [`ContainmentTree::promoted`].
    pub fn insert(&mut self, qualified_name: &str) -> Result<NodeId> {
        validate(qualified_name)?;

        let segments: Vec<&str> = qualified_name.split(SEPARATOR).collect();
        let last = segments.len() - 1;
        let mut parent = self.root();
        let mut path = String::with_capacity(qualified_name.len());

        for (i, segment) in segments.into_iter().enumerate() {
            if !path.is_empty() {
                path.push(SEPARATOR);
            }
            path.push_str(segment);
            let kind = if i == last {
                NodeKind::Class
            } else {
                NodeKind::Package
            };

            parent = match self.index.get(path.as_str()).copied() {
                Some(existing) => {
                    let node = &mut self.nodes[existing.0];
                    // Either order of `p` and `p.A` leaves a package `p` and no class `p`.
                    if node.kind != kind && !self.promoted.contains(&existing) {
                        tracing::warn!(
                            name = %node.qualified_name,
                            "name is both a class and a package; dropping the class building"
                        );
                        node.kind = NodeKind::Package;
                        self.promoted.push(existing);
                    }
                    existing
                }
                None => self.add_child(parent, segment, &path, kind),
            };
        }

        Ok(parent)
    }

    fn add_child(&mut self, parent: NodeId, name: &str, qualified_name: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            name: name.to_string(),
            qualified_name: qualified_name.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            level: 0,
        });
        self.nodes[parent.0].children.push(id);
        self.index.insert(qualified_name.to_string(), id);
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, qualified_name: &str) -> Option<NodeId> {
        self.index.get(qualified_name).copied()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn level(&self, id: NodeId) -> u32 {
        self.nodes[id.0].level
    }

    pub(crate) fn set_level(&mut self, id: NodeId, level: u32) {
        self.nodes[id.0].level = level;
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Names inserted both as a class and as a package, in the order the clash was seen.
    pub fn promoted(&self) -> &[NodeId] {
        &self.promoted
    }

    pub fn has_subpackages(&self, id: NodeId) -> bool {
        self.children(id)
            .iter()
            .any(|&c| self.nodes[c.0].kind == NodeKind::Package)
    }

    /// `id` and everything below it, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.children(v).iter().rev().copied());
        }
        out
    }

    /// The ancestor of `id` (or `id` itself) whose parent is `parent`.
    pub fn ancestor_under(&self, id: NodeId, parent: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let up = self.parent(current)?;
            if up == parent {
                return Some(current);
            }
            current = up;
        }
    }
}

fn validate(qualified_name: &str) -> Result<()> {
    let reason = if qualified_name.is_empty() {
        "name is empty"
    } else if qualified_name.split(SEPARATOR).any(str::is_empty) {
        "name contains an empty segment"
    } else {
        return Ok(());
    };
    Err(Error::MalformedName {
        name: qualified_name.to_string(),
        reason,
    })
}

/// Callbacks for [`walk`].
///
/// `enter_package` runs before a package's children are visited and `leave_package` after all
/// of them; `visit_class` runs once per class.
pub trait TreeVisitor {
    fn enter_package(&mut self, _tree: &ContainmentTree, _package: &Node) {}

    fn visit_class(&mut self, tree: &ContainmentTree, class: &Node);

    fn leave_package(&mut self, _tree: &ContainmentTree, _package: &Node) {}
}

pub fn walk<V: TreeVisitor + ?Sized>(tree: &ContainmentTree, visitor: &mut V) {
    walk_from(tree, tree.root(), visitor);
}

pub fn walk_from<V: TreeVisitor + ?Sized>(tree: &ContainmentTree, id: NodeId, visitor: &mut V) {
    let node = tree.node(id);
    match node.kind {
        NodeKind::Package => {
            visitor.enter_package(tree, node);
            for &child in &node.children {
                walk_from(tree, child, visitor);
            }
            visitor.leave_package(tree, node);
        }
        NodeKind::Class => visitor.visit_class(tree, node),
    }
}
