//! Layout output types.

use crate::leveling::NamedEdge;
use crate::tree::NodeKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner relative to the parent district.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistrictKind {
    /// Only classes, none of them cyclic.
    Leaf,
    /// Only classes, at least one of them on a dependency cycle.
    Cyclic,
    /// Holds at least one sub-package.
    Container,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub kind: NodeKind,
    pub name: String,
    pub qualified_name: String,
    pub level: u32,
    pub footprint: Size,
    pub position: Point,
    /// Building height; packages are flat (`1`).
    pub height: f64,
    pub is_cyclic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<DistrictKind>,
    /// Children in packing order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    pub fn is_package(&self) -> bool {
        self.kind == NodeKind::Package
    }

    pub fn find(&self, qualified_name: &str) -> Option<&LayoutNode> {
        self.iter().find(|n| n.qualified_name == qualified_name)
    }

    /// This node and all of its descendants, in pre-order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a LayoutNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a LayoutNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a LayoutNode {
    type Item = &'a LayoutNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityLayout {
    pub root: LayoutNode,
    pub removed_edges: Vec<NamedEdge>,
    pub wrong_direction: Vec<NamedEdge>,
    /// Dependency cycles of the input graph, each in discovery order.
    pub cycles: Vec<Vec<String>>,
}

impl CityLayout {
    pub fn find(&self, qualified_name: &str) -> Option<&LayoutNode> {
        self.root.find(qualified_name)
    }
}
