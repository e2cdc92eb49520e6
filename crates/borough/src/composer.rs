//! Bottom-up composition of the layout tree.
//!
//! Classes become buildings sized by their graph metrics; packages become districts sized by
//! packing their children.

use crate::graph::{CycleDetector, DependencyGraph};
use crate::model::{DistrictKind, LayoutNode, Point, Size};
use crate::packer::RectanglePacker;
use crate::tree::{ContainmentTree, Node, TreeVisitor};

struct Frame {
    children: Vec<LayoutNode>,
}

pub struct LayoutComposer<'a> {
    graph: &'a DependencyGraph,
    detector: &'a CycleDetector,
    spacing: f64,
    frames: Vec<Frame>,
    result: Option<LayoutNode>,
}

impl<'a> LayoutComposer<'a> {
    pub fn new(graph: &'a DependencyGraph, detector: &'a CycleDetector, spacing: f64) -> Self {
        Self {
            graph,
            detector,
            spacing,
            frames: Vec::new(),
            result: None,
        }
    }

    /// The composed root, once the walk has left the outermost package.
    pub fn finish(self) -> Option<LayoutNode> {
        self.result
    }

    fn attach(&mut self, node: LayoutNode) {
        match self.frames.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.result = Some(node),
        }
    }
}

fn district_kind(tree: &ContainmentTree, package: &Node, children: &[LayoutNode]) -> DistrictKind {
    if tree.has_subpackages(package.id) {
        DistrictKind::Container
    } else if children.iter().any(|c| c.is_cyclic) {
        DistrictKind::Cyclic
    } else {
        DistrictKind::Leaf
    }
}

impl TreeVisitor for LayoutComposer<'_> {
    fn enter_package(&mut self, _tree: &ContainmentTree, _package: &Node) {
        self.frames.push(Frame {
            children: Vec::new(),
        });
    }

    fn visit_class(&mut self, _tree: &ContainmentTree, class: &Node) {
        let fan_out = self.graph.out_degree(&class.qualified_name) as f64;
        let fan_in = self.graph.in_degree(&class.qualified_name) as f64;
        let side = fan_out + 1.0;
        self.attach(LayoutNode {
            kind: class.kind,
            name: class.name.clone(),
            qualified_name: class.qualified_name.clone(),
            level: class.level,
            footprint: Size::new(side, side),
            position: Point::default(),
            height: fan_in + 1.0,
            is_cyclic: self.detector.is_cyclic(&class.qualified_name),
            district: None,
            children: Vec::new(),
        });
    }

    fn leave_package(&mut self, tree: &ContainmentTree, package: &Node) {
        let Some(frame) = self.frames.pop() else {
            return;
        };

        let mut packer = RectanglePacker::new(self.spacing);
        for child in &frame.children {
            packer.add(
                child.qualified_name.as_str(),
                child.footprint.width,
                child.footprint.height,
            );
        }
        let packing = packer.fit();

        let mut slots: Vec<Option<LayoutNode>> = frame.children.into_iter().map(Some).collect();
        let children: Vec<LayoutNode> = packing
            .placements
            .iter()
            .filter_map(|placement| {
                let mut child = slots[placement.index].take()?;
                child.position = Point::new(placement.x, placement.y);
                Some(child)
            })
            .collect();

        let kind = district_kind(tree, package, &children);
        self.attach(LayoutNode {
            kind: package.kind,
            name: package.name.clone(),
            qualified_name: package.qualified_name.clone(),
            level: package.level,
            footprint: Size::new(packing.width, packing.height),
            position: Point::default(),
            height: 1.0,
            is_cyclic: kind == DistrictKind::Cyclic,
            district: Some(kind),
            children,
        });
    }
}
