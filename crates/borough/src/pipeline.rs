//! End-to-end layout: tree, leveling, cycle detection, composition.

use crate::composer::LayoutComposer;
use crate::error::Result;
use crate::graph::{CycleDetector, DependencyGraph};
use crate::leveling::{self, LevelingReport};
use crate::model::CityLayout;
use crate::options::LayoutOptions;
use crate::tree::{self, ContainmentTree};

pub fn layout(graph: &DependencyGraph, options: &LayoutOptions) -> Result<CityLayout> {
    let mut tree = ContainmentTree::from_graph(graph)?;

    let report = if options.leveling {
        leveling::levelize(&mut tree, graph)
    } else {
        LevelingReport::default()
    };

    let detector = CycleDetector::for_graph(graph);
    let mut composer = LayoutComposer::new(graph, &detector, options.spacing);
    tree::walk(&tree, &mut composer);
    let Some(root) = composer.finish() else {
        unreachable!("walking a tree always leaves the root package");
    };

    tracing::debug!(
        nodes = tree.len(),
        cycles = detector.len(),
        removed = report.removed_edges.len(),
        wrong_direction = report.wrong_direction.len(),
        width = root.footprint.width,
        height = root.footprint.height,
        "city layout composed"
    );

    Ok(CityLayout {
        root,
        removed_edges: report.removed_edges,
        wrong_direction: report.wrong_direction,
        cycles: detector.cycles().to_vec(),
    })
}
