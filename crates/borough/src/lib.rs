#![forbid(unsafe_code)]

//! Software-city layout engine.
//!
//! A dependency graph between dotted qualified names is turned into a nested city: packages
//! become districts, classes become buildings. Siblings are leveled by their dependencies
//! (cycles broken first) and packed into near-square containers bottom-up.
//!
//! ```
//! use borough::{DependencyGraph, LayoutOptions};
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_edge("app.Main", "core.Service");
//! graph.add_edge("core.Service", "core.Repo");
//!
//! let city = borough::layout(&graph, &LayoutOptions::default()).unwrap();
//! assert!(city.find("core.Repo").is_some());
//! ```

pub use borough_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod composer;
pub mod error;
pub mod leveling;
pub mod model;
pub mod options;
pub mod packer;
mod pipeline;
pub mod tree;

pub use error::{Error, Result};
pub use graph::{CycleDetector, DependencyGraph};
pub use leveling::{LevelingReport, NamedEdge, levelize};
pub use model::{CityLayout, DistrictKind, LayoutNode, Point, Size};
pub use options::LayoutOptions;
pub use packer::{Packing, Placement, RectanglePacker};
pub use pipeline::layout;
pub use tree::{ContainmentTree, Node, NodeId, NodeKind, TreeVisitor, walk};
