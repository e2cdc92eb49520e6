#![forbid(unsafe_code)]

//! Dependency graph container and cycle detection used by `borough`.
//!
//! The graph stores directed edges between fully-qualified names (`a.b.C -> a.d.E`). Cycles are
//! found with Tarjan's strongly connected components algorithm; only components with more than
//! one member count as cycles.

mod cycles;
mod graph;
pub mod scc;

pub use cycles::CycleDetector;
pub use graph::DependencyGraph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
