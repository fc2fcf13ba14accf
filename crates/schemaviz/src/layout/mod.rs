//! Layout of schema graphs.
//!
//! Layout runs in two steps:
//! 1. [`driver::LayoutDriver`] turns a [`Schema`](schemaviz_core::schema::Schema)
//!    into a [`Graph`](schemaviz_core::graph::Graph) with random initial
//!    positions inside the canvas.
//! 2. [`force::Engine`] moves the nodes under repulsive and attractive forces
//!    for a fixed iteration budget.
//!
//! The result is a read-only [`Layout`] that renderers consume.

pub mod driver;
pub mod force;

use schemaviz_core::graph::GraphError;
use thiserror::Error;

pub use driver::{Layout, LayoutDriver};
pub use force::{Engine, ForceConfig, SimulationReport};

/// Errors raised while building or simulating a layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The graph has no nodes, so the ideal edge length is undefined.
    #[error("cannot lay out an empty graph")]
    EmptyGraph,

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A node position became NaN or infinite during the simulation.
    #[error("node `{node}` reached a non-finite position in iteration {iteration}")]
    NonFinitePosition { node: String, iteration: usize },

    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
}
