//! Schemaviz Core Types and Definitions
//!
//! This crate provides the foundational types shared by every schemaviz
//! crate. It includes:
//!
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Graph**: The node/edge model the layout engine operates on ([`graph`] module)
//! - **Schema**: Typed entity descriptors produced by a schema provider ([`schema`] module)

pub mod geometry;
pub mod graph;
pub mod schema;
