pub mod contract;
pub mod dot;
pub mod graph;
pub mod layout;
pub mod style;
pub mod tikz;

pub use graph::{CladeGraph, VertexId, VertexInfo};
