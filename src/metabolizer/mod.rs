//! Expansión recursiva de productos de transformación.
mod expander;
mod tree;

pub use expander::{ExpansionRequest, Expander};
pub use tree::{NodeId, TransformationNode, TransformationRecord, TransformationTree};
