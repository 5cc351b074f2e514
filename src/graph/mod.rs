//! Core property graph implementation
//!
//! This module implements the property graph data model with:
//! - Nodes with labels and properties
//! - Directed, typed edges with properties
//! - In-memory storage with adjacency lists and label / edge-type indices

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStore};
pub use types::{EdgeId, EdgeType, Label, NodeId};
