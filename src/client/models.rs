//! Wire models for the graph server HTTP API
//!
//! `RemoteClient` decodes `/api/query` and `/api/status` responses into
//! these types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::graph::{EdgeId, Label, Node, NodeId, PropertyMap, PropertyValue};

use super::error::{ClientError, ClientResult};

/// A graph node returned from a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireNode {
    /// Node ID
    pub id: String,
    /// Node labels
    pub labels: Vec<String>,
    /// Node properties
    pub properties: HashMap<String, serde_json::Value>,
}

impl WireNode {
    /// Convert into a graph node. Ids must be numeric.
    pub fn into_node(self) -> ClientResult<Node> {
        let id = parse_id(&self.id)?;
        let properties: PropertyMap = self
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), PropertyValue::from_json(v)))
            .collect();
        let labels = self.labels.into_iter().map(Label::new).collect();
        Ok(Node::new_with_properties(NodeId::new(id), labels, properties))
    }
}

/// A graph edge returned from a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEdge {
    /// Edge ID
    pub id: String,
    /// Source node ID
    pub source: String,
    /// Target node ID
    pub target: String,
    /// Relationship type
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Edge properties
    pub properties: HashMap<String, serde_json::Value>,
}

impl WireEdge {
    pub fn edge_id(&self) -> ClientResult<EdgeId> {
        parse_id(&self.id).map(EdgeId::new)
    }
}

/// Result of executing a Cypher query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Graph nodes referenced in the result
    #[serde(default)]
    pub nodes: Vec<WireNode>,
    /// Graph edges referenced in the result
    #[serde(default)]
    pub edges: Vec<WireEdge>,
    /// Column names
    #[serde(default)]
    pub columns: Vec<String>,
    /// Tabular result rows
    #[serde(default)]
    pub records: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    /// Number of result records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the result is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Server status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Server version
    pub version: String,
    /// Storage statistics
    pub storage: StorageStats,
}

/// Storage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    /// Number of nodes
    pub nodes: u64,
    /// Number of edges
    pub edges: u64,
}

fn parse_id(raw: &str) -> ClientResult<u64> {
    raw.parse()
        .map_err(|_| ClientError::UnexpectedResponse(format!("non-numeric id '{}'", raw)))
}
