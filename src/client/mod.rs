//! Graph clients
//!
//! The loaders never touch a store directly; they go through [`GraphClient`].
//! Two implementations exist:
//!
//! - **`EmbeddedClient`**: in-process `GraphStore`, optionally persisted to
//!   a snapshot file.
//! - **`RemoteClient`**: Cypher over HTTP to a running graph server.
//!
//! [`connect`] picks one from a database URL.

pub mod cypher;
pub mod embedded;
pub mod error;
pub mod models;
pub mod remote;

pub use embedded::EmbeddedClient;
pub use error::{ClientError, ClientResult};
pub use models::{QueryResult, ServerStatus, StorageStats, WireEdge, WireNode};
pub use remote::RemoteClient;

use async_trait::async_trait;
use std::sync::Arc;

use crate::graph::{EdgeId, EdgeType, Label, Node, NodeId, PropertyMap, PropertyValue};

/// Graph operations the loaders need from a backend.
///
/// Lookups return the matching node with the lowest id.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// First node with `label` whose property `key` equals `value`
    async fn find_node(
        &self,
        label: &Label,
        key: &str,
        value: &PropertyValue,
    ) -> ClientResult<Option<Node>>;

    /// First node with `label` whose list property `key` contains `member`
    async fn find_node_with_member(
        &self,
        label: &Label,
        key: &str,
        member: &PropertyValue,
    ) -> ClientResult<Option<Node>>;

    /// Create a node and return its id
    async fn create_node(&self, label: &Label, properties: PropertyMap) -> ClientResult<NodeId>;

    /// Persist the properties of a node fetched earlier and mutated locally
    async fn save_node(&self, node: &Node) -> ClientResult<()>;

    /// Whether an `edge_type` edge runs from `source` to `target`
    async fn edge_exists(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: &EdgeType,
    ) -> ClientResult<bool>;

    /// Create a directed edge and return its id
    async fn create_edge(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: &EdgeType,
        properties: PropertyMap,
    ) -> ClientResult<EdgeId>;

    /// Delete every node and relationship
    async fn delete_all(&self) -> ClientResult<()>;

    /// Node and edge counts
    async fn status(&self) -> ClientResult<StorageStats>;

    /// Make completed writes durable
    async fn flush(&self) -> ClientResult<()> {
        Ok(())
    }

    /// Human-readable backend description for logs
    fn describe(&self) -> String;
}

/// Build a client from a database URL.
///
/// - `memory://`: embedded, discarded on exit
/// - `file://<path>`: embedded, persisted to a snapshot at `<path>`
/// - `http://…` / `https://…`: remote server
pub fn connect(database_url: &str) -> ClientResult<Arc<dyn GraphClient>> {
    let url = database_url.trim();

    if url == "memory://" || url == "memory:" {
        return Ok(Arc::new(EmbeddedClient::new()));
    }
    if let Some(path) = url.strip_prefix("file://") {
        if path.is_empty() {
            return Err(ClientError::UnsupportedUrl(database_url.to_string()));
        }
        return Ok(Arc::new(EmbeddedClient::open(path)?));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(Arc::new(RemoteClient::new(url)));
    }

    Err(ClientError::UnsupportedUrl(database_url.to_string()))
}
