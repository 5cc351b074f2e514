//! In-process graph client
//!
//! Uses GraphStore directly, no network needed. Optionally backed by a
//! snapshot file so a load survives the process.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::graph::{EdgeId, EdgeType, GraphStore, Label, Node, NodeId, PropertyMap, PropertyValue};
use crate::persistence::{load_snapshot, save_snapshot};

use super::error::ClientResult;
use super::models::StorageStats;
use super::GraphClient;

/// In-process client that wraps a GraphStore directly.
///
/// Ideal for tests and for loading into a local snapshot file.
pub struct EmbeddedClient {
    store: Arc<RwLock<GraphStore>>,
    snapshot_path: Option<PathBuf>,
}

impl EmbeddedClient {
    /// Create a new EmbeddedClient with a fresh empty graph store
    pub fn new() -> Self {
        Self::with_store(Arc::new(RwLock::new(GraphStore::new())))
    }

    /// Create an EmbeddedClient wrapping an existing store
    pub fn with_store(store: Arc<RwLock<GraphStore>>) -> Self {
        Self {
            store,
            snapshot_path: None,
        }
    }

    /// Open a snapshot-backed client. The file is read now if it exists and
    /// rewritten on every `flush`.
    pub fn open(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref().to_path_buf();
        let store = load_snapshot(&path)?;
        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            snapshot_path: Some(path),
        })
    }

    /// Get a reference to the underlying store
    pub fn store(&self) -> &Arc<RwLock<GraphStore>> {
        &self.store
    }

    /// Acquire a read lock on the store.
    pub async fn store_read(&self) -> tokio::sync::RwLockReadGuard<'_, GraphStore> {
        self.store.read().await
    }

    /// Snapshot file this client persists to, if any
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }
}

impl Default for EmbeddedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphClient for EmbeddedClient {
    async fn find_node(
        &self,
        label: &Label,
        key: &str,
        value: &PropertyValue,
    ) -> ClientResult<Option<Node>> {
        let store = self.store.read().await;
        Ok(store.find_node_by_property(label, key, value).cloned())
    }

    async fn find_node_with_member(
        &self,
        label: &Label,
        key: &str,
        member: &PropertyValue,
    ) -> ClientResult<Option<Node>> {
        let store = self.store.read().await;
        Ok(store.find_node_with_member(label, key, member).cloned())
    }

    async fn create_node(&self, label: &Label, properties: PropertyMap) -> ClientResult<NodeId> {
        let mut store = self.store.write().await;
        Ok(store.create_node_with_properties(vec![label.clone()], properties))
    }

    async fn save_node(&self, node: &Node) -> ClientResult<()> {
        let mut store = self.store.write().await;
        store.replace_node_properties(node.id, node.properties.clone())?;
        Ok(())
    }

    async fn edge_exists(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: &EdgeType,
    ) -> ClientResult<bool> {
        let store = self.store.read().await;
        Ok(store.edge_exists(source, target, edge_type))
    }

    async fn create_edge(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: &EdgeType,
        properties: PropertyMap,
    ) -> ClientResult<EdgeId> {
        let mut store = self.store.write().await;
        Ok(store.create_edge_with_properties(source, target, edge_type.clone(), properties)?)
    }

    async fn delete_all(&self) -> ClientResult<()> {
        let mut store = self.store.write().await;
        store.clear();
        Ok(())
    }

    async fn status(&self) -> ClientResult<StorageStats> {
        let store = self.store.read().await;
        Ok(StorageStats {
            nodes: store.node_count() as u64,
            edges: store.edge_count() as u64,
        })
    }

    async fn flush(&self) -> ClientResult<()> {
        if let Some(path) = &self.snapshot_path {
            let store = self.store.read().await;
            save_snapshot(&store, path)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.snapshot_path {
            Some(path) => format!("embedded graph (snapshot {})", path.display()),
            None => "embedded graph (in memory)".to_string(),
        }
    }
}
