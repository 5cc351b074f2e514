//! Single-file graph snapshots
//!
//! The whole store is written as one bincode document. Writes go to a
//! sibling temp file first and are renamed into place, so a crash never
//! leaves a half-written snapshot behind.

use crate::graph::{Edge, GraphStore, Node};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{PersistenceError, PersistenceResult};

/// Format version written into every snapshot
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serialized form of a graph store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub format_version: u32,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    /// Capture the current contents of a store
    pub fn capture(store: &GraphStore) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            nodes: store.all_nodes().into_iter().cloned().collect(),
            edges: store.all_edges().into_iter().cloned().collect(),
        }
    }

    /// Rebuild a store, re-deriving adjacency lists and indices
    pub fn restore(self) -> PersistenceResult<GraphStore> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(self.format_version));
        }

        let mut store = GraphStore::new();
        for node in self.nodes {
            store.insert_recovered_node(node)?;
        }
        for edge in self.edges {
            store.insert_recovered_edge(edge)?;
        }
        Ok(store)
    }
}

/// Write `store` to `path`
pub fn save_snapshot(store: &GraphStore, path: &Path) -> PersistenceResult<()> {
    let snapshot = GraphSnapshot::capture(store);
    let tmp_path = temp_path(path);

    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;

    info!(
        "Saved snapshot to {:?} ({} nodes, {} edges)",
        path,
        snapshot.nodes.len(),
        snapshot.edges.len()
    );
    Ok(())
}

/// Read a store from `path`. A missing file yields an empty store.
pub fn load_snapshot(path: &Path) -> PersistenceResult<GraphStore> {
    if !path.exists() {
        debug!("No snapshot at {:?}, starting empty", path);
        return Ok(GraphStore::new());
    }

    let file = File::open(path)?;
    let snapshot: GraphSnapshot = bincode::deserialize_from(BufReader::new(file))?;
    info!(
        "Loaded snapshot from {:?} ({} nodes, {} edges)",
        path,
        snapshot.nodes.len(),
        snapshot.edges.len()
    );
    snapshot.restore()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
