//! Persistence for the embedded graph store

pub mod snapshot;

pub use snapshot::{load_snapshot, save_snapshot, GraphSnapshot, SNAPSHOT_FORMAT_VERSION};

use crate::graph::GraphError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot is inconsistent: {0}")]
    Inconsistent(#[from] GraphError),

    #[error("Unsupported snapshot format version {0}")]
    UnsupportedVersion(u32),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
