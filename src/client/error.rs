//! Error types for graph clients

use crate::graph::GraphError;
use crate::persistence::PersistenceError;
use thiserror::Error;

/// Errors that can occur when talking to a graph backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Embedded store rejected an operation
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Query parsing or execution error reported by a server
    #[error("Query error: {0}")]
    QueryError(String),

    /// Connection error (remote mode)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Server answered with something we cannot interpret
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Snapshot load or save failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Database URL names a scheme we do not support
    #[error("Unsupported database URL '{0}' (expected memory://, file://<path>, http:// or https://)")]
    UnsupportedUrl(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
