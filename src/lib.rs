//! Tubegraph
//!
//! Loads subway network CSV data into a property graph: one `Station` node
//! per station identifier, and directed, line-typed connection edges
//! carrying travel time and distance.
//!
//! # Layout
//!
//! - [`graph`]: in-memory property graph (nodes, edges, label and type indices)
//! - [`persistence`]: bincode snapshots of a graph
//! - [`client`]: the `GraphClient` trait, with embedded and HTTP backends
//! - [`loader`]: station and connection loaders and the line registry
//! - [`config`]: loader configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubegraph::{EmbeddedClient, Loader, LoaderConfig, TubeLineList};
//!
//! # async fn run() -> Result<(), tubegraph::LoadError> {
//! let client = Arc::new(EmbeddedClient::new());
//! let loader = Loader::new(client, LoaderConfig::new("data"));
//!
//! let reports = loader.load_all(&TubeLineList::default()).await?;
//! for report in reports {
//!     println!("{}: {} stations created", report.line_name, report.stations.created);
//! }
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod graph;
pub mod loader;
pub mod persistence;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeId, EdgeType, GraphError, GraphResult, GraphStore, Label, Node, NodeId,
    PropertyMap, PropertyValue,
};

pub use persistence::{
    load_snapshot, save_snapshot, GraphSnapshot, PersistenceError, PersistenceResult,
};

pub use client::{
    connect, ClientError, ClientResult, EmbeddedClient, GraphClient, RemoteClient, StorageStats,
};

pub use config::{default_data_dir, project_root, LoaderConfig, MembershipPolicy};

pub use loader::{
    Connection, ConnectionLoadReport, LineLoadReport, LoadError, LoadResult, Loader, Station,
    StationLoadReport, TubeLine, TubeLineList, WipeConfirmation,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
