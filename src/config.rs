//! Loader configuration
//!
//! Everything the loaders need is passed in explicitly through
//! [`LoaderConfig`]; nothing is read from globals once a load starts.

use std::path::{Path, PathBuf};

/// Environment variable overriding the project root
pub const PROJECT_ROOT_ENV: &str = "TUBEGRAPH_PROJECT_ROOT";

/// Directory the data tree hangs off: `$TUBEGRAPH_PROJECT_ROOT`, else the
/// current directory.
pub fn project_root() -> PathBuf {
    match std::env::var_os(PROJECT_ROOT_ENV) {
        Some(root) if !root.is_empty() => PathBuf::from(root),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// `<project root>/data`
pub fn default_data_dir() -> PathBuf {
    project_root().join("data")
}

/// How re-loading a line treats a station's membership lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembershipPolicy {
    /// A line name or line identifier already on the station is not added
    /// again, so re-loading a line leaves the lists unchanged.
    #[default]
    Deduplicate,
    /// Append on every load, duplicates included. Reproduces the lists
    /// written by older loaders.
    AppendAlways,
}

impl MembershipPolicy {
    pub fn dedupes(&self) -> bool {
        matches!(self, MembershipPolicy::Deduplicate)
    }
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Root of the CSV tree (`lines/` and `connections/` live under it)
    pub data_dir: PathBuf,
    pub membership: MembershipPolicy,
}

impl LoaderConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            membership: MembershipPolicy::default(),
        }
    }

    pub fn with_membership(mut self, membership: MembershipPolicy) -> Self {
        self.membership = membership;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}
