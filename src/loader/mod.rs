//! CSV loaders
//!
//! A line loads in two phases, stations first and then connections, since
//! connection rows refer to stations by their line-scoped identifiers.
//! [`Loader`] runs those phases line by line against a [`GraphClient`] and
//! stops at the first error.

pub mod connection;
pub mod csv_rows;
pub mod error;
pub mod line;
pub mod station;

pub use connection::{load_connections, Connection, ConnectionLoadReport, ConnectionRecord};
pub use error::{FieldError, LoadError, LoadResult};
pub use line::{TubeLine, TubeLineList};
pub use station::{
    load_stations, merge_station, MergeOutcome, Station, StationLoadReport, StationMatch,
    StationRecord, STATION_LABEL,
};

use std::sync::Arc;
use tracing::{info, warn};

use crate::client::{GraphClient, StorageStats};
use crate::config::LoaderConfig;

/// CSV booleans: only the exact text `True` is true
pub fn parse_flag(raw: &str) -> bool {
    raw == "True"
}

/// Guard for operations that delete the whole graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeConfirmation {
    Confirmed,
    NotConfirmed,
}

impl From<bool> for WipeConfirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            WipeConfirmation::Confirmed
        } else {
            WipeConfirmation::NotConfirmed
        }
    }
}

/// Outcome of loading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLoadReport {
    pub line_name: String,
    pub stations: StationLoadReport,
    pub connections: ConnectionLoadReport,
}

pub struct Loader {
    client: Arc<dyn GraphClient>,
    config: LoaderConfig,
}

impl Loader {
    pub fn new(client: Arc<dyn GraphClient>, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &Arc<dyn GraphClient> {
        &self.client
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Stations then connections for one line. Writes are flushed after
    /// each phase.
    pub async fn load_line(&self, line: &TubeLine) -> LoadResult<LineLoadReport> {
        let client = self.client.as_ref();

        let stations = load_stations(client, line, &self.config).await?;
        client.flush().await?;

        let connections = load_connections(client, line, &self.config).await?;
        client.flush().await?;

        Ok(LineLoadReport {
            line_name: line.line_name.clone(),
            stations,
            connections,
        })
    }

    /// Load each line in order, stopping at the first failure
    pub async fn load_lines<'a, I>(&self, lines: I) -> LoadResult<Vec<LineLoadReport>>
    where
        I: IntoIterator<Item = &'a TubeLine>,
    {
        let mut reports = Vec::new();
        for line in lines {
            reports.push(self.load_line(line).await?);
        }
        Ok(reports)
    }

    /// Load every line in the registry
    pub async fn load_all(&self, registry: &TubeLineList) -> LoadResult<Vec<LineLoadReport>> {
        info!(
            "Loading {} line(s) into {}",
            registry.len(),
            self.client.describe()
        );
        self.load_lines(registry).await
    }

    /// Delete every node and relationship. Returns the counts that were
    /// removed.
    pub async fn wipe(&self, confirmation: WipeConfirmation) -> LoadResult<StorageStats> {
        if confirmation != WipeConfirmation::Confirmed {
            return Err(LoadError::WipeNotConfirmed);
        }

        let before = self.client.status().await?;
        warn!(
            nodes = before.nodes,
            edges = before.edges,
            "Wiping {}",
            self.client.describe()
        );
        self.client.delete_all().await?;
        self.client.flush().await?;
        Ok(before)
    }

    /// Wipe, then load the given lines
    pub async fn reload<'a, I>(
        &self,
        lines: I,
        confirmation: WipeConfirmation,
    ) -> LoadResult<Vec<LineLoadReport>>
    where
        I: IntoIterator<Item = &'a TubeLine>,
    {
        self.wipe(confirmation).await?;
        self.load_lines(lines).await
    }

    /// Wipe, then load every line in the registry
    pub async fn reload_all(
        &self,
        registry: &TubeLineList,
        confirmation: WipeConfirmation,
    ) -> LoadResult<Vec<LineLoadReport>> {
        self.wipe(confirmation).await?;
        self.load_all(registry).await
    }
}
