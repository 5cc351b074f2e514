//! Error types for CSV loading

use std::path::PathBuf;
use thiserror::Error;

use crate::client::ClientError;

/// Loader errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed CSV in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{} row {row}: invalid {field} '{value}'", path.display())]
    InvalidField {
        path: PathBuf,
        row: u64,
        field: &'static str,
        value: String,
    },

    #[error(
        "{} row {row}: no station found for {} (from_station={from_station}, to_station={to_station})",
        path.display(),
        missing.join(", ")
    )]
    MissingEndpoint {
        path: PathBuf,
        row: u64,
        from_station: String,
        to_station: String,
        /// Identifiers that matched no station
        missing: Vec<String>,
    },

    #[error("Unknown tube line '{0}'")]
    UnknownLine(String),

    #[error("Refusing to wipe the graph without confirmation")]
    WipeNotConfirmed,

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// A field that failed to parse, before the file and row are known
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
}

impl FieldError {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn at(self, path: impl Into<PathBuf>, row: u64) -> LoadError {
        LoadError::InvalidField {
            path: path.into(),
            row,
            field: self.field,
            value: self.value,
        }
    }
}
