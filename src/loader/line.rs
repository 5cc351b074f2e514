//! Tube line metadata and the registry of loadable lines

use std::path::{Path, PathBuf};

use crate::graph::EdgeType;

use super::error::{LoadError, LoadResult};

/// Static description of one line. Not persisted as a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TubeLine {
    pub line_name: String,
    pub line_colour: String,
    /// Stem of the line's CSV files, also used as its relationship type
    pub data_file_name: String,
}

impl TubeLine {
    pub fn new(
        line_name: impl Into<String>,
        line_colour: impl Into<String>,
        data_file_name: impl Into<String>,
    ) -> Self {
        Self {
            line_name: line_name.into(),
            line_colour: line_colour.into(),
            data_file_name: data_file_name.into(),
        }
    }

    pub fn piccadilly() -> Self {
        Self::new("Piccadilly", "#1C1865", "piccadilly")
    }

    /// Relationship type of this line's connection edges
    pub fn edge_type(&self) -> EdgeType {
        EdgeType::new(self.data_file_name.as_str())
    }

    /// `<data_dir>/lines/<data_file_name>.csv`
    pub fn stations_path(&self, data_dir: &Path) -> PathBuf {
        data_dir
            .join("lines")
            .join(format!("{}.csv", self.data_file_name))
    }

    /// `<data_dir>/connections/<data_file_name>.csv`
    pub fn connections_path(&self, data_dir: &Path) -> PathBuf {
        data_dir
            .join("connections")
            .join(format!("{}.csv", self.data_file_name))
    }

    fn answers_to(&self, name: &str) -> bool {
        self.line_name.eq_ignore_ascii_case(name) || self.data_file_name.eq_ignore_ascii_case(name)
    }
}

/// The lines a full load covers, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TubeLineList {
    lines: Vec<TubeLine>,
}

impl TubeLineList {
    pub fn new(lines: Vec<TubeLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[TubeLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TubeLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look a line up by display name or data file name, ignoring case
    pub fn get(&self, name: &str) -> Option<&TubeLine> {
        let name = name.trim();
        self.lines.iter().find(|line| line.answers_to(name))
    }

    /// Resolve every name, failing on the first unknown one
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> LoadResult<Vec<&TubeLine>> {
        names
            .iter()
            .map(|name| {
                self.get(name.as_ref())
                    .ok_or_else(|| LoadError::UnknownLine(name.as_ref().to_string()))
            })
            .collect()
    }
}

impl Default for TubeLineList {
    fn default() -> Self {
        Self::new(vec![TubeLine::piccadilly()])
    }
}

impl<'a> IntoIterator for &'a TubeLineList {
    type Item = &'a TubeLine;
    type IntoIter = std::slice::Iter<'a, TubeLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piccadilly_metadata() {
        let line = TubeLine::piccadilly();
        assert_eq!(line.line_name, "Piccadilly");
        assert_eq!(line.line_colour, "#1C1865");
        assert_eq!(line.edge_type(), EdgeType::new("piccadilly"));

        let data = Path::new("/srv/data");
        assert_eq!(
            line.stations_path(data),
            PathBuf::from("/srv/data/lines/piccadilly.csv")
        );
        assert_eq!(
            line.connections_path(data),
            PathBuf::from("/srv/data/connections/piccadilly.csv")
        );
    }

    #[test]
    fn test_registry_lookup() {
        let registry = TubeLineList::default();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("PICCADILLY").is_some());
        assert!(registry.get(" piccadilly ").is_some());
        assert!(registry.get("Victoria").is_none());

        let selected = registry.select(&["Piccadilly"]).unwrap();
        assert_eq!(selected, vec![&TubeLine::piccadilly()]);

        match registry.select(&["piccadilly", "Jubilee"]) {
            Err(LoadError::UnknownLine(name)) => assert_eq!(name, "Jubilee"),
            other => panic!("expected UnknownLine, got {:?}", other.map(|v| v.len())),
        }
    }
}
