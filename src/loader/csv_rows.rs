//! Streaming CSV reader shared by the loaders
//!
//! Rows are deserialised one at a time against the header row, so a bad
//! record only surfaces when the loader reaches it and earlier rows have
//! already been applied.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::error::{LoadError, LoadResult};

/// A deserialised row and the 1-based line it starts on (the header is line 1)
#[derive(Debug, Clone)]
pub struct CsvRow<T> {
    pub row: u64,
    pub value: T,
}

pub struct CsvRows<T> {
    path: PathBuf,
    reader: csv::Reader<File>,
    headers: csv::StringRecord,
    record: csv::StringRecord,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> CsvRows<T> {
    /// Open `path` as comma-delimited, double-quoted CSV with a header row
    pub fn open(path: &Path) -> LoadResult<Self> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .has_headers(true)
            .from_reader(file);
        let headers = reader.headers().map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let headers = headers.clone();

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
            record: csv::StringRecord::new(),
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn csv_error(&self, source: csv::Error) -> LoadError {
        LoadError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T: DeserializeOwned> Iterator for CsvRows<T> {
    type Item = LoadResult<CsvRow<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let row = self.record.position().map(|p| p.line()).unwrap_or(0);
                let parsed = self
                    .record
                    .deserialize::<T>(Some(&self.headers))
                    .map(|value| CsvRow { row, value })
                    .map_err(|e| self.csv_error(e));
                Some(parsed)
            }
            Err(e) => Some(Err(self.csv_error(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        a: String,
        b: String,
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_rows_carry_line_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pairs.csv", "b,a\n2,1\n\"x,y\",z\n");

        let rows: Vec<CsvRow<Pair>> = CsvRows::open(&path)
            .unwrap()
            .collect::<LoadResult<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].value, Pair { a: "1".into(), b: "2".into() });
        assert_eq!(rows[1].row, 3);
        assert_eq!(rows[1].value.b, "x,y");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = CsvRows::<Pair>::open(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pairs.csv", "a\n1\n");

        let mut rows = CsvRows::<Pair>::open(&path).unwrap();
        assert!(matches!(rows.next(), Some(Err(LoadError::Csv { .. }))));
    }
}
