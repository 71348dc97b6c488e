use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::error::LoadError;
use crate::models::{EvaluationRecord, ResultsDocument};

/// Read-only collection of evaluation records, loaded once per process
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<EvaluationRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<EvaluationRecord>) -> Self {
        Self { records }
    }

    /// Load the results document at `path`
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let store = Self::from_json(&content).map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), records = store.len(), "loaded results document");
        Ok(store)
    }

    /// Parse a results document from JSON text
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let document: ResultsDocument = serde_json::from_str(content)?;
        Ok(document.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvaluationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<ResultsDocument> for RecordStore {
    fn from(document: ResultsDocument) -> Self {
        Self::new(document.detailed_results)
    }
}
