use std::path::PathBuf;
use thiserror::Error;

use crate::comparison::AbsenceReport;

/// Failures while reading the results document. Fatal to the session.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The results document does not exist
    #[error("results file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The document is not valid JSON or does not have the expected shape
    #[error("failed to parse results file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Any other read failure
    #[error("failed to read results file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A selection that cannot be matched. Recoverable; nothing is looked up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("the same model was selected twice ({model}); choose two different models")]
    SameModel { model: String },

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("unknown problem id: {0}")]
    UnknownProblemId(i64),
}

/// Outcome of a single comparison request that produced no view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("no matching data for this selection")]
    NoMatch(AbsenceReport),
}

/// A selection line that could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSelectionError {
    #[error("expected <model_a> <model_b> <dataset> <problem_id>, got {0} field(s)")]
    FieldCount(usize),

    #[error("problem id is not an integer: {0}")]
    ProblemId(String),
}
