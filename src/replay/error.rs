use crate::evaluation::EvaluationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("no recorded {what}")]
    MissingRecord { what: String },
}

impl From<ReplayError> for EvaluationError {
    fn from(e: ReplayError) -> Self {
        EvaluationError::Collaborator(Box::new(e))
    }
}
