use crate::core::EstimatorName;
use crate::report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("ground truth of split {split_index} is zero; relative error is undefined")]
    DivisionByZero { split_index: usize },

    #[error("trial {trial_index} of split {split_index} returned no estimate for {estimator}")]
    MissingEstimate {
        split_index: usize,
        trial_index: usize,
        estimator: EstimatorName,
    },

    #[error("trial {trial_index} of split {split_index} returned unexpected estimator {estimator}")]
    UnexpectedEstimate {
        split_index: usize,
        trial_index: usize,
        estimator: EstimatorName,
    },

    #[error("trial {trial_index} of split {split_index} returned non-finite {estimator} estimate {value}")]
    NonFiniteEstimate {
        split_index: usize,
        trial_index: usize,
        estimator: EstimatorName,
        value: f64,
    },

    #[error("collaborator failed: {0}")]
    Collaborator(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Report(#[from] ReportError),
}
