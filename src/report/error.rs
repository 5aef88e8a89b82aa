use crate::core::EstimatorName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("estimator {0} was not declared for this table")]
    UnknownEstimator(EstimatorName),

    #[error("no confidence interval recorded for {0}")]
    IncompleteTable(EstimatorName),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
