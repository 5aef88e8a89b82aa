mod accumulators;
mod bootstrap;
mod error;

pub use accumulators::{Accumulator, RunningMean};
pub use bootstrap::{BootstrapSettings, ConfidenceInterval, estimate_confidence_interval};
pub use error::EvaluationError;
