mod estimator_name;
mod sample;

pub use estimator_name::{EstimateSet, EstimatorName};
pub use sample::Sample;
