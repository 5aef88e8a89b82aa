mod collaborators;
mod estimator_selection;

pub use collaborators::{DataSplitter, OffPolicyTrial, Partition, SplitContext, TrialContext};
pub use estimator_selection::{EstimatorSelection, relative_error, trial_seed};
