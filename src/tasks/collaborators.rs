use crate::core::EstimateSet;
use crate::evaluation::EvaluationError;

/// Identifies one train/test split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitContext {
    pub split_index: usize,
    /// Seed the splitter must use to draw the partition.
    pub seed: u64,
}

/// Identifies one bagged trial within a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialContext {
    pub split_index: usize,
    pub trial_index: usize,
    /// Seed for the trial's bootstrap draw of the training data and its
    /// simulation. Depends only on the run seed and the indices.
    pub seed: u64,
}

/// Result of splitting logged feedback: an opaque training partition and the
/// mean observed reward of the test partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub train: T,
    pub ground_truth: f64,
}

/// Produces train/test partitions of the logged bandit feedback.
pub trait DataSplitter {
    /// Training data handed to every trial of the split.
    type Train;

    fn split(&mut self, ctx: SplitContext) -> Result<Partition<Self::Train>, EvaluationError>;
}

/// Runs one bagged simulation on a training partition and returns each
/// estimator's policy-value estimate for the counterfactual policy.
pub trait OffPolicyTrial<T> {
    fn run_trial(&mut self, train: &T, ctx: TrialContext) -> Result<EstimateSet, EvaluationError>;
}

impl<T, F> OffPolicyTrial<T> for F
where
    F: FnMut(&T, TrialContext) -> Result<EstimateSet, EvaluationError>,
{
    fn run_trial(&mut self, train: &T, ctx: TrialContext) -> Result<EstimateSet, EvaluationError> {
        self(train, ctx)
    }
}
