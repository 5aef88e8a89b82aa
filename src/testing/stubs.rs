use crate::core::{EstimateSet, EstimatorName};
use crate::evaluation::EvaluationError;
use crate::tasks::{DataSplitter, OffPolicyTrial, Partition, SplitContext, TrialContext};
use std::sync::{Arc, Mutex};
use strum::IntoEnumIterator;

/// Same `value` for every estimator.
pub fn constant_estimates(value: f64) -> EstimateSet {
    EstimatorName::iter().map(|e| (e, value)).collect()
}

/// Splitter replaying a fixed list of ground truths (cycled) with an empty
/// training partition. Records every context it is called with.
pub struct FixedSplitter {
    ground_truths: Vec<f64>,
    seen: Arc<Mutex<Vec<SplitContext>>>,
}

impl FixedSplitter {
    pub fn new(ground_truths: Vec<f64>) -> Self {
        assert!(!ground_truths.is_empty(), "need at least one ground truth");
        Self {
            ground_truths,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn constant(ground_truth: f64) -> Self {
        Self::new(vec![ground_truth])
    }

    pub fn seen(&self) -> Arc<Mutex<Vec<SplitContext>>> {
        Arc::clone(&self.seen)
    }
}

impl DataSplitter for FixedSplitter {
    type Train = ();

    fn split(&mut self, ctx: SplitContext) -> Result<Partition<()>, EvaluationError> {
        self.seen.lock().unwrap().push(ctx);
        let ground_truth = self.ground_truths[ctx.split_index % self.ground_truths.len()];
        Ok(Partition {
            train: (),
            ground_truth,
        })
    }
}

/// Trial returning fixed estimates while counting its invocations.
pub struct CountingTrial {
    estimates: EstimateSet,
    calls: Arc<Mutex<Vec<TrialContext>>>,
}

#[derive(Clone)]
pub struct TrialHandle {
    calls: Arc<Mutex<Vec<TrialContext>>>,
}

impl TrialHandle {
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn contexts(&self) -> Vec<TrialContext> {
        self.calls.lock().unwrap().clone()
    }
}

impl CountingTrial {
    pub fn new(estimates: EstimateSet) -> (Self, TrialHandle) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                estimates,
                calls: Arc::clone(&calls),
            },
            TrialHandle { calls },
        )
    }
}

impl<T> OffPolicyTrial<T> for CountingTrial {
    fn run_trial(&mut self, _train: &T, ctx: TrialContext) -> Result<EstimateSet, EvaluationError> {
        self.calls.lock().unwrap().push(ctx);
        Ok(self.estimates.clone())
    }
}
