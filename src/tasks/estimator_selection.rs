use crate::core::{EstimateSet, EstimatorName, Sample};
use crate::evaluation::{Accumulator, BootstrapSettings, EvaluationError, RunningMean};
use crate::report::{AggregationTable, SplitHistory, SplitRecord};
use crate::tasks::{DataSplitter, OffPolicyTrial, SplitContext, TrialContext};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::Sender;
use tracing::{debug, info};

/// Compares off-policy estimators by their relative estimation error.
///
/// For every split the splitter yields a training partition and the test
/// ground truth; `n_trials` bagged trials are run on the training partition
/// and their estimates averaged per estimator. Each split contributes one
/// relative error per estimator, and after the last split every estimator's
/// errors are summarised with a bootstrap confidence interval.
///
/// The first failing split or trial aborts the run.
pub struct EstimatorSelection<S, T>
where
    S: DataSplitter,
    T: OffPolicyTrial<S::Train>,
{
    splitter: S,
    trial: T,
    estimators: BTreeSet<EstimatorName>,

    n_splits: usize,
    n_trials: usize,
    bootstrap: BootstrapSettings,
    seed: u64,

    history: SplitHistory,
    progress_tx: Option<Sender<SplitRecord>>,
}

impl<S, T> EstimatorSelection<S, T>
where
    S: DataSplitter,
    T: OffPolicyTrial<S::Train>,
{
    pub fn new<I>(
        splitter: S,
        trial: T,
        estimators: I,
        n_splits: usize,
        n_trials: usize,
        bootstrap: BootstrapSettings,
        seed: u64,
    ) -> Result<Self, EvaluationError>
    where
        I: IntoIterator<Item = EstimatorName>,
    {
        if n_splits == 0 {
            return Err(EvaluationError::InvalidInput("n_splits must be > 0".into()));
        }
        if n_trials == 0 {
            return Err(EvaluationError::InvalidInput(
                "n_estimators must be > 0".into(),
            ));
        }
        let estimators: BTreeSet<_> = estimators.into_iter().collect();
        if estimators.is_empty() {
            return Err(EvaluationError::InvalidInput(
                "at least one estimator is required".into(),
            ));
        }
        bootstrap.validate()?;

        Ok(Self {
            splitter,
            trial,
            estimators,
            n_splits,
            n_trials,
            bootstrap,
            seed,
            history: SplitHistory::default(),
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<SplitRecord>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Records of the most recent run.
    pub fn history(&self) -> &SplitHistory {
        &self.history
    }

    pub fn run(&mut self) -> Result<AggregationTable, EvaluationError> {
        self.history = SplitHistory::default();

        let mut errors: BTreeMap<EstimatorName, Vec<f64>> = self
            .estimators
            .iter()
            .map(|&e| (e, Vec::with_capacity(self.n_splits)))
            .collect();

        for split_index in 0..self.n_splits {
            let record = self.run_split(split_index)?;
            info!("\n{record}");

            for (name, &err) in &record.relative_errors {
                if let Some(v) = errors.get_mut(name) {
                    v.push(err);
                }
            }
            if let Some(tx) = &self.progress_tx {
                let _ = tx.send(record.clone());
            }
            self.history.push(record);
        }

        let mut table = AggregationTable::new(self.estimators.iter().copied());
        for (name, values) in errors {
            let sample = Sample::new(values);
            let ci = self.bootstrap.estimate(&sample, self.seed)?;
            debug!(
                estimator = %name,
                mean = ci.mean,
                lower = ci.lower_bound,
                upper = ci.upper_bound,
                "bootstrap interval"
            );
            table.record(name, ci)?;
        }
        Ok(table)
    }

    fn run_split(&mut self, split_index: usize) -> Result<SplitRecord, EvaluationError> {
        let partition = self.splitter.split(SplitContext {
            split_index,
            seed: split_index as u64,
        })?;
        let ground_truth = partition.ground_truth;
        if !ground_truth.is_finite() {
            return Err(EvaluationError::InvalidInput(format!(
                "ground truth of split {split_index} is not finite: {ground_truth}"
            )));
        }
        if ground_truth == 0.0 {
            return Err(EvaluationError::DivisionByZero { split_index });
        }

        let mut bagged: BTreeMap<EstimatorName, RunningMean> = self
            .estimators
            .iter()
            .map(|&e| (e, RunningMean::default()))
            .collect();

        for trial_index in 0..self.n_trials {
            let ctx = TrialContext {
                split_index,
                trial_index,
                seed: trial_seed(self.seed, split_index, trial_index),
            };
            let estimates = self.trial.run_trial(&partition.train, ctx)?;
            self.check_estimates(&estimates, ctx)?;
            for (name, acc) in bagged.iter_mut() {
                acc.add(estimates[name]);
            }
        }

        let estimates: EstimateSet = bagged.iter().map(|(&k, acc)| (k, acc.value())).collect();
        let relative_errors = estimates
            .iter()
            .map(|(&k, &v)| (k, relative_error(v, ground_truth)))
            .collect();

        Ok(SplitRecord {
            split_index,
            ground_truth,
            estimates,
            relative_errors,
        })
    }

    fn check_estimates(&self, estimates: &EstimateSet, ctx: TrialContext) -> Result<(), EvaluationError> {
        if let Some(&extra) = estimates.keys().find(|k| !self.estimators.contains(*k)) {
            return Err(EvaluationError::UnexpectedEstimate {
                split_index: ctx.split_index,
                trial_index: ctx.trial_index,
                estimator: extra,
            });
        }
        for &name in &self.estimators {
            match estimates.get(&name) {
                None => {
                    return Err(EvaluationError::MissingEstimate {
                        split_index: ctx.split_index,
                        trial_index: ctx.trial_index,
                        estimator: name,
                    });
                }
                Some(&value) if !value.is_finite() => {
                    return Err(EvaluationError::NonFiniteEstimate {
                        split_index: ctx.split_index,
                        trial_index: ctx.trial_index,
                        estimator: name,
                        value,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// `|(estimate - ground_truth) / ground_truth|`; callers reject a zero ground truth.
#[inline]
pub fn relative_error(estimate: f64, ground_truth: f64) -> f64 {
    ((estimate - ground_truth) / ground_truth).abs()
}

/// Seed of one trial, a SplitMix64 mix of the run seed and the trial's
/// position. Independent of the order in which trials are executed.
pub fn trial_seed(seed: u64, split_index: usize, trial_index: usize) -> u64 {
    let mut z = seed
        ^ (split_index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (trial_index as u64).wrapping_add(1).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
