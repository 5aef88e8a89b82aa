use crate::core::{EstimateSet, EstimatorName};
use crate::evaluation::EvaluationError;
use crate::replay::ReplayError;
use crate::replay::table::CsvTable;
use crate::tasks::{DataSplitter, OffPolicyTrial, Partition, SplitContext, TrialContext};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Ground truth of each split, read from a `split,ground_truth` file.
#[derive(Debug, Clone, Default)]
pub struct RecordedSplits {
    ground_truths: BTreeMap<usize, f64>,
}

impl RecordedSplits {
    pub fn from_csv(path: &Path) -> Result<Self, ReplayError> {
        let table = CsvTable::read(path)?;
        let split_col = table.column("split")?;
        let gt_col = table.column("ground_truth")?;

        let mut ground_truths = BTreeMap::new();
        for (line, fields) in table.rows() {
            let split: usize = table.field(line, fields, split_col)?;
            let gt: f64 = table.field(line, fields, gt_col)?;
            if ground_truths.insert(split, gt).is_some() {
                return Err(table.parse_error(line, format!("duplicate split {split}")));
            }
        }
        Ok(Self { ground_truths })
    }

    pub fn len(&self) -> usize {
        self.ground_truths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ground_truths.is_empty()
    }
}

impl FromIterator<(usize, f64)> for RecordedSplits {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        Self {
            ground_truths: iter.into_iter().collect(),
        }
    }
}

impl DataSplitter for RecordedSplits {
    type Train = ();

    fn split(&mut self, ctx: SplitContext) -> Result<Partition<()>, EvaluationError> {
        let ground_truth = self
            .ground_truths
            .get(&ctx.split_index)
            .copied()
            .ok_or_else(|| ReplayError::MissingRecord {
                what: format!("ground truth for split {}", ctx.split_index),
            })?;
        Ok(Partition {
            train: (),
            ground_truth,
        })
    }
}

/// Estimates of each (split, trial), read from a
/// `split,trial,estimator,estimate` file with one row per estimator.
#[derive(Debug, Clone, Default)]
pub struct RecordedTrials {
    estimates: BTreeMap<(usize, usize), EstimateSet>,
}

impl RecordedTrials {
    pub fn from_csv(path: &Path) -> Result<Self, ReplayError> {
        let table = CsvTable::read(path)?;
        let split_col = table.column("split")?;
        let trial_col = table.column("trial")?;
        let est_col = table.column("estimator")?;
        let value_col = table.column("estimate")?;

        let mut estimates: BTreeMap<(usize, usize), EstimateSet> = BTreeMap::new();
        for (line, fields) in table.rows() {
            let split: usize = table.field(line, fields, split_col)?;
            let trial: usize = table.field(line, fields, trial_col)?;
            let name = EstimatorName::from_str(&fields[est_col]).map_err(|_| {
                table.parse_error(line, format!("unknown estimator '{}'", fields[est_col]))
            })?;
            let value: f64 = table.field(line, fields, value_col)?;

            let entry = estimates.entry((split, trial)).or_default();
            if entry.insert(name, value).is_some() {
                return Err(table.parse_error(
                    line,
                    format!("duplicate {name} estimate for split {split}, trial {trial}"),
                ));
            }
        }
        Ok(Self { estimates })
    }

    pub fn insert(&mut self, split_index: usize, trial_index: usize, estimates: EstimateSet) {
        self.estimates.insert((split_index, trial_index), estimates);
    }

    /// Number of recorded (split, trial) pairs.
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}

impl<T> OffPolicyTrial<T> for RecordedTrials {
    fn run_trial(&mut self, _train: &T, ctx: TrialContext) -> Result<EstimateSet, EvaluationError> {
        self.estimates
            .get(&(ctx.split_index, ctx.trial_index))
            .cloned()
            .ok_or_else(|| {
                ReplayError::MissingRecord {
                    what: format!(
                        "estimates for split {}, trial {}",
                        ctx.split_index, ctx.trial_index
                    ),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::BootstrapSettings;
    use crate::tasks::EstimatorSelection;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, contents).unwrap();
        p
    }

    fn ctx(split_index: usize, trial_index: usize) -> TrialContext {
        TrialContext {
            split_index,
            trial_index,
            seed: 0,
        }
    }

    #[test]
    fn reads_ground_truths() {
        let dir = tempdir().unwrap();
        let p = write(&dir, "gt.csv", "# recorded\nsplit,ground_truth\n0,0.0035\n\n1,0.004\n");
        let mut splits = RecordedSplits::from_csv(&p).unwrap();
        assert_eq!(splits.len(), 2);
        let part = splits
            .split(SplitContext {
                split_index: 1,
                seed: 1,
            })
            .unwrap();
        assert_eq!(part.ground_truth, 0.004);

        let err = splits
            .split(SplitContext {
                split_index: 2,
                seed: 2,
            })
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Collaborator(_)));
    }

    #[test]
    fn columns_may_come_in_any_order() {
        let dir = tempdir().unwrap();
        let p = write(
            &dir,
            "est.csv",
            "estimate,estimator,trial,split\n0.5,DM,0,0\n0.25,ipw,0,0\n",
        );
        let mut trials = RecordedTrials::from_csv(&p).unwrap();
        let got = trials.run_trial(&(), ctx(0, 0)).unwrap();
        assert_eq!(got[&EstimatorName::Dm], 0.5);
        assert_eq!(got[&EstimatorName::Ipw], 0.25);
        assert!(trials.run_trial(&(), ctx(0, 1)).is_err());
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let dir = tempdir().unwrap();
        let p = write(&dir, "gt.csv", "split,ground_truth\n0,0.1\nx,0.2\n");
        match RecordedSplits::from_csv(&p).unwrap_err() {
            ReplayError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }

        let p = write(&dir, "est.csv", "split,trial,estimator,estimate\n0,0,snips,0.1\n");
        assert!(matches!(
            RecordedTrials::from_csv(&p).unwrap_err(),
            ReplayError::Parse { line: 2, .. }
        ));

        let p = write(&dir, "dup.csv", "split,ground_truth\n0,0.1\n0,0.2\n");
        assert!(matches!(
            RecordedSplits::from_csv(&p).unwrap_err(),
            ReplayError::Parse { line: 3, .. }
        ));

        let p = write(&dir, "short.csv", "split,ground_truth\n0\n");
        assert!(matches!(
            RecordedSplits::from_csv(&p).unwrap_err(),
            ReplayError::Parse { line: 2, .. }
        ));
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempdir().unwrap();
        let p = write(&dir, "gt.csv", "split,reward\n0,0.1\n");
        let err = RecordedSplits::from_csv(&p).unwrap_err();
        assert!(err.to_string().contains("ground_truth"), "{err}");
    }

    #[test]
    fn replayed_run_end_to_end() {
        let dir = tempdir().unwrap();
        let gt = write(&dir, "gt.csv", "split,ground_truth\n0,0.5\n1,0.25\n");
        let mut est = String::from("split,trial,estimator,estimate\n");
        for split in 0..2 {
            for trial in 0..2 {
                est.push_str(&format!("{split},{trial},dm,0.5\n"));
                est.push_str(&format!("{split},{trial},ipw,0.25\n"));
                est.push_str(&format!("{split},{trial},dr,0.375\n"));
            }
        }
        let est = write(&dir, "est.csv", &est);

        let mut sel = EstimatorSelection::new(
            RecordedSplits::from_csv(&gt).unwrap(),
            RecordedTrials::from_csv(&est).unwrap(),
            [EstimatorName::Dm, EstimatorName::Ipw, EstimatorName::Dr],
            2,
            2,
            BootstrapSettings {
                n_resamples: 100,
                confidence_level: 0.95,
            },
            12345,
        )
        .unwrap();
        let table = sel.run().unwrap();

        assert_eq!(sel.history().relative_errors(EstimatorName::Dm), vec![0.0, 1.0]);
        assert_eq!(sel.history().relative_errors(EstimatorName::Ipw), vec![0.5, 0.0]);
        let dm = table.get(EstimatorName::Dm).unwrap();
        assert!(dm.lower_bound >= 0.0 && dm.upper_bound <= 1.0);
        assert!(dm.contains(dm.mean));
    }

    #[test]
    fn missing_trial_aborts_replayed_run() {
        let splits: RecordedSplits = [(0, 0.5)].into_iter().collect();
        let mut trials = RecordedTrials::default();
        trials.insert(0, 0, EstimateSet::from([(EstimatorName::Dm, 0.5)]));

        let mut sel = EstimatorSelection::new(
            splits,
            trials,
            [EstimatorName::Dm],
            1,
            2,
            BootstrapSettings::default(),
            1,
        )
        .unwrap();
        assert!(matches!(sel.run().unwrap_err(), EvaluationError::Collaborator(_)));
    }
}
