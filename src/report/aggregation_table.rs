use crate::core::EstimatorName;
use crate::evaluation::ConfidenceInterval;
use crate::report::ReportError;
use std::collections::BTreeMap;

/// Confidence interval per estimator.
///
/// The set of estimators is fixed when the table is created; intervals are
/// recorded as the evaluation completes. Iteration follows estimator order
/// (DM, IPW, DR).
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationTable {
    entries: BTreeMap<EstimatorName, Option<ConfidenceInterval>>,
}

impl AggregationTable {
    pub fn new<I: IntoIterator<Item = EstimatorName>>(estimators: I) -> Self {
        Self {
            entries: estimators.into_iter().map(|e| (e, None)).collect(),
        }
    }

    pub fn record(
        &mut self,
        estimator: EstimatorName,
        interval: ConfidenceInterval,
    ) -> Result<(), ReportError> {
        let slot = self
            .entries
            .get_mut(&estimator)
            .ok_or(ReportError::UnknownEstimator(estimator))?;
        *slot = Some(interval);
        Ok(())
    }

    pub fn get(&self, estimator: EstimatorName) -> Option<&ConfidenceInterval> {
        self.entries.get(&estimator).and_then(Option::as_ref)
    }

    pub fn estimators(&self) -> impl Iterator<Item = EstimatorName> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.entries.values().all(Option::is_some)
    }

    /// All rows, failing on the first estimator without an interval.
    pub fn rows(&self) -> Result<Vec<(EstimatorName, ConfidenceInterval)>, ReportError> {
        self.entries
            .iter()
            .map(|(&name, ci)| {
                ci.map(|ci| (name, ci))
                    .ok_or(ReportError::IncompleteTable(name))
            })
            .collect()
    }

    /// Estimator with the smallest mean relative error, if the table is complete.
    pub fn best(&self) -> Option<(EstimatorName, ConfidenceInterval)> {
        self.rows()
            .ok()?
            .into_iter()
            .min_by(|a, b| a.1.mean.total_cmp(&b.1.mean))
    }
}
