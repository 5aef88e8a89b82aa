use crate::core::EstimateSet;
use std::fmt::{Display, Formatter, Result};

const RULE: &str = "=========================";

/// Outcome of one train/test split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRecord {
    pub split_index: usize,
    pub ground_truth: f64,
    /// Bagged (trial-averaged) policy-value estimate per estimator.
    pub estimates: EstimateSet,
    pub relative_errors: EstimateSet,
}

impl Display for SplitRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "random_state={}", self.split_index)?;
        writeln!(f, "-----")?;
        for (name, err) in &self.relative_errors {
            writeln!(f, "{name}: {err:.6}")?;
        }
        write!(f, "{RULE}")
    }
}
