use crate::core::Sample;
use crate::evaluation::EvaluationError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const DEFAULT_N_RESAMPLES: usize = 10_000;
const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

fn default_n_resamples() -> usize {
    DEFAULT_N_RESAMPLES
}

fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}

/// Percentile-bootstrap estimate of a population mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Mean of the bootstrap means.
    pub mean: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower_bound <= x && x <= self.upper_bound
    }
}

/// Resampling parameters shared by every estimator of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BootstrapSettings {
    #[serde(default = "default_n_resamples")]
    #[schemars(
        title = "Resamples",
        description = "Number of bootstrap resamples",
        range(min = 1),
        default = "default_n_resamples"
    )]
    pub n_resamples: usize,

    #[serde(default = "default_confidence_level")]
    #[schemars(
        title = "Confidence level",
        description = "Coverage of the interval, strictly between 0 and 1",
        default = "default_confidence_level"
    )]
    pub confidence_level: f64,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            n_resamples: DEFAULT_N_RESAMPLES,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl BootstrapSettings {
    pub fn validate(&self) -> Result<(), EvaluationError> {
        validate_parameters(self.n_resamples, self.confidence_level)
    }

    pub fn estimate(&self, samples: &Sample, seed: u64) -> Result<ConfidenceInterval, EvaluationError> {
        estimate_confidence_interval(samples, self.n_resamples, self.confidence_level, seed)
    }
}

fn validate_parameters(n_resamples: usize, confidence_level: f64) -> Result<(), EvaluationError> {
    if n_resamples == 0 {
        return Err(EvaluationError::InvalidInput(
            "n_resamples must be > 0".into(),
        ));
    }
    if !(confidence_level.is_finite() && confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(EvaluationError::InvalidInput(format!(
            "confidence_level must lie in (0, 1), got {confidence_level}"
        )));
    }
    Ok(())
}

/// Estimates a confidence interval for the mean of `samples` by
/// nonparametric bootstrap.
///
/// Draws `n_resamples` resamples (with replacement, same size as `samples`)
/// from a `StdRng` seeded with `seed` and records each resample mean. The
/// point estimate is the mean of those bootstrap means; the bounds are the
/// `alpha / 2` and `1 - alpha / 2` percentiles of the same distribution
/// (linear interpolation between closest ranks), where
/// `alpha = 1 - confidence_level`. Bounds never exclude the point estimate.
///
/// The same arguments always produce the same result.
pub fn estimate_confidence_interval(
    samples: &Sample,
    n_resamples: usize,
    confidence_level: f64,
    seed: u64,
) -> Result<ConfidenceInterval, EvaluationError> {
    if samples.is_empty() {
        return Err(EvaluationError::InvalidInput(
            "cannot bootstrap an empty sample".into(),
        ));
    }
    validate_parameters(n_resamples, confidence_level)?;
    let values = samples.as_slice();
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(EvaluationError::InvalidInput(format!(
            "sample contains non-finite value {bad}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let n = values.len();
    let mut boot_means: Vec<f64> = (0..n_resamples)
        .map(|_| {
            let sum: f64 = (0..n).map(|_| values[rng.random_range(0..n)]).sum();
            sum / n as f64
        })
        .collect();

    let mean = boot_means.iter().sum::<f64>() / n_resamples as f64;

    boot_means.sort_by(f64::total_cmp);
    let alpha = 1.0 - confidence_level;
    let lower = percentile(&boot_means, alpha / 2.0);
    let upper = percentile(&boot_means, 1.0 - alpha / 2.0);

    Ok(ConfidenceInterval {
        mean,
        lower_bound: lower.min(mean),
        upper_bound: upper.max(mean),
        confidence_level,
    })
}

/// `q`-quantile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len() - 1;
    let h = last as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(last);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}
