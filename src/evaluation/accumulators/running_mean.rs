use crate::evaluation::accumulators::Accumulator;

/// Streaming mean: `mean = sum / len`.
///
/// Used to bag the policy-value estimates of the trials within a split.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunningMean {
    len: usize,
    sum: f64,
}

impl Accumulator for RunningMean {
    #[inline]
    fn add(&mut self, v: f64) {
        self.len += 1;
        self.sum += v;
    }

    #[inline]
    fn value(&self) -> f64 {
        if self.len > 0 {
            self.sum / self.len as f64
        } else {
            f64::NAN
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.len
    }
}
