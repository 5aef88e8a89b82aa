/// Ordered, immutable sequence of scalar measurements (one per split).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    #[inline]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean, or `NaN` when empty.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

impl From<Vec<f64>> for Sample {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for Sample {
    fn from(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }
}

impl FromIterator<f64> for Sample {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_values() {
        let s = Sample::from(vec![0.1, 0.2, 0.15, 0.3, 0.05]);
        assert_eq!(s.len(), 5);
        assert!((s.mean() - 0.16).abs() < 1e-12);
    }

    #[test]
    fn empty_mean_is_nan() {
        let s = Sample::default();
        assert!(s.is_empty());
        assert!(s.mean().is_nan());
    }
}
