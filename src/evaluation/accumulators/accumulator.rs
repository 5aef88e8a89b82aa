/// Online scalar summary (e.g., streaming mean).
///
/// Implementations accept values incrementally via [`add`] and expose the
/// current summary via [`value`].
///
/// [`add`]: Accumulator::add
/// [`value`]: Accumulator::value
pub trait Accumulator {
    /// Incorporates a new observation.
    fn add(&mut self, v: f64);

    /// Returns the current summary.
    fn value(&self) -> f64;

    /// Number of observations incorporated so far.
    fn count(&self) -> usize;
}
