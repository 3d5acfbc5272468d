//! Deterministic random sources.

use crate::random::RandomSource;

/// Replays a fixed list of draws, cycling when it runs out.
///
/// # Panics
///
/// Drawing from an empty sequence panics.
///
/// ```
/// use ironsample::WeightAssigner;
/// use ironsample::testing::FixedSequence;
///
/// let weights = WeightAssigner::from_source(FixedSequence::new([0.1, 0.9]));
/// assert_eq!(weights.draw(), 0.1);
/// assert_eq!(weights.draw(), 0.9);
/// assert_eq!(weights.draw(), 0.1);
/// ```
#[derive(Clone, Debug)]
pub struct FixedSequence {
    values: Vec<f64>,
    next: usize,
}

impl FixedSequence {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            next: 0,
        }
    }

    /// Draws handed out so far.
    #[must_use]
    pub const fn drawn(&self) -> usize {
        self.next
    }
}

impl RandomSource for FixedSequence {
    fn next_canonical(&mut self) -> f64 {
        assert!(!self.values.is_empty(), "FixedSequence has no values");
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
