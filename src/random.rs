//! Random weight assignment.
//!
//! Every sampling stage draws from a [`RandomSource`] injected at construction,
//! wrapped in a [`WeightAssigner`]. Cloning the assigner shares the underlying
//! generator, so several stages (and a test harness) can consume one stream of
//! draws.
//!
//! # Example
//!
//! ```
//! use ironsample::{doc, WeightAssigner};
//!
//! let weights = WeightAssigner::seeded(7);
//! let mut d = doc!({"_id": 1});
//! let w = weights.assign_uniform_weight(&mut d);
//! assert_eq!(d.rand_val(), Some(w));
//! assert!((0.0..1.0).contains(&w));
//! ```

use crate::Document;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A source of uniform `[0, 1)` draws.
pub trait RandomSource {
    /// Next value, uniform over `[0, 1)`.
    fn next_canonical(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    #[inline]
    fn next_canonical(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// A random source shared between stages.
pub type SharedRandom = Arc<Mutex<dyn RandomSource + Send>>;

/// Draws uniform weights and writes them into document metadata.
#[derive(Clone)]
pub struct WeightAssigner {
    source: SharedRandom,
}

impl WeightAssigner {
    /// Wrap an existing shared source.
    #[must_use]
    pub fn new(source: SharedRandom) -> Self {
        Self { source }
    }

    /// Take ownership of a source and share it from now on.
    #[must_use]
    pub fn from_source<S: RandomSource + Send + 'static>(source: S) -> Self {
        Self::new(Arc::new(Mutex::new(source)))
    }

    /// Generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_source(StdRng::from_os_rng())
    }

    /// Reproducible generator for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_source(ChaCha8Rng::seed_from_u64(seed))
    }

    /// One raw uniform draw from the shared source.
    pub fn draw(&self) -> f64 {
        // generator state stays valid across a poisoning panic
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        source.next_canonical()
    }

    /// Draw a uniform weight, attach it to `doc`, and return it.
    pub fn assign_uniform_weight(&self, doc: &mut Document) -> f64 {
        let weight = self.draw();
        doc.set_rand_val(weight);
        weight
    }

    /// Attach a weight computed elsewhere.
    pub fn assign_weight(&self, doc: &mut Document, weight: f64) -> f64 {
        doc.set_rand_val(weight);
        weight
    }
}

impl Default for WeightAssigner {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl fmt::Debug for WeightAssigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightAssigner").finish_non_exhaustive()
    }
}
