//! `$sampleFromRandomCursor`: sampling from an upstream that is already random.
//!
//! When upstream is a random cursor over a collection of roughly `N`
//! documents, the first `size` distinct documents it returns are already a
//! random sample. What remains is to give them the weights `$sample` would
//! have given them, so that samples from both stages can be merged by weight.
//!
//! `$sample` keeps the `size` largest of `N` uniform draws. Their joint
//! distribution can be generated lazily, largest first: starting from a
//! ceiling of `1.0`, the next largest of the `N - i` remaining draws is
//! `ceiling * u^(1 / (N - i))` for a fresh uniform `u`. This stage keeps that
//! running ceiling, so it costs O(size) instead of O(N).
//!
//! A random cursor may return the same document twice. Duplicates (by the
//! configured identity field) are skipped, up to a bounded number of
//! consecutive attempts per pull.

use crate::config::{RandomCursorOptions, SAMPLE_FROM_RANDOM_CURSOR_STAGE_NAME};
use crate::error::{Result, SampleError};
use crate::metrics::StageStats;
use crate::stages::SeenIdentities;
use crate::{BoxedStage, Document, PullResult, Stage, WeightAssigner};
use serde_json::{Map, Value, json};
use tracing::{debug, trace, warn};

enum Phase {
    Sampling,
    Done,
    Failed(SampleError),
}

/// Sampling stage for random-cursor upstreams.
pub struct SampleFromRandomCursorStage {
    options: RandomCursorOptions,
    source: BoxedStage,
    weights: WeightAssigner,
    seen: SeenIdentities,
    accepted: u64,
    ceiling: f64,
    phase: Phase,
    stats: StageStats,
}

impl SampleFromRandomCursorStage {
    /// Sample from `source`, which must never report [`PullResult::Paused`].
    ///
    /// # Errors
    ///
    /// Any error reported by [`RandomCursorOptions::validate`].
    pub fn new(
        options: RandomCursorOptions,
        source: BoxedStage,
        weights: WeightAssigner,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            source,
            weights,
            seen: SeenIdentities::new(),
            accepted: 0,
            ceiling: 1.0,
            phase: Phase::Sampling,
            stats: StageStats::default(),
        })
    }

    /// Documents returned so far.
    #[must_use]
    pub const fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Weight given to the most recently returned document (`1.0` before any).
    #[must_use]
    pub const fn ceiling(&self) -> f64 {
        self.ceiling
    }

    fn sample_size_reached(&self) -> bool {
        usize::try_from(self.accepted).map_or(true, |n| n >= self.options.size)
    }

    /// Pull until a document with an unseen identity arrives.
    ///
    /// `None` means upstream is exhausted.
    fn next_distinct(&mut self) -> Result<Option<Document>> {
        for _ in 0..self.options.max_duplicate_attempts {
            let doc = match self.source.pull()? {
                PullResult::Produced(doc) => doc,
                PullResult::Exhausted => return Ok(None),
                PullResult::Paused => panic!(
                    "{SAMPLE_FROM_RANDOM_CURSOR_STAGE_NAME} requires an upstream that never pauses"
                ),
            };
            self.stats.record_examined();

            let Some(id) = doc.get_path(&self.options.id_field) else {
                return Err(SampleError::MissingIdentityField {
                    field: self.options.id_field.clone(),
                });
            };
            if self.seen.insert(id) {
                return Ok(Some(doc));
            }
            debug!(id = %id, "$sample encountered duplicate document");
            self.stats.record_duplicate();
        }

        warn!(
            attempts = self.options.max_duplicate_attempts,
            "$sample random cursor returned only duplicates"
        );
        Err(SampleError::DuplicateBudgetExceeded {
            attempts: self.options.max_duplicate_attempts,
        })
    }

    /// Next descending order statistic of `population_estimate` uniform draws.
    #[allow(clippy::cast_precision_loss)]
    fn next_weight(&mut self) -> f64 {
        // the estimate may undershoot what was actually seen
        let remaining = self
            .options
            .population_estimate
            .saturating_sub(self.accepted)
            .max(1);
        let u = self.weights.draw();
        self.ceiling *= u.powf(1.0 / remaining as f64);
        self.ceiling
    }
}

impl Stage for SampleFromRandomCursorStage {
    fn pull(&mut self) -> Result<PullResult> {
        self.stats.record_pull();
        match &self.phase {
            Phase::Sampling => {}
            Phase::Done => return Ok(PullResult::Exhausted),
            Phase::Failed(err) => return Err(err.clone()),
        }

        if self.sample_size_reached() {
            trace!(accepted = self.accepted, "$sampleFromRandomCursor reached sample size");
            self.phase = Phase::Done;
            return Ok(PullResult::Exhausted);
        }

        let mut doc = match self.next_distinct() {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                trace!(accepted = self.accepted, "$sampleFromRandomCursor upstream exhausted");
                self.phase = Phase::Done;
                return Ok(PullResult::Exhausted);
            }
            Err(err) => {
                self.phase = Phase::Failed(err.clone());
                return Err(err);
            }
        };

        let weight = self.next_weight();
        self.weights.assign_weight(&mut doc, weight);
        self.accepted += 1;
        self.stats.record_returned();
        Ok(PullResult::Produced(doc))
    }

    fn name(&self) -> &'static str {
        SAMPLE_FROM_RANDOM_CURSOR_STAGE_NAME
    }

    fn explain(&self) -> Value {
        let mut stage = Map::new();
        stage.insert(
            SAMPLE_FROM_RANDOM_CURSOR_STAGE_NAME.to_owned(),
            json!({ "size": self.options.size }),
        );
        Value::Object(stage)
    }

    fn stats(&self) -> StageStats {
        self.stats
    }

    fn dispose(&mut self) {
        self.seen.clear();
        if matches!(self.phase, Phase::Sampling) {
            self.phase = Phase::Done;
        }
        self.source.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::testing::{FixedSequence, MockSource};

    #[test]
    fn weights_follow_closed_form() {
        // N = 4: first = u1^(1/4), second = first * u2^(1/3)
        let source = MockSource::from_docs([doc!({"_id": "a"}), doc!({"_id": "b"})]);
        let weights = WeightAssigner::from_source(FixedSequence::new([0.5, 0.25]));
        let mut stage =
            SampleFromRandomCursorStage::new(RandomCursorOptions::new(2, 4), Box::new(source), weights)
                .unwrap();

        let first = stage.pull().unwrap().into_document().unwrap();
        let second = stage.pull().unwrap().into_document().unwrap();
        let w1 = 0.5f64.powf(0.25);
        let w2 = w1 * 0.25f64.powf(1.0 / 3.0);
        assert!((first.rand_val().unwrap() - w1).abs() < 1e-12);
        assert!((second.rand_val().unwrap() - w2).abs() < 1e-12);
        assert_eq!(stage.ceiling(), second.rand_val().unwrap());
    }

    #[test]
    fn undersized_estimate_clamps_exponent() {
        let source = MockSource::from_docs((0..3).map(|i| doc!({"_id": i})));
        let weights = WeightAssigner::from_source(FixedSequence::new([0.5, 0.5, 0.5]));
        let mut stage =
            SampleFromRandomCursorStage::new(RandomCursorOptions::new(3, 1), Box::new(source), weights)
                .unwrap();
        let ws: Vec<f64> = (0..3)
            .map(|_| stage.pull().unwrap().into_document().unwrap().rand_val().unwrap())
            .collect();
        assert_eq!(ws, vec![0.5, 0.25, 0.125]);
    }

    #[test]
    fn invalid_options_rejected_at_construction() {
        let err = SampleFromRandomCursorStage::new(
            RandomCursorOptions::new(1, 0),
            Box::new(MockSource::new()),
            WeightAssigner::seeded(0),
        )
        .err()
        .unwrap();
        assert_eq!(err.code(), 28747);
    }

    #[test]
    fn failure_is_sticky() {
        let source = MockSource::from_docs([doc!({"other": 1}), doc!({"_id": 2})]);
        let mut stage = SampleFromRandomCursorStage::new(
            RandomCursorOptions::new(2, 10),
            Box::new(source.clone()),
            WeightAssigner::seeded(3),
        )
        .unwrap();
        let first = stage.pull().unwrap_err();
        assert_eq!(stage.pull().unwrap_err(), first);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn explain_names_stage() {
        let stage = SampleFromRandomCursorStage::new(
            RandomCursorOptions::new(5, 100),
            Box::new(MockSource::new()),
            WeightAssigner::seeded(0),
        )
        .unwrap();
        assert_eq!(stage.explain(), json!({"$sampleFromRandomCursor": {"size": 5}}));
    }
}
