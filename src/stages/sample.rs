//! `$sample`: reservoir sampling over any upstream.
//!
//! Every upstream document gets a uniform random weight; the stage keeps the
//! `size` documents with the largest weights and, once upstream is exhausted,
//! returns them highest weight first.
//!
//! No output can be correct before the whole input has been seen, so the
//! stage first drains upstream (forwarding every pause) and only then starts
//! emitting. The phase lives in the stage, not on the call stack, so a pause
//! in the middle of filling loses nothing.

use crate::config::{SAMPLE_STAGE_NAME, SampleSpec};
use crate::error::Result;
use crate::metrics::StageStats;
use crate::reservoir::{Descending, Reservoir};
use crate::{BoxedStage, Document, PullResult, Stage, WeightAssigner};
use serde_json::{Map, Value};
use std::mem;
use tracing::trace;

enum Phase {
    Filling(Reservoir<Document>),
    Emitting(Descending<Document>),
    Done,
}

/// Reservoir sampling stage.
pub struct SampleStage {
    spec: SampleSpec,
    source: BoxedStage,
    weights: WeightAssigner,
    phase: Phase,
    stats: StageStats,
}

impl SampleStage {
    /// Sample `spec.size()` documents from `source`.
    #[must_use]
    pub fn new(spec: SampleSpec, source: BoxedStage, weights: WeightAssigner) -> Self {
        let phase = match spec.size() {
            0 => Phase::Done,
            size => Phase::Filling(Reservoir::new(size)),
        };
        Self {
            spec,
            source,
            weights,
            phase,
            stats: StageStats::default(),
        }
    }

    /// Build from the JSON argument of a `$sample` stage.
    ///
    /// # Errors
    ///
    /// Any configuration error reported by [`SampleSpec::parse`].
    pub fn from_json(spec: &Value, source: BoxedStage, weights: WeightAssigner) -> Result<Self> {
        Ok(Self::new(SampleSpec::parse(spec)?, source, weights))
    }

    /// The stage argument, exactly as configured.
    #[must_use]
    pub fn serialize(&self) -> Value {
        self.spec.serialize()
    }

    /// Documents currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        match &self.phase {
            Phase::Filling(reservoir) => reservoir.len(),
            Phase::Emitting(drain) => drain.len(),
            Phase::Done => 0,
        }
    }

    /// Keep pulling upstream until it is exhausted or pauses.
    ///
    /// Returns `false` when upstream paused; the reservoir stays in place.
    fn fill(&mut self) -> Result<bool> {
        let Phase::Filling(reservoir) = &mut self.phase else {
            return Ok(true);
        };
        loop {
            match self.source.pull()? {
                PullResult::Produced(mut doc) => {
                    self.stats.record_examined();
                    let weight = self.weights.assign_uniform_weight(&mut doc);
                    reservoir.insert(weight, doc);
                }
                PullResult::Paused => {
                    self.stats.record_pause();
                    return Ok(false);
                }
                PullResult::Exhausted => break,
            }
        }

        let full = mem::replace(&mut self.phase, Phase::Done);
        if let Phase::Filling(reservoir) = full {
            trace!(
                offered = reservoir.offered(),
                kept = reservoir.len(),
                "$sample reservoir filled"
            );
            self.phase = Phase::Emitting(reservoir.into_descending());
        }
        Ok(true)
    }
}

impl Stage for SampleStage {
    fn pull(&mut self) -> Result<PullResult> {
        self.stats.record_pull();
        if !self.fill()? {
            return Ok(PullResult::Paused);
        }

        let Phase::Emitting(drain) = &mut self.phase else {
            return Ok(PullResult::Exhausted);
        };
        match drain.next() {
            Some(doc) => {
                self.stats.record_returned();
                Ok(PullResult::Produced(doc))
            }
            None => {
                trace!("$sample exhausted");
                self.phase = Phase::Done;
                Ok(PullResult::Exhausted)
            }
        }
    }

    fn name(&self) -> &'static str {
        SAMPLE_STAGE_NAME
    }

    fn explain(&self) -> Value {
        let mut stage = Map::new();
        stage.insert(SAMPLE_STAGE_NAME.to_owned(), self.serialize());
        Value::Object(stage)
    }

    fn stats(&self) -> StageStats {
        self.stats
    }

    fn dispose(&mut self) {
        self.phase = Phase::Done;
        self.source.dispose();
    }
}
