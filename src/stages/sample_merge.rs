//! Merging per-shard samples into one sample.
//!
//! Each input is a sample stream in descending weight order, as produced by
//! [`SampleStage`](super::SampleStage) or
//! [`SampleFromRandomCursorStage`](super::SampleFromRandomCursorStage) running
//! against one shard. Because both stages assign weights with the same
//! distribution, the `limit` largest weights across all inputs form a sample
//! of the union.
//!
//! The stage buffers one head document per input. Filling a head may hit an
//! upstream pause; the heads collected so far stay buffered and the pause is
//! returned to the caller.

use crate::error::{Result, SampleError};
use crate::metrics::StageStats;
use crate::{BoxedStage, Document, PullResult, Stage};
use ordered_float::OrderedFloat;
use serde_json::{Value, json};
use tracing::trace;

struct MergeInput {
    stage: BoxedStage,
    head: Option<(OrderedFloat<f64>, Document)>,
    exhausted: bool,
}

/// K-way merge of weight-ordered sample streams.
pub struct SampleMergeStage {
    inputs: Vec<MergeInput>,
    limit: usize,
    returned: usize,
    done: bool,
    stats: StageStats,
}

impl SampleMergeStage {
    /// Merge `inputs`, returning at most `limit` documents.
    #[must_use]
    pub fn new(inputs: Vec<BoxedStage>, limit: usize) -> Self {
        let inputs = inputs
            .into_iter()
            .map(|stage| MergeInput {
                stage,
                head: None,
                exhausted: false,
            })
            .collect();
        Self {
            inputs,
            limit,
            returned: 0,
            done: limit == 0,
            stats: StageStats::default(),
        }
    }

    /// Make sure every live input has a head document.
    ///
    /// Returns `false` when an input paused.
    fn fill_heads(&mut self) -> Result<bool> {
        for (index, input) in self.inputs.iter_mut().enumerate() {
            if input.head.is_some() || input.exhausted {
                continue;
            }
            match input.stage.pull()? {
                PullResult::Produced(doc) => {
                    self.stats.record_examined();
                    let weight = doc
                        .rand_val()
                        .ok_or(SampleError::MissingRandomWeight { input: index })?;
                    input.head = Some((OrderedFloat(weight), doc));
                }
                PullResult::Paused => {
                    self.stats.record_pause();
                    return Ok(false);
                }
                PullResult::Exhausted => {
                    trace!(input = index, "sample merge input exhausted");
                    input.exhausted = true;
                }
            }
        }
        Ok(true)
    }

    fn take_heaviest(&mut self) -> Option<Document> {
        let (index, _) = self
            .inputs
            .iter()
            .enumerate()
            .filter_map(|(i, input)| input.head.as_ref().map(|(w, _)| (i, *w)))
            // ties go to the lower input index
            .max_by(|(ia, wa), (ib, wb)| wa.cmp(wb).then(ib.cmp(ia)))?;
        self.inputs[index].head.take().map(|(_, doc)| doc)
    }
}

impl Stage for SampleMergeStage {
    fn pull(&mut self) -> Result<PullResult> {
        self.stats.record_pull();
        if self.done {
            return Ok(PullResult::Exhausted);
        }
        if !self.fill_heads()? {
            return Ok(PullResult::Paused);
        }

        match self.take_heaviest() {
            Some(doc) => {
                self.returned += 1;
                self.done = self.returned >= self.limit;
                self.stats.record_returned();
                Ok(PullResult::Produced(doc))
            }
            None => {
                self.done = true;
                Ok(PullResult::Exhausted)
            }
        }
    }

    fn name(&self) -> &'static str {
        "$sampleMerge"
    }

    fn explain(&self) -> Value {
        let inputs: Vec<Value> = self.inputs.iter().map(|i| i.stage.explain()).collect();
        json!({ "$sampleMerge": { "limit": self.limit, "inputs": inputs } })
    }

    fn stats(&self) -> StageStats {
        self.stats
    }

    fn dispose(&mut self) {
        self.done = true;
        for input in &mut self.inputs {
            input.head = None;
            input.stage.dispose();
        }
    }
}
