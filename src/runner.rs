//! Driving a stage to completion.
//!
//! The pipeline engine that normally drives stages lives outside this crate.
//! [`Runner`] is the minimal stand-in: it pulls until exhaustion and re-pulls
//! after every pause, which is what the contract asks of any consumer.

use crate::{Document, PullResult, Stage};
use anyhow::{Result, bail};
use tracing::trace;

/// Everything a stage produced, plus how often it paused.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Drained {
    pub documents: Vec<Document>,
    pub pauses: usize,
}

impl Drained {
    /// Random weights of the drained documents, in output order.
    #[must_use]
    pub fn weights(&self) -> Vec<Option<f64>> {
        self.documents.iter().map(Document::rand_val).collect()
    }
}

/// Pulls a stage until it is exhausted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Runner {
    /// Most consecutive pauses tolerated; one more fails the drain. `None` waits forever.
    pub max_consecutive_pauses: Option<usize>,
}

impl Runner {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_consecutive_pauses: None,
        }
    }

    #[must_use]
    pub const fn with_pause_limit(limit: usize) -> Self {
        Self {
            max_consecutive_pauses: Some(limit),
        }
    }

    /// Pull `stage` until it reports exhaustion.
    ///
    /// # Errors
    ///
    /// Propagates stage errors, and fails if the pause limit is exceeded.
    pub fn drain(&self, stage: &mut dyn Stage) -> Result<Drained> {
        let mut out = Drained::default();
        let mut consecutive = 0usize;
        loop {
            match stage.pull()? {
                PullResult::Produced(doc) => {
                    consecutive = 0;
                    out.documents.push(doc);
                }
                PullResult::Paused => {
                    out.pauses += 1;
                    consecutive += 1;
                    if let Some(limit) = self.max_consecutive_pauses
                        && consecutive > limit
                    {
                        bail!(
                            "{} paused {consecutive} times in a row (limit {limit})",
                            stage.name()
                        );
                    }
                }
                PullResult::Exhausted => break,
            }
        }
        trace!(
            stage = stage.name(),
            documents = out.documents.len(),
            pauses = out.pauses,
            "stage drained"
        );
        Ok(out)
    }

    /// Drain and keep only the documents.
    ///
    /// # Errors
    ///
    /// See [`drain`](Self::drain).
    pub fn collect(&self, stage: &mut dyn Stage) -> Result<Vec<Document>> {
        Ok(self.drain(stage)?.documents)
    }
}
