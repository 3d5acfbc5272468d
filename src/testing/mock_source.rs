//! Scripted upstream stage.

use crate::error::{Result, SampleError};
use crate::{Document, PullResult, Stage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Script {
    queue: VecDeque<Result<PullResult>>,
    pulls: usize,
    disposed: bool,
}

/// An upstream that replays a queued script, then reports exhaustion.
///
/// Clones share one script, so a test can hand a clone to the stage under test
/// and keep another to add results or inspect what is left.
///
/// # Example
///
/// ```
/// use ironsample::{doc, PullResult, Stage};
/// use ironsample::testing::MockSource;
///
/// let mut source = MockSource::new();
/// source.push_doc(doc!({"_id": 1}));
/// source.push_pause();
/// assert!(source.pull().unwrap().is_produced());
/// assert!(source.pull().unwrap().is_paused());
/// assert_eq!(source.pull().unwrap(), PullResult::Exhausted);
/// ```
#[derive(Clone, Default)]
pub struct MockSource {
    script: Arc<Mutex<Script>>,
}

impl MockSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that produces `docs` in order.
    #[must_use]
    pub fn from_docs(docs: impl IntoIterator<Item = Document>) -> Self {
        let source = Self::new();
        for doc in docs {
            source.push_doc(doc);
        }
        source
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_doc(&self, doc: Document) {
        self.script().queue.push_back(Ok(PullResult::Produced(doc)));
    }

    pub fn push_pause(&self) {
        self.script().queue.push_back(Ok(PullResult::Paused));
    }

    pub fn push_error(&self, err: SampleError) {
        self.script().queue.push_back(Err(err));
    }

    /// Scripted results not yet pulled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script().queue.len()
    }

    /// Number of `pull` calls made so far.
    #[must_use]
    pub fn pulls(&self) -> usize {
        self.script().pulls
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.script().disposed
    }
}

impl Stage for MockSource {
    fn pull(&mut self) -> Result<PullResult> {
        let mut script = self.script();
        script.pulls += 1;
        script.queue.pop_front().unwrap_or(Ok(PullResult::Exhausted))
    }

    fn name(&self) -> &'static str {
        "$mock"
    }

    fn dispose(&mut self) {
        let mut script = self.script();
        script.queue.clear();
        script.disposed = true;
    }
}
