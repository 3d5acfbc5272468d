//! The pull contract shared by every stage.
//!
//! A stage produces output only when asked. Each call to [`Stage::pull`]
//! returns one of three outcomes:
//!
//! - [`PullResult::Produced`]: the next document.
//! - [`PullResult::Paused`]: nothing available right now; call again later.
//! - [`PullResult::Exhausted`]: no more documents, ever.
//!
//! Callers must not assume how many `Paused` results precede a document. A
//! stage that needs input and sees `Paused` from upstream returns `Paused`
//! itself, keeping whatever it has accumulated, and resumes on the next call.

use crate::error::Result;
use crate::metrics::StageStats;
use crate::Document;
use serde_json::Value;

/// Outcome of one [`Stage::pull`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum PullResult {
    Produced(Document),
    Paused,
    Exhausted,
}

impl PullResult {
    #[must_use]
    pub const fn is_produced(&self) -> bool {
        matches!(self, Self::Produced(_))
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// The produced document, if any.
    #[must_use]
    pub fn into_document(self) -> Option<Document> {
        match self {
            Self::Produced(doc) => Some(doc),
            Self::Paused | Self::Exhausted => None,
        }
    }

    #[must_use]
    pub const fn document(&self) -> Option<&Document> {
        match self {
            Self::Produced(doc) => Some(doc),
            Self::Paused | Self::Exhausted => None,
        }
    }
}

impl From<Document> for PullResult {
    fn from(doc: Document) -> Self {
        Self::Produced(doc)
    }
}

/// A pull-based pipeline stage.
pub trait Stage: Send {
    /// Produce the next result.
    ///
    /// # Errors
    ///
    /// Returns the stage's own runtime errors and any error raised upstream.
    fn pull(&mut self) -> Result<PullResult>;

    /// Stage name as it appears in explain output.
    fn name(&self) -> &'static str {
        "stage"
    }

    /// Explain-style description of this stage.
    fn explain(&self) -> Value {
        Value::String(self.name().to_owned())
    }

    /// Counters collected so far.
    fn stats(&self) -> StageStats {
        StageStats::default()
    }

    /// Release buffered documents. Later pulls report exhaustion.
    fn dispose(&mut self) {}
}

/// Boxed stage, the unit stages use to hold their upstream.
pub type BoxedStage = Box<dyn Stage>;

impl<S: Stage + ?Sized> Stage for Box<S> {
    fn pull(&mut self) -> Result<PullResult> {
        (**self).pull()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn explain(&self) -> Value {
        (**self).explain()
    }

    fn stats(&self) -> StageStats {
        (**self).stats()
    }

    fn dispose(&mut self) {
        (**self).dispose();
    }
}
