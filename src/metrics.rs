//! Per-stage execution counters.
//!
//! Every stage in this crate keeps a [`StageStats`] and reports it through
//! [`Stage::stats`](crate::Stage::stats). Counters are plain integers updated
//! inside `pull`, so reading them never blocks.
//!
//! ```
//! use ironsample::metrics::StageStats;
//!
//! let mut stats = StageStats::default();
//! stats.record_pull();
//! stats.record_examined();
//! stats.record_returned();
//! assert_eq!(stats.to_json()["documents_returned"], 1);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::AddAssign;

/// Counters describing what a stage has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStats {
    /// Calls to `pull` on this stage.
    pub pulls: u64,
    /// Documents received from upstream.
    pub documents_examined: u64,
    /// Documents handed to the caller.
    pub documents_returned: u64,
    /// Upstream pauses forwarded to the caller.
    pub pauses_propagated: u64,
    /// Documents discarded because their identity was already sampled.
    pub duplicates_skipped: u64,
}

impl StageStats {
    #[inline]
    pub const fn record_pull(&mut self) {
        self.pulls += 1;
    }

    #[inline]
    pub const fn record_examined(&mut self) {
        self.documents_examined += 1;
    }

    #[inline]
    pub const fn record_returned(&mut self) {
        self.documents_returned += 1;
    }

    #[inline]
    pub const fn record_pause(&mut self) {
        self.pauses_propagated += 1;
    }

    #[inline]
    pub const fn record_duplicate(&mut self) {
        self.duplicates_skipped += 1;
    }

    /// Counters as a JSON object, for explain output.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl AddAssign for StageStats {
    fn add_assign(&mut self, other: Self) {
        self.pulls += other.pulls;
        self.documents_examined += other.documents_examined;
        self.documents_returned += other.documents_returned;
        self.pauses_propagated += other.pauses_propagated;
        self.duplicates_skipped += other.duplicates_skipped;
    }
}

impl fmt::Display for StageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pulls={} examined={} returned={} paused={} duplicates={}",
            self.pulls,
            self.documents_examined,
            self.documents_returned,
            self.pauses_propagated,
            self.duplicates_skipped
        )
    }
}
