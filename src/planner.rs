//! Choosing between the two sampling stages.
//!
//! A `$sample` request can always be served by [`SampleStage`], which reads the
//! whole input. When the input is a collection that can hand out documents in
//! random order, [`SampleFromRandomCursorStage`] gives a statistically
//! equivalent sample while reading only about `size` documents.
//!
//! The planner picks the random cursor when all of these hold:
//!
//! 1. the collection supports random cursors;
//! 2. the collection is not empty;
//! 3. `size <= record_count * max_sample_ratio` (default 5%).
//!
//! Past that ratio, duplicates from the random cursor become likely enough that
//! a full scan is the better plan.

use crate::config::{PlannerConfig, RandomCursorOptions, SampleSpec};
use crate::stages::{SampleFromRandomCursorStage, SampleStage};
use crate::{BoxedStage, WeightAssigner};
use anyhow::{Context, Result};
use std::fmt::{Display, Formatter, Result as FormatResult};
use tracing::debug;

/// What the planner knows about the collection being sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectionInfo {
    /// Estimated number of documents.
    pub record_count: u64,
    /// Whether the storage layer can produce a random cursor.
    pub supports_random_cursor: bool,
}

impl CollectionInfo {
    #[must_use]
    pub const fn new(record_count: u64, supports_random_cursor: bool) -> Self {
        Self {
            record_count,
            supports_random_cursor,
        }
    }
}

/// Why the planner settled on a full-scan reservoir.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScanReason {
    /// The collection cannot produce a random cursor.
    NoRandomCursor,
    /// The collection is empty (or its size is unknown).
    EmptyCollection,
    /// The requested size is too large a share of the collection.
    RatioExceeded {
        /// `size / record_count`
        ratio: f64,
        /// Configured threshold
        max_ratio: f64,
    },
}

/// The stage the planner chose.
#[derive(Clone, Debug, PartialEq)]
pub enum SamplePlan {
    /// Read the whole input through a reservoir.
    Reservoir {
        spec: SampleSpec,
        reason: ScanReason,
    },
    /// Read from a random cursor with lazy order-statistic weights.
    RandomCursor { options: RandomCursorOptions },
}

impl SamplePlan {
    /// Whether the source handed to [`SamplePlanner::build`] must be a random cursor.
    #[must_use]
    pub const fn requires_random_cursor(&self) -> bool {
        matches!(self, Self::RandomCursor { .. })
    }

    /// Number of documents the plan returns at most.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Reservoir { spec, .. } => spec.size(),
            Self::RandomCursor { options } => options.size,
        }
    }
}

impl Display for SamplePlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            Self::Reservoir { spec, reason } => {
                write!(f, "$sample size={} via reservoir scan (", spec.size())?;
                match reason {
                    ScanReason::NoRandomCursor => write!(f, "no random cursor")?,
                    ScanReason::EmptyCollection => write!(f, "empty collection")?,
                    ScanReason::RatioExceeded { ratio, max_ratio } => {
                        write!(f, "ratio {ratio:.4} > {max_ratio:.4}")?;
                    }
                }
                write!(f, ")")
            }
            Self::RandomCursor { options } => write!(
                f,
                "$sampleFromRandomCursor size={} of ~{} (id field {:?}, {} duplicate attempts)",
                options.size,
                options.population_estimate,
                options.id_field,
                options.max_duplicate_attempts
            ),
        }
    }
}

/// Decides how a `$sample` request is executed.
#[derive(Clone, Debug, Default)]
pub struct SamplePlanner {
    config: PlannerConfig,
}

impl SamplePlanner {
    #[must_use]
    pub const fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Pick a stage for `spec` over the described collection.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn plan(&self, spec: &SampleSpec, collection: &CollectionInfo) -> SamplePlan {
        let reservoir = |reason| SamplePlan::Reservoir {
            spec: spec.clone(),
            reason,
        };

        if !collection.supports_random_cursor {
            return reservoir(ScanReason::NoRandomCursor);
        }
        if collection.record_count == 0 {
            return reservoir(ScanReason::EmptyCollection);
        }

        let ratio = spec.size() as f64 / collection.record_count as f64;
        if ratio > self.config.max_sample_ratio {
            return reservoir(ScanReason::RatioExceeded {
                ratio,
                max_ratio: self.config.max_sample_ratio,
            });
        }

        let options = RandomCursorOptions::new(spec.size(), collection.record_count)
            .with_id_field(self.config.id_field.clone())
            .with_max_duplicate_attempts(self.config.max_duplicate_attempts);
        SamplePlan::RandomCursor { options }
    }

    /// Build the stage for `plan`, reading from `source`.
    ///
    /// `source` must be a random cursor when
    /// [`plan.requires_random_cursor()`](SamplePlan::requires_random_cursor)
    /// and may be any stage otherwise.
    ///
    /// # Errors
    ///
    /// Fails if the random-cursor options do not validate.
    pub fn build(
        &self,
        plan: SamplePlan,
        source: BoxedStage,
        weights: WeightAssigner,
    ) -> Result<BoxedStage> {
        debug!(plan = %plan, "building sample stage");
        match plan {
            SamplePlan::Reservoir { spec, .. } => {
                Ok(Box::new(SampleStage::new(spec, source, weights)))
            }
            SamplePlan::RandomCursor { options } => {
                let stage = SampleFromRandomCursorStage::new(options, source, weights)
                    .context("invalid random-cursor sampling options")?;
                Ok(Box::new(stage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_describes_choice() {
        let planner = SamplePlanner::default();
        let plan = planner.plan(&SampleSpec::new(5), &CollectionInfo::new(1000, true));
        assert_eq!(
            plan.to_string(),
            "$sampleFromRandomCursor size=5 of ~1000 (id field \"_id\", 1000 duplicate attempts)"
        );

        let plan = planner.plan(&SampleSpec::new(5), &CollectionInfo::new(1000, false));
        assert_eq!(plan.to_string(), "$sample size=5 via reservoir scan (no random cursor)");
    }

    #[test]
    fn size_reports_requested_count() {
        let planner = SamplePlanner::default();
        let plan = planner.plan(&SampleSpec::new(7), &CollectionInfo::new(0, true));
        assert_eq!(plan.size(), 7);
        assert!(!plan.requires_random_cursor());
    }
}
