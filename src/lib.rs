//! # Ironsample
//!
//! **Random sampling stages** for pull-based document pipelines.
//!
//! A pipeline engine drives each stage by calling [`Stage::pull`] repeatedly.
//! Every call returns one of three outcomes: a produced [`Document`], a
//! transient pause, or exhaustion. This crate provides stages that sample
//! documents under that contract.
//!
//! ## Key Features
//!
//! - **`$sample`** ([`SampleStage`]) - reservoir sampling over any upstream
//! - **`$sampleFromRandomCursor`** ([`SampleFromRandomCursorStage`]) - O(size)
//!   sampling from a random cursor with statistically equivalent weights
//! - **Shard merge** ([`SampleMergeStage`]) - combine per-shard samples by weight
//! - **Planner** ([`planner`]) - pick the cheaper stage when it is safe to
//! - **Pause propagation** - stages suspend and resume across upstream pauses
//! - **Deterministic testing** - inject a seeded or scripted random source
//!
//! ## Quick Start
//!
//! ```
//! use ironsample::*;
//! use ironsample::testing::MockSource;
//! use serde_json::json;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let source = MockSource::from_docs((0..100).map(|i| doc!({"_id": i})));
//!
//! let mut sample = SampleStage::from_json(
//!     &json!({"size": 5}),
//!     Box::new(source),
//!     WeightAssigner::seeded(7),
//! )?;
//!
//! let docs = Runner::new().collect(&mut sample)?;
//! assert_eq!(docs.len(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Pull contract
//!
//! [`PullResult::Paused`] means "nothing right now, ask again". A stage that
//! needs upstream input and sees a pause returns the pause to its own caller
//! and keeps its partial state, so the next pull resumes where it stopped.
//! [`PullResult::Exhausted`] is final.
//!
//! ### Random weights
//!
//! Sampled documents carry a random weight in their metadata
//! ([`Document::rand_val`]); their visible fields are never modified. Both
//! sampling stages emit documents in descending weight order and their weights
//! share one distribution, so samples from either can be merged.
//!
//! ### Randomness
//!
//! All draws go through a [`WeightAssigner`] injected at construction. Use
//! [`WeightAssigner::seeded`] for reproducible runs and
//! [`testing::FixedSequence`] to script exact draws.
//!
//! ## Module Overview
//!
//! - [`stage`] - the pull contract
//! - [`document`] - documents and metadata
//! - [`random`] - random sources and weight assignment
//! - [`reservoir`] - bounded top-K reservoir
//! - [`stages`] - the sampling stages
//! - [`config`] - stage specifications and planner settings
//! - [`planner`] - choosing between sampling stages
//! - [`runner`] - draining a stage to completion
//! - [`metrics`] - per-stage counters
//! - [`error`] - error type and codes
//! - [`testing`] - mock upstreams, fixtures and assertions

pub mod config;
pub mod document;
pub mod error;
pub mod metrics;
pub mod planner;
pub mod random;
pub mod reservoir;
pub mod runner;
pub mod stage;
pub mod stages;
pub mod testing;

// General re-exports
pub use config::{PlannerConfig, RandomCursorOptions, SampleSpec};
pub use document::Document;
pub use error::{Result, SampleError};
pub use metrics::StageStats;
pub use planner::{CollectionInfo, SamplePlan, SamplePlanner};
pub use random::{RandomSource, SharedRandom, WeightAssigner};
pub use runner::{Drained, Runner};
pub use stage::{BoxedStage, PullResult, Stage};
pub use stages::{SampleFromRandomCursorStage, SampleMergeStage, SampleStage, SeenIdentities};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::json;
}
