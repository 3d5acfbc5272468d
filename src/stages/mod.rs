//! Sampling stages.
//!
//! - [`SampleStage`]: `$sample`, reservoir sampling over any upstream.
//! - [`SampleFromRandomCursorStage`]: `$sampleFromRandomCursor`, lazy
//!   order-statistic weights over a random cursor.
//! - [`SampleMergeStage`]: merges weight-ordered samples from several shards.
//!
//! Every stage implements [`Stage`](crate::Stage) and owns its upstream as a
//! [`BoxedStage`](crate::BoxedStage).

mod sample;
mod sample_from_random_cursor;
mod sample_merge;
mod seen;

pub use sample::SampleStage;
pub use sample_from_random_cursor::SampleFromRandomCursorStage;
pub use sample_merge::SampleMergeStage;
pub use seen::SeenIdentities;
