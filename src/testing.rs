//! Testing utilities for sampling stages.
//!
//! This module provides what a test needs to drive a stage without a real
//! pipeline engine:
//!
//! - **Mock upstream**: [`MockSource`] replays documents, pauses and errors
//! - **Deterministic randomness**: [`FixedSequence`] replays chosen draws
//! - **Fixtures**: ready-made documents
//! - **Assertions**: exhaustion, weight ordering, untouched fields
//!
//! # Quick Start
//!
//! ```
//! use ironsample::*;
//! use ironsample::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let source = MockSource::from_docs(numbered_docs(10));
//! let mut sample = SampleStage::new(
//!     SampleSpec::new(3),
//!     Box::new(source),
//!     WeightAssigner::seeded(42),
//! );
//!
//! let docs = Runner::new().collect(&mut sample)?;
//! assert_collection_size(&docs, 3);
//! assert_descending_weights(&docs);
//! assert_exhausted(&mut sample);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock_source;
pub mod random;

pub use assertions::*;
pub use fixtures::*;
pub use mock_source::MockSource;
pub use random::FixedSequence;
