//! Assertion functions for testing stage outputs.
//!
//! These panic with a detailed message on failure, like `assert_eq!`.

use crate::{Document, PullResult, Stage};
use std::fmt::Debug;

/// Assert that `stage` reports exhaustion on three consecutive pulls.
///
/// # Panics
///
/// Panics if any of the pulls errors or returns something other than
/// [`PullResult::Exhausted`].
pub fn assert_exhausted(stage: &mut dyn Stage) {
    for attempt in 1..=3 {
        match stage.pull() {
            Ok(PullResult::Exhausted) => {}
            other => panic!(
                "{} was not exhausted on pull {attempt} after its last document: {other:?}",
                stage.name()
            ),
        }
    }
}

/// Pull once and return the produced document.
///
/// # Panics
///
/// Panics unless the pull produced a document.
pub fn expect_produced(stage: &mut dyn Stage) -> Document {
    match stage.pull() {
        Ok(PullResult::Produced(doc)) => doc,
        other => panic!("expected {} to produce a document, got {other:?}", stage.name()),
    }
}

/// Assert that every document carries a random weight and that weights never increase.
///
/// # Panics
///
/// Panics on the first document without a weight or the first increase.
pub fn assert_descending_weights(docs: &[Document]) {
    let mut previous: Option<f64> = None;
    for (i, doc) in docs.iter().enumerate() {
        let Some(weight) = doc.rand_val() else {
            panic!("document {i} has no random weight: {doc:?}");
        };
        if let Some(prev) = previous {
            assert!(
                weight <= prev,
                "weights increase at index {i}: {prev} then {weight}\n  Documents: {docs:?}"
            );
        }
        previous = Some(weight);
    }
}

/// Assert that each sampled document matches one input document field for field.
///
/// # Panics
///
/// Panics if a sampled document has no counterpart among `inputs`.
pub fn assert_fields_unchanged(sampled: &[Document], inputs: &[Document]) {
    for (i, doc) in sampled.iter().enumerate() {
        assert!(
            inputs.iter().any(|input| input.same_fields(doc)),
            "sampled document {i} does not match any input document:\n  Sampled: {doc:?}\n  Inputs: {inputs:?}"
        );
    }
}

/// Assert that a collection has the expected number of elements.
///
/// # Panics
///
/// Panics if the length differs.
pub fn assert_collection_size<T: Debug>(collection: &[T], expected_size: usize) {
    assert_eq!(
        collection.len(),
        expected_size,
        "Collection size mismatch:\n  Expected: {expected_size}\n  Actual: {}\n  Collection: {collection:?}",
        collection.len()
    );
}
