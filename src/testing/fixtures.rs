//! Pre-built documents for common sampling scenarios.

use crate::Document;
use serde_json::json;

/// `n` documents of the form `{"_id": i}` for `i` in `0..n`.
///
/// ```
/// use ironsample::testing::numbered_docs;
///
/// let docs = numbered_docs(3);
/// assert_eq!(docs[2]["_id"], 2);
/// ```
#[must_use]
pub fn numbered_docs(n: usize) -> Vec<Document> {
    (0..n).map(|i| with_id(json!(i))).collect()
}

/// `copies` documents that all share the identity `id`.
#[must_use]
pub fn duplicate_docs(id: i64, copies: usize) -> Vec<Document> {
    (0..copies).map(|_| with_id(json!(id))).collect()
}

/// Documents with nested and mixed-type fields, each with a distinct `_id`.
#[must_use]
pub fn nested_docs() -> Vec<Document> {
    [
        json!({"_id": 1, "name": "alpha", "tags": ["a", "b"], "meta": {"score": 0.5}}),
        json!({"_id": 2, "name": "beta", "tags": [], "meta": {"score": 1.5, "flag": true}}),
        json!({"_id": 3, "name": null, "meta": {"nested": {"deep": [1, 2, 3]}}}),
        json!({"_id": "four", "name": "delta", "meta": {}}),
    ]
    .into_iter()
    .filter_map(Document::from_value)
    .collect()
}

fn with_id(id: serde_json::Value) -> Document {
    let mut doc = Document::new();
    doc.insert("_id", id);
    doc
}
