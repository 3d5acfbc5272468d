//! Minimal document model carried through sampling stages.
//!
//! A [`Document`] is an ordered map of field name to JSON value plus a
//! metadata slot. Metadata never shows up as a visible field and is
//! skipped when the document is serialized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Out-of-band annotations attached to a document.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct DocumentMetadata {
    /// Random weight in `[0, 1)` assigned by a sampling stage.
    pub(crate) rand_val: Option<f64>,
}

/// An ordered set of fields with attached metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(flatten)]
    fields: Map<String, Value>,
    #[serde(skip)]
    metadata: DocumentMetadata,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a JSON object.
    ///
    /// Returns `None` when `value` is not an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::from(fields)),
            _ => None,
        }
    }

    /// Look up a top-level field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Look up a field by dotted path (`"b.c"`), descending through objects.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Set a top-level field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Visible fields in insertion order.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Number of visible fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The random weight, if a sampling stage assigned one.
    #[must_use]
    pub const fn rand_val(&self) -> Option<f64> {
        self.metadata.rand_val
    }

    #[must_use]
    pub const fn has_rand_val(&self) -> bool {
        self.metadata.rand_val.is_some()
    }

    /// Attach (or overwrite) the random weight.
    pub const fn set_rand_val(&mut self, weight: f64) {
        self.metadata.rand_val = Some(weight);
    }

    /// Whether two documents have identical visible fields, ignoring metadata.
    #[must_use]
    pub fn same_fields(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            metadata: DocumentMetadata::default(),
        }
    }
}

impl std::ops::Index<&str> for Document {
    type Output = Value;

    /// Missing fields index to `Value::Null`, like `serde_json::Value`.
    fn index(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }
}

/// Build a [`Document`] from JSON object syntax.
///
/// ```
/// use ironsample::doc;
///
/// let d = doc!({"_id": 1, "b": {"c": 2}});
/// assert_eq!(d["b"]["c"], 2);
/// ```
///
/// # Panics
///
/// Panics if the expression is not a JSON object.
#[macro_export]
macro_rules! doc {
    ($($json:tt)+) => {
        $crate::Document::from_value($crate::__private::json!($($json)+))
            .expect("doc! requires a JSON object")
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_is_not_serialized() {
        let mut d = crate::doc!({"a": 1, "b": {"c": 2}});
        d.set_rand_val(0.25);
        assert_eq!(serde_json::to_value(&d).unwrap(), json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(d.rand_val(), Some(0.25));
    }

    #[test]
    fn fields_keep_insertion_order() {
        let d = crate::doc!({"z": 1, "a": 2, "m": 3});
        let keys: Vec<&str> = d.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn dotted_path_lookup() {
        let d = crate::doc!({"b": {"c": {"d": true}}});
        assert_eq!(d.get_path("b.c.d"), Some(&json!(true)));
        assert_eq!(d.get_path("b.x"), None);
        assert_eq!(d["missing"], Value::Null);
    }

    #[test]
    fn non_objects_are_not_documents() {
        assert!(Document::from_value(json!(1)).is_none());
        assert!(Document::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn same_fields_ignores_metadata() {
        let a = crate::doc!({"x": 1});
        let mut b = a.clone();
        b.set_rand_val(0.9);
        assert!(a.same_fields(&b));
        assert_ne!(a, b);
    }
}
