//! Identities already returned by the random-cursor sampler.

use serde_json::{Number, Value};
use std::collections::HashSet;

/// Set of accepted document identities.
///
/// Numbers compare by numeric value at any depth, so `1`, `1.0` and `1u64`
/// are one identity, as are `{"a": [1]}` and `{"a": [1.0]}`. Strings, booleans
/// and null compare by their JSON text; object fields compare in order.
#[derive(Clone, Debug, Default)]
pub struct SeenIdentities {
    keys: HashSet<String>,
}

impl SeenIdentities {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`; returns `false` if it was already present.
    pub fn insert(&mut self, id: &Value) -> bool {
        self.keys.insert(identity_key(id))
    }

    #[must_use]
    pub fn contains(&self, id: &Value) -> bool {
        self.keys.contains(&identity_key(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.keys.shrink_to_fit();
    }
}

fn identity_key(id: &Value) -> String {
    match id {
        Value::Number(n) => number_key(n),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(identity_key).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, value)| {
                    format!("{}:{}", Value::from(name.as_str()), identity_key(value))
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        other => other.to_string(),
    }
}

// 2^63; integral floats below this print as integers
const INTEGRAL_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        #[allow(clippy::cast_possible_truncation)]
        Some(f) if f.fract() == 0.0 && f.abs() < INTEGRAL_LIMIT => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
