//! Stage specifications and planner settings.
//!
//! `$sample` is configured from user-supplied JSON of the form
//! `{"size": <non-negative number>}`. [`SampleSpec::parse`] checks that shape
//! once, at construction, and reports the first violated rule as a specific
//! [`SampleError`] variant. [`SampleSpec::serialize`] gives the same object
//! back, number type included.
//!
//! The random-cursor sampler has no user-facing syntax; the planner builds its
//! [`RandomCursorOptions`] directly.
//!
//! # Example
//!
//! ```
//! use ironsample::config::SampleSpec;
//! use serde_json::json;
//!
//! let spec = SampleSpec::parse(&json!({"size": 10}))?;
//! assert_eq!(spec.size(), 10);
//! assert_eq!(spec.serialize(), json!({"size": 10}));
//! # Ok::<(), ironsample::SampleError>(())
//! ```

use crate::error::{Result, SampleError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Name of the reservoir sampling stage.
pub const SAMPLE_STAGE_NAME: &str = "$sample";

/// Name of the random-cursor sampling stage, as shown by explain.
pub const SAMPLE_FROM_RANDOM_CURSOR_STAGE_NAME: &str = "$sampleFromRandomCursor";

/// Default identity field used for duplicate detection.
pub const DEFAULT_ID_FIELD: &str = "_id";

/// Consecutive duplicates tolerated before the random-cursor sampler gives up.
pub const DEFAULT_MAX_DUPLICATE_ATTEMPTS: usize = 1000;

/// Largest `size / record_count` ratio for which the planner picks a random cursor.
pub const DEFAULT_MAX_SAMPLE_RATIO: f64 = 0.05;

const SIZE: &str = "size";

/// Validated `$sample` specification.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSpec {
    size: usize,
    raw_size: Number,
}

impl SampleSpec {
    /// Specification for a sample of `size` documents.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            raw_size: Number::from(size as u64),
        }
    }

    /// Validate the argument of a `$sample` stage.
    ///
    /// # Errors
    ///
    /// - [`SampleError::InvalidConfigurationShape`] if `spec` is not an object.
    /// - [`SampleError::InvalidOptionType`] if `size` is not a number.
    /// - [`SampleError::InvalidOptionValue`] if `size` is negative.
    /// - [`SampleError::UnrecognizedOption`] for any key other than `size`.
    /// - [`SampleError::MissingRequiredOption`] if `size` is absent.
    pub fn parse(spec: &Value) -> Result<Self> {
        let Value::Object(options) = spec else {
            return Err(SampleError::InvalidConfigurationShape {
                found: json_type_name(spec).to_owned(),
            });
        };

        let mut parsed = None;
        for (key, value) in options {
            if key != SIZE {
                return Err(SampleError::UnrecognizedOption {
                    option: key.clone(),
                });
            }
            parsed = Some(parse_size(value)?);
        }

        parsed.ok_or(SampleError::MissingRequiredOption { option: SIZE })
    }

    /// Validate a full stage document, `{"$sample": {...}}`.
    ///
    /// # Errors
    ///
    /// [`SampleError::InvalidConfigurationShape`] if the document is not a
    /// single-key object naming `$sample`, plus everything [`parse`](Self::parse)
    /// reports for the argument.
    pub fn parse_stage(stage: &Value) -> Result<Self> {
        let shape_error = |found: String| SampleError::InvalidConfigurationShape { found };
        let Value::Object(map) = stage else {
            return Err(shape_error(json_type_name(stage).to_owned()));
        };
        let mut entries = map.iter();
        match (entries.next(), entries.next()) {
            (Some((name, argument)), None) if name == SAMPLE_STAGE_NAME => Self::parse(argument),
            (Some((name, _)), None) => Err(shape_error(format!("stage {name}"))),
            _ => Err(shape_error(format!("object with {} keys", map.len()))),
        }
    }

    /// Number of documents to sample.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The specification as it was parsed.
    #[must_use]
    pub fn serialize(&self) -> Value {
        let mut map = Map::new();
        map.insert(SIZE.to_owned(), Value::Number(self.raw_size.clone()));
        Value::Object(map)
    }

    /// The full stage document, `{"$sample": {"size": ...}}`.
    #[must_use]
    pub fn to_stage(&self) -> Value {
        let mut stage = Map::new();
        stage.insert(SAMPLE_STAGE_NAME.to_owned(), self.serialize());
        Value::Object(stage)
    }
}

fn parse_size(value: &Value) -> Result<SampleSpec> {
    let Value::Number(number) = value else {
        return Err(SampleError::InvalidOptionType {
            option: SIZE,
            found: json_type_name(value).to_owned(),
        });
    };

    let size = if let Some(n) = number.as_u64() {
        usize::try_from(n).unwrap_or(usize::MAX)
    } else if number.as_i64().is_some() {
        return Err(negative_size());
    } else {
        let n = number.as_f64().unwrap_or(f64::NAN);
        if n.is_nan() || n < 0.0 {
            return Err(negative_size());
        }
        truncate_size(n)
    };

    Ok(SampleSpec {
        size,
        raw_size: number.clone(),
    })
}

// fractional sizes truncate toward zero; huge values saturate
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_size(n: f64) -> usize {
    n.trunc() as usize
}

fn negative_size() -> SampleError {
    SampleError::InvalidOptionValue {
        option: SIZE,
        value: "negative".into(),
    }
}

/// JSON type name used in error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Settings for the random-cursor sampler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomCursorOptions {
    /// Documents to produce before reporting exhaustion.
    pub size: usize,
    /// Field whose value identifies a document for duplicate detection.
    /// Dotted paths (`"meta.key"`) descend into embedded objects.
    pub id_field: String,
    /// Estimated number of documents in the underlying collection.
    pub population_estimate: u64,
    /// Consecutive duplicates tolerated within one pull.
    pub max_duplicate_attempts: usize,
}

impl RandomCursorOptions {
    /// Options with the default identity field and duplicate budget.
    #[must_use]
    pub fn new(size: usize, population_estimate: u64) -> Self {
        Self {
            size,
            population_estimate,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    #[must_use]
    pub const fn with_max_duplicate_attempts(mut self, attempts: usize) -> Self {
        self.max_duplicate_attempts = attempts;
        self
    }

    /// Check the options a planner filled in.
    ///
    /// # Errors
    ///
    /// [`SampleError::InvalidOptionValue`] for a zero population estimate, an
    /// empty identity field, or a zero duplicate budget.
    pub fn validate(&self) -> Result<()> {
        if self.population_estimate == 0 {
            return Err(SampleError::InvalidOptionValue {
                option: "population_estimate",
                value: "0".into(),
            });
        }
        if self.id_field.is_empty() {
            return Err(SampleError::InvalidOptionValue {
                option: "id_field",
                value: "empty".into(),
            });
        }
        if self.max_duplicate_attempts == 0 {
            return Err(SampleError::InvalidOptionValue {
                option: "max_duplicate_attempts",
                value: "0".into(),
            });
        }
        Ok(())
    }
}

impl Default for RandomCursorOptions {
    fn default() -> Self {
        Self {
            size: 0,
            id_field: DEFAULT_ID_FIELD.to_owned(),
            population_estimate: 1,
            max_duplicate_attempts: DEFAULT_MAX_DUPLICATE_ATTEMPTS,
        }
    }
}

/// Settings used by [`SamplePlanner`](crate::planner::SamplePlanner).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Largest `size / record_count` ratio for which a random cursor is used.
    pub max_sample_ratio: f64,
    /// Identity field handed to the random-cursor sampler.
    pub id_field: String,
    /// Duplicate budget handed to the random-cursor sampler.
    pub max_duplicate_attempts: usize,
}

impl PlannerConfig {
    /// Load settings from JSON text; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for this structure.
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if !(0.0..=1.0).contains(&config.max_sample_ratio) {
            anyhow::bail!(
                "max_sample_ratio must be within [0, 1], got {}",
                config.max_sample_ratio
            );
        }
        Ok(config)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_sample_ratio: DEFAULT_MAX_SAMPLE_RATIO,
            id_field: DEFAULT_ID_FIELD.to_owned(),
            max_duplicate_attempts: DEFAULT_MAX_DUPLICATE_ATTEMPTS,
        }
    }
}
