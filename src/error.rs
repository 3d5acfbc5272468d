//! Error type shared by every sampling stage.
//!
//! Configuration problems are reported once, when a stage is built. Runtime
//! problems are returned from [`Stage::pull`](crate::Stage::pull) and stay
//! attached to the stage that raised them.
//!
//! Each variant carries a stable numeric [`code`](SampleError::code) so callers
//! can match on failures without parsing messages.

/// Result alias used across the crate.
pub type Result<T, E = SampleError> = std::result::Result<T, E>;

/// Errors raised while building or pulling from a sampling stage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    /// The stage specification is not an object (or names another stage).
    #[error("$sample expects an object as its argument, found {found}")]
    InvalidConfigurationShape {
        /// JSON type (or stage name) that was found instead
        found: String,
    },

    /// A required option is absent.
    #[error("$sample stage must specify a {option}")]
    MissingRequiredOption {
        /// Name of the missing option
        option: &'static str,
    },

    /// An option is present but has the wrong JSON type.
    #[error("{option} argument to $sample must be a number, found {found}")]
    InvalidOptionType {
        /// Name of the offending option
        option: &'static str,
        /// JSON type that was found
        found: String,
    },

    /// An option has the right type but an unusable value.
    #[error("{option} argument to $sample must not be {value}")]
    InvalidOptionValue {
        /// Name of the offending option
        option: &'static str,
        /// Rendered value that was rejected
        value: String,
    },

    /// The specification carries a key this stage does not understand.
    #[error("unrecognized option to $sample: {option}")]
    UnrecognizedOption {
        /// The unexpected key
        option: String,
    },

    /// A document reached the random-cursor sampler without its identity field.
    #[error("$sample stage requires each document to have a {field} field; found a document without one")]
    MissingIdentityField {
        /// Configured identity field name
        field: String,
    },

    /// The random cursor kept returning documents that were already sampled.
    #[error(
        "$sample stage could not find a non-duplicate document after {attempts} attempts while using a random cursor"
    )]
    DuplicateBudgetExceeded {
        /// Number of consecutive duplicates observed
        attempts: usize,
    },

    /// A merge input produced a document that was never assigned a random weight.
    #[error("sample merge input {input} produced a document without a random weight")]
    MissingRandomWeight {
        /// Index of the input stream
        input: usize,
    },
}

impl SampleError {
    /// Stable numeric code for this error kind.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::InvalidConfigurationShape { .. } => 28745,
            Self::InvalidOptionType { .. } => 28746,
            Self::InvalidOptionValue { .. } => 28747,
            Self::UnrecognizedOption { .. } => 28748,
            Self::MissingRequiredOption { .. } => 28749,
            Self::MissingIdentityField { .. } => 28793,
            Self::DuplicateBudgetExceeded { .. } => 28799,
            Self::MissingRandomWeight { .. } => 28800,
        }
    }

    /// Whether the error was raised while validating a stage specification.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfigurationShape { .. }
                | Self::InvalidOptionType { .. }
                | Self::InvalidOptionValue { .. }
                | Self::UnrecognizedOption { .. }
                | Self::MissingRequiredOption { .. }
        )
    }
}
