//! Error types for configuration operations.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Primary error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {key}: {reason}")]
    InvalidEnv {
        /// Environment variable name.
        key: &'static str,
        /// Raw value that failed to parse.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A field failed validation.
    #[error("invalid configuration field {field}: {reason}")]
    InvalidField {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The service URL could not be parsed.
    #[error("invalid service URL '{value}'")]
    InvalidUrl {
        /// URL text provided by the caller.
        value: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
}
