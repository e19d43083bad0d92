//! Error types for gateway and controller operations.

use cleango_config::ConfigError;
use thiserror::Error;

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure of a single remote operation.
///
/// Transport-class variants cover everything between the socket and the JSON
/// decoder; [`GatewayError::Rejected`] is the service reporting its own error.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("request to {endpoint} failed")]
    Transport {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The service answered with a non-success status and no error body.
    #[error("{endpoint} responded with HTTP {status}")]
    Status {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The response body did not match the expected shape.
    #[error("{endpoint} returned a malformed body")]
    Decode {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A field decoded but carried an unusable value.
    #[error("{endpoint} returned an invalid {field}")]
    InvalidField {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// Offending field name.
        field: &'static str,
        /// Offending raw value.
        value: String,
    },
    /// The service reported an error of its own.
    #[error("{message}")]
    Rejected {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// Service message with any `error: ` prefix removed.
        message: String,
    },
    /// The request URL could not be built from the base URL.
    #[error("invalid request URL for {endpoint}")]
    Url {
        /// Endpoint path that was being joined.
        endpoint: &'static str,
        /// Underlying URL error.
        source: url::ParseError,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client {
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The service configuration was unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GatewayError {
    /// `true` when the service itself reported the failure.
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Endpoint involved in the failure, when there was one.
    #[must_use]
    pub const fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::InvalidField { endpoint, .. }
            | Self::Rejected { endpoint, .. }
            | Self::Url { endpoint, .. } => Some(*endpoint),
            Self::Client { .. } | Self::Config(_) => None,
        }
    }
}

/// Returned by [`crate::ControllerHandle`] once the controller loop has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dashboard controller is no longer running")]
pub struct ControllerClosed;
