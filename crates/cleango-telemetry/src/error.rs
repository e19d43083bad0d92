//! Failures raised while setting up logging or rendering metrics.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use prometheus::Error as PrometheusError;

/// Shorthand for telemetry results.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Telemetry failure.
#[derive(Debug)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    SubscriberInstall {
        /// Error from `tracing-subscriber`.
        source: tracing_subscriber::util::TryInitError,
    },
    /// A collector could not be created or registered.
    MetricsCollector {
        /// Metric name.
        name: &'static str,
        /// Error from `prometheus`.
        source: PrometheusError,
    },
    /// The registry could not be encoded as text.
    MetricsEncode {
        /// Error from `prometheus`.
        source: PrometheusError,
    },
    /// The encoded registry was not UTF-8.
    MetricsUtf8 {
        /// Conversion error.
        source: std::string::FromUtf8Error,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriberInstall { .. } => {
                formatter.write_str("a global tracing subscriber is already installed")
            }
            Self::MetricsCollector { name, .. } => {
                write!(formatter, "failed to set up metrics collector {name}")
            }
            Self::MetricsEncode { .. } => formatter.write_str("failed to encode the metrics registry"),
            Self::MetricsUtf8 { .. } => formatter.write_str("encoded metrics are not utf-8"),
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SubscriberInstall { source } => Some(source),
            Self::MetricsCollector { source, .. } | Self::MetricsEncode { source } => Some(source),
            Self::MetricsUtf8 { source } => Some(source),
        }
    }
}
