//! Gateway construction and the CLI error type.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use cleango_config::DashboardConfig;
use cleango_dashboard::{GatewayError, HttpGateway};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// Bad input (exit 2) versus a failed operation (exit 3).
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

impl From<GatewayError> for CliError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Config(inner) => Self::validation(inner.to_string()),
            other => Self::failure(other),
        }
    }
}

/// Resolved configuration and the gateway every handler talks through.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) gateway: Arc<HttpGateway>,
    pub(crate) config: DashboardConfig,
}

impl AppContext {
    /// Build the HTTP gateway for `config`, tagging every request with `trace_id`.
    pub(crate) fn new(config: DashboardConfig, trace_id: &str) -> CliResult<Self> {
        let base_url = config
            .service
            .base_url()
            .map_err(|err| CliError::validation(err.to_string()))?;
        let client = build_client(config.service.request_timeout, trace_id)?;
        Ok(Self {
            gateway: Arc::new(HttpGateway::new(client, base_url)),
            config,
        })
    }
}

/// Construct an HTTP client carrying the request identifier header.
pub(crate) fn build_client(timeout: Duration, trace_id: &str) -> CliResult<Client> {
    let trace = HeaderValue::from_str(trace_id)
        .map_err(|_| CliError::failure(anyhow!("trace id is not a valid header value")))?;
    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(HEADER_REQUEST_ID), trace);

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}
