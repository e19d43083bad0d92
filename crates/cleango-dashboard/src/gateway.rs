//! Remote gateway: the only component that talks to the cleanup service.
//!
//! # Design
//! - One trait seam ([`RemoteGateway`]) for the controller and its test doubles.
//! - Every call resolves to a typed domain value or a [`GatewayError`]; no retries.
//! - Non-success responses carrying `{"error": ...}` become domain rejections,
//!   anything else is transport-class.

use async_trait::async_trait;
use cleango_api_models::{
    CLEAN_PATH, CLEAN_STATUS_PATH, CleanResponse, CleanStatusResponse, DELETED_PATH,
    DeletedListResponse, ErrorBody, STATS_PATH, STATUS_PATH, StatsResponse, StatusResponse,
    VERSION_PATH, VersionResponse, strip_error_prefix,
};
use cleango_config::ServiceConfig;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::convert;
use crate::error::{GatewayError, GatewayResult};
use crate::model::{CleanReceipt, CleanRun, ConnectionStatus, Page, PageQuery, Stats};

/// Typed operations against the cleanup service.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Service version string.
    async fn version(&self) -> GatewayResult<String>;
    /// Whether the service reaches its torrent client.
    async fn connection_status(&self) -> GatewayResult<ConnectionStatus>;
    /// Last completed clean run.
    async fn clean_status(&self) -> GatewayResult<CleanRun>;
    /// Cumulative removal statistics.
    async fn stats(&self) -> GatewayResult<Stats>;
    /// One page of the deletion log.
    async fn deleted_page(&self, query: &PageQuery) -> GatewayResult<Page>;
    /// Ask the service to run a clean pass now.
    async fn trigger_clean(&self) -> GatewayResult<CleanReceipt>;
}

/// [`RemoteGateway`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Wrap a preconfigured client.
    ///
    /// A path prefix on `base_url` (`http://host/cleango`) is kept; endpoints
    /// resolve beneath it.
    #[must_use]
    pub fn new(client: Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Build a client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL does not parse or the client cannot be built.
    pub fn from_config(config: &ServiceConfig) -> GatewayResult<Self> {
        let base_url = config.base_url()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| GatewayError::Client { source })?;
        Ok(Self::new(client, base_url))
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &'static str) -> GatewayResult<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|source| GatewayError::Url { endpoint, source })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&'static str, String)],
    ) -> GatewayResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| GatewayError::Transport { endpoint, source })?;
        decode(endpoint, response).await
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &'static str, response: Response) -> GatewayResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| GatewayError::Transport { endpoint, source })?;

    if !status.is_success() {
        debug!(endpoint, status = status.as_u16(), "service returned failure status");
        if let Ok(problem) = serde_json::from_str::<ErrorBody>(&body) {
            return Err(GatewayError::Rejected {
                endpoint,
                message: strip_error_prefix(&problem.error).to_string(),
            });
        }
        return Err(GatewayError::Status {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| GatewayError::Decode { endpoint, source })
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn version(&self) -> GatewayResult<String> {
        let body: VersionResponse = self.get_json(VERSION_PATH, &[]).await?;
        Ok(body.version)
    }

    async fn connection_status(&self) -> GatewayResult<ConnectionStatus> {
        let body: StatusResponse = self.get_json(STATUS_PATH, &[]).await?;
        Ok(convert::connection_status(&body))
    }

    async fn clean_status(&self) -> GatewayResult<CleanRun> {
        let body: CleanStatusResponse = self.get_json(CLEAN_STATUS_PATH, &[]).await?;
        convert::clean_run(CLEAN_STATUS_PATH, body)
    }

    async fn stats(&self) -> GatewayResult<Stats> {
        let body: StatsResponse = self.get_json(STATS_PATH, &[]).await?;
        Ok(convert::stats(&body))
    }

    async fn deleted_page(&self, query: &PageQuery) -> GatewayResult<Page> {
        let pairs = query.to_wire().to_pairs();
        let body: DeletedListResponse = self.get_json(DELETED_PATH, &pairs).await?;
        convert::page(DELETED_PATH, body)
    }

    async fn trigger_clean(&self) -> GatewayResult<CleanReceipt> {
        let url = self.endpoint_url(CLEAN_PATH)?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: CLEAN_PATH,
                source,
            })?;
        let body: CleanResponse = decode(CLEAN_PATH, response).await?;
        if let Some(error) = body.error {
            return Err(GatewayError::Rejected {
                endpoint: CLEAN_PATH,
                message: strip_error_prefix(&error).to_string(),
            });
        }
        Ok(convert::receipt(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CleanOutcome, CleanTrigger};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn gateway_for(server: &MockServer) -> HttpGateway {
        HttpGateway::from_config(&ServiceConfig {
            api_url: server.base_url(),
            request_timeout: Duration::from_secs(2),
        })
        .expect("gateway should build")
    }

    #[tokio::test]
    async fn base_path_prefix_is_preserved() {
        let server = MockServer::start_async().await;
        let version = server.mock(|when, then| {
            when.method(GET).path("/cleango/api/version");
            then.status(200).json_body(json!({"version": "2.1.0"}));
        });
        let gateway = HttpGateway::from_config(&ServiceConfig {
            api_url: format!("{}/cleango", server.base_url()),
            request_timeout: Duration::from_secs(2),
        })
        .expect("gateway should build");

        assert_eq!(gateway.base_url().path(), "/cleango/");
        assert_eq!(gateway.version().await.expect("version loads"), "2.1.0");
        version.assert();
    }

    #[tokio::test]
    async fn version_and_status_decode() {
        let server = MockServer::start_async().await;
        let version = server.mock(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).json_body(json!({"version": "2.1.0"}));
        });
        let status = server.mock(|when, then| {
            when.method(GET).path("/api/status");
            then.status(200).json_body(json!({"status": "connected"}));
        });

        let gateway = gateway_for(&server);
        assert_eq!(gateway.version().await.expect("version"), "2.1.0");
        assert_eq!(
            gateway.connection_status().await.expect("status"),
            ConnectionStatus::Connected
        );
        version.assert();
        status.assert();
    }

    #[tokio::test]
    async fn clean_status_strips_error_prefix() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/clean-status");
            then.status(200).json_body(json!({
                "timestamp": "2024-05-01 14:00:00",
                "type": "manual",
                "result": "error: Not connected to qBittorrent",
                "torrents_removed": 0
            }));
        });

        let run = gateway_for(&server).clean_status().await.expect("clean status");
        assert_eq!(run.trigger, Some(CleanTrigger::Manual));
        assert_eq!(
            run.outcome,
            Some(CleanOutcome::Failure {
                message: "Not connected to qBittorrent".into()
            })
        );
        assert!(run.timestamp.is_some());
    }

    #[tokio::test]
    async fn deleted_page_forwards_query() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/deleted")
                .query_param("page", "2")
                .query_param("per_page", "100")
                .query_param("search", "unregistered");
            then.status(200).json_body(json!({
                "torrents": [{
                    "name": "Some.Show.S01E01",
                    "size": 1_073_741_824_u64,
                    "tracker_message": "Unregistered torrent",
                    "deletion_date": "2024-05-01 14:00:00"
                }],
                "total": 101,
                "page": 2,
                "per_page": 100,
                "total_pages": 2
            }));
        });

        let page = gateway_for(&server)
            .deleted_page(&PageQuery::new(2, 100, "Unregistered"))
            .await
            .expect("page");
        mock.assert();
        assert_eq!(page.page_number, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].size_bytes, 1_073_741_824);
    }

    #[tokio::test]
    async fn clean_error_body_is_domain_rejection() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/clean");
            then.status(500).json_body(json!({"error": "disk full"}));
        });

        let err = gateway_for(&server)
            .trigger_clean()
            .await
            .expect_err("clean should fail");
        assert!(err.is_domain());
        assert_eq!(err.to_string(), "disk full");
    }

    #[tokio::test]
    async fn clean_success_returns_receipt() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/clean");
            then.status(200).json_body(json!({"deleted": [{
                "name": "Old.Release",
                "size_bytes": 2048,
                "tracker_message": "Torrent not found"
            }]}));
        });

        let receipt = gateway_for(&server).trigger_clean().await.expect("receipt");
        assert_eq!(receipt.removed_count(), 1);
        assert_eq!(receipt.removed[0].name, "Old.Release");
    }

    #[tokio::test]
    async fn non_json_failure_is_status_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(502).body("upstream unavailable");
        });

        let err = gateway_for(&server).stats().await.expect_err("stats should fail");
        assert!(matches!(err, GatewayError::Status { status: 502, .. }));
        assert!(!err.is_domain());
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).body("{\"total_deleted\": \"many\"}");
        });

        let err = gateway_for(&server).stats().await.expect_err("stats should fail");
        assert!(matches!(err, GatewayError::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let gateway = HttpGateway::from_config(&ServiceConfig {
            api_url: "http://127.0.0.1:9".into(),
            request_timeout: Duration::from_millis(500),
        })
        .expect("gateway should build");

        let err = gateway
            .connection_status()
            .await
            .expect_err("status should fail");
        assert!(matches!(err, GatewayError::Transport { .. }));
    }
}
