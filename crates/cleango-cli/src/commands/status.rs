use cleango_dashboard::RemoteGateway;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliResult};
use crate::output::{StatusReport, render_stats, render_status, render_version};

pub(crate) async fn handle_status(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let gateway = ctx.gateway.as_ref();
    let (version, connection, last_clean) = tokio::try_join!(
        gateway.version(),
        gateway.connection_status(),
        gateway.clean_status()
    )?;
    let report = StatusReport {
        version,
        connection,
        last_clean,
    };
    render_status(&report, format)
}

pub(crate) async fn handle_stats(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let stats = ctx.gateway.stats().await?;
    render_stats(&stats, format)
}

pub(crate) async fn handle_version(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let version = ctx.gateway.version().await?;
    render_version(&version, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_context::context_for;
    use cleango_test_support::fixtures::{clean_status_body, stats_body};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn status_queries_all_three_endpoints() {
        let server = MockServer::start_async().await;
        let version = server.mock(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).json_body(json!({"version": "2.0.0"}));
        });
        let status = server.mock(|when, then| {
            when.method(GET).path("/api/status");
            then.status(200).json_body(json!({"status": "connected"}));
        });
        let clean = server.mock(|when, then| {
            when.method(GET).path("/api/clean-status");
            then.status(200)
                .json_body(clean_status_body("manual", "success", 2));
        });

        handle_status(&context_for(&server), OutputFormat::Json)
            .await
            .expect("status should succeed");

        version.assert();
        status.assert();
        clean.assert();
    }

    #[tokio::test]
    async fn status_fails_when_any_endpoint_fails() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).json_body(json!({"version": "2.0.0"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/status");
            then.status(503).body("unavailable");
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/clean-status");
            then.status(200).json_body(json!({}));
        });

        let err = handle_status(&context_for(&server), OutputFormat::Table)
            .await
            .expect_err("status should fail");
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn stats_renders_service_totals() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(stats_body(41, None));
        });

        handle_stats(&context_for(&server), OutputFormat::Table)
            .await
            .expect("stats should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn version_surfaces_decode_errors() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).body("not json");
        });

        let err = handle_version(&context_for(&server), OutputFormat::Table)
            .await
            .expect_err("version should fail");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("/api/version"));
    }
}
