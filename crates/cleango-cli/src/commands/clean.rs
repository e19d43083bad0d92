use cleango_dashboard::RemoteGateway;
use tracing::info;

use crate::cli::{CleanArgs, OutputFormat};
use crate::client::{AppContext, CliResult};
use crate::output::{CleanReport, render_clean_report};

pub(crate) async fn handle_clean(
    ctx: &AppContext,
    args: &CleanArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let gateway = ctx.gateway.as_ref();
    let receipt = gateway.trigger_clean().await?;
    info!(removed = receipt.removed_count(), "clean accepted");

    let mut report = CleanReport {
        receipt,
        last_clean: None,
        stats: None,
    };
    if !args.no_wait {
        tokio::time::sleep(ctx.config.clean.settle_delay).await;
        let (last_clean, stats) = tokio::try_join!(gateway.clean_status(), gateway.stats())?;
        report.last_clean = Some(last_clean);
        report.stats = Some(stats);
    }
    render_clean_report(&report, format)
}
