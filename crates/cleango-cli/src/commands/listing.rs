use cleango_dashboard::{PageQuery, RemoteGateway};
use tracing::debug;

use crate::cli::{ListArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_page;

pub(crate) async fn handle_list(
    ctx: &AppContext,
    args: &ListArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let query = build_query(ctx, args)?;
    debug!(page = query.page, per_page = query.per_page, "listing deleted torrents");
    let page = ctx.gateway.deleted_page(&query).await?;
    render_page(&page, format)
}

fn build_query(ctx: &AppContext, args: &ListArgs) -> CliResult<PageQuery> {
    if args.page == 0 {
        return Err(CliError::validation("page must be at least 1"));
    }
    let per_page = args.per_page.unwrap_or(ctx.config.listing.page_size);
    if per_page == 0 {
        return Err(CliError::validation("per-page must be greater than zero"));
    }
    Ok(PageQuery::new(
        args.page,
        per_page,
        args.search.as_deref().unwrap_or_default(),
    ))
}
