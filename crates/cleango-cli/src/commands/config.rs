use cleango_config::DashboardConfig;

use crate::cli::OutputFormat;
use crate::client::CliResult;
use crate::output::render_config;

pub(crate) fn handle_config(config: &DashboardConfig, format: OutputFormat) -> CliResult<()> {
    render_config(config, format)
}
