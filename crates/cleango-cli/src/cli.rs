//! Command-line client for the cleango cleanup service.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cleango_config::{DashboardConfig, PollingConfig, load_from_env, validate};
use cleango_telemetry::{LogFormat, LogTarget, LoggingConfig, build_sha, init_logging};
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::clean::handle_clean;
use crate::commands::config::handle_config;
use crate::commands::listing::handle_list;
use crate::commands::status::{handle_stats, handle_status, handle_version};
use crate::commands::watch::handle_watch;

const DEFAULT_CLI_LOG_LEVEL: &str = "warn";

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    install_logging(&cli);
    let trace_id = Uuid::new_v4().to_string();

    match dispatch(cli, &trace_id).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn install_logging(cli: &Cli) {
    let format = cli
        .log_format
        .as_deref()
        .map_or_else(LogFormat::infer, LogFormat::from_name);
    let config = LoggingConfig {
        level: &cli.log_level,
        format,
        target: LogTarget::Stderr,
        build_sha: build_sha(),
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: {err}");
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let base = load_from_env().map_err(|err| CliError::validation(err.to_string()))?;
    let config = resolve_config(&cli, base)?;
    let output = cli.output;
    let ctx = AppContext::new(config, trace_id)?;
    match cli.command {
        Command::Watch(args) => handle_watch(&ctx, &args, output).await,
        Command::Status => handle_status(&ctx, output).await,
        Command::Stats => handle_stats(&ctx, output).await,
        Command::Ls(args) => handle_list(&ctx, &args, output).await,
        Command::Clean(args) => handle_clean(&ctx, &args, output).await,
        Command::Version => handle_version(&ctx, output).await,
        Command::Config => handle_config(&ctx.config, output),
    }
}

/// Layer command-line overrides on top of the environment configuration, then validate.
pub(crate) fn resolve_config(cli: &Cli, mut config: DashboardConfig) -> CliResult<DashboardConfig> {
    if let Some(api_url) = &cli.api_url {
        config.service.api_url.clone_from(api_url);
    }
    if let Some(timeout) = cli.timeout {
        config.service.request_timeout = Duration::from_secs(timeout);
    }
    if let Command::Watch(args) = &cli.command {
        if let Some(page_size) = args.page_size {
            config.listing.page_size = page_size;
        }
        if let Some(interval_ms) = args.interval_ms {
            config.polling = PollingConfig::uniform(Duration::from_millis(interval_ms));
        }
    }

    validate(&config).map_err(|err| CliError::validation(err.to_string()))?;
    Ok(config)
}

#[derive(Parser)]
#[command(
    name = "cleango",
    version,
    about = "Monitor and drive the cleango torrent cleanup service"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        help = "Cleanup service base URL (overrides CLEANGO_API_URL)"
    )]
    pub(crate) api_url: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Request timeout in seconds (overrides CLEANGO_HTTP_TIMEOUT_SECS)"
    )]
    pub(crate) timeout: Option<u64>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "CLEANGO_LOG_LEVEL",
        default_value = DEFAULT_CLI_LOG_LEVEL
    )]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "CLEANGO_LOG_FORMAT")]
    pub(crate) log_format: Option<String>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Live dashboard driven by commands typed on stdin.
    Watch(WatchArgs),
    /// Service version, connection, and last clean run.
    Status,
    /// Cumulative removal statistics.
    Stats,
    /// One page of the deletion log.
    Ls(ListArgs),
    /// Run a clean pass now.
    Clean(CleanArgs),
    /// Service version.
    Version,
    /// Print the resolved configuration.
    Config,
}

#[derive(Args, Default)]
pub(crate) struct WatchArgs {
    #[arg(long, help = "Initial rows per page (20 or 100)")]
    pub(crate) page_size: Option<u32>,
    #[arg(long, help = "Poll every task at this interval in milliseconds")]
    pub(crate) interval_ms: Option<u64>,
    #[arg(long, help = "Print Prometheus metrics when the dashboard exits")]
    pub(crate) print_metrics: bool,
}

#[derive(Args)]
pub(crate) struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long, help = "Rows per page (defaults to CLEANGO_PAGE_SIZE)")]
    pub(crate) per_page: Option<u32>,
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct CleanArgs {
    #[arg(long, help = "Return as soon as the service accepts the request")]
    pub(crate) no_wait: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}
