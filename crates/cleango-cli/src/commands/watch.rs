//! Interactive dashboard: the controller draws frames while stdin drives it.

use std::io::Write;
use std::sync::Arc;

use cleango_dashboard::{ControlCommand, ControllerHandle, RemoteGateway, SyncController};
use cleango_telemetry::Metrics;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::{OutputFormat, WatchArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::terminal::TerminalRenderer;

const HELP: &str = "\
commands:
  n, next            next page
  p, prev            previous page
  page N             jump to page N
  size N             rows per page (20 or 100)
  search TERM        filter by name
  clear              drop the search filter
  clean              run a clean pass now
  r, refresh         poll everything now
  q, quit            leave the dashboard";

/// One line typed by the operator.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum WatchInput {
    Command(ControlCommand),
    Quit,
    Help,
    Empty,
    Invalid(String),
}

pub(crate) fn parse_input(line: &str) -> WatchInput {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    match verb.to_ascii_lowercase().as_str() {
        "" => WatchInput::Empty,
        "n" | "next" => WatchInput::Command(ControlCommand::NextPage),
        "p" | "prev" | "previous" => WatchInput::Command(ControlCommand::PreviousPage),
        "page" => parse_number(rest).map_or_else(
            || WatchInput::Invalid(format!("expected a page number, got '{rest}'")),
            |page| WatchInput::Command(ControlCommand::GoToPage(page)),
        ),
        "size" => parse_number(rest).map_or_else(
            || WatchInput::Invalid(format!("expected a page size, got '{rest}'")),
            |size| WatchInput::Command(ControlCommand::SetPageSize(size)),
        ),
        "search" | "/" => WatchInput::Command(ControlCommand::Search(rest.to_string())),
        "clear" => WatchInput::Command(ControlCommand::Search(String::new())),
        "clean" => WatchInput::Command(ControlCommand::TriggerClean),
        "r" | "refresh" => WatchInput::Command(ControlCommand::Refresh),
        "q" | "quit" | "exit" => WatchInput::Quit,
        "h" | "help" | "?" => WatchInput::Help,
        other => WatchInput::Invalid(format!("unknown command '{other}' (type 'help')")),
    }
}

fn parse_number(value: &str) -> Option<u32> {
    value.parse().ok()
}

pub(crate) async fn handle_watch(
    ctx: &AppContext,
    args: &WatchArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let metrics = Metrics::new().map_err(CliError::failure)?;
    let gateway: Arc<dyn RemoteGateway> = ctx.gateway.clone();
    let renderer = TerminalRenderer::new(std::io::stdout(), format);
    let (controller, handle) = SyncController::new(gateway, Box::new(renderer), &ctx.config);
    let controller = controller.with_metrics(metrics.clone());
    let task = tokio::spawn(controller.run());

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        () = drive(stdin, &handle, std::io::stderr()) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                warn!(error = %err, "failed to listen for interrupt");
            }
        }
    }

    // The loop may already be gone; shutting down twice is harmless.
    let _ = handle.shutdown().await;
    drop(handle);
    if let Err(err) = task.await {
        return Err(CliError::failure(err));
    }
    info!("dashboard stopped");

    if args.print_metrics {
        let text = metrics.render().map_err(CliError::failure)?;
        print!("{text}");
    }
    Ok(())
}

/// Feed operator lines to the controller until `quit` or the controller exits.
///
/// End of input leaves the dashboard running until it is interrupted.
async fn drive<R, W>(reader: R, handle: &ControllerHandle, mut messages: W)
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                std::future::pending::<()>().await;
                return;
            }
            Err(err) => {
                warn!(error = %err, "failed to read operator input");
                std::future::pending::<()>().await;
                return;
            }
        };

        match parse_input(&line) {
            WatchInput::Command(command) => {
                if handle.send(command).await.is_err() {
                    return;
                }
            }
            WatchInput::Quit => return,
            WatchInput::Help => {
                let _ = writeln!(messages, "{HELP}");
            }
            WatchInput::Invalid(message) => {
                let _ = writeln!(messages, "{message}");
            }
            WatchInput::Empty => {}
        }
    }
}
