//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use cleango_config::DashboardConfig;
use cleango_dashboard::render::CleanResultView;
use cleango_dashboard::{
    CleanReceipt, CleanRun, ConnectionStatus, DashboardView, Page, Stats, format_relative_time,
    format_size,
};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Combined answer of the `status` command.
#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub(crate) version: String,
    pub(crate) connection: ConnectionStatus,
    pub(crate) last_clean: CleanRun,
}

/// Answer of the `clean` command.
#[derive(Debug, Serialize)]
pub(crate) struct CleanReport {
    pub(crate) receipt: CleanReceipt,
    pub(crate) last_clean: Option<CleanRun>,
    pub(crate) stats: Option<Stats>,
}

#[derive(Debug, Serialize)]
struct ConfigView<'a> {
    api_url: &'a str,
    request_timeout_ms: u64,
    status_interval_ms: u64,
    clean_status_interval_ms: u64,
    listing_interval_ms: u64,
    settle_delay_ms: u64,
    clean_cooldown_ms: u64,
    page_size: u32,
    search_debounce_ms: u64,
}

impl<'a> ConfigView<'a> {
    fn from_config(config: &'a DashboardConfig) -> Self {
        Self {
            api_url: &config.service.api_url,
            request_timeout_ms: millis(config.service.request_timeout),
            status_interval_ms: millis(config.polling.status_interval),
            clean_status_interval_ms: millis(config.polling.clean_status_interval),
            listing_interval_ms: millis(config.polling.listing_interval),
            settle_delay_ms: millis(config.clean.settle_delay),
            clean_cooldown_ms: millis(config.clean.cooldown),
            page_size: config.listing.page_size,
            search_debounce_ms: millis(config.listing.search_debounce),
        }
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_status(report: &StatusReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            println!("version: {}", report.version);
            println!("connection: {}", report.connection.label());
            for line in last_clean_lines(&report.last_clean) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_stats(stats: &Stats, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(stats),
        OutputFormat::Table => {
            println!("{}", stats_line(stats));
            Ok(())
        }
    }
}

pub(crate) fn render_page(page: &Page, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            println!("{}", page_table(page));
            Ok(())
        }
    }
}

pub(crate) fn render_clean_report(report: &CleanReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let removed = report.receipt.removed_count();
            if removed == 0 {
                println!("clean accepted: nothing to remove");
            } else {
                println!("clean accepted: {removed} torrent(s) removed");
                for torrent in &report.receipt.removed {
                    println!(
                        "  {} ({}) {}",
                        torrent.name,
                        format_size(torrent.size_bytes),
                        torrent.tracker_message
                    );
                }
            }
            if let Some(last_clean) = &report.last_clean {
                for line in last_clean_lines(last_clean) {
                    println!("{line}");
                }
            }
            if let Some(stats) = &report.stats {
                println!("{}", stats_line(stats));
            }
            Ok(())
        }
    }
}

pub(crate) fn render_version(version: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "version": version })),
        OutputFormat::Table => {
            println!("{version}");
            Ok(())
        }
    }
}

pub(crate) fn render_config(config: &DashboardConfig, format: OutputFormat) -> CliResult<()> {
    let view = ConfigView::from_config(config);
    match format {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Table => {
            println!("api_url: {}", view.api_url);
            println!("request_timeout_ms: {}", view.request_timeout_ms);
            println!("status_interval_ms: {}", view.status_interval_ms);
            println!("clean_status_interval_ms: {}", view.clean_status_interval_ms);
            println!("listing_interval_ms: {}", view.listing_interval_ms);
            println!("settle_delay_ms: {}", view.settle_delay_ms);
            println!("clean_cooldown_ms: {}", view.clean_cooldown_ms);
            println!("page_size: {}", view.page_size);
            println!("search_debounce_ms: {}", view.search_debounce_ms);
            Ok(())
        }
    }
}

fn last_clean_lines(run: &CleanRun) -> Vec<String> {
    let mut lines = vec![format!(
        "last clean: {}",
        format_relative_time(run.timestamp)
    )];
    if let Some(trigger) = &run.trigger {
        lines.push(format!("trigger: {}", trigger.label()));
        if let Some(outcome) = &run.outcome {
            lines.push(format!("result: {}", outcome.summary()));
        }
    }
    lines
}

fn stats_line(stats: &Stats) -> String {
    format!(
        "deleted: {}  freed: {}",
        stats.total_deleted,
        format_size(stats.total_size_freed_bytes)
    )
}

fn page_table(page: &Page) -> String {
    let mut lines = vec![format!(
        "{:<48} {:>10} {:<20} TRACKER MESSAGE",
        "NAME", "SIZE", "DELETED"
    )];
    for record in &page.items {
        lines.push(format!(
            "{:<48} {:>10} {:<20} {}",
            record.name,
            format_size(record.size_bytes),
            format_relative_time(Some(record.deleted_at)),
            record.tracker_message
        ));
    }
    lines.push(format!("Page {} of {}", page.page_number, page.total_pages));
    lines.join("\n")
}

/// Plain-text dashboard frame used by the `watch` renderer.
pub(crate) fn dashboard_text(view: &DashboardView) -> String {
    let version = view.version.as_deref().unwrap_or("unknown");
    let mut lines = vec![
        format!("cleango {version}  [{}]", view.connection.label()),
        format!(
            "[{}]{}",
            view.clean_control.label,
            if view.clean_control.enabled {
                ""
            } else {
                " (unavailable)"
            }
        ),
    ];

    let mut last = format!("Last clean: {}", view.last_clean.when);
    if let Some(trigger) = &view.last_clean.trigger {
        last.push(' ');
        last.push_str(trigger);
    }
    lines.push(last);
    match &view.last_clean.result {
        Some(CleanResultView::Success(text)) => lines.push(format!("  ok: {text}")),
        Some(CleanResultView::Error(text)) => lines.push(format!("  error: {text}")),
        None => {}
    }

    match &view.stats {
        Some(stats) => lines.push(format!(
            "Deleted: {}  Freed: {}",
            stats.total_deleted, stats.total_freed
        )),
        None => lines.push("Deleted: -  Freed: -".to_string()),
    }

    if !view.pagination.search_term.is_empty() {
        lines.push(format!("Search: {}", view.pagination.search_term));
    }
    lines.push(format!(
        "{:<48} {:>10} {:<20} TRACKER MESSAGE",
        "NAME", "SIZE", "DELETED"
    ));
    if view.rows.is_empty() {
        lines.push("(no deleted torrents)".to_string());
    }
    for row in &view.rows {
        lines.push(format!(
            "{:<48} {:>10} {:<20} {}",
            row.name, row.size, row.deleted, row.tracker_message
        ));
    }
    lines.push(format!(
        "{}{}{}  ({} per page)",
        if view.pagination.previous_enabled {
            "< "
        } else {
            "  "
        },
        view.pagination.label,
        if view.pagination.next_enabled {
            " >"
        } else {
            "  "
        },
        view.pagination.page_size
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleango_dashboard::{CleanOutcome, CleanTrigger};
    use cleango_test_support::fixtures::{reference_instant, sample_records};
    use std::time::Duration;

    #[test]
    fn page_table_lists_rows_and_footer() {
        let page = Page {
            items: sample_records(2),
            page_number: 1,
            total_pages: 3,
        };
        let text = page_table(&page);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].contains("Sample.Release.000"));
        assert!(lines[1].contains("1 GB"));
        assert_eq!(lines[3], "Page 1 of 3");
    }

    #[test]
    fn last_clean_lines_hide_result_without_trigger() {
        assert_eq!(last_clean_lines(&CleanRun::default()), vec!["last clean: Never"]);

        let run = CleanRun {
            timestamp: Some(reference_instant()),
            trigger: Some(CleanTrigger::Manual),
            outcome: Some(CleanOutcome::Success { removed_count: 3 }),
        };
        let lines = last_clean_lines(&run);
        assert_eq!(lines[1], "trigger: (manual)");
        assert_eq!(lines[2], "result: Removed 3 torrents");
    }

    #[test]
    fn config_view_reports_milliseconds() {
        let mut config = DashboardConfig::default();
        config.clean.settle_delay = Duration::from_millis(1500);
        let view = ConfigView::from_config(&config);
        assert_eq!(view.settle_delay_ms, 1500);
        assert_eq!(view.request_timeout_ms, 10_000);
        assert_eq!(view.page_size, 20);
    }

    #[test]
    fn stats_line_formats_bytes() {
        let stats = Stats {
            total_deleted: 41,
            total_size_freed_bytes: 1536,
        };
        assert_eq!(stats_line(&stats), "deleted: 41  freed: 1.5 KB");
    }
}
