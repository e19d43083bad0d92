//! View model handed to whatever draws the dashboard.
//!
//! Views are rebuilt from state on every render so relative times never go
//! stale; nothing here is cached.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::{format_relative_time_at, format_size};
use crate::model::{CleanPhase, ConnectionStatus};
use crate::state::DashboardState;

/// Draws a [`DashboardView`]. Implementations own the presentation technology.
pub trait Renderer: Send {
    /// Present the latest view.
    fn render(&mut self, view: &DashboardView);
}

/// Complete, display-ready snapshot of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    /// Service version once fetched.
    pub version: Option<String>,
    /// Connection indicator.
    pub connection: ConnectionStatus,
    /// Clean affordance.
    pub clean_control: CleanControlView,
    /// Last clean run summary.
    pub last_clean: LastCleanView,
    /// Statistics once loaded.
    pub stats: Option<StatsView>,
    /// Rows of the current page.
    pub rows: Vec<RowView>,
    /// Paging controls.
    pub pagination: PaginationView,
}

/// State of the clean button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanControlView {
    /// Whether the operator may trigger a clean.
    pub enabled: bool,
    /// Button text.
    pub label: &'static str,
    /// Underlying phase.
    pub phase: CleanPhase,
}

/// Last clean run, formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastCleanView {
    /// Relative time of the run, or `"Never"`.
    pub when: String,
    /// `"(manual)"`, `"(scheduled)"`, ...
    pub trigger: Option<String>,
    /// Result line.
    pub result: Option<CleanResultView>,
}

/// Result line of the last clean run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum CleanResultView {
    /// Shown in the success style.
    Success(String),
    /// Shown in the error style.
    Error(String),
}

/// Statistics panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsView {
    /// Torrents removed.
    pub total_deleted: u64,
    /// Formatted bytes freed.
    pub total_freed: String,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Torrent name.
    pub name: String,
    /// Formatted size.
    pub size: String,
    /// Tracker message.
    pub tracker_message: String,
    /// Relative deletion time.
    pub deleted: String,
}

/// Paging controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    /// `"Page X of Y"`.
    pub label: String,
    /// Whether "previous" is clickable.
    pub previous_enabled: bool,
    /// Whether "next" is clickable.
    pub next_enabled: bool,
    /// Selected page size.
    pub page_size: u32,
    /// Active search filter.
    pub search_term: String,
}

impl DashboardView {
    pub(crate) fn from_state(state: &DashboardState, now: DateTime<Utc>) -> Self {
        let last = &state.last_clean;
        // The trigger and result lines only appear once a run has a kind.
        let (trigger, result) = last.trigger.as_ref().map_or((None, None), |trigger| {
            let result = last.outcome.as_ref().map(|outcome| {
                if outcome.is_success() {
                    CleanResultView::Success(outcome.summary())
                } else {
                    CleanResultView::Error(outcome.summary())
                }
            });
            (Some(trigger.label()), result)
        });

        Self {
            version: state.version.clone(),
            connection: state.connection,
            clean_control: CleanControlView {
                enabled: state.clean_available(),
                label: state.clean_phase.button_label(),
                phase: state.clean_phase,
            },
            last_clean: LastCleanView {
                when: format_relative_time_at(last.timestamp, now),
                trigger,
                result,
            },
            stats: state.stats.map(|stats| StatsView {
                total_deleted: stats.total_deleted,
                total_freed: format_size(stats.total_size_freed_bytes),
            }),
            rows: state
                .page
                .as_ref()
                .map(|page| {
                    page.items
                        .iter()
                        .map(|record| RowView {
                            name: record.name.clone(),
                            size: format_size(record.size_bytes),
                            tracker_message: record.tracker_message.clone(),
                            deleted: format_relative_time_at(Some(record.deleted_at), now),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            pagination: PaginationView {
                label: state.pagination.label(),
                previous_enabled: state.pagination.has_previous(),
                next_enabled: state.pagination.has_next(),
                page_size: state.pagination.page_size(),
                search_term: state.pagination.search_term().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CleanOutcome, CleanRun, CleanTrigger, Page, Stats, TorrentRecord};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_state_renders_placeholders() {
        let view = DashboardView::from_state(&DashboardState::new(20), now());
        assert_eq!(view.connection.label(), "Disconnected");
        assert!(!view.clean_control.enabled);
        assert_eq!(view.clean_control.label, "Clean Torrents");
        assert_eq!(view.last_clean.when, "Never");
        assert_eq!(view.last_clean.trigger, None);
        assert!(view.stats.is_none());
        assert!(view.rows.is_empty());
        assert_eq!(view.pagination.label, "Page 1 of 1");
    }

    #[test]
    fn populated_state_formats_every_panel() {
        let mut state = DashboardState::new(20);
        state.connection = ConnectionStatus::Connected;
        state.version = Some("2.0.0".into());
        state.last_clean = CleanRun {
            timestamp: Some(now() - Duration::seconds(90)),
            trigger: Some(CleanTrigger::Manual),
            outcome: Some(CleanOutcome::Success { removed_count: 2 }),
        };
        state.stats = Some(Stats {
            total_deleted: 41,
            total_size_freed_bytes: 1536,
        });
        state.page = Some(Page {
            items: vec![TorrentRecord {
                name: "Some.Show".into(),
                size_bytes: 1024,
                tracker_message: "Unregistered torrent".into(),
                deleted_at: now() - Duration::seconds(30),
            }],
            page_number: 1,
            total_pages: 3,
        });
        state.pagination.apply_server_page(1, 3);

        let view = DashboardView::from_state(&state, now());
        assert!(view.clean_control.enabled);
        assert_eq!(view.last_clean.when, "1 minutes ago");
        assert_eq!(view.last_clean.trigger.as_deref(), Some("(manual)"));
        assert_eq!(
            view.last_clean.result,
            Some(CleanResultView::Success("Removed 2 torrents".into()))
        );
        let stats = view.stats.expect("stats panel");
        assert_eq!(stats.total_freed, "1.5 KB");
        assert_eq!(view.rows[0].size, "1 KB");
        assert_eq!(view.rows[0].deleted, "30 seconds ago");
        assert_eq!(view.pagination.label, "Page 1 of 3");
        assert!(!view.pagination.previous_enabled);
        assert!(view.pagination.next_enabled);
    }

    #[test]
    fn failed_run_renders_error_line() {
        let mut state = DashboardState::new(20);
        state.last_clean = CleanRun {
            timestamp: None,
            trigger: Some(CleanTrigger::Scheduled),
            outcome: Some(CleanOutcome::Failure {
                message: "Not connected to qBittorrent".into(),
            }),
        };
        let view = DashboardView::from_state(&state, now());
        assert_eq!(
            view.last_clean.result,
            Some(CleanResultView::Error("Not connected to qBittorrent".into()))
        );
    }
}
