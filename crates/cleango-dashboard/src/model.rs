//! Domain values reconciled by the controller.
//!
//! Every value here is replaced wholesale by a successful fetch; none of them
//! is mutated in place.

use chrono::{DateTime, Utc};
use cleango_api_models::DeletedListQuery;
use serde::Serialize;

/// Whether the cleanup service can reach its torrent client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// The service reported a live client connection.
    Connected,
    /// The service reported no connection, or the status poll failed.
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    /// `true` for [`ConnectionStatus::Connected`].
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Human-readable indicator text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

/// What started a clean run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanTrigger {
    /// The service's own schedule.
    Scheduled,
    /// An operator request.
    Manual,
    /// Any other kind the service reports, kept verbatim.
    Other(String),
}

impl CleanTrigger {
    /// Map the service's `type` field.
    #[must_use]
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "scheduled" => Self::Scheduled,
            "manual" => Self::Manual,
            other => Self::Other(other.to_string()),
        }
    }

    /// Raw kind name as reported by the service.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Manual => "manual",
            Self::Other(kind) => kind,
        }
    }

    /// Parenthesised label shown next to the last run time.
    #[must_use]
    pub fn label(&self) -> String {
        format!("({})", self.kind())
    }
}

/// Result of the last completed clean run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanOutcome {
    /// The run finished.
    Success {
        /// Torrents removed by the run.
        removed_count: u64,
    },
    /// The run failed; the message has its `error: ` prefix stripped.
    Failure {
        /// Failure text reported by the service.
        message: String,
    },
}

impl CleanOutcome {
    /// Display text for the outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Success { removed_count: 0 } => "No torrents needed cleaning".to_string(),
            Self::Success { removed_count } => format!("Removed {removed_count} torrents"),
            Self::Failure { message } => message.clone(),
        }
    }

    /// `true` for [`CleanOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Snapshot of the service's last clean run.
///
/// All fields are absent until the service has completed a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanRun {
    /// Completion time of the run.
    pub timestamp: Option<DateTime<Utc>>,
    /// What started the run.
    pub trigger: Option<CleanTrigger>,
    /// How the run ended.
    pub outcome: Option<CleanOutcome>,
}

/// Cumulative removal statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Torrents removed since the log began.
    pub total_deleted: u64,
    /// Bytes freed since the log began.
    pub total_size_freed_bytes: u64,
}

/// One row of the deletion log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentRecord {
    /// Torrent display name.
    pub name: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// Tracker message that caused the removal.
    pub tracker_message: String,
    /// When the torrent was removed.
    pub deleted_at: DateTime<Utc>,
}

/// One page of the deletion log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Rows on this page, newest first.
    pub items: Vec<TorrentRecord>,
    /// One-based page number as reported by the service; may exceed
    /// `total_pages` when the log shrank since the request.
    pub page_number: u32,
    /// Number of pages available, at least one.
    pub total_pages: u32,
}

/// Parameters of a deletion log request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    /// One-based page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
    /// Normalised search filter, absent when blank.
    pub search: Option<String>,
}

impl PageQuery {
    /// Build a query, trimming and lower-casing the search term.
    #[must_use]
    pub fn new(page: u32, per_page: u32, search: &str) -> Self {
        Self {
            page,
            per_page,
            search: normalize_search(search),
        }
    }

    pub(crate) fn to_wire(&self) -> DeletedListQuery {
        DeletedListQuery {
            page: self.page,
            per_page: self.per_page,
            search: self.search.clone(),
        }
    }
}

pub(crate) fn normalize_search(term: &str) -> Option<String> {
    let trimmed = term.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Torrent removed by an operator-triggered clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedTorrent {
    /// Torrent display name.
    pub name: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// Tracker message that caused the removal.
    pub tracker_message: String,
}

/// Body of an accepted clean request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReceipt {
    /// Torrents the pass removed.
    pub removed: Vec<RemovedTorrent>,
}

impl CleanReceipt {
    /// Number of torrents removed.
    #[must_use]
    pub const fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Lifecycle of the operator clean action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanPhase {
    /// Ready for a new request.
    #[default]
    Idle,
    /// The trigger request is in flight.
    Requesting,
    /// The request was accepted; waiting before refreshing.
    AwaitingSettle,
    /// The request failed; waiting out the cooldown.
    Error,
}

impl CleanPhase {
    /// Label of the clean affordance in this phase.
    #[must_use]
    pub const fn button_label(self) -> &'static str {
        match self {
            Self::Idle => "Clean Torrents",
            Self::Requesting | Self::AwaitingSettle | Self::Error => "Cleaning...",
        }
    }
}
