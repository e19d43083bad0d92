#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Wire DTOs for the cleango cleanup service API.
//!
//! These types mirror the JSON bodies served under `/api/*` exactly, including
//! the loosely typed fields (timestamps as strings, `"error: <msg>"` result
//! strings). Conversion into domain values happens in the dashboard gateway so
//! the contract stays readable here.
use serde::{Deserialize, Serialize};

/// Path of the service version endpoint.
pub const VERSION_PATH: &str = "/api/version";
/// Path of the connection status endpoint.
pub const STATUS_PATH: &str = "/api/status";
/// Path of the last clean run endpoint.
pub const CLEAN_STATUS_PATH: &str = "/api/clean-status";
/// Path of the cumulative statistics endpoint.
pub const STATS_PATH: &str = "/api/stats";
/// Path of the paginated deletion log endpoint.
pub const DELETED_PATH: &str = "/api/deleted";
/// Path of the clean trigger endpoint.
pub const CLEAN_PATH: &str = "/api/clean";

/// Value of `status` reported when the service reaches its torrent client.
pub const STATUS_CONNECTED: &str = "connected";
/// Value of `result` reported for a successful clean run.
pub const CLEAN_RESULT_SUCCESS: &str = "success";
/// Prefix the service puts in front of failed clean run messages.
pub const CLEAN_ERROR_PREFIX: &str = "error: ";

/// Response body of `GET /api/version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionResponse {
    /// Service version string.
    pub version: String,
}

/// Response body of `GET /api/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    /// `"connected"` or `"disconnected"`.
    pub status: String,
}

/// Response body of `GET /api/clean-status`.
///
/// Every field is `null` until the service has completed its first run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanStatusResponse {
    /// ISO-8601 completion time of the last run.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Trigger kind (`scheduled` or `manual`).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// `"success"` or `"error: <message>"`.
    #[serde(default)]
    pub result: Option<String>,
    /// Number of torrents removed by the last run.
    #[serde(default)]
    pub torrents_removed: Option<u64>,
}

/// Response body of `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsResponse {
    /// Total torrents removed since the log was created.
    pub total_deleted: u64,
    /// Total bytes freed; `null` when nothing has been removed yet.
    #[serde(default)]
    pub total_size_freed: Option<u64>,
}

/// One row of the deletion log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletedTorrent {
    /// Torrent display name.
    pub name: String,
    /// Payload size in bytes.
    pub size: u64,
    /// Tracker message that caused the removal.
    pub tracker_message: String,
    /// Deletion time; either RFC 3339 or the service's `YYYY-MM-DD HH:MM:SS` UTC form.
    pub deletion_date: String,
}

/// Response body of `GET /api/deleted`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletedListResponse {
    /// Rows of the requested page, newest first.
    pub torrents: Vec<DeletedTorrent>,
    /// Page number echoed by the service.
    pub page: u32,
    /// Number of pages available, never below one.
    pub total_pages: u32,
    /// Total number of rows in the log.
    #[serde(default)]
    pub total: Option<u64>,
    /// Page size actually applied by the service.
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Query parameters accepted by `GET /api/deleted`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletedListQuery {
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub per_page: u32,
    /// Optional search filter; omitted from the query string when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl DeletedListQuery {
    /// Render the query as ordered key/value pairs for URL construction.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

/// Torrent reported as removed by `POST /api/clean`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemovedTorrentDto {
    /// Torrent display name.
    pub name: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// Tracker message that caused the removal.
    pub tracker_message: String,
}

/// Response body of `POST /api/clean`.
///
/// The service answers `{"deleted": [...]}` on success and `{"error": "..."}`
/// (usually with HTTP 500) when the pass could not run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanResponse {
    /// Torrents removed by this pass.
    #[serde(default)]
    pub deleted: Vec<RemovedTorrentDto>,
    /// Service-reported failure; absence means the pass was accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error envelope the service uses for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Failure message.
    pub error: String,
}

/// Strip the `"error: "` prefix the service adds to failed clean results.
#[must_use]
pub fn strip_error_prefix(result: &str) -> &str {
    result.strip_prefix(CLEAN_ERROR_PREFIX).unwrap_or(result)
}
