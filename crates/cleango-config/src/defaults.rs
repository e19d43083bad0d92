//! Default values and environment keys for the dashboard configuration.
//!
//! # Design
//! - Centralize timing defaults so the controller and CLI agree on them.
//! - Keep environment keys next to the defaults they override.

use std::time::Duration;

/// Service address used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
/// Per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Cadence shared by every poll task.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Wait after an accepted clean before re-reading service state.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);
/// Wait after a failed clean before the action becomes available again.
pub const DEFAULT_CLEAN_COOLDOWN: Duration = Duration::from_secs(1);
/// Quiet period collapsing search keystrokes into one request.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// Rows per page requested by default.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Page sizes the service honours; anything else is coerced to 20 server-side.
pub const PAGE_SIZE_OPTIONS: [u32; 2] = [20, 100];

pub(crate) const ENV_API_URL: &str = "CLEANGO_API_URL";
pub(crate) const ENV_HTTP_TIMEOUT_SECS: &str = "CLEANGO_HTTP_TIMEOUT_SECS";
pub(crate) const ENV_POLL_INTERVAL_MS: &str = "CLEANGO_POLL_INTERVAL_MS";
pub(crate) const ENV_STATUS_INTERVAL_MS: &str = "CLEANGO_STATUS_INTERVAL_MS";
pub(crate) const ENV_CLEAN_STATUS_INTERVAL_MS: &str = "CLEANGO_CLEAN_STATUS_INTERVAL_MS";
pub(crate) const ENV_LISTING_INTERVAL_MS: &str = "CLEANGO_LISTING_INTERVAL_MS";
pub(crate) const ENV_SETTLE_DELAY_MS: &str = "CLEANGO_SETTLE_DELAY_MS";
pub(crate) const ENV_CLEAN_COOLDOWN_MS: &str = "CLEANGO_CLEAN_COOLDOWN_MS";
pub(crate) const ENV_SEARCH_DEBOUNCE_MS: &str = "CLEANGO_SEARCH_DEBOUNCE_MS";
pub(crate) const ENV_PAGE_SIZE: &str = "CLEANGO_PAGE_SIZE";
