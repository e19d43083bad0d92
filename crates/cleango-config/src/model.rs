//! Typed configuration sections for the dashboard controller.
//!
//! # Design
//! - Pure data carriers; parsing lives in `loader.rs`, checks in `validate.rs`.
//! - Durations are stored as `Duration` so callers never juggle units.

use std::time::Duration;

use url::Url;

use crate::defaults::{
    DEFAULT_API_URL, DEFAULT_CLEAN_COOLDOWN, DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_SEARCH_DEBOUNCE, DEFAULT_SETTLE_DELAY,
};
use crate::error::{ConfigError, ConfigResult};

/// Complete configuration consumed by the dashboard controller and CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Remote service location and HTTP behaviour.
    pub service: ServiceConfig,
    /// Poll task cadence.
    pub polling: PollingConfig,
    /// Clean action sequencing delays.
    pub clean: CleanConfig,
    /// Deletion log paging and search behaviour.
    pub listing: ListingConfig,
}

/// Remote service connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL of the cleanup service, e.g. `http://127.0.0.1:5000`.
    pub api_url: String,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl ServiceConfig {
    /// Parse the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the URL cannot be parsed.
    pub fn base_url(&self) -> ConfigResult<Url> {
        Url::parse(self.api_url.trim()).map_err(|source| ConfigError::InvalidUrl {
            value: self.api_url.clone(),
            source,
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Interval of each named poll task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Connection status refresh.
    pub status_interval: Duration,
    /// Last clean run refresh.
    pub clean_status_interval: Duration,
    /// Combined statistics and current page refresh.
    pub listing_interval: Duration,
}

impl PollingConfig {
    /// Every task on the same cadence.
    #[must_use]
    pub const fn uniform(interval: Duration) -> Self {
        Self {
            status_interval: interval,
            clean_status_interval: interval,
            listing_interval: interval,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_POLL_INTERVAL)
    }
}

/// Delays framing the clean action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanConfig {
    /// Wait after an accepted clean before refreshing.
    pub settle_delay: Duration,
    /// Wait after a failed clean before re-enabling the action.
    pub cooldown: Duration,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            cooldown: DEFAULT_CLEAN_COOLDOWN,
        }
    }
}

/// Deletion log listing behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    /// Initial rows per page.
    pub page_size: u32,
    /// Debounce window for search input.
    pub search_debounce: Duration,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_cadence() {
        let config = DashboardConfig::default();
        assert_eq!(config.polling, PollingConfig::uniform(Duration::from_secs(5)));
        assert_eq!(config.clean.settle_delay, Duration::from_secs(1));
        assert_eq!(config.clean.cooldown, Duration::from_secs(1));
        assert_eq!(config.listing.search_debounce, Duration::from_millis(300));
        assert_eq!(config.listing.page_size, 20);
    }

    #[test]
    fn base_url_parses_trimmed_value() {
        let service = ServiceConfig {
            api_url: " http://cleaner.local:5000 ".into(),
            ..ServiceConfig::default()
        };
        let url = service.base_url().expect("url should parse");
        assert_eq!(url.host_str(), Some("cleaner.local"));
        assert_eq!(url.port(), Some(5000));
    }
}
