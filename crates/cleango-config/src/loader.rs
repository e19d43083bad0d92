//! Environment-driven configuration loading.
//!
//! Values are parsed here but not validated; callers apply their own overrides
//! (CLI flags) and then run [`crate::validate`].

use std::time::Duration;

use tracing::debug;

use crate::defaults::{
    ENV_API_URL, ENV_CLEAN_COOLDOWN_MS, ENV_CLEAN_STATUS_INTERVAL_MS, ENV_HTTP_TIMEOUT_SECS,
    ENV_LISTING_INTERVAL_MS, ENV_PAGE_SIZE, ENV_POLL_INTERVAL_MS, ENV_SEARCH_DEBOUNCE_MS,
    ENV_SETTLE_DELAY_MS, ENV_STATUS_INTERVAL_MS,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{DashboardConfig, PollingConfig};

/// Load configuration from the process environment.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnv`] when a `CLEANGO_*` variable is present
/// but cannot be parsed.
pub fn load_from_env() -> ConfigResult<DashboardConfig> {
    load_with(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary key lookup.
///
/// `CLEANGO_POLL_INTERVAL_MS` sets every poll task at once; the per-task keys
/// take precedence over it.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnv`] when a present value cannot be parsed.
pub fn load_with<F>(lookup: F) -> ConfigResult<DashboardConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = DashboardConfig::default();

    if let Some(url) = lookup(ENV_API_URL).filter(|value| !value.trim().is_empty()) {
        config.service.api_url = url.trim().to_string();
    }
    if let Some(secs) = read_u64(&lookup, ENV_HTTP_TIMEOUT_SECS)? {
        config.service.request_timeout = Duration::from_secs(secs);
    }

    if let Some(interval) = read_millis(&lookup, ENV_POLL_INTERVAL_MS)? {
        config.polling = PollingConfig::uniform(interval);
    }
    if let Some(interval) = read_millis(&lookup, ENV_STATUS_INTERVAL_MS)? {
        config.polling.status_interval = interval;
    }
    if let Some(interval) = read_millis(&lookup, ENV_CLEAN_STATUS_INTERVAL_MS)? {
        config.polling.clean_status_interval = interval;
    }
    if let Some(interval) = read_millis(&lookup, ENV_LISTING_INTERVAL_MS)? {
        config.polling.listing_interval = interval;
    }

    if let Some(delay) = read_millis(&lookup, ENV_SETTLE_DELAY_MS)? {
        config.clean.settle_delay = delay;
    }
    if let Some(cooldown) = read_millis(&lookup, ENV_CLEAN_COOLDOWN_MS)? {
        config.clean.cooldown = cooldown;
    }

    if let Some(debounce) = read_millis(&lookup, ENV_SEARCH_DEBOUNCE_MS)? {
        config.listing.search_debounce = debounce;
    }
    if let Some(size) = read_u64(&lookup, ENV_PAGE_SIZE)? {
        config.listing.page_size = u32::try_from(size).map_err(|_| ConfigError::InvalidEnv {
            key: ENV_PAGE_SIZE,
            value: size.to_string(),
            reason: "must fit in 32 bits",
        })?;
    }

    debug!(api_url = %config.service.api_url, "loaded dashboard configuration");
    Ok(config)
}

fn read_u64<F>(lookup: &F, key: &'static str) -> ConfigResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv {
            key,
            value: raw.clone(),
            reason: "must be a non-negative integer",
        })
}

fn read_millis<F>(lookup: &F, key: &'static str) -> ConfigResult<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(read_u64(lookup, key)?.map(Duration::from_millis))
}
