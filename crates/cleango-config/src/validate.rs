//! Validation helpers for assembled configuration.

use std::time::Duration;

use crate::defaults::PAGE_SIZE_OPTIONS;
use crate::error::{ConfigError, ConfigResult};
use crate::model::DashboardConfig;

/// Check a fully assembled configuration.
///
/// # Errors
///
/// Returns the first violation found: an unparsable or non-HTTP service URL,
/// a zero timeout or poll interval, or a page size the service does not honour.
pub fn validate(config: &DashboardConfig) -> ConfigResult<()> {
    let url = config.service.base_url()?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidField {
            field: "service.api_url",
            value: Some(config.service.api_url.clone()),
            reason: "must use http or https",
        });
    }

    ensure_non_zero("service.request_timeout", config.service.request_timeout)?;
    ensure_non_zero("polling.status_interval", config.polling.status_interval)?;
    ensure_non_zero(
        "polling.clean_status_interval",
        config.polling.clean_status_interval,
    )?;
    ensure_non_zero("polling.listing_interval", config.polling.listing_interval)?;

    if !PAGE_SIZE_OPTIONS.contains(&config.listing.page_size) {
        return Err(ConfigError::InvalidField {
            field: "listing.page_size",
            value: Some(config.listing.page_size.to_string()),
            reason: "must be 20 or 100",
        });
    }

    Ok(())
}

fn ensure_non_zero(field: &'static str, value: Duration) -> ConfigResult<()> {
    if value.is_zero() {
        return Err(ConfigError::InvalidField {
            field,
            value: Some(format!("{}ms", value.as_millis())),
            reason: "must be greater than zero",
        });
    }
    Ok(())
}
