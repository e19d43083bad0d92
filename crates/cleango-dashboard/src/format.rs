//! Display formatting for byte counts and timestamps.

use chrono::{DateTime, Local, Utc};

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const SIZE_STEP: f64 = 1024.0;

/// Render a byte count with a 1024-based unit, e.g. `1536 -> "1.5 KB"`.
///
/// Values beyond the terabyte range stay in TB.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= SIZE_STEP && unit < SIZE_UNITS.len() - 1 {
        value /= SIZE_STEP;
        unit += 1;
    }
    let rounded = format!("{:.2}", (value * 100.0).round() / 100.0);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

/// Age bucket of a timestamp, ordered from most to least recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelativeBucket {
    /// Under five seconds, or in the future.
    JustNow,
    /// Under a minute.
    Seconds(u64),
    /// Under an hour.
    Minutes(u64),
    /// Under two hours.
    OneHour,
    /// Under a day.
    Hours(u64),
    /// A day or older; shown as an absolute local time.
    Absolute,
}

/// Bucket an elapsed duration in whole seconds.
#[must_use]
pub const fn relative_bucket(elapsed_secs: i64) -> RelativeBucket {
    let secs = elapsed_secs.unsigned_abs();
    match elapsed_secs {
        i64::MIN..=4 => RelativeBucket::JustNow,
        5..=59 => RelativeBucket::Seconds(secs),
        60..=3_599 => RelativeBucket::Minutes(secs / 60),
        3_600..=7_199 => RelativeBucket::OneHour,
        7_200..=86_399 => RelativeBucket::Hours(secs / 3_600),
        _ => RelativeBucket::Absolute,
    }
}

/// Describe how long ago `instant` was, relative to the current time.
#[must_use]
pub fn format_relative_time(instant: Option<DateTime<Utc>>) -> String {
    format_relative_time_at(instant, Utc::now())
}

/// Describe how long ago `instant` was, relative to `now`.
#[must_use]
pub fn format_relative_time_at(instant: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(instant) = instant else {
        return "Never".to_string();
    };
    match relative_bucket((now - instant).num_seconds()) {
        RelativeBucket::JustNow => "Just now".to_string(),
        RelativeBucket::Seconds(n) => format!("{n} seconds ago"),
        RelativeBucket::Minutes(n) => format!("{n} minutes ago"),
        RelativeBucket::OneHour => "1 hour ago".to_string(),
        RelativeBucket::Hours(n) => format!("{n} hours ago"),
        RelativeBucket::Absolute => format_absolute(instant),
    }
}

/// Render an instant as a local date and time.
#[must_use]
pub fn format_absolute(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
