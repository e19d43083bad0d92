//! Sample records and wire bodies shared by the dashboard and CLI suites.

use chrono::{DateTime, Duration, TimeZone, Utc};
use cleango_dashboard::TorrentRecord;
use serde_json::{Value, json};

/// Fixed reference instant for deterministic records.
#[must_use]
pub fn reference_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0)
        .single()
        .unwrap_or_default()
}

/// `count` records, one minute apart, newest first.
#[must_use]
pub fn sample_records(count: usize) -> Vec<TorrentRecord> {
    (0..count)
        .map(|index| TorrentRecord {
            name: format!("Sample.Release.{index:03}"),
            size_bytes: 1_073_741_824,
            tracker_message: "Unregistered torrent".to_string(),
            deleted_at: reference_instant() - Duration::minutes(i64::try_from(index).unwrap_or(0)),
        })
        .collect()
}

/// `/api/deleted` body with `rows` sample rows.
#[must_use]
pub fn deleted_list_body(rows: usize, page: u32, total_pages: u32, per_page: u32) -> Value {
    let torrents: Vec<Value> = (0..rows)
        .map(|index| {
            json!({
                "name": format!("Sample.Release.{index:03}"),
                "size": 1_073_741_824_u64,
                "tracker_message": "Unregistered torrent",
                "deletion_date": "2024-05-01 14:00:00"
            })
        })
        .collect();
    json!({
        "torrents": torrents,
        "total": rows,
        "page": page,
        "per_page": per_page,
        "total_pages": total_pages
    })
}

/// `/api/clean-status` body for a completed run.
#[must_use]
pub fn clean_status_body(kind: &str, result: &str, removed: u64) -> Value {
    json!({
        "timestamp": "2024-05-01T14:00:00+00:00",
        "type": kind,
        "result": result,
        "torrents_removed": removed
    })
}

/// `/api/stats` body.
#[must_use]
pub fn stats_body(total_deleted: u64, total_size_freed: Option<u64>) -> Value {
    json!({
        "total_deleted": total_deleted,
        "total_size_freed": total_size_freed
    })
}
