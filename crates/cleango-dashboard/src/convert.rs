//! Wire DTO to domain conversions.

use chrono::{DateTime, NaiveDateTime, Utc};
use cleango_api_models::{
    CLEAN_RESULT_SUCCESS, CleanResponse, CleanStatusResponse, DeletedListResponse,
    DeletedTorrent, STATUS_CONNECTED, StatsResponse, StatusResponse, strip_error_prefix,
};

use crate::error::{GatewayError, GatewayResult};
use crate::model::{
    CleanOutcome, CleanReceipt, CleanRun, CleanTrigger, ConnectionStatus, Page, RemovedTorrent,
    Stats, TorrentRecord,
};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a service timestamp.
///
/// Accepts RFC 3339 and the offset-less `YYYY-MM-DD HH:MM:SS` form the
/// service stores, which is read as UTC.
#[must_use]
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn connection_status(dto: &StatusResponse) -> ConnectionStatus {
    if dto.status == STATUS_CONNECTED {
        ConnectionStatus::Connected
    } else {
        ConnectionStatus::Disconnected
    }
}

pub(crate) fn clean_run(endpoint: &'static str, dto: CleanStatusResponse) -> GatewayResult<CleanRun> {
    let timestamp = match dto.timestamp.as_deref() {
        Some(raw) => Some(parse_instant(raw).ok_or_else(|| GatewayError::InvalidField {
            endpoint,
            field: "timestamp",
            value: raw.to_string(),
        })?),
        None => None,
    };
    let outcome = dto.result.map(|result| {
        if result == CLEAN_RESULT_SUCCESS {
            CleanOutcome::Success {
                removed_count: dto.torrents_removed.unwrap_or_default(),
            }
        } else {
            CleanOutcome::Failure {
                message: strip_error_prefix(&result).to_string(),
            }
        }
    });
    Ok(CleanRun {
        timestamp,
        trigger: dto.kind.as_deref().map(CleanTrigger::from_kind),
        outcome,
    })
}

pub(crate) fn stats(dto: &StatsResponse) -> Stats {
    Stats {
        total_deleted: dto.total_deleted,
        total_size_freed_bytes: dto.total_size_freed.unwrap_or_default(),
    }
}

pub(crate) fn page(endpoint: &'static str, dto: DeletedListResponse) -> GatewayResult<Page> {
    let items = dto
        .torrents
        .into_iter()
        .map(|row| record(endpoint, row))
        .collect::<GatewayResult<Vec<_>>>()?;
    let total_pages = dto.total_pages.max(1);
    Ok(Page {
        items,
        page_number: dto.page.max(1),
        total_pages,
    })
}

fn record(endpoint: &'static str, row: DeletedTorrent) -> GatewayResult<TorrentRecord> {
    let deleted_at = parse_instant(&row.deletion_date).ok_or(GatewayError::InvalidField {
        endpoint,
        field: "deletion_date",
        value: row.deletion_date,
    })?;
    Ok(TorrentRecord {
        name: row.name,
        size_bytes: row.size,
        tracker_message: row.tracker_message,
        deleted_at,
    })
}

pub(crate) fn receipt(dto: CleanResponse) -> CleanReceipt {
    CleanReceipt {
        removed: dto
            .deleted
            .into_iter()
            .map(|removed| RemovedTorrent {
                name: removed.name,
                size_bytes: removed.size_bytes,
                tracker_message: removed.tracker_message,
            })
            .collect(),
    }
}
