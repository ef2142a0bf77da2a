//! Timestamp resolution and field checks shared by the builders.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::domain::SessionRecord;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses an ISO-8601 instant.
///
/// Accepts RFC 3339 with an offset, local date-times without one (read in the
/// local zone) and bare dates (UTC midnight). Expanded-year forms such as
/// `+275760-09-13T00:00:00Z` are not RFC 3339 and are rejected, so records
/// carrying them are dropped as invalid.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local_naive_to_utc(naive);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

pub fn parse_millis(raw: &str) -> Option<i64> {
    parse_instant(raw).map(|timestamp| timestamp.timestamp_millis())
}

/// Start and end of a record in epoch milliseconds; an open end resolves to `now`.
pub fn resolve_span(record: &SessionRecord, now: DateTime<Utc>) -> Result<(i64, i64), String> {
    let start = parse_millis(&record.start_time)
        .ok_or_else(|| format!("unparseable start_time {:?}", record.start_time))?;
    let end = match &record.end_time {
        Some(raw) => parse_millis(raw).ok_or_else(|| format!("unparseable end_time {raw:?}"))?,
        None => now.timestamp_millis(),
    };
    Ok((start, end))
}

/// Logs missing or blank fields. Never rejects a record.
pub fn audit_record(position: usize, record: &SessionRecord) {
    if record.instance_label.trim().is_empty() {
        debug!(position, "record has an empty instance_name");
    }
    if record.category.trim().is_empty() {
        debug!(position, "record has an empty category_name");
    }
    if record.start_time.trim().is_empty() {
        debug!(position, "record has an empty start_time");
    }
    if record.end_time.is_none() {
        debug!(position, instance = %record.instance_label, "record is ongoing");
    }
}

fn local_naive_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(local_datetime) => Some(local_datetime.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => Some(first.min(second).with_timezone(&Utc)),
        // Inside a DST gap: the wall clock skipped this time, use the instant it jumped to.
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|local_datetime| local_datetime.with_timezone(&Utc)),
    }
}
