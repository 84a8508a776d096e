//! Timestamp parsing
//!
//! Readings arrive with timestamps in many shapes. Anything without an
//! explicit offset is taken as wall-clock time in the viewer's zone.

use super::error::{IngestError, IngestResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a timestamp string into an instant
///
/// Accepted, in order: RFC 3339, naive date-times (local to `tz`), bare dates
/// (local noon), and integer Unix milliseconds. An optional `preferred`
/// strftime format is tried first.
pub fn parse_recorded_at<Tz: TimeZone>(
    s: &str,
    tz: &Tz,
    preferred: Option<&str>,
) -> IngestResult<DateTime<Utc>> {
    let s = s.trim();

    if let Some(fmt) = preferred {
        if let Some(at) = parse_with_format(s, fmt, tz) {
            return Ok(at);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS.iter().chain(DATE_FORMATS.iter()) {
        if let Some(at) = parse_with_format(s, fmt, tz) {
            return Ok(at);
        }
    }

    if let Ok(millis) = s.parse::<i64>() {
        if let Some(at) = DateTime::from_timestamp_millis(millis) {
            return Ok(at);
        }
    }

    Err(IngestError::InvalidTimestamp(s.to_string()))
}

fn parse_with_format<Tz: TimeZone>(s: &str, fmt: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
        return localize(naive, tz);
    }
    let date = NaiveDate::parse_from_str(s, fmt).ok()?;
    localize(date.and_hms_opt(12, 0, 0)?, tz)
}

fn localize<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
