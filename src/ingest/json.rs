//! JSON Import
//!
//! Accepts an array of reading objects:
//!
//! ```json
//! [
//!   { "recordedAt": "2024-01-15T08:30:00Z", "value": 120, "secondaryValue": 80 },
//!   { "recordedAt": 1705329342123, "value": 72 }
//! ]
//! ```

use super::error::{IngestError, IngestResult};
use super::timestamp::parse_recorded_at;
use crate::aggregation::RawPoint;
use chrono::{DateTime, TimeZone};
use serde::Deserialize;
use std::path::Path;

/// Timestamp as it appears in JSON input
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimestampDto {
    /// Unix milliseconds
    Millis(i64),
    /// Any string accepted by [`parse_recorded_at`]
    Text(String),
}

/// One reading as it appears in JSON input
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadingDto {
    #[serde(alias = "recorded_at", alias = "timestamp")]
    recorded_at: TimestampDto,
    value: f64,
    #[serde(default, alias = "secondary_value")]
    secondary_value: Option<f64>,
}

impl ReadingDto {
    fn into_point<Tz: TimeZone>(self, tz: &Tz) -> IngestResult<RawPoint> {
        let recorded_at = match self.recorded_at {
            TimestampDto::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| IngestError::InvalidTimestamp(ms.to_string()))?,
            TimestampDto::Text(s) => parse_recorded_at(&s, tz, None)?,
        };

        Ok(RawPoint {
            recorded_at,
            value: self.value,
            secondary_value: self.secondary_value,
        })
    }
}

/// Parse readings from a JSON string
///
/// Fails on the first malformed entry; invalid timestamps never reach the
/// aggregation engine.
pub fn parse_json_readings<Tz: TimeZone>(json: &str, tz: &Tz) -> IngestResult<Vec<RawPoint>> {
    let readings: Vec<ReadingDto> = serde_json::from_str(json)?;
    readings.into_iter().map(|r| r.into_point(tz)).collect()
}

/// Read readings from a JSON file
pub fn import_json<Tz: TimeZone>(path: &Path, tz: &Tz) -> IngestResult<Vec<RawPoint>> {
    let content = std::fs::read_to_string(path)?;
    let points = parse_json_readings(&content, tz)?;
    tracing::debug!(path = ?path, points = points.len(), "JSON import finished");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_parse_mixed_timestamps() {
        let json = r#"[
            { "recordedAt": "2024-01-15T08:30:00Z", "value": 120, "secondaryValue": 80 },
            { "recordedAt": 1705329342123, "value": 72 },
            { "timestamp": "2024-01-16 09:00:00", "value": 70, "secondaryValue": null }
        ]"#;

        let points = parse_json_readings(json, &Utc).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].secondary_value, Some(80.0));
        assert_eq!(points[1].recorded_at.timestamp_millis(), 1705329342123);
        assert_eq!(
            points[2].recorded_at,
            Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap()
        );
        assert!(points[2].secondary_value.is_none());
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let json = r#"[{ "recordedAt": "sometime", "value": 1 }]"#;

        assert!(matches!(
            parse_json_readings(json, &Utc),
            Err(IngestError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_json_readings("{not json", &Utc),
            Err(IngestError::Json(_))
        ));
    }
}
