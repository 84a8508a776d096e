//! Flat chart records
//!
//! The shape a charting surface consumes directly: one record per x-axis
//! position, with the bucket average as the plotted value.

use crate::aggregation::{local_date, period_label, AggregatedPoint, Granularity, RawPoint};
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

/// One plotted position on a chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    /// Local calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Plotted value (bucket average)
    pub value: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_max: Option<f64>,
    pub count: usize,
    pub period_label: String,
}

impl From<&AggregatedPoint> for ChartRecord {
    fn from(point: &AggregatedPoint) -> Self {
        Self {
            date: point.period_start.date_naive().format("%Y-%m-%d").to_string(),
            value: point.average,
            min: point.min,
            max: point.max,
            secondary_value: point.secondary.map(|s| s.average),
            secondary_min: point.secondary.map(|s| s.min),
            secondary_max: point.secondary.map(|s| s.max),
            count: point.count,
            period_label: point.period_label.clone(),
        }
    }
}

/// Convert aggregated buckets to chart records, preserving order
pub fn to_chart_records(points: &[AggregatedPoint]) -> Vec<ChartRecord> {
    points.iter().map(ChartRecord::from).collect()
}

/// Convert raw readings to chart records, one per reading, sorted by time
///
/// Used when aggregation was skipped so the same consumer can render the
/// fallback data.
pub fn raw_records<Tz: TimeZone>(points: &[RawPoint], tz: &Tz) -> Vec<ChartRecord> {
    let mut ordered: Vec<&RawPoint> = points.iter().collect();
    ordered.sort_by_key(|p| p.recorded_at);

    ordered
        .into_iter()
        .map(|point| {
            let date = local_date(&point.recorded_at, tz);
            ChartRecord {
                date: date.format("%Y-%m-%d").to_string(),
                value: point.value,
                min: point.value,
                max: point.value,
                secondary_value: point.secondary_value,
                secondary_min: point.secondary_value,
                secondary_max: point.secondary_value,
                count: 1,
                period_label: period_label(date, Granularity::None),
            }
        })
        .collect()
}
