//! Core data types for the aggregation engine
//!
//! This module defines the values flowing through the pipeline:
//! - `RawPoint`: A single vital-sign reading as supplied by the caller
//! - `Granularity`: The bucket width chosen for a dataset
//! - `AggregatedPoint`: Summary statistics for one bucket
//! - `AggregationResult`: The full output of one aggregation run
//! - `PeriodThresholds`: Tunables used when choosing a granularity

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A single vital-sign reading
///
/// Owned by the caller; the engine only ever borrows it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawPoint {
    /// When the reading was taken
    #[serde(alias = "recorded_at")]
    pub recorded_at: DateTime<Utc>,
    /// Primary measured value (e.g. systolic pressure, heart rate)
    pub value: f64,
    /// Optional second component (e.g. diastolic pressure)
    #[serde(default, alias = "secondary_value", skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<f64>,
}

impl RawPoint {
    /// Create a reading without a secondary component
    pub fn new(recorded_at: DateTime<Utc>, value: f64) -> Self {
        Self {
            recorded_at,
            value,
            secondary_value: None,
        }
    }

    /// Builder method: attach a secondary value
    pub fn secondary(mut self, value: f64) -> Self {
        self.secondary_value = Some(value);
        self
    }

    /// Create a reading from a Unix timestamp in milliseconds
    pub fn from_millis(timestamp: i64, value: f64) -> Option<Self> {
        DateTime::from_timestamp_millis(timestamp).map(|at| Self::new(at, value))
    }
}

/// Resolution at which readings are bucketed
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Do not aggregate; render raw readings directly
    #[default]
    None,
    /// One bucket per local calendar day
    Daily,
    /// One bucket per week, starting Sunday
    Weekly,
    /// 14-day cycles anchored at January 1 of each year
    Biweekly,
    /// One bucket per calendar month
    Monthly,
}

impl Granularity {
    /// All granularities, finest first
    pub fn all() -> &'static [Granularity] {
        &[
            Granularity::None,
            Granularity::Daily,
            Granularity::Weekly,
            Granularity::Biweekly,
            Granularity::Monthly,
        ]
    }

    /// Whether this granularity performs any bucketing
    pub fn is_aggregated(&self) -> bool {
        !matches!(self, Granularity::None)
    }

    /// Adjective used in human-readable descriptions
    pub fn adjective(&self) -> Option<&'static str> {
        match self {
            Granularity::None => None,
            Granularity::Daily => Some("daily"),
            Granularity::Weekly => Some("weekly"),
            Granularity::Biweekly => Some("bi-weekly"),
            Granularity::Monthly => Some("monthly"),
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "raw" => Some(Self::None),
            "daily" | "day" | "d" => Some(Self::Daily),
            "weekly" | "week" | "w" => Some(Self::Weekly),
            "biweekly" | "bi-weekly" | "fortnight" => Some(Self::Biweekly),
            "monthly" | "month" | "m" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::None => write!(f, "none"),
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Biweekly => write!(f, "biweekly"),
            Granularity::Monthly => write!(f, "monthly"),
        }
    }
}

/// Statistics over the secondary series of one bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SecondaryStats {
    #[serde(rename = "secondaryAverage")]
    pub average: f64,
    #[serde(rename = "secondaryMin")]
    pub min: f64,
    #[serde(rename = "secondaryMax")]
    pub max: f64,
}

/// Summary of all readings that fell into one bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPoint {
    /// Local midnight of the bucket's first day, in the viewer's offset
    pub period_start: DateTime<FixedOffset>,
    /// Caption for chart axes and tooltips
    pub period_label: String,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Number of raw readings folded into this bucket
    pub count: usize,
    /// Present only when at least one reading carried a secondary value
    #[serde(flatten)]
    pub secondary: Option<SecondaryStats>,
}

/// Output of one aggregation run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Buckets in ascending `period_start` order; empty when `period` is `None`
    pub aggregated_points: Vec<AggregatedPoint>,
    /// Granularity that was applied
    pub period: Granularity,
    /// Length of the input, whatever the outcome
    pub total_raw_points: usize,
}

impl AggregationResult {
    /// Result signalling that the caller should render raw data
    pub fn raw(total_raw_points: usize) -> Self {
        Self {
            aggregated_points: Vec::new(),
            period: Granularity::None,
            total_raw_points,
        }
    }

    /// Whether any aggregation took place
    pub fn is_aggregated(&self) -> bool {
        self.period.is_aggregated()
    }

    /// One-line summary of how much reduction occurred
    pub fn description(&self) -> String {
        crate::chart::describe(
            self.period,
            self.total_raw_points,
            self.aggregated_points.len(),
        )
    }
}

/// Limits used to pick a granularity from the shape of the data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PeriodThresholds {
    /// More readings than this on a single local date forces daily buckets
    pub max_readings_per_day: usize,
    /// Spans up to this many days are rendered raw
    pub raw_max_span_days: f64,
    /// Spans up to this many days use weekly buckets
    pub weekly_max_span_days: f64,
    /// Spans up to this many days use bi-weekly buckets; longer spans go monthly
    pub biweekly_max_span_days: f64,
}

impl Default for PeriodThresholds {
    fn default() -> Self {
        Self {
            max_readings_per_day: 10,
            raw_max_span_days: 180.0,
            weekly_max_span_days: 730.0,
            biweekly_max_span_days: 1825.0,
        }
    }
}
