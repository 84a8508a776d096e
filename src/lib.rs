//! # vitalchart
//!
//! Adaptive aggregation of vital-sign readings for charting.
//!
//! Dense sources (continuous monitors) and sparse multi-year histories both
//! chart badly when every reading is plotted. This crate inspects a reading
//! set, picks a bucket width (daily, weekly, bi-weekly, monthly, or none),
//! and produces sorted per-bucket statistics ready for a chart. The raw
//! readings are only borrowed and stay untouched for export and exact-value
//! display elsewhere.
//!
//! ## Modules
//!
//! - [`aggregation`]: Granularity selection, bucketing and statistics
//! - [`chart`]: Chart records and reduction summaries
//! - [`ingest`]: CSV and JSON readers producing [`RawPoint`]s
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use vitalchart::{chart, Granularity, RawPoint, SmartAggregator};
//!
//! // A continuous monitor: one reading every 5 minutes for 3 days
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let points: Vec<RawPoint> = (0..864)
//!     .map(|i| RawPoint::new(start + Duration::minutes(5 * i), 60.0 + (i % 20) as f64))
//!     .collect();
//!
//! let result = SmartAggregator::new(Utc).aggregate(&points);
//! assert_eq!(result.period, Granularity::Daily);
//!
//! let records = chart::to_chart_records(&result.aggregated_points);
//! assert_eq!(records.len(), 3);
//! assert_eq!(
//!     result.description(),
//!     "864 data points (3 daily averages displayed)"
//! );
//! ```

pub mod aggregation;
pub mod chart;
pub mod config;
pub mod ingest;

// Re-export top-level types for convenience
pub use aggregation::{
    smart_aggregate, AggregatedPoint, AggregationResult, Granularity, PeriodThresholds, RawPoint,
    SecondaryStats, SmartAggregator,
};

pub use chart::{describe, ChartRecord};

pub use config::{Config, ConfigError, LoggingConfig};

pub use ingest::{IngestError, IngestResult};
