//! Adaptive Aggregation Engine
//!
//! Decides from the shape of a reading set how coarsely to bucket it, then
//! produces sorted per-bucket statistics ready for charting:
//!
//! - **types**: Core data structures (RawPoint, Granularity, AggregatedPoint)
//! - **period**: Granularity selection (span and density rules)
//! - **bucket**: Calendar-aligned bucket starts in the viewer's time zone
//! - **stats**: Average/min/max/count plus secondary-series statistics
//! - **label**: Human-readable bucket captions
//! - **engine**: Orchestration of the full pipeline
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use vitalchart::aggregation::{Granularity, RawPoint, SmartAggregator};
//!
//! let start = Utc.with_ymd_and_hms(2022, 1, 1, 8, 0, 0).unwrap();
//! let points: Vec<RawPoint> = (0..400)
//!     .map(|day| RawPoint::new(start + Duration::days(day), 120.0).secondary(80.0))
//!     .collect();
//!
//! let result = SmartAggregator::new(Utc).aggregate(&points);
//!
//! assert_eq!(result.period, Granularity::Weekly);
//! assert_eq!(result.total_raw_points, 400);
//! ```

pub mod bucket;
pub mod engine;
pub mod label;
pub mod period;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use bucket::{bucket_start, group_points, local_date, local_midnight};
pub use engine::{smart_aggregate, SmartAggregator};
pub use label::period_label;
pub use period::{select_period, DatasetShape};
pub use stats::{summarize, BucketStats};
pub use types::{
    AggregatedPoint, AggregationResult, Granularity, PeriodThresholds, RawPoint, SecondaryStats,
};
