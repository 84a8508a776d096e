//! One-line summaries of how much a dataset was reduced

use crate::aggregation::Granularity;

/// Describe an aggregation outcome
///
/// ```text
/// 120 data points
/// 4380 data points (52 weekly averages displayed)
/// ```
pub fn describe(period: Granularity, raw_count: usize, aggregated_count: usize) -> String {
    match period.adjective() {
        None => format!("{} data points", raw_count),
        Some(adjective) => format!(
            "{} data points ({} {} averages displayed)",
            raw_count, aggregated_count, adjective
        ),
    }
}
