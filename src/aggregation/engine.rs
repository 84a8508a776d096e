//! Aggregation Engine
//!
//! Runs the full pipeline over a borrowed slice of readings:
//! 1. Granularity selection from the shape of the data
//! 2. Bucketing by local calendar date
//! 3. Per-bucket statistics
//! 4. Labelling and ordering
//!
//! # Pipeline
//!
//! ```text
//! RawPoints → Select Period ─(none)→ empty result, caller renders raw data
//!                  │
//!                  └→ Bucket → Summarize → Label → Sort → AggregationResult
//! ```

use super::bucket::{group_points, local_midnight};
use super::label::period_label;
use super::period::select_period;
use super::stats::summarize;
use super::types::{AggregatedPoint, AggregationResult, Granularity, PeriodThresholds, RawPoint};
use chrono::{Local, TimeZone};

/// Adaptive aggregator bound to a viewer time zone
///
/// Holds no mutable state; identical input always yields identical output.
#[derive(Debug, Clone)]
pub struct SmartAggregator<Tz: TimeZone> {
    /// Zone whose calendar defines day, week and month boundaries
    tz: Tz,
    /// Limits used when choosing a granularity
    thresholds: PeriodThresholds,
}

impl SmartAggregator<Local> {
    /// Aggregator using the process-local time zone
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl<Tz: TimeZone> SmartAggregator<Tz> {
    /// Create an aggregator for the given time zone with default thresholds
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            thresholds: PeriodThresholds::default(),
        }
    }

    /// Builder: override the selection thresholds
    pub fn with_thresholds(mut self, thresholds: PeriodThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// The viewer time zone
    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// The selection thresholds in use
    pub fn thresholds(&self) -> &PeriodThresholds {
        &self.thresholds
    }

    /// Choose a granularity for `points`
    pub fn select_period(&self, points: &[RawPoint]) -> Granularity {
        select_period(points, &self.tz, &self.thresholds)
    }

    /// Pick a granularity and aggregate accordingly
    ///
    /// When no aggregation is warranted the result has `period == None` and
    /// no buckets; the caller is expected to render `points` directly.
    pub fn aggregate(&self, points: &[RawPoint]) -> AggregationResult {
        let period = self.select_period(points);
        self.aggregate_with(points, period)
    }

    /// Aggregate at a fixed granularity, skipping selection
    pub fn aggregate_with(&self, points: &[RawPoint], period: Granularity) -> AggregationResult {
        if !period.is_aggregated() {
            tracing::debug!(total = points.len(), "No aggregation needed, using raw data");
            return AggregationResult::raw(points.len());
        }

        let groups = group_points(points, period, &self.tz);

        let mut aggregated_points: Vec<AggregatedPoint> = groups
            .into_iter()
            .filter_map(|(start, members)| {
                let stats = summarize(&members)?;
                Some(AggregatedPoint {
                    period_start: local_midnight(start, &self.tz).fixed_offset(),
                    period_label: period_label(start, period),
                    average: stats.average,
                    min: stats.min,
                    max: stats.max,
                    count: stats.count,
                    secondary: stats.secondary,
                })
            })
            .collect();

        // HashMap iteration order is arbitrary
        aggregated_points.sort_by_key(|p| p.period_start);

        tracing::debug!(
            period = %period,
            total = points.len(),
            buckets = aggregated_points.len(),
            "Aggregated readings"
        );

        AggregationResult {
            aggregated_points,
            period,
            total_raw_points: points.len(),
        }
    }
}

/// Aggregate readings in the process-local time zone with default thresholds
pub fn smart_aggregate(points: &[RawPoint]) -> AggregationResult {
    SmartAggregator::local().aggregate(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    /// `count` readings evenly spread over exactly `days` days
    fn spread(days: i64, count: i64) -> Vec<RawPoint> {
        let start = utc(2019, 3, 1, 12);
        let end = start + Duration::days(days);
        let step = (end - start).num_seconds() / (count - 1);
        (0..count)
            .map(|i| {
                let at = if i == count - 1 {
                    end
                } else {
                    start + Duration::seconds(step * i)
                };
                RawPoint::new(at, 60.0 + (i % 7) as f64)
            })
            .collect()
    }

    fn aggregator() -> SmartAggregator<Utc> {
        SmartAggregator::new(Utc)
    }

    fn assert_invariants(points: &[RawPoint], result: &AggregationResult) {
        assert_eq!(result.total_raw_points, points.len());
        if result.is_aggregated() {
            let total: usize = result.aggregated_points.iter().map(|p| p.count).sum();
            assert_eq!(total, points.len());
        }
        for p in &result.aggregated_points {
            assert!(p.count >= 1);
            assert!(p.min <= p.average && p.average <= p.max, "{p:?}");
            if let Some(s) = p.secondary {
                assert!(s.min <= s.average && s.average <= s.max, "{p:?}");
            }
        }
        for pair in result.aggregated_points.windows(2) {
            assert!(pair[0].period_start < pair[1].period_start);
        }
    }

    #[test]
    fn test_scenario_empty_input() {
        let result = aggregator().aggregate(&[]);

        assert!(result.aggregated_points.is_empty());
        assert_eq!(result.period, Granularity::None);
        assert_eq!(result.total_raw_points, 0);
    }

    #[test]
    fn test_scenario_sparse_month_stays_raw() {
        let points = spread(30, 5);
        let result = aggregator().aggregate(&points);

        assert_eq!(result.period, Granularity::None);
        assert!(result.aggregated_points.is_empty());
        assert_eq!(result.total_raw_points, 5);
    }

    #[test]
    fn test_scenario_dense_day_forces_daily() {
        let mut points = spread(10, 6);
        let burst = utc(2019, 3, 5, 6);
        for i in 0..15 {
            points.push(RawPoint::new(burst + Duration::minutes(i * 20), 95.0 + i as f64));
        }

        let result = aggregator().aggregate(&points);

        assert_eq!(result.period, Granularity::Daily);
        assert_invariants(&points, &result);

        let burst_day = result
            .aggregated_points
            .iter()
            .find(|p| p.period_label == "2019-03-05")
            .unwrap();
        assert!(burst_day.count >= 15);
    }

    #[test]
    fn test_scenario_400_days_weekly() {
        let points = spread(400, 60);
        let result = aggregator().aggregate(&points);

        assert_eq!(result.period, Granularity::Weekly);
        assert_invariants(&points, &result);
        assert!(result.aggregated_points[0].period_label.starts_with("Week of "));
    }

    #[test]
    fn test_scenario_800_days_biweekly() {
        let points = spread(800, 80);
        let result = aggregator().aggregate(&points);

        assert_eq!(result.period, Granularity::Biweekly);
        assert_invariants(&points, &result);
    }

    #[test]
    fn test_scenario_2000_days_monthly() {
        let points = spread(2000, 120);
        let result = aggregator().aggregate(&points);

        assert_eq!(result.period, Granularity::Monthly);
        assert_invariants(&points, &result);
        assert_eq!(result.aggregated_points[0].period_label, "Mar 2019");
    }

    #[test]
    fn test_scenario_same_week_shares_bucket() {
        // Tuesday and Thursday of the week starting Sunday 2024-01-14
        let points = vec![
            RawPoint::new(utc(2024, 1, 16, 9), 120.0),
            RawPoint::new(utc(2024, 1, 18, 21), 130.0),
        ];

        let result = aggregator().aggregate_with(&points, Granularity::Weekly);

        assert_eq!(result.aggregated_points.len(), 1);
        let bucket = &result.aggregated_points[0];
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.average, 125.0);
        assert_eq!(bucket.period_label, "Week of Jan 14, 2024");
        assert_eq!(
            bucket.period_start.date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()
        );
    }

    #[test]
    fn test_unordered_input_gives_sorted_output() {
        let mut points = spread(400, 60);
        points.reverse();
        points.swap(3, 40);

        let result = aggregator().aggregate(&points);
        assert_invariants(&points, &result);
    }

    #[test]
    fn test_idempotent() {
        let mut points = spread(900, 90);
        for (i, p) in points.iter_mut().enumerate() {
            if i % 3 == 0 {
                p.secondary_value = Some(80.0 - i as f64 * 0.1);
            }
        }

        let agg = aggregator();
        assert_eq!(agg.aggregate(&points), agg.aggregate(&points));
    }

    #[test]
    fn test_secondary_presence_per_bucket() {
        let points = vec![
            RawPoint::new(utc(2024, 2, 1, 8), 120.0).secondary(80.0),
            RawPoint::new(utc(2024, 2, 1, 20), 124.0),
            RawPoint::new(utc(2024, 3, 3, 8), 118.0),
        ];

        let result = aggregator().aggregate_with(&points, Granularity::Monthly);

        assert_eq!(result.aggregated_points.len(), 2);
        let feb = &result.aggregated_points[0];
        let mar = &result.aggregated_points[1];
        assert_eq!(feb.secondary.map(|s| s.average), Some(80.0));
        assert!(mar.secondary.is_none());
    }

    #[test]
    fn test_forced_none_short_circuits() {
        let points = spread(2000, 50);
        let result = aggregator().aggregate_with(&points, Granularity::None);

        assert_eq!(result, AggregationResult::raw(50));
    }

    #[test]
    fn test_biweekly_year_seam() {
        let points = vec![
            RawPoint::new(utc(2023, 12, 30, 12), 1.0),
            RawPoint::new(utc(2023, 12, 31, 12), 2.0),
            RawPoint::new(utc(2024, 1, 1, 12), 3.0),
        ];

        let result = aggregator().aggregate_with(&points, Granularity::Biweekly);
        let labels: Vec<&str> = result
            .aggregated_points
            .iter()
            .map(|p| p.period_label.as_str())
            .collect();

        assert_eq!(
            labels,
            vec!["Dec 17-30, 2023", "Dec 31 - Jan 13, 2024", "Jan 1-14, 2024"]
        );
    }

    #[test]
    fn test_period_start_carries_viewer_offset() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        // 02:00 UTC on Jan 1 is still Dec 31 locally
        let points = vec![RawPoint::new(utc(2024, 1, 1, 2), 70.0)];

        let result = SmartAggregator::new(tz).aggregate_with(&points, Granularity::Daily);
        let bucket = &result.aggregated_points[0];

        assert_eq!(bucket.period_label, "2023-12-31");
        assert_eq!(bucket.period_start.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(bucket.period_start.with_timezone(&Utc), utc(2023, 12, 31, 5));
    }

    #[test]
    fn test_custom_thresholds() {
        let points = spread(100, 20);
        let agg = aggregator().with_thresholds(PeriodThresholds {
            raw_max_span_days: 30.0,
            ..PeriodThresholds::default()
        });

        assert_eq!(agg.aggregate(&points).period, Granularity::Weekly);
    }
}
