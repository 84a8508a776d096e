//! Granularity selection
//!
//! Picks a bucket width from the shape of a dataset:
//!
//! ```text
//! any local date with > 10 readings  → daily
//! span ≤ 180 days                    → none (render raw)
//! span ≤ 730 days                    → weekly
//! span ≤ 1825 days                   → biweekly
//! otherwise                          → monthly
//! ```
//!
//! The density check looks at the busiest single day rather than a
//! dataset-wide average, so a short burst from a continuous monitor inside an
//! otherwise sparse range still gets daily buckets.

use super::bucket::local_date;
use super::types::{Granularity, PeriodThresholds, RawPoint};
use chrono::{NaiveDate, TimeZone};
use std::collections::HashMap;

const MILLIS_PER_DAY: f64 = 24.0 * 3600.0 * 1000.0;

/// Measurements of a dataset that drive granularity selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetShape {
    /// Days between earliest and latest reading, floored at 1
    pub span_days: f64,
    /// Local date with the most readings
    pub busiest_date: NaiveDate,
    /// Number of readings on `busiest_date`
    pub peak_daily_count: usize,
}

impl DatasetShape {
    /// Measure a point set; `None` when it is empty
    pub fn measure<Tz: TimeZone>(points: &[RawPoint], tz: &Tz) -> Option<Self> {
        let first = points.first()?;

        let (mut earliest, mut latest) = (first.recorded_at, first.recorded_at);
        let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();

        for point in points {
            earliest = earliest.min(point.recorded_at);
            latest = latest.max(point.recorded_at);
            *per_day.entry(local_date(&point.recorded_at, tz)).or_default() += 1;
        }

        let span_days =
            ((latest - earliest).num_milliseconds() as f64 / MILLIS_PER_DAY).max(1.0);

        // Ties resolve to the earliest date so repeated runs agree
        let (busiest_date, peak_daily_count) = per_day
            .into_iter()
            .max_by(|(da, ca), (db, cb)| ca.cmp(cb).then_with(|| db.cmp(da)))?;

        Some(Self {
            span_days,
            busiest_date,
            peak_daily_count,
        })
    }

    /// Apply the selection rules to this shape
    pub fn granularity(&self, thresholds: &PeriodThresholds) -> Granularity {
        if self.peak_daily_count > thresholds.max_readings_per_day {
            return Granularity::Daily;
        }

        if self.span_days <= thresholds.raw_max_span_days {
            Granularity::None
        } else if self.span_days <= thresholds.weekly_max_span_days {
            Granularity::Weekly
        } else if self.span_days <= thresholds.biweekly_max_span_days {
            Granularity::Biweekly
        } else {
            Granularity::Monthly
        }
    }
}

/// Choose a granularity for `points` as seen from time zone `tz`
pub fn select_period<Tz: TimeZone>(
    points: &[RawPoint],
    tz: &Tz,
    thresholds: &PeriodThresholds,
) -> Granularity {
    match DatasetShape::measure(points, tz) {
        Some(shape) => {
            let period = shape.granularity(thresholds);
            tracing::trace!(
                span_days = shape.span_days,
                peak_daily_count = shape.peak_daily_count,
                busiest_date = %shape.busiest_date,
                period = %period,
                "Selected aggregation period"
            );
            period
        }
        None => Granularity::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};

    fn spread(days: i64, count: i64) -> Vec<RawPoint> {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        let step = Duration::days(days) / (count as i32 - 1);
        (0..count)
            .map(|i| RawPoint::new(start + step * i as i32, 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(
            select_period(&[], &Utc, &PeriodThresholds::default()),
            Granularity::None
        );
        assert!(DatasetShape::measure(&[], &Utc).is_none());
    }

    #[test]
    fn test_span_thresholds() {
        let t = PeriodThresholds::default();

        assert_eq!(select_period(&spread(30, 5), &Utc, &t), Granularity::None);
        assert_eq!(select_period(&spread(180, 20), &Utc, &t), Granularity::None);
        assert_eq!(select_period(&spread(181, 20), &Utc, &t), Granularity::Weekly);
        assert_eq!(select_period(&spread(730, 20), &Utc, &t), Granularity::Weekly);
        assert_eq!(select_period(&spread(731, 20), &Utc, &t), Granularity::Biweekly);
        assert_eq!(select_period(&spread(1825, 20), &Utc, &t), Granularity::Biweekly);
        assert_eq!(select_period(&spread(1826, 20), &Utc, &t), Granularity::Monthly);
    }

    #[test]
    fn test_single_point_span_is_one_day() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let shape = DatasetShape::measure(&[RawPoint::new(at, 1.0)], &Utc).unwrap();

        assert_eq!(shape.span_days, 1.0);
        assert_eq!(shape.peak_daily_count, 1);
    }

    #[test]
    fn test_density_override_beats_long_span() {
        let mut points = spread(1000, 10);
        let burst_day = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
        for minute in 0..11 {
            points.push(RawPoint::new(burst_day + Duration::minutes(minute * 5), 90.0));
        }

        let shape = DatasetShape::measure(&points, &Utc).unwrap();
        assert_eq!(shape.peak_daily_count, 11);
        assert_eq!(
            shape.busiest_date,
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()
        );
        assert_eq!(
            select_period(&points, &Utc, &PeriodThresholds::default()),
            Granularity::Daily
        );
    }

    #[test]
    fn test_exactly_ten_per_day_is_not_dense() {
        let day = Utc.with_ymd_and_hms(2024, 2, 1, 1, 0, 0).unwrap();
        let points: Vec<_> = (0..10)
            .map(|h| RawPoint::new(day + Duration::hours(h), 60.0))
            .collect();

        assert_eq!(
            select_period(&points, &Utc, &PeriodThresholds::default()),
            Granularity::None
        );
    }

    #[test]
    fn test_density_uses_local_dates() {
        // 12 readings straddling UTC midnight: split 6/6 in UTC, but all on
        // the same local date five hours behind
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap();
        let points: Vec<_> = (0..12)
            .map(|i| RawPoint::new(base + Duration::minutes(i * 30), 70.0))
            .collect();

        let t = PeriodThresholds::default();
        assert_eq!(select_period(&points, &Utc, &t), Granularity::None);

        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(select_period(&points, &eastern, &t), Granularity::Daily);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = PeriodThresholds {
            max_readings_per_day: 2,
            ..PeriodThresholds::default()
        };
        let day = Utc.with_ymd_and_hms(2024, 2, 1, 1, 0, 0).unwrap();
        let points: Vec<_> = (0..3)
            .map(|h| RawPoint::new(day + Duration::hours(h), 60.0))
            .collect();

        assert_eq!(select_period(&points, &Utc, &t), Granularity::Daily);
    }
}
