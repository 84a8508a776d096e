//! Calendar-aligned bucketing
//!
//! Every reading is mapped to the local calendar date on which its bucket
//! starts. All arithmetic works on `NaiveDate`s in the viewer's time zone so
//! readings near midnight land on the day the viewer saw them.

use super::types::{Granularity, RawPoint};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;

/// Length of one bi-weekly cycle in days
pub const BIWEEKLY_CYCLE_DAYS: u32 = 14;

/// Local calendar date of an instant in time zone `tz`
pub fn local_date<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// First instant of `date` in time zone `tz`
///
/// Falls back to later hours of the same day when midnight falls into a
/// daylight-saving gap.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    (0..24)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

/// Start date of the bucket that contains `date`
///
/// `Granularity::None` leaves the date unchanged.
pub fn bucket_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::None | Granularity::Daily => date,
        Granularity::Weekly => {
            let days_since_sunday = date.weekday().num_days_from_sunday() as i64;
            date - Duration::days(days_since_sunday)
        }
        Granularity::Biweekly => {
            // Cycles restart at January 1 of every year, so the final cycle
            // of a year is 1 or 2 days long
            let cycle = date.ordinal0() / BIWEEKLY_CYCLE_DAYS;
            let offset = (cycle * BIWEEKLY_CYCLE_DAYS) as i64;
            NaiveDate::from_yo_opt(date.year(), 1)
                .map(|jan1| jan1 + Duration::days(offset))
                .unwrap_or(date)
        }
        Granularity::Monthly => date.with_day(1).unwrap_or(date),
    }
}

/// Group readings by bucket start date
///
/// Every input point appears in exactly one group, and points keep their
/// input order within a group.
pub fn group_points<'a, Tz: TimeZone>(
    points: &'a [RawPoint],
    granularity: Granularity,
    tz: &Tz,
) -> HashMap<NaiveDate, Vec<&'a RawPoint>> {
    let mut groups: HashMap<NaiveDate, Vec<&RawPoint>> = HashMap::new();

    for point in points {
        let start = bucket_start(local_date(&point.recorded_at, tz), granularity);
        groups.entry(start).or_default().push(point);
    }

    groups
}
