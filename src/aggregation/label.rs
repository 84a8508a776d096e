//! Bucket captions
//!
//! ```text
//! daily     2024-01-15
//! weekly    Week of Jan 14, 2024
//! biweekly  Jan 15-28, 2024  |  Jan 29 - Feb 11, 2024
//! monthly   Jan 2024
//! ```

use super::types::Granularity;
use chrono::{Datelike, Duration, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Caption for the bucket starting on `start`
pub fn period_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::None | Granularity::Daily => start.format("%Y-%m-%d").to_string(),
        Granularity::Weekly => format!(
            "Week of {} {}, {}",
            month_name(start),
            start.day(),
            start.year()
        ),
        Granularity::Biweekly => {
            let end = start + Duration::days(13);
            if start.month() == end.month() {
                format!(
                    "{} {}-{}, {}",
                    month_name(start),
                    start.day(),
                    end.day(),
                    start.year()
                )
            } else {
                format!(
                    "{} {} - {} {}, {}",
                    month_name(start),
                    start.day(),
                    month_name(end),
                    end.day(),
                    end.year()
                )
            }
        }
        Granularity::Monthly => format!("{} {}", month_name(start), start.year()),
    }
}
