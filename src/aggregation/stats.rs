//! Per-bucket statistics

use super::types::{RawPoint, SecondaryStats};

/// Running min/max/sum over a series of values
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sum: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
    }

    /// Mean kept inside `[min, max]` despite rounding in the sum
    fn average(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some((self.sum / self.count as f64).max(self.min).min(self.max))
    }
}

/// Summary of one bucket before it is labelled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub secondary: Option<SecondaryStats>,
}

/// Summarize a bucket's readings
///
/// Returns `None` for an empty slice. Readings without a secondary value are
/// left out of the secondary statistics rather than counted as zero.
pub fn summarize(points: &[&RawPoint]) -> Option<BucketStats> {
    let mut primary = Accumulator::new();
    let mut secondary = Accumulator::new();

    for point in points {
        primary.push(point.value);
        if let Some(value) = point.secondary_value {
            secondary.push(value);
        }
    }

    let average = primary.average()?;

    Some(BucketStats {
        average,
        min: primary.min,
        max: primary.max,
        count: primary.count,
        secondary: secondary.average().map(|average| SecondaryStats {
            average,
            min: secondary.min,
            max: secondary.max,
        }),
    })
}
