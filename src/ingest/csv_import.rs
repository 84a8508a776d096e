//! CSV Import
//!
//! Reads vital-sign readings from CSV exports.
//! Supports flexible column mapping and multiple timestamp formats.

use super::error::{IngestError, IngestResult};
use super::timestamp::parse_recorded_at;
use crate::aggregation::RawPoint;
use chrono::TimeZone;
use std::io::Read;
use std::path::Path;

/// Maximum number of row errors kept in a result
const MAX_REPORTED_ERRORS: usize = 100;

/// CSV reading importer with configurable column mapping
#[derive(Debug, Clone)]
pub struct CsvReadingImporter<Tz: TimeZone> {
    /// Column index for timestamps (0-indexed)
    timestamp_column: usize,
    /// Column index for the primary value
    value_column: usize,
    /// Column index for the optional secondary value
    secondary_column: Option<usize>,
    /// Format tried before the built-in ones
    timestamp_format: Option<String>,
    /// Whether the CSV has a header row
    has_header: bool,
    /// Zone used for timestamps without an offset
    tz: Tz,
}

/// Result of a CSV import operation
#[derive(Debug)]
pub struct CsvImportResult {
    pub points: Vec<RawPoint>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl<Tz: TimeZone> CsvReadingImporter<Tz> {
    /// Create an importer expecting `timestamp,value[,secondary]` columns
    pub fn new(tz: Tz) -> Self {
        Self {
            timestamp_column: 0,
            value_column: 1,
            secondary_column: None,
            timestamp_format: None,
            has_header: true,
            tz,
        }
    }

    /// Set the timestamp column index
    pub fn with_timestamp_column(mut self, column: usize) -> Self {
        self.timestamp_column = column;
        self
    }

    /// Set the primary value column index
    pub fn with_value_column(mut self, column: usize) -> Self {
        self.value_column = column;
        self
    }

    /// Set the secondary value column index
    pub fn with_secondary_column(mut self, column: usize) -> Self {
        self.secondary_column = Some(column);
        self
    }

    /// Set a strftime format to try first
    pub fn with_timestamp_format(mut self, format: &str) -> Self {
        self.timestamp_format = Some(format.to_string());
        self
    }

    /// Set whether the CSV has a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Auto-detect column mapping from a header row
    ///
    /// Columns mentioning a date or time become the timestamp, a
    /// `diastolic`/`secondary`/`low` column becomes the secondary value, and
    /// the first remaining column is the primary value.
    pub fn auto_detect_columns(&mut self, headers: &csv::StringRecord) -> IngestResult<()> {
        let mut timestamp = None;
        let mut secondary = None;
        let mut value = None;

        for (idx, header) in headers.iter().enumerate() {
            let header_lower = header.trim().to_lowercase();

            if timestamp.is_none()
                && (header_lower.contains("date")
                    || header_lower.contains("time")
                    || header_lower.contains("recorded"))
            {
                timestamp = Some(idx);
            } else if secondary.is_none()
                && (header_lower.contains("diastolic")
                    || header_lower.contains("secondary")
                    || header_lower == "low")
            {
                secondary = Some(idx);
            } else if value.is_none() {
                value = Some(idx);
            }
        }

        self.timestamp_column =
            timestamp.ok_or_else(|| IngestError::MissingColumn("timestamp".to_string()))?;
        self.value_column = value.ok_or_else(|| IngestError::MissingColumn("value".to_string()))?;
        self.secondary_column = secondary;

        tracing::debug!(
            timestamp = self.timestamp_column,
            value = self.value_column,
            secondary = ?self.secondary_column,
            "Detected CSV columns"
        );

        Ok(())
    }

    /// Import readings from a CSV file
    pub fn import(&self, path: &Path) -> IngestResult<CsvImportResult> {
        let file = std::fs::File::open(path)?;
        self.import_reader(file)
    }

    /// Import from a CSV string (useful for testing)
    pub fn import_str(&self, csv_data: &str) -> IngestResult<CsvImportResult> {
        self.import_reader(csv_data.as_bytes())
    }

    /// Import readings from any reader
    pub fn import_reader<R: Read>(&self, input: R) -> IngestResult<CsvImportResult> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .from_reader(input);

        let mut points = Vec::new();
        let mut rows_processed = 0;
        let mut rows_failed = 0;
        let mut errors = Vec::new();

        for (line_num, result) in reader.records().enumerate() {
            let actual_line = if self.has_header {
                line_num + 2
            } else {
                line_num + 1
            };

            let parsed = result
                .map_err(IngestError::from)
                .and_then(|record| self.parse_record(&record));

            match parsed {
                Ok(Some(point)) => {
                    points.push(point);
                    rows_processed += 1;
                }
                // Blank value cell: nothing was measured on this row
                Ok(None) => {}
                Err(e) => {
                    errors.push(format!("Line {}: {}", actual_line, e));
                    rows_failed += 1;
                }
            }
        }

        // Truncate errors if too many
        if errors.len() > MAX_REPORTED_ERRORS {
            let total = errors.len();
            errors.truncate(MAX_REPORTED_ERRORS);
            errors.push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
        }

        tracing::debug!(
            rows_processed,
            rows_failed,
            points = points.len(),
            "CSV import finished"
        );

        Ok(CsvImportResult {
            points,
            rows_processed,
            rows_failed,
            errors,
        })
    }

    fn parse_record(&self, record: &csv::StringRecord) -> IngestResult<Option<RawPoint>> {
        let ts_str = record
            .get(self.timestamp_column)
            .map(str::trim)
            .ok_or_else(|| IngestError::MissingColumn("timestamp".to_string()))?;

        let value_str = record
            .get(self.value_column)
            .map(str::trim)
            .unwrap_or_default();
        if value_str.is_empty() {
            return Ok(None);
        }

        let recorded_at =
            parse_recorded_at(ts_str, &self.tz, self.timestamp_format.as_deref())?;
        let value = parse_number(value_str, self.value_column)?;

        let secondary_value = match self.secondary_column {
            Some(col) => match record.get(col).map(str::trim) {
                Some(s) if !s.is_empty() => Some(parse_number(s, col)?),
                _ => None,
            },
            None => None,
        };

        Ok(Some(RawPoint {
            recorded_at,
            value,
            secondary_value,
        }))
    }
}

fn parse_number(s: &str, column: usize) -> IngestResult<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| IngestError::InvalidValue {
            column,
            value: s.to_string(),
        })
}

/// Import a CSV file, detecting columns from its header
pub fn import_csv<Tz: TimeZone>(path: &Path, tz: Tz) -> IngestResult<CsvImportResult> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut importer = CsvReadingImporter::new(tz);
    importer.auto_detect_columns(&headers)?;

    importer.import(path)
}
