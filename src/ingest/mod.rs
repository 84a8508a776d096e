//! Reading Ingest
//!
//! Turns external data into [`RawPoint`](crate::aggregation::RawPoint)s at
//! the crate boundary:
//! - CSV exports (configurable or auto-detected columns)
//! - JSON arrays of reading objects
//!
//! Malformed timestamps are rejected here so the aggregation engine only ever
//! sees valid instants.

mod csv_import;
mod error;
mod json;
mod timestamp;

pub use csv_import::{import_csv, CsvImportResult, CsvReadingImporter};
pub use error::{IngestError, IngestResult};
pub use json::{import_json, parse_json_readings};
pub use timestamp::parse_recorded_at;

use crate::aggregation::RawPoint;
use chrono::TimeZone;
use std::path::Path;

/// Load readings from a file, choosing the parser by extension
///
/// `.json` files are parsed as JSON; anything else as CSV with auto-detected
/// columns. CSV row errors are logged and skipped.
pub fn load_readings<Tz: TimeZone>(path: &Path, tz: &Tz) -> IngestResult<Vec<RawPoint>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        return import_json(path, tz);
    }

    let result = import_csv(path, tz.clone())?;
    if result.rows_failed > 0 {
        tracing::warn!(
            path = ?path,
            rows_failed = result.rows_failed,
            "Skipped malformed CSV rows"
        );
        for error in result.errors.iter().take(10) {
            tracing::warn!("{}", error);
        }
    }
    Ok(result.points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::Write;

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("readings.json");
        std::fs::write(&json_path, r#"[{"recordedAt":"2024-01-01T00:00:00Z","value":1}]"#)
            .unwrap();
        assert_eq!(load_readings(&json_path, &Utc).unwrap().len(), 1);

        let csv_path = dir.path().join("readings.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "date,value\n2024-01-01,1\n2024-01-02,2\nbad,3").unwrap();
        drop(file);
        assert_eq!(load_readings(&csv_path, &Utc).unwrap().len(), 2);
    }
}
