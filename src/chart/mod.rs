//! Chart-facing output
//!
//! - **record**: Flat records in the shape a charting surface consumes
//! - **description**: One-line summary of the applied reduction

mod description;
mod record;

pub use description::describe;
pub use record::{raw_records, to_chart_records, ChartRecord};
