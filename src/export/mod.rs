//! Read-only views derived from floor state: display formatting and the CSV
//! session report.

pub mod csv;
pub mod format;

pub use csv::{export_file_name, render_table_csv, write_table_csv};
pub use format::{format_amount, format_duration, format_duration_ms, format_share, occupancy_share};
