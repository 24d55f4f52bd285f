//! Delimited text reading.

mod header;
mod reader;

pub use header::unique_column_names;
pub use reader::{ingest, row_count, row_count_with_options};

pub(crate) use reader::csv_error;
