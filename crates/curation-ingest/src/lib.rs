//! Ingestion and export for the canonical table.
//!
//! Delimited files are read with per-column native type inference followed by
//! a cast under the chosen [`IngestPolicy`](curation_model::IngestPolicy).
//! SAS Transport files are read through `curation-xpt`. Export writes
//! delimited UTF-8 text with every field quoted.

pub mod delimited;
mod export;
pub mod infer;
mod options;
mod stat;

pub use delimited::{ingest, row_count, row_count_with_options};
pub use export::{export, export_with_options};
pub use infer::{DEFAULT_NA_VALUES, infer_native_type};
pub use options::{ExportOptions, IngestOptions};
pub use stat::{ingest_stat_table, ingest_stat_table_with_policy};
