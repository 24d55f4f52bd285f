//! Tabular data curation.
//!
//! Files are read into a [`Table`], filtered, deduplicated or sorted, and
//! written back as quoted delimited text or summarised.
//!
//! ```no_run
//! use std::path::Path;
//! use datacuration::{IngestOptions, KeepPolicy, dedup, export, ingest};
//!
//! let table = ingest(Path::new("a.csv"), &IngestOptions::default())?;
//! let unique = dedup(&table, &["id"], KeepPolicy::Last)?;
//! export(&unique, Path::new("a_dedup.csv"))?;
//! # Ok::<(), datacuration::CurationError>(())
//! ```

pub mod logging;

pub use curation_core::{
    CaseSensitivity, KeepPolicy, SortOrder, ValueCounts, dedup, drop_column, filter_contains,
    filter_equals, filter_not_missing, sort_by, subset_by_membership, value_counts,
};
pub use curation_ingest::{
    DEFAULT_NA_VALUES, ExportOptions, IngestOptions, export, export_with_options, ingest,
    ingest_stat_table, ingest_stat_table_with_policy, row_count, row_count_with_options,
};
pub use curation_model::{
    CellValue, CurationError, IngestPolicy, NativeType, Result, RowView, SENTINEL, Table,
};

/// SAS Transport reading and writing.
pub mod xpt {
    pub use curation_xpt::{
        MissingValue, NumericValue, XptColumn, XptDataset, XptError, XptReaderOptions, XptType,
        XptValue, XptWriterOptions, read_xpt, read_xpt_with_options, write_xpt,
        write_xpt_with_options,
    };
}
