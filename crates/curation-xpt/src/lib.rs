//! SAS Transport (XPT) V5 reader and writer.
//!
//! The statistical ingestion path of the curation workspace reads XPT files
//! through this crate; the writer produces compatible files for exchange
//! with SAS tooling.
//!
//! ```no_run
//! use std::path::Path;
//! use curation_xpt::{XptColumn, XptDataset, XptValue, read_xpt, write_xpt};
//!
//! let mut ds = XptDataset::with_columns(
//!     "DM",
//!     vec![
//!         XptColumn::character("USUBJID", 20).with_label("Unique Subject ID"),
//!         XptColumn::numeric("AGE").with_label("Age in Years"),
//!     ],
//! );
//! ds.add_row(vec![XptValue::character("STUDY-001"), XptValue::numeric(35.0)]);
//! write_xpt(Path::new("dm.xpt"), &ds).unwrap();
//!
//! let dataset = read_xpt(Path::new("dm.xpt")).unwrap();
//! println!("{} ({} rows)", dataset.name, dataset.num_rows());
//! ```

mod error;
pub mod float;
mod namestr;
mod reader;
mod record;
mod types;
mod writer;

pub use error::{Result, XptError};

pub use types::{
    MissingValue, NumericValue, XptColumn, XptDataset, XptReaderOptions, XptType, XptValue,
    XptWriterOptions,
};

pub use reader::{XptReader, read_xpt, read_xpt_with_options};

pub use writer::{XptWriter, write_xpt, write_xpt_with_options};
