//! Core types for XPT file handling.

mod column;
mod dataset;
mod options;
mod value;

pub use column::{XptColumn, XptType};
pub use dataset::XptDataset;
pub use options::{XptReaderOptions, XptWriterOptions};
pub use value::{MissingValue, NumericValue, XptValue};
