//! Canonical table model for the data curation workspace.
//!
//! Every reader in the workspace produces a [`Table`], and every projection,
//! deduplication and aggregation consumes one. Cells are [`CellValue`]s whose
//! shape is decided by the [`IngestPolicy`] used at ingestion time.

pub mod error;
pub mod policy;
pub mod redact;
pub mod table;
pub mod value;

pub use error::{CurationError, Result};
pub use policy::IngestPolicy;
pub use redact::redact_value;
pub use table::{RowView, Table};
pub use value::{CellValue, NativeType, SENTINEL};
