//! Table operations: projection, deduplication, sorting and aggregation.
//!
//! Every operation borrows a [`Table`](curation_model::Table), resolves the
//! columns it references before touching any row, and returns a new value.

pub mod aggregate;
pub mod dedup;
pub mod projector;
pub mod sort;

pub use aggregate::{ValueCounts, value_counts};
pub use dedup::{KeepPolicy, dedup};
pub use projector::{
    CaseSensitivity, drop_column, filter_contains, filter_equals, filter_not_missing,
    subset_by_membership,
};
pub use sort::{SortOrder, sort_by};
