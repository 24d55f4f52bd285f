use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// How inferred native values are stored in the resulting table.
///
/// The delimited reader defaults to `StringSentinel` so values loaded from
/// different sources compare as plain strings. The statistical reader
/// defaults to `NativeTypes`; the two are not expected to produce identical
/// tables for the same data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestPolicy {
    /// Every cell is canonical text; missing values become the sentinel.
    #[default]
    StringSentinel,
    /// Cells keep their native type; missing values stay `Missing`.
    NativeTypes,
}

impl IngestPolicy {
    /// Apply the policy to a cell that already carries its native type.
    #[must_use]
    pub fn apply(self, value: CellValue) -> CellValue {
        match self {
            Self::StringSentinel => value.into_canonical_text(),
            Self::NativeTypes => value,
        }
    }
}
