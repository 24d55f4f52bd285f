//! Cell values and native column types.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved string marking a value that was missing or empty in the source.
pub const SENTINEL: &str = ".";

/// Narrowest native representation inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl NativeType {
    /// Lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell of a [`Table`](crate::Table).
///
/// Tables ingested under [`IngestPolicy::StringSentinel`](crate::IngestPolicy)
/// only ever contain `Text`; the other variants appear under
/// [`IngestPolicy::NativeTypes`](crate::IngestPolicy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Missing,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The sentinel text cell.
    #[must_use]
    pub fn sentinel() -> Self {
        Self::Text(SENTINEL.to_string())
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// True for the sentinel text `"."`.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Text(text) if text == SENTINEL)
    }

    /// True when the cell carries no data under either ingestion policy.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.is_missing() || self.is_sentinel()
    }

    /// Borrow the text of a `Text` cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Canonical string form, borrowing when the cell is already text.
    #[must_use]
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Missing => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Re-express the cell as canonical text, using the sentinel for `Missing`.
    #[must_use]
    pub fn into_canonical_text(self) -> Self {
        match self {
            Self::Text(_) => self,
            Self::Missing => Self::sentinel(),
            other => Self::Text(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write_float(f, *value),
            Self::Boolean(true) => f.write_str("True"),
            Self::Boolean(false) => f.write_str("False"),
            Self::Missing => Ok(()),
        }
    }
}

/// Shortest round-trip text. Decimal exponents below -4 or from 16 up use
/// the `1e-05` / `1.5e+20` form; every other float keeps a fractional part.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("nan");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "inf" } else { "-inf" });
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    }

    let fixed = value.to_string();
    if fixed.contains('.') {
        f.write_str(&fixed)
    } else {
        write!(f, "{fixed}.0")
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
