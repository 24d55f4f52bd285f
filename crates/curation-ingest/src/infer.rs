//! Per-column native type inference.
//!
//! Inference runs over the present (non-missing) values of a column before
//! any value is cast to its canonical string. Casting first would make a
//! column with gaps float-shaped and turn `123` into `123.0`.

use std::collections::HashSet;

use curation_model::{CellValue, IngestPolicy, NativeType};

/// Strings treated as missing unless `keep_default_na` is disabled.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_LITERALS: &[&str] = &["True", "TRUE", "true"];
const FALSE_LITERALS: &[&str] = &["False", "FALSE", "false"];

/// Set of strings that mark a missing value.
#[derive(Debug, Clone, Default)]
pub struct MissingMarkers {
    markers: HashSet<String>,
}

impl MissingMarkers {
    pub fn new<'a>(markers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            markers: markers.into_iter().map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn is_missing(&self, raw: &str) -> bool {
        self.markers.contains(raw)
    }
}

/// Shape of one present value, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Boolean,
    Integer,
    Float,
    Text,
}

impl Shape {
    fn join(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer) => Self::Float,
            _ => Self::Text,
        }
    }

    fn native(self) -> NativeType {
        match self {
            Self::Boolean => NativeType::Boolean,
            Self::Integer => NativeType::Integer,
            Self::Float => NativeType::Float,
            Self::Text => NativeType::Text,
        }
    }
}

fn classify(raw: &str) -> Shape {
    if parse_bool(raw).is_some() {
        Shape::Boolean
    } else if parse_integer(raw).is_some() {
        Shape::Integer
    } else if looks_like_integer(raw) {
        // Digits beyond i64 stay text so identifiers are not rounded.
        Shape::Text
    } else if raw.parse::<f64>().is_ok() {
        Shape::Float
    } else {
        Shape::Text
    }
}

fn looks_like_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_bool(raw: &str) -> Option<bool> {
    if TRUE_LITERALS.contains(&raw) {
        Some(true)
    } else if FALSE_LITERALS.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

/// Parse an integer, accepting floats with no fractional part (`2.0`).
#[must_use]
pub fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    if looks_like_integer(raw) {
        return None;
    }
    let value = raw.parse::<f64>().ok()?;
    integral_f64(value)
}

/// An `i64` for floats that are whole and inside the `i64` range.
#[must_use]
pub fn integral_f64(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value) {
        Some(value as i64)
    } else {
        None
    }
}

/// Infer the narrowest type covering every present value.
///
/// Columns without any present value are `Text`.
pub fn infer_native_type<'a>(present: impl IntoIterator<Item = &'a str>) -> NativeType {
    present
        .into_iter()
        .map(classify)
        .reduce(Shape::join)
        .unwrap_or(Shape::Text)
        .native()
}

/// Convert a present raw value to a cell of the inferred type.
#[must_use]
pub fn to_native(raw: &str, native: NativeType) -> CellValue {
    let parsed = match native {
        NativeType::Integer => parse_integer(raw).map(CellValue::Integer),
        NativeType::Float => raw.parse::<f64>().ok().map(CellValue::Float),
        NativeType::Boolean => parse_bool(raw).map(CellValue::Boolean),
        NativeType::Text => None,
    };
    parsed.unwrap_or_else(|| CellValue::text(raw))
}

/// Type one raw column: infer over present values, then cast and apply the policy.
///
/// `None` entries are fields absent from short records.
pub fn normalize_column(
    raw: Vec<Option<String>>,
    markers: &MissingMarkers,
    policy: IngestPolicy,
) -> (NativeType, Vec<CellValue>) {
    let is_present = |value: &Option<String>| {
        value
            .as_deref()
            .is_some_and(|text| !markers.is_missing(text))
    };

    let native = infer_native_type(
        raw.iter()
            .filter(|value| is_present(value))
            .filter_map(|value| value.as_deref()),
    );

    let cells = raw
        .into_iter()
        .map(|value| {
            let cell = match value {
                Some(text) if !markers.is_missing(&text) => match native {
                    NativeType::Text => CellValue::Text(text),
                    other => to_native(&text, other),
                },
                _ => CellValue::Missing,
            };
            policy.apply(cell)
        })
        .collect();

    (native, cells)
}
