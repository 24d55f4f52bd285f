//! Observation values and SAS missing codes.

/// One of the 28 SAS missing value codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissingValue {
    /// `.`
    #[default]
    Standard,
    /// `._`
    Underscore,
    /// `.A` through `.Z`
    Special(char),
}

impl MissingValue {
    /// Decode the marker byte of a missing numeric.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'.' => Some(Self::Standard),
            b'_' => Some(Self::Underscore),
            b'A'..=b'Z' => Some(Self::Special(byte as char)),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Standard => b'.',
            Self::Underscore => b'_',
            Self::Special(ch) if ch.is_ascii_uppercase() => ch as u8,
            Self::Special(_) => b'.',
        }
    }
}

/// A numeric observation value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Value(f64),
    Missing(MissingValue),
}

impl NumericValue {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(*value),
            Self::Missing(_) => None,
        }
    }

    #[must_use]
    pub fn missing_type(&self) -> Option<MissingValue> {
        match self {
            Self::Missing(missing) => Some(*missing),
            Self::Value(_) => None,
        }
    }
}

/// A single cell of an XPT observation.
#[derive(Debug, Clone, PartialEq)]
pub enum XptValue {
    Char(String),
    Num(NumericValue),
}

impl XptValue {
    pub fn character(value: impl Into<String>) -> Self {
        Self::Char(value.into())
    }

    #[must_use]
    pub fn numeric(value: f64) -> Self {
        Self::Num(NumericValue::Value(value))
    }

    #[must_use]
    pub fn numeric_missing() -> Self {
        Self::Num(NumericValue::Missing(MissingValue::Standard))
    }

    #[must_use]
    pub fn numeric_missing_with(missing: MissingValue) -> Self {
        Self::Num(NumericValue::Missing(missing))
    }

    /// True for missing numerics; character values are never missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Num(num) if num.is_missing())
    }
}
