//! Variable (column) definitions.

/// Variable storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XptType {
    /// Numeric, stored as IBM floating point.
    Num,
    /// Fixed-width character.
    Char,
}

impl XptType {
    /// Decode the NAMESTR `ntype` field (1 = numeric, 2 = character).
    #[must_use]
    pub const fn from_ntype(ntype: i16) -> Option<Self> {
        match ntype {
            1 => Some(Self::Num),
            2 => Some(Self::Char),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_ntype(self) -> i16 {
        match self {
            Self::Num => 1,
            Self::Char => 2,
        }
    }
}

/// A variable described by one NAMESTR record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XptColumn {
    pub name: String,
    pub label: Option<String>,
    pub data_type: XptType,
    /// Width in bytes inside each observation.
    pub length: u16,
}

impl XptColumn {
    /// Numeric column with the standard 8-byte width.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type: XptType::Num,
            length: 8,
        }
    }

    /// Character column of `length` bytes.
    pub fn character(name: impl Into<String>, length: u16) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type: XptType::Char,
            length,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: u16) -> Self {
        self.length = length;
        self
    }
}
