//! Errors raised while reading or writing transport files.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XptError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The input is not a whole number of records or is too short to hold a member.
    #[error("transport file has unusable length {len}")]
    BadLength { len: usize },

    /// A section marker is absent where the layout requires one.
    #[error("expected {expected} header record at byte {offset}")]
    UnexpectedRecord {
        expected: &'static str,
        offset: usize,
    },

    /// The input ends inside a record or block.
    #[error("transport file truncated at byte {offset}")]
    Truncated { offset: usize },

    /// A numeric header field does not hold digits.
    #[error("header field '{field}' is not a number")]
    BadField { field: &'static str },

    /// A NAMESTR entry could not be decoded.
    #[error("variable {index}: {reason}")]
    BadVariable { index: usize, reason: String },

    /// Character data is not valid UTF-8.
    #[error("column {column}, row {row}: text is not valid UTF-8")]
    NonUtf8 { column: String, row: usize },

    #[error("observation length overflows")]
    Overflow,

    /// Non-blank bytes after the last whole observation.
    #[error("partial observation at end of file")]
    TrailingBytes,

    /// Dataset or variable name empty or longer than eight bytes.
    #[error("invalid name '{name}'")]
    InvalidName { name: String },

    #[error("variable {name} appears more than once")]
    DuplicateVariable { name: String },

    /// Numeric width outside 2..=8, or zero character width.
    #[error("variable {name} cannot have length {length}")]
    InvalidLength { name: String, length: u16 },

    #[error("row {row} has {actual} values for {expected} variables")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, XptError>;

impl XptError {
    pub(crate) fn bad_variable(index: usize, reason: impl Into<String>) -> Self {
        Self::BadVariable {
            index,
            reason: reason.into(),
        }
    }
}
