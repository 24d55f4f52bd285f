//! Error types shared by every curation operation.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced by ingestion, projection, deduplication and export.
#[derive(Debug, Error)]
pub enum CurationError {
    /// The file could not be tokenized or decoded.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Referenced file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Referenced column does not exist in the table.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// File exists but could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CurationError {
    /// Create a Parse error.
    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a ColumnNotFound error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Map an I/O error on `path`, distinguishing a missing file.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// True for both missing-file and missing-column errors.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. } | Self::ColumnNotFound { .. })
    }
}

/// Result type for curation operations.
pub type Result<T> = std::result::Result<T, CurationError>;
