//! Ingestion and export configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use curation_model::{CurationError, IngestPolicy, Result};

use crate::infer::DEFAULT_NA_VALUES;

/// Options for reading a delimited file.
///
/// Deserializes with per-field defaults, so a config file only needs the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Parse at most this many data rows.
    pub row_limit: Option<usize>,
    /// Parse only the first column and keep its raw text.
    pub first_column_only: bool,
    /// Field delimiter; must be a single ASCII character.
    pub delimiter: char,
    /// How inferred values are stored in the table.
    pub policy: IngestPolicy,
    /// Additional strings treated as missing.
    pub na_values: Vec<String>,
    /// Whether the default missing markers apply.
    pub keep_default_na: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            row_limit: None,
            first_column_only: false,
            delimiter: ',',
            policy: IngestPolicy::StringSentinel,
            na_values: Vec::new(),
            keep_default_na: true,
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn first_column_only(mut self) -> Self {
        self.first_column_only = true;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: IngestPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_na_value(mut self, value: impl Into<String>) -> Self {
        self.na_values.push(value.into());
        self
    }

    #[must_use]
    pub fn without_default_na(mut self) -> Self {
        self.keep_default_na = false;
        self
    }

    /// Every string treated as missing under these options.
    pub fn missing_markers(&self) -> impl Iterator<Item = &str> + '_ {
        let defaults: &[&str] = if self.keep_default_na {
            DEFAULT_NA_VALUES
        } else {
            &[]
        };
        defaults
            .iter()
            .copied()
            .chain(self.na_values.iter().map(String::as_str))
    }

    pub(crate) fn delimiter_byte(&self, path: &Path) -> Result<u8> {
        delimiter_byte(self.delimiter, path)
    }
}

/// Options for writing a delimited file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Field delimiter; must be a single ASCII character.
    pub delimiter: char,
    /// Text written for `Missing` cells.
    pub missing_marker: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            missing_marker: String::new(),
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_missing_marker(mut self, marker: impl Into<String>) -> Self {
        self.missing_marker = marker.into();
        self
    }

    pub(crate) fn delimiter_byte(&self, path: &Path) -> Result<u8> {
        delimiter_byte(self.delimiter, path)
    }
}

fn delimiter_byte(delimiter: char, path: &Path) -> Result<u8> {
    if delimiter.is_ascii() && delimiter != '"' {
        Ok(delimiter as u8)
    } else {
        Err(CurationError::parse(
            path,
            format!("delimiter {delimiter:?} is not a usable ASCII character"),
        ))
    }
}
