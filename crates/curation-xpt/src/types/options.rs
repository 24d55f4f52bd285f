//! Reader and writer options.

use chrono::NaiveDateTime;

use super::MissingValue;
use crate::record::sas_timestamp;

/// Options for reading transport files.
#[derive(Debug, Clone)]
pub struct XptReaderOptions {
    /// Drop the blank padding of character values (default: true).
    pub trim_strings: bool,
}

impl Default for XptReaderOptions {
    fn default() -> Self {
        Self { trim_strings: true }
    }
}

impl XptReaderOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the blank padding of character values.
    #[must_use]
    pub fn keep_padding(mut self) -> Self {
        self.trim_strings = false;
        self
    }
}

/// Options for writing transport files.
#[derive(Debug, Clone)]
pub struct XptWriterOptions {
    /// Release written to the header records (eight bytes at most).
    pub sas_version: String,
    /// Host name written to the header records (eight bytes at most).
    pub os_name: String,
    /// Creation time; the clock is read at write time when unset.
    pub created: Option<NaiveDateTime>,
    /// Modification time; defaults to the creation time.
    pub modified: Option<NaiveDateTime>,
    /// Code written for NaN and infinite numbers.
    pub default_missing: MissingValue,
}

impl Default for XptWriterOptions {
    fn default() -> Self {
        Self {
            sas_version: "9.4".to_string(),
            os_name: "RUST".to_string(),
            created: None,
            modified: None,
            default_missing: MissingValue::Standard,
        }
    }
}

impl XptWriterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sas_version(mut self, version: impl Into<String>) -> Self {
        self.sas_version = version.into();
        self
    }

    #[must_use]
    pub fn with_os_name(mut self, os_name: impl Into<String>) -> Self {
        self.os_name = os_name.into();
        self
    }

    #[must_use]
    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(created);
        self
    }

    #[must_use]
    pub fn with_modified(mut self, modified: NaiveDateTime) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Resolve both header timestamps, reading the clock at most once.
    pub(crate) fn timestamps(&self) -> (String, String) {
        let created = self
            .created
            .unwrap_or_else(|| chrono::Local::now().naive_local());
        let modified = self.modified.unwrap_or(created);
        (sas_timestamp(created), sas_timestamp(modified))
    }
}
