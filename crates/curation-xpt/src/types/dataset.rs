use std::collections::HashSet;

use super::{XptColumn, XptType, XptValue};
use crate::error::{Result, XptError};

fn valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name.len() <= 8
}

/// A single XPT member: variable definitions plus observations.
#[derive(Debug, Clone, PartialEq)]
pub struct XptDataset {
    pub name: String,
    pub label: Option<String>,
    pub columns: Vec<XptColumn>,
    pub rows: Vec<Vec<XptValue>>,
}

impl XptDataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_columns(name, Vec::new())
    }

    pub fn with_columns(name: impl Into<String>, columns: Vec<XptColumn>) -> Self {
        Self {
            name: name.into(),
            label: None,
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn add_row(&mut self, row: Vec<XptValue>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Bytes per observation.
    #[must_use]
    pub fn observation_length(&self) -> usize {
        self.columns.iter().map(|col| col.length as usize).sum()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    /// Check names, widths and row shapes before anything is written.
    pub fn validate(&self) -> Result<()> {
        if !valid_name(&self.name) {
            return Err(XptError::InvalidName {
                name: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !valid_name(&column.name) {
                return Err(XptError::InvalidName {
                    name: column.name.clone(),
                });
            }
            if !seen.insert(column.name.trim().to_uppercase()) {
                return Err(XptError::DuplicateVariable {
                    name: column.name.clone(),
                });
            }
            let width_ok = match column.data_type {
                XptType::Num => (2..=8).contains(&column.length),
                XptType::Char => column.length > 0,
            };
            if !width_ok {
                return Err(XptError::InvalidLength {
                    name: column.name.clone(),
                    length: column.length,
                });
            }
        }

        match self
            .rows
            .iter()
            .position(|row| row.len() != self.columns.len())
        {
            Some(row) => Err(XptError::RowWidth {
                row,
                expected: self.columns.len(),
                actual: self.rows[row].len(),
            }),
            None => Ok(()),
        }
    }
}
