//! The canonical in-memory table.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CurationError, Result};
use crate::value::CellValue;

/// Ordered rows over uniquely named, ordered columns.
///
/// Each row stores one cell per column, aligned by position with
/// [`Table::columns`]. Tables are plain values: every transformation in the
/// workspace borrows a table and builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Serialized shape of a [`Table`], checked before it becomes one.
#[derive(Deserialize)]
struct TableParts {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TryFrom<TableParts> for Table {
    type Error = String;

    fn try_from(parts: TableParts) -> std::result::Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        if let Some(name) = parts.columns.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(format!("duplicate column '{name}'"));
        }
        let width = parts.columns.len();
        if let Some((idx, row)) = parts
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != width)
        {
            return Err(format!(
                "row {idx} has {} cells for {width} columns",
                row.len()
            ));
        }
        Ok(Self {
            columns: parts.columns,
            rows: parts.rows,
        })
    }
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from column names and pre-built rows.
    ///
    /// # Panics
    /// Panics if a row does not have one cell per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut table = Self::new(columns);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Build an all-text table, mostly useful for fixtures.
    pub fn from_text(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self::from_rows(
            columns.iter().map(|name| (*name).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|value| CellValue::from(*value)).collect())
                .collect(),
        )
    }

    /// Append a row.
    ///
    /// # Panics
    /// Panics if `cells` does not have one cell per column.
    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        assert_eq!(
            cells.len(),
            self.columns.len(),
            "row width must match column count"
        );
        self.rows.push(cells);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, failing fast when it is absent.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| CurationError::column_not_found(name))
    }

    /// Resolve several columns at once, reporting the first missing one.
    pub fn column_indices<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| self.column_index(name.as_ref()))
            .collect()
    }

    /// Iterate over the cells of one column.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &CellValue> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Name-addressable view of one row.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    /// Iterate over name-addressable row views.
    pub fn records(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        self.rows.iter().map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    /// New table holding the rows for which `keep` is true, in order.
    ///
    /// # Panics
    /// Panics if `keep` is shorter than the table.
    #[must_use]
    pub fn filter_rows(&self, keep: &[bool]) -> Self {
        assert!(keep.len() >= self.rows.len(), "mask shorter than table");
        let rows = self
            .rows
            .iter()
            .zip(keep.iter().copied())
            .filter_map(|(row, keep)| keep.then(|| row.clone()))
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// New table holding the rows at `indices`, in the given order.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&idx| self.rows[idx].clone()).collect(),
        }
    }

    /// New table without the column at `index`.
    #[must_use]
    pub fn without_column_at(&self, index: usize) -> Self {
        let mut columns = self.columns.clone();
        columns.remove(index);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(pos, _)| *pos != index)
                    .map(|(_, cell)| cell.clone())
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// Consume the table into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<CellValue>>) {
        (self.columns, self.rows)
    }
}

/// A row borrowed from a [`Table`], addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> RowView<'a> {
    /// Cell for `column`, if the table has it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|idx| &self.cells[idx])
    }

    #[must_use]
    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }

    /// Column name to cell mapping, preserving column order in iteration.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        let (columns, cells) = (self.columns, self.cells);
        columns.iter().map(String::as_str).zip(cells.iter())
    }

    /// Owned map of rendered values, handy for assertions.
    #[must_use]
    pub fn to_text_map(&self) -> HashMap<String, String> {
        self.iter()
            .map(|(name, cell)| (name.to_string(), cell.render().into_owned()))
            .collect()
    }
}
