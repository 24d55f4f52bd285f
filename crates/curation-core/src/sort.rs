//! Stable row ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use curation_model::{CellValue, Result, Table};

/// Direction of [`sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Integer(x), CellValue::Integer(y)) => x.cmp(y),
        (CellValue::Float(x), CellValue::Float(y)) => x.total_cmp(y),
        (CellValue::Integer(x), CellValue::Float(y)) => (*x as f64).total_cmp(y),
        (CellValue::Float(x), CellValue::Integer(y)) => x.total_cmp(&(*y as f64)),
        _ => a.render().cmp(&b.render()),
    }
}

/// Stable sort of rows by `columns`, compared left to right.
///
/// Native numbers compare numerically; everything else compares by its
/// rendered text, so sentinel-policy tables sort lexically.
pub fn sort_by<S: AsRef<str>>(table: &Table, columns: &[S], order: SortOrder) -> Result<Table> {
    let indices = table.column_indices(columns)?;
    let rows = table.rows();
    let mut positions: Vec<usize> = (0..rows.len()).collect();
    positions.sort_by(|&a, &b| {
        let ordering = indices
            .iter()
            .map(|&idx| compare_cells(&rows[a][idx], &rows[b][idx]))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    tracing::debug!(columns = indices.len(), ?order, "Sorted rows");
    Ok(table.select_rows(&positions))
}
