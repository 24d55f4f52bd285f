//! Column removal and row filters.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use curation_model::{CellValue, Result, Table, redact_value};

/// Case handling for [`filter_contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

fn filter_by<F>(table: &Table, column: &str, mut keep: F) -> Result<Table>
where
    F: FnMut(&CellValue) -> bool,
{
    let idx = table.column_index(column)?;
    let mask: Vec<bool> = table.rows().iter().map(|row| keep(&row[idx])).collect();
    let filtered = table.filter_rows(&mask);
    tracing::debug!(
        column,
        before = table.height(),
        after = filtered.height(),
        "Filtered rows"
    );
    Ok(filtered)
}

/// Remove one column.
pub fn drop_column(table: &Table, name: &str) -> Result<Table> {
    let idx = table.column_index(name)?;
    tracing::debug!(column = name, "Dropping column");
    Ok(table.without_column_at(idx))
}

/// Keep rows whose rendered value in `column` is one of `values`.
pub fn subset_by_membership<I, S>(table: &Table, column: &str, values: I) -> Result<Table>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let idx = table.column_index(column)?;
    let allowed: HashSet<String> = values
        .into_iter()
        .map(|value| value.as_ref().to_string())
        .collect();
    let mask: Vec<bool> = table
        .rows()
        .iter()
        .map(|row| allowed.contains(row[idx].render().as_ref()))
        .collect();
    tracing::debug!(column, allowed = allowed.len(), "Subsetting by membership");
    Ok(table.filter_rows(&mask))
}

/// Keep rows whose rendered value in `column` equals `value` exactly.
pub fn filter_equals(table: &Table, column: &str, value: &str) -> Result<Table> {
    tracing::trace!(column, value = redact_value(value), "Filtering on equality");
    filter_by(table, column, |cell| cell.render() == value)
}

/// Keep rows whose value in `column` contains `pattern` as a plain substring.
///
/// `Missing` cells never match. With [`CaseSensitivity::Insensitive`] both
/// sides are compared in lowercase.
pub fn filter_contains(
    table: &Table,
    column: &str,
    pattern: &str,
    case: CaseSensitivity,
) -> Result<Table> {
    tracing::trace!(column, pattern = redact_value(pattern), ?case, "Filtering on substring");
    let needle = match case {
        CaseSensitivity::Sensitive => pattern.to_string(),
        CaseSensitivity::Insensitive => pattern.to_lowercase(),
    };
    filter_by(table, column, |cell| {
        if cell.is_missing() {
            return false;
        }
        let text = cell.render();
        match case {
            CaseSensitivity::Sensitive => text.contains(needle.as_str()),
            CaseSensitivity::Insensitive => text.to_lowercase().contains(needle.as_str()),
        }
    })
}

/// Drop rows whose value in `column` is `Missing` or the sentinel.
pub fn filter_not_missing(table: &Table, column: &str) -> Result<Table> {
    filter_by(table, column, |cell| !cell.is_absent())
}
