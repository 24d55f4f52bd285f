//! Column statistics.

use std::collections::HashMap;

use curation_model::{Result, Table};

/// Distinct values of a column with their occurrence counts.
///
/// Iterates by descending count, ties broken by ascending value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueCounts {
    entries: Vec<(String, usize)>,
}

impl ValueCounts {
    /// Count for `value`, zero when absent.
    #[must_use]
    pub fn get(&self, value: &str) -> usize {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == value)
            .map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries
            .iter()
            .map(|(value, count)| (value.as_str(), *count))
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of counted cells.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl IntoIterator for ValueCounts {
    type Item = (String, usize);
    type IntoIter = std::vec::IntoIter<(String, usize)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Count distinct rendered values of `column`.
///
/// `Missing` cells are skipped; sentinel strings are counted like any text.
pub fn value_counts(table: &Table, column: &str) -> Result<ValueCounts> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for cell in table.column(column)?.filter(|cell| !cell.is_missing()) {
        *counts.entry(cell.render().into_owned()).or_default() += 1;
    }

    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|(a_value, a_count), (b_value, b_count)| {
        b_count.cmp(a_count).then_with(|| a_value.cmp(b_value))
    });
    tracing::debug!(column, distinct = entries.len(), "Counted values");
    Ok(ValueCounts { entries })
}
