//! Duplicate row removal.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use curation_model::{CellValue, Result, Table};

/// Which row of a duplicate group survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepPolicy {
    /// Keep the first occurrence.
    First,
    /// Keep the last occurrence.
    #[default]
    Last,
    /// Drop every row that has a duplicate.
    #[serde(alias = "false")]
    None,
}

impl KeepPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::None => "none",
        }
    }
}

impl fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeepPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "none" | "false" => Ok(Self::None),
            _ => Err(format!("Unknown keep policy: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Group {
    first: usize,
    last: usize,
    size: usize,
}

/// Remove rows that share the rendered values of `keys`.
///
/// An empty `keys` compares whole rows. Surviving rows keep their original
/// relative order.
pub fn dedup<S: AsRef<str>>(table: &Table, keys: &[S], keep: KeepPolicy) -> Result<Table> {
    let indices = if keys.is_empty() {
        (0..table.width()).collect()
    } else {
        table.column_indices(keys)?
    };

    let signature = |row: &[CellValue]| -> Vec<String> {
        indices
            .iter()
            .map(|&idx| row[idx].render().into_owned())
            .collect()
    };

    let mut groups: HashMap<Vec<String>, Group> = HashMap::new();
    let signatures: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| signature(row.as_slice()))
        .collect();
    for (pos, sig) in signatures.iter().enumerate() {
        groups
            .entry(sig.clone())
            .and_modify(|group| {
                group.last = pos;
                group.size += 1;
            })
            .or_insert(Group {
                first: pos,
                last: pos,
                size: 1,
            });
    }

    let mask: Vec<bool> = signatures
        .iter()
        .enumerate()
        .map(|(pos, sig)| {
            let group = &groups[sig];
            match keep {
                KeepPolicy::First => group.first == pos,
                KeepPolicy::Last => group.last == pos,
                KeepPolicy::None => group.size == 1,
            }
        })
        .collect();
    let deduped = table.filter_rows(&mask);

    tracing::info!(
        keep = %keep,
        keys = indices.len(),
        before = table.height(),
        after = deduped.height(),
        "Removed duplicate rows"
    );
    Ok(deduped)
}
