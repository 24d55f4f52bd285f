//! Header row normalization.

use std::collections::HashSet;

const BOM: char = '\u{feff}';

/// Make header names unique and non-empty.
///
/// A leading byte-order mark is stripped from the first name. Empty names
/// become `Unnamed: {index}`. Repeated names get `.1`, `.2`, ... suffixes,
/// skipping suffixes that collide with names already present.
pub fn unique_column_names(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut columns = Vec::with_capacity(raw.len());

    for (idx, name) in raw.into_iter().enumerate() {
        let name = if idx == 0 {
            name.strip_prefix(BOM).map(str::to_string).unwrap_or(name)
        } else {
            name
        };
        let name = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };

        let unique = if seen.contains(&name) {
            (1..)
                .map(|n| format!("{name}.{n}"))
                .find(|candidate| !seen.contains(candidate))
                .unwrap_or_default()
        } else {
            name
        };
        seen.insert(unique.clone());
        columns.push(unique);
    }

    columns
}
