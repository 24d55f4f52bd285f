//! Algebraic properties of the table operations.

use proptest::prelude::*;

use curation_core::{
    CaseSensitivity, KeepPolicy, SortOrder, dedup, drop_column, filter_contains, filter_equals,
    filter_not_missing, sort_by, subset_by_membership, value_counts,
};
use curation_model::{CellValue, Table};

fn table_strategy() -> impl Strategy<Value = Table> {
    let cell = prop_oneof![Just("."), Just("a"), Just("b"), Just("ab"), Just("B")];
    prop::collection::vec((cell.clone(), cell.clone(), cell), 0..24).prop_map(|rows| {
        Table::from_rows(
            vec!["k".to_string(), "v".to_string(), "w".to_string()],
            rows.into_iter()
                .map(|(k, v, w)| vec![CellValue::text(k), CellValue::text(v), CellValue::text(w)])
                .collect(),
        )
    })
}

fn keep_strategy() -> impl Strategy<Value = KeepPolicy> {
    prop_oneof![
        Just(KeepPolicy::First),
        Just(KeepPolicy::Last),
        Just(KeepPolicy::None)
    ]
}

proptest! {
    #[test]
    fn dedup_is_idempotent(table in table_strategy(), keep in keep_strategy()) {
        let once = dedup(&table, &["k", "v"], keep).unwrap();
        let twice = dedup(&once, &["k", "v"], keep).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn dedup_never_grows(table in table_strategy(), keep in keep_strategy()) {
        let deduped = dedup(&table, &["k"], keep).unwrap();
        prop_assert!(deduped.height() <= table.height());
        prop_assert!(deduped.height() <= 5);
    }

    #[test]
    fn row_filters_commute(table in table_strategy()) {
        let left = filter_not_missing(
            &filter_contains(&table, "v", "a", CaseSensitivity::Insensitive).unwrap(),
            "w",
        )
        .unwrap();
        let right = filter_contains(
            &filter_not_missing(&table, "w").unwrap(),
            "v",
            "a",
            CaseSensitivity::Insensitive,
        )
        .unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn membership_and_equality_commute(table in table_strategy()) {
        let subset = subset_by_membership(&table, "k", ["a", "b"]).unwrap();
        let left = filter_equals(&subset, "w", "ab").unwrap();
        let filtered = filter_equals(&table, "w", "ab").unwrap();
        let right = subset_by_membership(&filtered, "k", ["a", "b"]).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn equality_filter_commutes_with_dropping_another_column(table in table_strategy()) {
        let left = drop_column(&filter_equals(&table, "k", "a").unwrap(), "w").unwrap();
        let right = filter_equals(&drop_column(&table, "w").unwrap(), "k", "a").unwrap();
        prop_assert_eq!(left.columns(), &["k".to_string(), "v".to_string()]);
        prop_assert_eq!(left, right);
    }

    #[test]
    fn membership_commutes_with_dropping_another_column(table in table_strategy()) {
        let subset = subset_by_membership(&table, "v", [".", "ab"]).unwrap();
        let left = drop_column(&subset, "k").unwrap();
        let dropped = drop_column(&table, "k").unwrap();
        let right = subset_by_membership(&dropped, "v", [".", "ab"]).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn sorting_preserves_value_counts(table in table_strategy()) {
        let sorted = sort_by(&table, &["v", "k"], SortOrder::Descending).unwrap();
        prop_assert_eq!(sorted.height(), table.height());
        prop_assert_eq!(value_counts(&sorted, "w").unwrap(), value_counts(&table, "w").unwrap());
    }
}

#[test]
fn keep_policy_deserializes() {
    let keep: KeepPolicy = serde_json::from_str(r#""first""#).unwrap();
    assert_eq!(keep, KeepPolicy::First);
    let keep: KeepPolicy = serde_json::from_str(r#""false""#).unwrap();
    assert_eq!(keep, KeepPolicy::None);
    let case: CaseSensitivity = serde_json::from_str(r#""insensitive""#).unwrap();
    assert_eq!(case, CaseSensitivity::Insensitive);
}
