//! Full curation flows over files on disk.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use datacuration::xpt::{XptColumn, XptDataset, XptValue, write_xpt};
use datacuration::{
    CaseSensitivity, CurationError, IngestOptions, KeepPolicy, SortOrder, Table, dedup,
    drop_column, export, filter_contains, filter_equals, filter_not_missing, ingest,
    ingest_stat_table, row_count, sort_by, subset_by_membership, value_counts,
};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn read(path: &Path) -> Table {
    ingest(path, &IngestOptions::default()).unwrap()
}

fn rows(table: &Table) -> Vec<Vec<String>> {
    table
        .rows()
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

#[test]
fn dedup_keep_last_on_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.csv", "id,name\n1,Alice\n2,\n1,Bob\n");

    let table = read(&path);
    assert_eq!(
        rows(&table),
        vec![vec!["1", "Alice"], vec!["2", "."], vec!["1", "Bob"]]
    );

    let deduped = dedup(&table, &["id"], KeepPolicy::Last).unwrap();
    assert_eq!(rows(&deduped), vec![vec!["2", "."], vec!["1", "Bob"]]);

    let out = dir.path().join("a_dedup.csv");
    export(&deduped, &out).unwrap();
    insta::assert_snapshot!(std::fs::read_to_string(&out).unwrap(), @r#"
    "id","name"
    "2","."
    "1","Bob"
    "#);
    assert_eq!(read(&out), deduped);
}

#[test]
fn projection_chain() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "ae.csv",
        "USUBJID,AETERM,AESEV,NOTE\n\
         S1,Headache,MILD,x\n\
         S2,headache,SEVERE,\n\
         S3,Nausea,,y\n\
         S1,Migraine Headache,MODERATE,z\n",
    );
    let table = read(&path);

    let headaches = filter_contains(&table, "AETERM", "headache", CaseSensitivity::Insensitive)
        .unwrap();
    let graded = filter_not_missing(&headaches, "AESEV").unwrap();
    let subjects = subset_by_membership(&graded, "USUBJID", ["S1"]).unwrap();
    let trimmed = drop_column(&subjects, "NOTE").unwrap();

    assert_eq!(trimmed.columns(), &["USUBJID", "AETERM", "AESEV"]);
    assert_eq!(
        rows(&trimmed),
        vec![
            vec!["S1", "Headache", "MILD"],
            vec!["S1", "Migraine Headache", "MODERATE"]
        ]
    );

    let sorted = sort_by(&trimmed, &["AESEV"], SortOrder::Descending).unwrap();
    assert_eq!(sorted.rows()[0][2].to_string(), "MODERATE");

    let severe = filter_equals(&table, "AESEV", "SEVERE").unwrap();
    assert_eq!(severe.height(), 1);
}

#[test]
fn aggregation_over_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "dm.csv", "ARM,AGE\nA,30\nB,\nA,41\n,52\n");

    assert_eq!(row_count(&path).unwrap(), 4);

    let counts = value_counts(&read(&path), "ARM").unwrap();
    let entries: Vec<(&str, usize)> = counts.iter().collect();
    assert_eq!(entries, vec![("A", 2), (".", 1), ("B", 1)]);
}

#[test]
fn column_errors_name_the_column() {
    let table = Table::from_text(&["id"], &[&["1"]]);
    let err = dedup(&table, &["missing"], KeepPolicy::First).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "column 'missing' not found");
    assert!(matches!(
        drop_column(&table, "missing"),
        Err(CurationError::ColumnNotFound { .. })
    ));
}

#[test]
fn transport_and_delimited_sources_combine() {
    let dir = tempfile::tempdir().unwrap();
    let xpt_path = dir.path().join("vs.xpt");
    let mut dataset = XptDataset::with_columns(
        "VS",
        vec![XptColumn::character("USUBJID", 8), XptColumn::numeric("PULSE")],
    );
    for (subject, pulse) in [("S1", 72.0), ("S2", 80.0), ("S1", 75.0)] {
        dataset.add_row(vec![XptValue::character(subject), XptValue::numeric(pulse)]);
    }
    write_xpt(&xpt_path, &dataset).unwrap();

    let table = ingest_stat_table(&xpt_path).unwrap();
    let last = dedup(&table, &["USUBJID"], KeepPolicy::Last).unwrap();
    assert_eq!(rows(&last), vec![vec!["S2", "80"], vec!["S1", "75"]]);

    let out = dir.path().join("vs.csv");
    export(&last, &out).unwrap();
    let reread = read(&out);
    assert_eq!(rows(&reread), rows(&last));
}
