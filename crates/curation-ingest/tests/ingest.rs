//! End-to-end ingestion and export through real files.

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tempfile::TempDir;

use curation_ingest::{
    ExportOptions, IngestOptions, export, export_with_options, ingest, ingest_stat_table,
    ingest_stat_table_with_policy, row_count,
};
use curation_model::{CellValue, CurationError, IngestPolicy, Table};
use curation_xpt::{XptColumn, XptDataset, XptValue, write_xpt};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn texts(table: &Table, column: &str) -> Vec<String> {
    table
        .column(column)
        .unwrap()
        .map(ToString::to_string)
        .collect()
}

fn read(path: &Path) -> Table {
    ingest(path, &IngestOptions::default()).unwrap()
}

#[test]
fn sentinel_integrity_keeps_integers_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.csv", "code\n123\n\n456\n");
    // Blank lines are skipped; an empty quoted field is a missing value.
    let path_with_gap = write_file(&dir, "b.csv", "code\n123\n\"\"\n456\n");

    assert_eq!(texts(&read(&path), "code"), vec!["123", "456"]);
    assert_eq!(texts(&read(&path_with_gap), "code"), vec!["123", ".", "456"]);
}

#[test]
fn na_markers_are_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "na.csv", "x\nNA\n-\n7\n");

    assert_eq!(texts(&read(&path), "x"), vec![".", "-", "7"]);

    let options = IngestOptions::new().without_default_na().with_na_value("-");
    let table = ingest(&path, &options).unwrap();
    assert_eq!(texts(&table, "x"), vec!["NA", ".", "7"]);
}

#[test]
fn duplicate_headers_are_renamed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "dup.csv", "\u{feff}id,id,\n1,2,3\n");
    let table = read(&path);
    assert_eq!(table.columns(), &["id", "id.1", "Unnamed: 2"]);
}

#[test]
fn export_quotes_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(&dir, "in.csv", "id,name,score\n1,\"Smith, J\",2.50\n2,,\n");
    let out = dir.path().join("out.csv");

    export(&read(&source), &out).unwrap();

    insta::assert_snapshot!(std::fs::read_to_string(&out).unwrap(), @r#"
    "id","name","score"
    "1","Smith, J","2.5"
    "2",".","."
    "#);
}

#[test]
fn native_tables_export_missing_marker() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(&dir, "in.csv", "id,flag\n1,True\n2,\n");
    let out = dir.path().join("out.csv");
    let options = IngestOptions::new().with_policy(IngestPolicy::NativeTypes);
    let table = ingest(&source, &options).unwrap();
    assert_eq!(table.rows()[1][1], CellValue::Missing);

    export_with_options(&table, &out, &ExportOptions::new().with_missing_marker("NA")).unwrap();

    insta::assert_snapshot!(std::fs::read_to_string(&out).unwrap(), @r#"
    "id","flag"
    "1","True"
    "2","NA"
    "#);
}

#[test]
fn row_count_matches_full_ingest() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "rows.csv", "a,b\n1,x\n,y\n3\n\n4,z\n");
    assert_eq!(row_count(&path).unwrap(), read(&path).height());
    assert_eq!(row_count(&path).unwrap(), 4);
}

#[test]
fn row_limit_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "rows.csv", "a\n1\n2\n3\n");
    let table = ingest(&path, &IngestOptions::new().with_row_limit(2)).unwrap();
    assert_eq!(texts(&table, "a"), vec!["1", "2"]);
}

#[test]
fn unterminated_quote_fails_instead_of_merging_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "open.csv", "id,name\n1,\"Alice\n2,Bob\n3,Carol\n");

    let err = ingest(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(&err, CurationError::Parse { message, .. } if message.contains("line 2")));
    assert!(matches!(row_count(&path), Err(CurationError::Parse { .. })));

    let closed = write_file(&dir, "closed.csv", "id,name\n1,\"Alice\nSmith\"\n2,Bob\n");
    assert_eq!(texts(&read(&closed), "name"), vec!["Alice\nSmith", "Bob"]);
    assert_eq!(row_count(&closed).unwrap(), 2);
}

#[test]
fn sas7bdat_files_are_rejected_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "dm.sas7bdat", "not a transport file");
    let err = ingest_stat_table(&path).unwrap_err();
    assert!(matches!(&err, CurationError::Parse { message, .. } if message.contains("sas7bdat")));
}

#[test]
fn missing_files_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.csv");
    assert!(matches!(
        ingest(&absent, &IngestOptions::default()),
        Err(CurationError::FileNotFound { .. })
    ));
    assert!(matches!(row_count(&absent), Err(CurationError::FileNotFound { .. })));
    assert!(matches!(
        ingest_stat_table(&dir.path().join("absent.xpt")),
        Err(CurationError::FileNotFound { .. })
    ));
}

#[test]
fn garbage_transport_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "bad.xpt", &"x".repeat(800));
    assert!(matches!(
        ingest_stat_table(&path),
        Err(CurationError::Parse { .. })
    ));
}

#[test]
fn options_load_from_json() {
    let options: IngestOptions =
        serde_json::from_str(r#"{"row_limit": 10, "policy": "native_types"}"#).unwrap();
    assert_eq!(options.row_limit, Some(10));
    assert_eq!(options.policy, IngestPolicy::NativeTypes);
    assert_eq!(options.delimiter, ',');
    assert!(options.keep_default_na);

    let export: ExportOptions = serde_json::from_str(r#"{"delimiter": "\t"}"#).unwrap();
    assert_eq!(export.delimiter, '\t');
    assert_eq!(export.missing_marker, "");
}

#[test]
fn transport_files_ingest_with_native_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dm.xpt");
    let mut dataset = XptDataset::with_columns(
        "DM",
        vec![
            XptColumn::character("USUBJID", 10),
            XptColumn::numeric("AGE"),
            XptColumn::numeric("BMI"),
        ],
    );
    dataset.add_row(vec![
        XptValue::character("S-001"),
        XptValue::numeric(42.0),
        XptValue::numeric(22.5),
    ]);
    dataset.add_row(vec![
        XptValue::character("S-002"),
        XptValue::numeric_missing(),
        XptValue::numeric(19.0),
    ]);
    write_xpt(&path, &dataset).unwrap();

    let native = ingest_stat_table(&path).unwrap();
    assert_eq!(native.columns(), &["USUBJID", "AGE", "BMI"]);
    assert_eq!(
        native.rows()[0],
        vec![
            CellValue::text("S-001"),
            CellValue::Integer(42),
            CellValue::Float(22.5)
        ]
    );
    assert_eq!(native.rows()[1][1], CellValue::Missing);

    let strings = ingest_stat_table_with_policy(&path, IngestPolicy::StringSentinel).unwrap();
    assert_eq!(texts(&strings, "AGE"), vec!["42", "."]);
    assert_eq!(texts(&strings, "BMI"), vec!["22.5", "19.0"]);
}

fn text_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(".".to_string()),
        "x[A-Za-z ,\"]{0,8}",
        (0i64..100_000).prop_map(|n| n.to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn export_then_ingest_is_identity(
        rows in prop::collection::vec((text_cell(), text_cell()), 1..12)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.csv");
        let table = Table::from_rows(
            vec!["left".to_string(), "right".to_string()],
            rows.into_iter()
                .map(|(l, r)| vec![CellValue::Text(l), CellValue::Text(r)])
                .collect(),
        );

        export(&table, &path).unwrap();
        let read_back = ingest(&path, &IngestOptions::default()).unwrap();
        prop_assert_eq!(read_back, table);
    }
}
