//! SAS Transport ingestion.

use std::path::Path;

use curation_model::{CellValue, CurationError, IngestPolicy, NativeType, Result, Table};
use curation_xpt::{XptColumn, XptDataset, XptError, XptType, XptValue, read_xpt};

use crate::infer::integral_f64;

/// Map an XPT error on `path` into the shared error type.
fn xpt_error(path: &Path, err: XptError) -> CurationError {
    match err {
        XptError::FileNotFound { path } => CurationError::FileNotFound { path },
        XptError::Io(source) => CurationError::from_io(path, source),
        other => CurationError::parse(path, other.to_string()),
    }
}

/// Read the first member of a SAS Transport file with native types.
pub fn ingest_stat_table(path: &Path) -> Result<Table> {
    ingest_stat_table_with_policy(path, IngestPolicy::NativeTypes)
}

/// Read the first member of a SAS Transport file.
///
/// Numeric variables become `Integer` when every present value is whole,
/// `Float` otherwise. SAS missing codes become `Missing`. Native SAS
/// datasets (`.sas7bdat`) are refused up front.
pub fn ingest_stat_table_with_policy(path: &Path, policy: IngestPolicy) -> Result<Table> {
    tracing::debug!(path = %path.display(), ?policy, "Reading SAS transport file");

    let extension = path.extension().and_then(|ext| ext.to_str());
    if extension.is_some_and(|ext| ext.eq_ignore_ascii_case("sas7bdat")) {
        return Err(CurationError::parse(
            path,
            "sas7bdat datasets are not supported; convert to SAS Transport (.xpt)",
        ));
    }

    let dataset = read_xpt(path).map_err(|err| xpt_error(path, err))?;
    let table = dataset_to_table(dataset, policy);

    tracing::info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "Ingested SAS transport file"
    );
    Ok(table)
}

fn numeric_type(dataset: &XptDataset, idx: usize) -> NativeType {
    let all_integral = dataset.rows.iter().all(|row| match row.get(idx) {
        Some(XptValue::Num(num)) => num.value().is_none_or(|v| integral_f64(v).is_some()),
        _ => true,
    });
    if all_integral {
        NativeType::Integer
    } else {
        NativeType::Float
    }
}

fn convert(value: XptValue, native: NativeType, policy: IngestPolicy) -> CellValue {
    match value {
        XptValue::Char(text) => {
            let text = text.trim_end().to_string();
            if text.is_empty() && policy == IngestPolicy::StringSentinel {
                CellValue::Missing
            } else {
                CellValue::Text(text)
            }
        }
        XptValue::Num(num) => match num.value() {
            None => CellValue::Missing,
            Some(v) if native == NativeType::Integer => {
                integral_f64(v).map_or(CellValue::Float(v), CellValue::Integer)
            }
            Some(v) => CellValue::Float(v),
        },
    }
}

fn dataset_to_table(dataset: XptDataset, policy: IngestPolicy) -> Table {
    let types: Vec<NativeType> = dataset
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| match column.data_type {
            XptType::Num => numeric_type(&dataset, idx),
            XptType::Char => NativeType::Text,
        })
        .collect();
    for (column, native) in dataset.columns.iter().zip(&types) {
        tracing::trace!(column = %column.name, native = %native, "Inferred variable type");
    }

    let columns = dataset
        .columns
        .iter()
        .map(|XptColumn { name, .. }| name.clone())
        .collect();
    let rows = dataset
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&types)
                .map(|(value, native)| policy.apply(convert(value, *native, policy)))
                .collect()
        })
        .collect();
    Table::from_rows(columns, rows)
}
