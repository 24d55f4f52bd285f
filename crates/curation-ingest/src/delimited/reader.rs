//! Delimited file reading into the canonical table.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use curation_model::{CellValue, CurationError, Result, Table};

use super::header::unique_column_names;
use crate::infer::{MissingMarkers, normalize_column};
use crate::options::IngestOptions;

/// Column count above which a table is reported as unusually wide.
const WIDE_TABLE_COLUMNS: usize = 500;

/// Map a `csv` error on `path`, keeping I/O failures distinct.
pub(crate) fn csv_error(path: &Path, err: csv::Error) -> CurationError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => CurationError::from_io(path, source),
        _ => CurationError::parse(path, message),
    }
}

/// Header plus column-major raw fields; `None` marks a field absent from a short record.
struct RawColumns {
    headers: Vec<String>,
    fields: Vec<Vec<Option<String>>>,
}

fn decode(path: &Path, record: &ByteRecord, bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| {
            let line = record.position().map_or(0, csv::Position::line);
            CurationError::parse(path, format!("invalid UTF-8 on line {line}: {err}"))
        })
}

/// Quote state while scanning raw input; the line is where the open quote sits.
#[derive(Clone, Copy)]
enum Quoting {
    FieldStart,
    Bare,
    Quoted(u64),
    QuoteSeen(u64),
}

/// Line of a quoted field that is still open at end of input.
///
/// The `csv` tokenizer ends such a field at EOF without complaint, swallowing
/// every later record into it.
fn unclosed_quote(bytes: &[u8], delimiter: u8) -> Option<u64> {
    let mut line = 1;
    let mut state = Quoting::FieldStart;
    for &byte in bytes {
        state = match (state, byte) {
            (Quoting::Quoted(opened), b'"') => Quoting::QuoteSeen(opened),
            (Quoting::Quoted(opened), _) | (Quoting::QuoteSeen(opened), b'"') => {
                Quoting::Quoted(opened)
            }
            (_, b'\n' | b'\r') => Quoting::FieldStart,
            (_, byte) if byte == delimiter => Quoting::FieldStart,
            (Quoting::FieldStart, b'"') => Quoting::Quoted(line),
            _ => Quoting::Bare,
        };
        if byte == b'\n' {
            line += 1;
        }
    }
    match state {
        Quoting::Quoted(opened) => Some(opened),
        _ => None,
    }
}

fn read_raw(path: &Path, options: &IngestOptions) -> Result<RawColumns> {
    let delimiter = options.delimiter_byte(path)?;
    let bytes = std::fs::read(path).map_err(|err| CurationError::from_io(path, err))?;
    if let Some(line) = unclosed_quote(&bytes, delimiter) {
        return Err(CurationError::parse(
            path,
            format!("quoted field opened on line {line} is never closed"),
        ));
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes.as_slice());

    let mut records = reader.byte_records();
    let header = match records.next() {
        Some(record) => record.map_err(|err| csv_error(path, err))?,
        None => return Err(CurationError::parse(path, "no header row")),
    };
    let raw_headers = header
        .iter()
        .map(|bytes| decode(path, &header, bytes))
        .collect::<Result<Vec<_>>>()?;
    let headers = unique_column_names(raw_headers);
    let width = if options.first_column_only {
        1
    } else {
        headers.len()
    };

    let mut fields: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let limit = options.row_limit.unwrap_or(usize::MAX);
    for record in records.take(limit) {
        let record = record.map_err(|err| csv_error(path, err))?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, csv::Position::line);
            return Err(CurationError::parse(
                path,
                format!(
                    "line {line} has {} fields, header has {}",
                    record.len(),
                    headers.len()
                ),
            ));
        }
        for (idx, column) in fields.iter_mut().enumerate() {
            let value = record
                .get(idx)
                .map(|bytes| decode(path, &record, bytes))
                .transpose()?;
            column.push(value);
        }
    }

    let headers = if options.first_column_only {
        headers.into_iter().take(1).collect()
    } else {
        headers
    };
    Ok(RawColumns { headers, fields })
}

fn assemble(headers: Vec<String>, columns: Vec<Vec<CellValue>>) -> Table {
    let height = columns.first().map_or(0, Vec::len);
    let mut iters: Vec<_> = columns.into_iter().map(Vec::into_iter).collect();
    let rows = (0..height)
        .map(|_| {
            iters
                .iter_mut()
                .map(|column| column.next().unwrap_or(CellValue::Missing))
                .collect()
        })
        .collect();
    Table::from_rows(headers, rows)
}

/// Read a delimited file into a table.
///
/// Every column is typed over its present values first; values are then
/// cast and stored according to `options.policy`. In first-column mode the
/// single column keeps its raw text and fields absent from short records
/// read as empty strings.
pub fn ingest(path: &Path, options: &IngestOptions) -> Result<Table> {
    tracing::debug!(
        path = %path.display(),
        row_limit = ?options.row_limit,
        first_column_only = options.first_column_only,
        "Reading delimited file"
    );

    let RawColumns { headers, fields } = read_raw(path, options)?;

    let table = if options.first_column_only {
        let columns = fields
            .into_iter()
            .map(|column| {
                column
                    .into_iter()
                    .map(|value| CellValue::Text(value.unwrap_or_default()))
                    .collect()
            })
            .collect();
        assemble(headers, columns)
    } else {
        let markers = MissingMarkers::new(options.missing_markers());
        let columns = fields
            .into_iter()
            .zip(&headers)
            .map(|(raw, name)| {
                let (native, cells) = normalize_column(raw, &markers, options.policy);
                tracing::trace!(column = %name, native = %native, "Inferred column type");
                cells
            })
            .collect();
        assemble(headers, columns)
    };

    if table.width() > WIDE_TABLE_COLUMNS {
        tracing::warn!(
            path = %path.display(),
            columns = table.width(),
            "Table has more than 500 columns"
        );
    }
    tracing::info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "Ingested delimited file"
    );
    Ok(table)
}

/// Count data rows of a comma-delimited file.
pub fn row_count(path: &Path) -> Result<usize> {
    row_count_with_options(path, ',')
}

/// Count data rows, parsing only the first column.
pub fn row_count_with_options(path: &Path, delimiter: char) -> Result<usize> {
    let options = IngestOptions::new()
        .first_column_only()
        .with_delimiter(delimiter);
    let count = ingest(path, &options)?.height();
    tracing::debug!(path = %path.display(), rows = count, "Counted rows");
    Ok(count)
}
