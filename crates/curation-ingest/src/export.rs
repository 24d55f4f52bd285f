//! Delimited export.

use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use curation_model::{CellValue, CurationError, Result, Table};

use crate::delimited::csv_error;
use crate::options::ExportOptions;

/// Write a table as comma-delimited UTF-8 text with every field quoted.
pub fn export(table: &Table, path: &Path) -> Result<()> {
    export_with_options(table, path, &ExportOptions::default())
}

/// Write a table as delimited UTF-8 text.
///
/// The header row is always written and every field is quoted. `Missing`
/// cells are written as `options.missing_marker`.
pub fn export_with_options(table: &Table, path: &Path, options: &ExportOptions) -> Result<()> {
    tracing::debug!(path = %path.display(), "Writing delimited file");

    let delimiter = options.delimiter_byte(path)?;
    let file = File::create(path).map_err(|err| CurationError::from_io(path, err))?;
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .delimiter(delimiter)
        .from_writer(file);

    writer
        .write_record(table.columns())
        .map_err(|err| csv_error(path, err))?;
    for row in table.rows() {
        for cell in row {
            let text = match cell {
                CellValue::Missing => Cow::Borrowed(options.missing_marker.as_str()),
                other => other.render(),
            };
            writer
                .write_field(&*text)
                .map_err(|err| csv_error(path, err))?;
        }
        writer
            .write_record(None::<&[u8]>)
            .map_err(|err| csv_error(path, err))?;
    }
    writer
        .flush()
        .map_err(|err| CurationError::from_io(path, err))?;

    tracing::info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "Exported table"
    );
    Ok(())
}
