//! Transport file writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::float::{encode_missing, ieee_to_ibm, truncate_ibm};
use crate::namestr::{self, NAMESTR_LEN};
use crate::record::{Record, Section, padding_for};
use crate::types::{NumericValue, XptColumn, XptDataset, XptType, XptValue, XptWriterOptions};

/// Writes one dataset as a single-member V5 transport file.
pub struct XptWriter<W: Write> {
    sink: BufWriter<W>,
    options: XptWriterOptions,
}

impl<W: Write> XptWriter<W> {
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, XptWriterOptions::default())
    }

    pub fn with_options(sink: W, options: XptWriterOptions) -> Self {
        Self {
            sink: BufWriter::new(sink),
            options,
        }
    }

    /// Validate `dataset`, then write headers, descriptors and observations.
    pub fn write_dataset(mut self, dataset: &XptDataset) -> Result<()> {
        dataset.validate()?;

        for record in prelude(dataset, &self.options) {
            self.sink.write_all(record.as_bytes())?;
        }
        self.sink.write_all(&padded(descriptor_block(&dataset.columns)))?;
        self.sink.write_all(Record::marker(Section::Observations).as_bytes())?;
        self.sink
            .write_all(&padded(observation_block(dataset, &self.options)))?;
        self.sink.flush()?;

        tracing::debug!(
            dataset = %dataset.name,
            columns = dataset.columns.len(),
            rows = dataset.num_rows(),
            "Wrote transport member"
        );
        Ok(())
    }
}

impl XptWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        Self::create_with_options(path, XptWriterOptions::default())
    }

    pub fn create_with_options(path: &Path, options: XptWriterOptions) -> Result<Self> {
        Ok(Self::with_options(File::create(path)?, options))
    }
}

/// Write `dataset` to `path` with default options.
pub fn write_xpt(path: &Path, dataset: &XptDataset) -> Result<()> {
    XptWriter::create(path)?.write_dataset(dataset)
}

pub fn write_xpt_with_options(
    path: &Path,
    dataset: &XptDataset,
    options: &XptWriterOptions,
) -> Result<()> {
    XptWriter::create_with_options(path, options.clone())?.write_dataset(dataset)
}

/// The eight fixed records ahead of the descriptor block.
fn prelude(dataset: &XptDataset, options: &XptWriterOptions) -> [Record; 8] {
    let (created, modified) = options.timestamps();

    let mut real = Record::default();
    real.put(0, 8, "SAS")
        .put(8, 8, "SAS")
        .put(16, 8, "SASLIB")
        .put(24, 8, &options.sas_version)
        .put(32, 8, &options.os_name)
        .put(64, 16, &created);

    let mut modified_header = Record::default();
    modified_header.put(0, 16, &modified);

    let mut member = Record::marker(Section::Member);
    member.put(64, 4, "0160").put_number(74, 4, NAMESTR_LEN);

    let mut data = Record::default();
    data.put(0, 8, "SAS")
        .put(8, 8, &dataset.name.trim().to_uppercase())
        .put(16, 8, "SASDATA")
        .put(24, 8, &options.sas_version)
        .put(32, 8, &options.os_name)
        .put(64, 16, &created);

    let mut second = Record::default();
    second
        .put(0, 16, &modified)
        .put(32, 40, dataset.label.as_deref().unwrap_or(""));

    let mut descriptors = Record::marker(Section::Namestr);
    descriptors.put_number(54, 4, dataset.columns.len());

    [
        Record::marker(Section::Library),
        real,
        modified_header,
        member,
        Record::marker(Section::Descriptor),
        data,
        second,
        descriptors,
    ]
}

fn descriptor_block(columns: &[XptColumn]) -> Vec<u8> {
    let mut block = Vec::with_capacity(columns.len() * NAMESTR_LEN);
    let mut offset = 0u32;
    for (column, number) in columns.iter().zip(1u16..) {
        block.extend_from_slice(&namestr::encode(column, number, offset));
        offset = offset.saturating_add(u32::from(column.length));
    }
    block
}

fn observation_block(dataset: &XptDataset, options: &XptWriterOptions) -> Vec<u8> {
    let mut block = Vec::with_capacity(dataset.observation_length() * dataset.num_rows());
    for row in &dataset.rows {
        for (value, column) in row.iter().zip(&dataset.columns) {
            encode_field(&mut block, value, column, options);
        }
    }
    block
}

fn padded(mut block: Vec<u8>) -> Vec<u8> {
    let fill = padding_for(block.len());
    block.resize(block.len() + fill, b' ');
    block
}

/// Append one value, coercing it to the column's storage type.
fn encode_field(
    out: &mut Vec<u8>,
    value: &XptValue,
    column: &XptColumn,
    options: &XptWriterOptions,
) {
    let width = usize::from(column.length);
    match (column.data_type, value) {
        (XptType::Char, XptValue::Char(text)) => push_text(out, text, width),
        (XptType::Char, XptValue::Num(number)) => {
            let text = number.value().map(|v| v.to_string()).unwrap_or_default();
            push_text(out, &text, width);
        }
        (XptType::Num, XptValue::Num(number)) => push_number(out, number, width, options),
        (XptType::Num, XptValue::Char(text)) => {
            let number = match text.trim().parse::<f64>() {
                Ok(parsed) => NumericValue::Value(parsed),
                Err(_) => NumericValue::Missing(options.default_missing),
            };
            push_number(out, &number, width, options);
        }
    }
}

/// Text cut at a character boundary, then blank-filled to `width`.
fn push_text(out: &mut Vec<u8>, text: &str, width: usize) {
    let cut = (0..=text.len().min(width))
        .rev()
        .find(|&at| text.is_char_boundary(at))
        .unwrap_or(0);
    out.extend_from_slice(&text.as_bytes()[..cut]);
    out.resize(out.len() + (width - cut), b' ');
}

fn push_number(
    out: &mut Vec<u8>,
    number: &NumericValue,
    width: usize,
    options: &XptWriterOptions,
) {
    let bytes = match *number {
        NumericValue::Value(v) if v.is_finite() => ieee_to_ibm(v),
        NumericValue::Value(_) => encode_missing(options.default_missing),
        NumericValue::Missing(code) => encode_missing(code),
    };
    out.extend_from_slice(&truncate_ibm(bytes, width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MissingValue;

    fn text(value: &str, width: usize) -> Vec<u8> {
        let mut out = Vec::new();
        push_text(&mut out, value, width);
        out
    }

    #[test]
    fn text_is_padded_and_cut_on_boundaries() {
        assert_eq!(text("hello", 8), b"hello   ");
        assert_eq!(text("verylongstring", 5), b"veryl");
        assert_eq!(text("aé", 2), b"a ");
    }

    #[test]
    fn non_finite_numbers_use_default_missing() {
        let options = XptWriterOptions {
            default_missing: MissingValue::Special('Z'),
            ..XptWriterOptions::default()
        };
        let mut out = Vec::new();
        push_number(&mut out, &NumericValue::Value(f64::INFINITY), 8, &options);
        push_number(&mut out, &NumericValue::Missing(MissingValue::Standard), 8, &options);
        assert_eq!(out[0], b'Z');
        assert_eq!(out[8], b'.');
        assert!(out[9..].iter().all(|&b| b == 0));
    }

    #[test]
    fn text_values_in_numeric_columns_are_parsed() {
        let options = XptWriterOptions::default();
        let column = XptColumn::numeric("AGE");
        let mut out = Vec::new();
        encode_field(&mut out, &XptValue::character(" 1 "), &column, &options);
        encode_field(&mut out, &XptValue::character("n/a"), &column, &options);
        assert_eq!(&out[..8], &ieee_to_ibm(1.0));
        assert_eq!(out[8], b'.');
    }

    #[test]
    fn layout_is_whole_records() {
        let mut dataset = XptDataset::with_columns(
            "dm",
            vec![XptColumn::character("ID", 3), XptColumn::numeric("AGE")],
        )
        .with_label("Demographics");
        dataset.add_row(vec![XptValue::character("001"), XptValue::numeric(35.0)]);

        let mut buffer = Vec::new();
        XptWriter::new(&mut buffer).write_dataset(&dataset).unwrap();
        // 8 prelude records, 4 NAMESTR records, OBS marker, 1 observation record.
        assert_eq!(buffer.len(), 14 * 80);
        assert_eq!(&buffer[5 * 80 + 8..5 * 80 + 16], b"DM      ");
        assert_eq!(&buffer[6 * 80 + 32..6 * 80 + 44], b"Demographics");
        assert_eq!(&buffer[7 * 80 + 54..7 * 80 + 58], b"0002");
        assert_eq!(&buffer[13 * 80..13 * 80 + 3], b"001");
    }

    #[test]
    fn invalid_datasets_write_nothing() {
        let mut buffer = Vec::new();
        let result = XptWriter::new(&mut buffer).write_dataset(&XptDataset::new("TOOLONGNAME"));
        assert!(result.is_err());
        assert!(buffer.is_empty());
    }
}
