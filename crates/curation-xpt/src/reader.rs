//! Transport file reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, XptError};
use crate::float::{ibm_to_ieee, is_missing};
use crate::namestr;
use crate::record::{RECORD_LEN, Record, Section};
use crate::types::{
    MissingValue, NumericValue, XptColumn, XptDataset, XptReaderOptions, XptType, XptValue,
};

/// Reads the first member of a V5 transport file.
pub struct XptReader<R: Read> {
    source: R,
    options: XptReaderOptions,
}

impl<R: Read> XptReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_options(source, XptReaderOptions::default())
    }

    pub fn with_options(source: R, options: XptReaderOptions) -> Self {
        Self { source, options }
    }

    /// Consume the input and decode its first dataset.
    pub fn read_dataset(mut self) -> Result<XptDataset> {
        let mut bytes = Vec::new();
        self.source.read_to_end(&mut bytes)?;
        decode_member(&bytes, &self.options)
    }
}

impl XptReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, XptReaderOptions::default())
    }

    pub fn open_with_options(path: &Path, options: XptReaderOptions) -> Result<Self> {
        match File::open(path) {
            Ok(file) => Ok(Self::with_options(file, options)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(XptError::FileNotFound {
                path: path.to_path_buf(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

/// Read the first dataset of a transport file.
pub fn read_xpt(path: &Path) -> Result<XptDataset> {
    XptReader::open(path)?.read_dataset()
}

pub fn read_xpt_with_options(path: &Path, options: XptReaderOptions) -> Result<XptDataset> {
    XptReader::open_with_options(path, options)?.read_dataset()
}

/// Forward-only position over the raw file.
struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.offset.checked_add(len).ok_or(XptError::Overflow)?;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(XptError::Truncated {
                offset: self.offset,
            })?;
        self.offset = end;
        Ok(slice)
    }

    fn record(&mut self) -> Result<Record> {
        let offset = self.offset;
        self.take(RECORD_LEN)
            .and_then(|bytes| Record::from_bytes(bytes).ok_or(XptError::Truncated { offset }))
    }

    fn marker(&mut self, section: Section) -> Result<Record> {
        let offset = self.offset;
        let record = self.record()?;
        if record.is_marker(section) {
            Ok(record)
        } else {
            Err(XptError::UnexpectedRecord {
                expected: section.tag(),
                offset,
            })
        }
    }

    fn skip_records(&mut self, count: usize) -> Result<()> {
        self.take(count * RECORD_LEN).map(|_| ())
    }

    fn align(&mut self) {
        self.offset = self.offset.next_multiple_of(RECORD_LEN);
    }

    /// Bytes up to the next member header, or to the end of the file.
    fn rest_of_member(&self) -> &'a [u8] {
        let rest = self.bytes.get(self.offset..).unwrap_or_default();
        let end = rest
            .chunks_exact(RECORD_LEN)
            .position(|chunk| {
                Record::from_bytes(chunk).is_some_and(|record| record.is_marker(Section::Member))
            })
            .map_or(rest.len(), |records| records * RECORD_LEN);
        &rest[..end]
    }
}

fn decode_member(bytes: &[u8], options: &XptReaderOptions) -> Result<XptDataset> {
    // Eight header records plus the OBS marker.
    if bytes.len() < RECORD_LEN * 9 || !bytes.len().is_multiple_of(RECORD_LEN) {
        return Err(XptError::BadLength { len: bytes.len() });
    }
    let mut cursor = Cursor { bytes, offset: 0 };

    cursor.marker(Section::Library)?;
    // Real and modified library headers carry only provenance.
    cursor.skip_records(2)?;

    let entry_len = cursor
        .marker(Section::Member)?
        .number(74, 4, "descriptor length")?;
    cursor.marker(Section::Descriptor)?;
    let name = cursor.record()?.text(8, 8);
    if name.is_empty() {
        return Err(XptError::InvalidName { name });
    }
    let label = Some(cursor.record()?.text(32, 40)).filter(|label| !label.is_empty());

    let count = cursor
        .marker(Section::Namestr)?
        .number(54, 4, "variable count")?;
    let block_len = count.checked_mul(entry_len).ok_or(XptError::Overflow)?;
    let columns = namestr::decode_all(cursor.take(block_len)?, count, entry_len)?;
    cursor.align();

    cursor.marker(Section::Observations)?;
    let rows = decode_observations(cursor.rest_of_member(), &columns, options)?;

    tracing::debug!(
        dataset = %name,
        columns = columns.len(),
        rows = rows.len(),
        "Decoded transport member"
    );
    Ok(XptDataset {
        name,
        label,
        columns,
        rows,
    })
}

fn decode_observations(
    block: &[u8],
    columns: &[XptColumn],
    options: &XptReaderOptions,
) -> Result<Vec<Vec<XptValue>>> {
    let width = columns.iter().try_fold(0usize, |sum, column| {
        sum.checked_add(usize::from(column.length))
            .ok_or(XptError::Overflow)
    })?;
    if width == 0 {
        return Ok(Vec::new());
    }

    let observations = block.chunks(width);
    let mut rows: Vec<&[u8]> = Vec::with_capacity(block.len() / width);
    for chunk in observations {
        if chunk.len() < width {
            if chunk.iter().any(|&b| b != b' ') {
                return Err(XptError::TrailingBytes);
            }
        } else {
            rows.push(chunk);
        }
    }
    // Record padding can look like whole blank observations at the end.
    while rows
        .last()
        .is_some_and(|row| row.iter().all(|&b| b == b' '))
    {
        rows.pop();
    }

    rows.into_iter()
        .enumerate()
        .map(|(row, bytes)| decode_row(bytes, row, columns, options))
        .collect()
}

fn decode_row(
    bytes: &[u8],
    row: usize,
    columns: &[XptColumn],
    options: &XptReaderOptions,
) -> Result<Vec<XptValue>> {
    let mut rest = bytes;
    columns
        .iter()
        .map(|column| {
            let (field, tail) = rest.split_at(usize::from(column.length));
            rest = tail;
            match column.data_type {
                XptType::Num => Ok(XptValue::Num(decode_number(field))),
                XptType::Char => decode_text(field, options.trim_strings)
                    .map(XptValue::Char)
                    .ok_or_else(|| XptError::NonUtf8 {
                        column: column.name.clone(),
                        row,
                    }),
            }
        })
        .collect()
}

fn decode_text(field: &[u8], trim: bool) -> Option<String> {
    let text = std::str::from_utf8(field).ok()?;
    Some(if trim { text.trim_end() } else { text }.to_string())
}

fn decode_number(field: &[u8]) -> NumericValue {
    if field.is_empty() {
        return NumericValue::Missing(MissingValue::Standard);
    }
    if let Some(missing) = is_missing(field) {
        return NumericValue::Missing(missing);
    }
    // Short numerics store the leading bytes of the 8-byte value.
    let mut full = [0u8; 8];
    let len = field.len().min(8);
    full[..len].copy_from_slice(&field[..len]);
    NumericValue::Value(ibm_to_ieee(full))
}
