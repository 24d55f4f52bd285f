//! Fixed 80-byte records of the transport format.
//!
//! A single-member V5 file is a sequence of records:
//! library header, real header, modified header, member header, descriptor
//! header, member data, member second, NAMESTR header, NAMESTR block,
//! OBS header, observation block. Both blocks are padded to whole records.

use chrono::NaiveDateTime;

use crate::error::{Result, XptError};

pub const RECORD_LEN: usize = 80;

/// The five marker records that introduce a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Library,
    Member,
    Descriptor,
    Namestr,
    Observations,
}

impl Section {
    /// Eight-character tag embedded in the marker record.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Library => "LIBRARY",
            Self::Member => "MEMBER",
            Self::Descriptor => "DSCRPTR",
            Self::Namestr => "NAMESTR",
            Self::Observations => "OBS",
        }
    }

    fn prefix(self) -> String {
        format!("HEADER RECORD*******{:<8}HEADER RECORD!!!!!!!", self.tag())
    }
}

/// One 80-byte record, blank-filled by default.
#[derive(Clone, PartialEq, Eq)]
pub struct Record([u8; RECORD_LEN]);

impl Default for Record {
    fn default() -> Self {
        Self([b' '; RECORD_LEN])
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Record({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl Record {
    /// Marker record: prefix, zeros through byte 77, two blanks.
    pub fn marker(section: Section) -> Self {
        let mut record = Self::default();
        record.put(0, 48, &section.prefix());
        record.0[48..78].fill(b'0');
        record
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_LEN] {
        &self.0
    }

    /// Write `value` at `offset`, truncated or blank-padded to `width`.
    pub fn put(&mut self, offset: usize, width: usize, value: &str) -> &mut Self {
        put_text(&mut self.0, offset, width, value);
        self
    }

    /// Right-aligned zero-padded number, as used by the count fields.
    pub fn put_number(&mut self, offset: usize, width: usize, value: usize) -> &mut Self {
        let digits = format!("{value:0width$}");
        self.put(offset, width, &digits)
    }

    pub fn text(&self, offset: usize, width: usize) -> String {
        get_text(&self.0, offset, width)
    }

    pub fn number(&self, offset: usize, width: usize, field: &'static str) -> Result<usize> {
        self.text(offset, width)
            .trim()
            .parse()
            .map_err(|_| XptError::BadField { field })
    }

    pub fn is_marker(&self, section: Section) -> bool {
        self.0.starts_with(section.prefix().as_bytes())
    }
}

/// Write text into a blank-initialised field.
pub fn put_text(buf: &mut [u8], offset: usize, width: usize, value: &str) {
    let field = &mut buf[offset..offset + width];
    let bytes = value.as_bytes();
    let len = bytes.len().min(width);
    field[..len].copy_from_slice(&bytes[..len]);
    field[len..].fill(b' ');
}

/// Read a field, dropping trailing blanks.
pub fn get_text(buf: &[u8], offset: usize, width: usize) -> String {
    buf.get(offset..offset + width)
        .map(|field| String::from_utf8_lossy(field).trim_end().to_string())
        .unwrap_or_default()
}

/// Bytes needed to pad `len` up to a whole number of records.
pub fn padding_for(len: usize) -> usize {
    len.next_multiple_of(RECORD_LEN) - len
}

/// Timestamp in the `ddMMMyy:hh:mm:ss` form used by header records.
pub fn sas_timestamp(datetime: NaiveDateTime) -> String {
    datetime.format("%d%b%y:%H:%M:%S").to_string().to_uppercase()
}
