//! Variable descriptors (NAMESTR entries).
//!
//! Each entry is 140 bytes (136 on VAX/VMS); only the leading 88 carry
//! fields this crate uses:
//!
//! | Bytes | Field                      |
//! |-------|----------------------------|
//! | 0-1   | type, 1 numeric 2 character |
//! | 4-5   | width in the observation   |
//! | 6-7   | variable number            |
//! | 8-15  | name                       |
//! | 16-55 | label                      |
//! | 84-87 | offset in the observation  |

use crate::error::{Result, XptError};
use crate::record::{get_text, put_text};
use crate::types::{XptColumn, XptType};

pub const NAMESTR_LEN: usize = 140;

const USED_LEN: usize = 88;

fn be_i16(bytes: &[u8], at: usize) -> i16 {
    i16::from_be_bytes([bytes[at], bytes[at + 1]])
}

/// Decode the entry for variable `index`.
pub fn decode(bytes: &[u8], index: usize) -> Result<XptColumn> {
    if bytes.len() < USED_LEN {
        return Err(XptError::bad_variable(
            index,
            format!("descriptor is only {} bytes", bytes.len()),
        ));
    }

    let code = be_i16(bytes, 0);
    let data_type = XptType::from_ntype(code)
        .ok_or_else(|| XptError::bad_variable(index, format!("unknown type code {code}")))?;
    let length = u16::try_from(be_i16(bytes, 4))
        .ok()
        .filter(|&len| len > 0)
        .ok_or_else(|| XptError::bad_variable(index, "zero or negative length"))?;
    let name = get_text(bytes, 8, 8);
    if name.is_empty() {
        return Err(XptError::bad_variable(index, "blank name"));
    }
    let label = Some(get_text(bytes, 16, 40)).filter(|label| !label.is_empty());

    Ok(XptColumn {
        name,
        label,
        data_type,
        length,
    })
}

/// Decode `count` consecutive entries of `entry_len` bytes.
pub fn decode_all(block: &[u8], count: usize, entry_len: usize) -> Result<Vec<XptColumn>> {
    (0..count)
        .map(|index| {
            let start = index.checked_mul(entry_len).ok_or(XptError::Overflow)?;
            let entry = block
                .get(start..start + entry_len)
                .ok_or_else(|| XptError::bad_variable(index, "descriptor block too short"))?;
            decode(entry, index)
        })
        .collect()
}

/// Encode one entry; `number` is 1-based, `offset` is the byte position in each observation.
pub fn encode(column: &XptColumn, number: u16, offset: u32) -> [u8; NAMESTR_LEN] {
    let mut entry = [0u8; NAMESTR_LEN];
    entry[0..2].copy_from_slice(&column.data_type.to_ntype().to_be_bytes());
    entry[4..6].copy_from_slice(&column.length.to_be_bytes());
    entry[6..8].copy_from_slice(&number.to_be_bytes());
    put_text(&mut entry, 8, 8, &column.name.to_uppercase());
    put_text(&mut entry, 16, 40, column.label.as_deref().unwrap_or(""));
    // Format and informat names stay blank.
    put_text(&mut entry, 56, 8, "");
    put_text(&mut entry, 72, 8, "");
    entry[84..88].copy_from_slice(&offset.to_be_bytes());
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_character_entries_decode() {
        let age = XptColumn::numeric("age").with_label("Age in Years");
        let parsed = decode(&encode(&age, 1, 0), 0).unwrap();
        assert_eq!(parsed.name, "AGE");
        assert_eq!(parsed.label.as_deref(), Some("Age in Years"));
        assert_eq!(parsed.data_type, XptType::Num);
        assert_eq!(parsed.length, 8);

        let id = XptColumn::character("USUBJID", 20);
        let parsed = decode(&encode(&id, 2, 8), 1).unwrap();
        assert_eq!(parsed.data_type, XptType::Char);
        assert_eq!(parsed.length, 20);
        assert_eq!(parsed.label, None);
    }

    #[test]
    fn bad_entries_are_rejected() {
        let mut entry = [0u8; NAMESTR_LEN];
        entry[1] = 5;
        assert!(matches!(decode(&entry, 0), Err(XptError::BadVariable { .. })));

        entry[1] = 1;
        assert!(decode(&entry, 0).is_err());
        assert!(decode(&entry[..40], 0).is_err());
    }

    #[test]
    fn blocks_decode_in_order() {
        let columns = [
            XptColumn::numeric("AGE"),
            XptColumn::character("SEX", 1),
            XptColumn::character("RACE", 40),
        ];
        let block: Vec<u8> = columns
            .iter()
            .zip(1u16..)
            .flat_map(|(column, number)| encode(column, number, 0))
            .collect();
        let names: Vec<String> = decode_all(&block, 3, NAMESTR_LEN)
            .unwrap()
            .into_iter()
            .map(|column| column.name)
            .collect();
        assert_eq!(names, vec!["AGE", "SEX", "RACE"]);
        assert!(decode_all(&block, 4, NAMESTR_LEN).is_err());
    }
}
