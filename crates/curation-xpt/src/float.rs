//! IBM mainframe ↔ IEEE 754 double conversion.
//!
//! XPT stores numbers as IBM hexadecimal floating point: one sign bit, a
//! 7-bit base-16 exponent biased by 64, and a 56-bit fraction.

use crate::types::MissingValue;

const IBM_EXPONENT_BIAS: i32 = 64;
const IBM_MAX_EXPONENT: i32 = 127;
const FRACTION_MASK: u64 = 0x00ff_ffff_ffff_ffff;

/// Convert an IEEE double to its 8-byte IBM representation.
///
/// Magnitudes beyond the IBM range saturate to the largest representable
/// value; magnitudes below it become zero.
#[must_use]
pub fn ieee_to_ibm(value: f64) -> [u8; 8] {
    if value == 0.0 || !value.is_finite() {
        return [0u8; 8];
    }

    let bits = value.to_bits();
    let sign = ((bits >> 63) as u8) << 7;
    let biased = ((bits >> 52) & 0x7ff) as i32;
    if biased == 0 {
        return [0u8; 8];
    }
    let mantissa = (bits & 0x000f_ffff_ffff_ffff) | 0x0010_0000_0000_0000;

    // value = mantissa * 2^(biased - 1075) = fraction * 2^(4 * (exp - 64) - 56)
    let shift = (biased - 763).rem_euclid(4);
    let exponent = (biased - 763 - shift) / 4;
    if exponent < 0 {
        return [0u8; 8];
    }
    if exponent > IBM_MAX_EXPONENT {
        let mut out = [0xffu8; 8];
        out[0] = sign | 0x7f;
        return out;
    }

    let fraction = (mantissa << shift) & FRACTION_MASK;
    let fraction_bytes = fraction.to_be_bytes();
    let mut out = [0u8; 8];
    out[0] = sign | exponent as u8;
    out[1..].copy_from_slice(&fraction_bytes[1..]);
    out
}

/// Convert an 8-byte IBM value to an IEEE double.
#[must_use]
pub fn ibm_to_ieee(bytes: [u8; 8]) -> f64 {
    let negative = bytes[0] & 0x80 != 0;
    let exponent = i32::from(bytes[0] & 0x7f);
    let mut fraction_bytes = [0u8; 8];
    fraction_bytes[1..].copy_from_slice(&bytes[1..]);
    let fraction = u64::from_be_bytes(fraction_bytes);
    if fraction == 0 {
        return 0.0;
    }

    // 2^-56 == 16^-14
    let magnitude = fraction as f64 * 16f64.powi(exponent - IBM_EXPONENT_BIAS - 14);
    if negative { -magnitude } else { magnitude }
}

/// Detect a SAS missing value encoding.
///
/// Missing values are a single marker byte (`.`, `_`, or `A`-`Z`) followed
/// by zero bytes.
#[must_use]
pub fn is_missing(bytes: &[u8]) -> Option<MissingValue> {
    let (&first, rest) = bytes.split_first()?;
    if rest.iter().any(|&b| b != 0) {
        return None;
    }
    MissingValue::from_byte(first)
}

/// Encode a missing value as 8 bytes.
#[must_use]
pub fn encode_missing(missing: MissingValue) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[0] = missing.to_byte();
    out
}

/// Keep the leading `length` bytes of an encoded number (3 to 8).
#[must_use]
pub fn truncate_ibm(bytes: [u8; 8], length: usize) -> Vec<u8> {
    bytes[..length.clamp(1, 8)].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one() {
        assert_eq!(ieee_to_ibm(1.0), [0x41, 0x10, 0, 0, 0, 0, 0, 0]);
        assert!((ibm_to_ieee([0x41, 0x10, 0, 0, 0, 0, 0, 0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_and_fraction() {
        // -118.625 is the canonical IBM example: C2 76 A0 00 ...
        assert_eq!(ieee_to_ibm(-118.625), [0xc2, 0x76, 0xa0, 0, 0, 0, 0, 0]);
        assert_eq!(ibm_to_ieee([0xc2, 0x76, 0xa0, 0, 0, 0, 0, 0]), -118.625);
    }

    #[test]
    fn test_zero() {
        assert_eq!(ieee_to_ibm(0.0), [0u8; 8]);
        assert_eq!(ibm_to_ieee([0u8; 8]), 0.0);
    }

    #[test]
    fn test_roundtrip_integers() {
        for value in [2.0, 12.0, 35.0, 84.0, 123.0, 456.0, 1_000_000.0, -7.0] {
            assert_eq!(ibm_to_ieee(ieee_to_ibm(value)), value);
        }
    }

    #[test]
    fn test_missing_detection() {
        assert_eq!(is_missing(&[0x2e, 0, 0, 0, 0, 0, 0, 0]), Some(MissingValue::Standard));
        assert_eq!(is_missing(&[b'_', 0, 0, 0, 0, 0, 0, 0]), Some(MissingValue::Underscore));
        assert_eq!(is_missing(&[b'Z', 0, 0, 0, 0, 0, 0, 0]), Some(MissingValue::Special('Z')));
        assert_eq!(is_missing(&ieee_to_ibm(1.0)), None);
        assert_eq!(encode_missing(MissingValue::Standard)[0], b'.');
    }
}
