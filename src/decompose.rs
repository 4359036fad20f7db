//! Splits a target bit pattern into its sign, exponent and mantissa fields
//! as ASCII bit strings. External collaborators render tables and binary
//! dumps from this without re-learning the bit layout.

extern crate alloc;

use crate::layout::FloatFormat;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter, Result};

/// The unpacked bit representation of an encoded value. Each field is a
/// sequence of ASCII `'0'`/`'1'` bytes, most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBits {
    pub sign: Vec<u8>,
    pub exponent: Vec<u8>,
    pub mantissa: Vec<u8>,
}

fn field_chars(field: u64, width: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(width as usize);
    for i in (0..width).rev() {
        out.push(if (field >> i) & 1 == 1 { b'1' } else { b'0' });
    }
    out
}

/// Decompose the bit pattern `bits` of the format `format` into its three
/// fields.
pub fn decompose_bits(bits: u64, format: &FloatFormat) -> FieldBits {
    FieldBits {
        sign: field_chars(format.sign_of(bits) as u64, 1),
        exponent: field_chars(
            format.exponent_field(bits),
            format.exponent_len(),
        ),
        mantissa: field_chars(
            format.mantissa_field(bits),
            format.mantissa_len(),
        ),
    }
}

impl FieldBits {
    /// All fields concatenated, as they appear in the encoding.
    pub fn bit_string(&self) -> String {
        let mut s = String::new();
        for field in [&self.sign, &self.exponent, &self.mantissa] {
            for &b in field.iter() {
                s.push(b as char);
            }
        }
        s
    }
}

impl Display for FieldBits {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let as_str = |v: &Vec<u8>| -> String {
            v.iter().map(|&b| b as char).collect()
        };
        write!(
            f,
            "Sign: {}, Exponent: {}, Mantissa: {}",
            as_str(&self.sign),
            as_str(&self.exponent),
            as_str(&self.mantissa)
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::layout::{BFLOAT16, BINARY16, BINARY32};
    use alloc::string::ToString;

    #[test]
    fn test_field_widths() {
        let f = decompose_bits(0x3f9dbc01, &BINARY32);
        assert_eq!(f.sign.len(), 1);
        assert_eq!(f.exponent.len(), 8);
        assert_eq!(f.mantissa.len(), 23);
    }

    #[test]
    fn test_msb_first_ordering() {
        // 1.2323 in binary32: 0 | 01111111 | 00111011011110000000001.
        let f = decompose_bits(0x3f9dbc01, &BINARY32);
        assert_eq!(f.sign, b"0");
        assert_eq!(f.exponent, b"01111111");
        assert_eq!(f.mantissa, b"00111011011110000000001");
        assert_eq!(
            f.bit_string(),
            "00111111100111011011110000000001"
        );
    }

    #[test]
    fn test_sixteen_bit_formats() {
        let f = decompose_bits(0xfc01, &BINARY16);
        assert_eq!(f.sign, b"1");
        assert_eq!(f.exponent, b"11111");
        assert_eq!(f.mantissa, b"0000000001");

        let f = decompose_bits(0x3f9d, &BFLOAT16);
        assert_eq!(f.sign, b"0");
        assert_eq!(f.exponent, b"01111111");
        assert_eq!(f.mantissa, b"0011101");
    }

    #[test]
    fn test_display() {
        let f = decompose_bits(0x8000, &BINARY16);
        assert_eq!(
            f.to_string(),
            "Sign: 1, Exponent: 00000, Mantissa: 0000000000"
        );
    }
}
