//! Literal parsing and decimal printing for arbitrary-precision values.
//! The conversion core never touches text; these exist for the callers
//! that do, and they reuse the same normalize machinery so a parsed
//! literal rounds exactly once.

extern crate alloc;

use crate::bigint::{BigInt, Loss};
use crate::float::{Category, Real, Semantics};
use crate::policy::RoundingMode;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Display;

/// A malformed literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The literal was empty, or reduced to nothing after the sign.
    Empty,
    /// The literal contained an unexpected character or no digits where
    /// some were required.
    InvalidDigit,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty literal"),
            ParseError::InvalidDigit => write!(f, "malformed literal"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Decimal exponents beyond this bound are pinned to it. The value is no
/// longer represented exactly, but everything past the bound is many
/// orders of magnitude outside every supported format, and the direction
/// of the error is preserved, so conversions are unaffected.
const DECIMAL_EXP_LIMIT: i64 = 80_000;

/// Parse a decimal exponent with saturation instead of overflow.
fn parse_exponent(s: &str) -> Result<i64, ParseError> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'+') => (false, &s[1..]),
        Some(b'-') => (true, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() {
        return Err(ParseError::InvalidDigit);
    }
    let mut value: i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return Err(ParseError::InvalidDigit);
        }
        value = value
            .saturating_mul(10)
            .saturating_add((b - b'0') as i64);
    }
    Ok(if negative { -value } else { value })
}

impl Real {
    /// Parse a decimal (`-12.5e-3`) or hexadecimal (`0x1.8p3`) floating
    /// point literal into a value with the semantics `sem`, rounding the
    /// digits that do not fit with `rm`. The words `inf`, `infinity` and
    /// `nan` are accepted in any case, with an optional sign.
    pub fn parse(
        literal: &str,
        sem: Semantics,
        rm: RoundingMode,
    ) -> Result<Real, ParseError> {
        let literal = literal.trim();
        if literal.is_empty() {
            return Err(ParseError::Empty);
        }

        let (sign, rest) = match literal.as_bytes()[0] {
            b'+' => (false, &literal[1..]),
            b'-' => (true, &literal[1..]),
            _ => (false, literal),
        };
        if rest.is_empty() {
            return Err(ParseError::Empty);
        }

        let lower = rest.to_lowercase();
        if lower == "inf" || lower == "infinity" {
            return Ok(Real::inf(sem, sign));
        }
        if lower == "nan" {
            return Ok(Real::nan(sem, sign));
        }

        if lower.starts_with("0x") {
            Self::parse_hex(&lower[2..], sign, sem, rm)
        } else {
            Self::parse_decimal(rest, sign, sem, rm)
        }
    }

    fn parse_decimal(
        body: &str,
        sign: bool,
        sem: Semantics,
        rm: RoundingMode,
    ) -> Result<Real, ParseError> {
        // Split off the decimal exponent.
        let (digits_part, exp_part) = match body.find(['e', 'E']) {
            Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };
        let explicit_exp = match exp_part {
            Some(s) => parse_exponent(s)?,
            None => 0,
        };

        // Accumulate the digits into an integer, remembering how many sat
        // behind the decimal point.
        let mut mantissa = BigInt::zero();
        let mut frac_digits: i64 = 0;
        let mut seen_dot = false;
        let mut seen_digit = false;
        let ten = BigInt::from_u64(10);
        for b in digits_part.bytes() {
            match b {
                b'.' if !seen_dot => seen_dot = true,
                b'0'..=b'9' => {
                    seen_digit = true;
                    mantissa.inplace_mul(&ten);
                    mantissa.inplace_add(&BigInt::from_u64((b - b'0') as u64));
                    if seen_dot {
                        frac_digits += 1;
                    }
                }
                _ => return Err(ParseError::InvalidDigit),
            }
        }
        if !seen_digit {
            return Err(ParseError::InvalidDigit);
        }
        if mantissa.is_zero() {
            return Ok(Real::zero(sem, sign));
        }

        let exp10 = (explicit_exp - frac_digits)
            .clamp(-DECIMAL_EXP_LIMIT, DECIMAL_EXP_LIMIT);

        if exp10 >= 0 {
            // value = mantissa * 10^exp10 = (mantissa * 5^exp10) * 2^exp10.
            let five_e = BigInt::from_u64(5).powi(exp10 as u64);
            mantissa.inplace_mul(&five_e);
            let exp = exp10 + sem.mantissa_len() as i64;
            let mut value = Real::new(sem, sign, exp, mantissa);
            let _ = value.normalize(rm, Loss::ExactlyZero);
            Ok(value)
        } else {
            // value = mantissa / 10^-exp10. Scale the dividend up until the
            // quotient carries more bits than the precision, divide, and
            // classify the remainder for the rounding step.
            let divisor = BigInt::from_u64(5).powi((-exp10) as u64);
            let wanted = sem.precision() as i64 + 2 + divisor.msb_index() as i64
                - mantissa.msb_index() as i64;
            let scale = wanted.max(0) as u64;
            mantissa.shift_left(scale as usize);
            let remainder = mantissa.inplace_div(&divisor);

            let loss = if remainder.is_zero() {
                Loss::ExactlyZero
            } else {
                let mut doubled = remainder;
                doubled.shift_left(1);
                match doubled.cmp(&divisor) {
                    Ordering::Less => Loss::LessThanHalf,
                    Ordering::Equal => Loss::ExactlyHalf,
                    Ordering::Greater => Loss::MoreThanHalf,
                }
            };

            let exp = exp10 - scale as i64 + sem.mantissa_len() as i64;
            let mut value =
                Real::raw(sem, sign, exp, mantissa, Category::Normal);
            let _ = value.normalize(rm, loss);
            Ok(value)
        }
    }

    fn parse_hex(
        body: &str,
        sign: bool,
        sem: Semantics,
        rm: RoundingMode,
    ) -> Result<Real, ParseError> {
        let (digits_part, exp_part) = match body.find('p') {
            Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };
        let explicit_exp = match exp_part {
            Some(s) => parse_exponent(s)?,
            None => 0,
        };

        let mut mantissa = BigInt::zero();
        let mut frac_digits: i64 = 0;
        let mut seen_dot = false;
        let mut seen_digit = false;
        for b in digits_part.bytes() {
            let nibble = match b {
                b'.' if !seen_dot => {
                    seen_dot = true;
                    continue;
                }
                b'0'..=b'9' => (b - b'0') as u64,
                b'a'..=b'f' => (b - b'a' + 10) as u64,
                _ => return Err(ParseError::InvalidDigit),
            };
            seen_digit = true;
            mantissa.shift_left(4);
            mantissa.inplace_add(&BigInt::from_u64(nibble));
            if seen_dot {
                frac_digits += 1;
            }
        }
        if !seen_digit {
            return Err(ParseError::InvalidDigit);
        }
        if mantissa.is_zero() {
            return Ok(Real::zero(sem, sign));
        }

        // Hex literals are exact binary values: mantissa * 2^exp2.
        let exp2 = explicit_exp
            .clamp(-4 * DECIMAL_EXP_LIMIT, 4 * DECIMAL_EXP_LIMIT)
            - 4 * frac_digits;
        let exp = exp2 + sem.mantissa_len() as i64;
        let mut value = Real::new(sem, sign, exp, mantissa);
        let _ = value.normalize(rm, Loss::ExactlyZero);
        Ok(value)
    }

    /// Convert the value into a large integer and a base-10 exponent, so
    /// that the value equals `integer * 10^-exp`.
    fn convert_to_integer(&self) -> (BigInt, i64) {
        let mut exp = self.get_exp() - self.get_semantics().mantissa_len() as i64;
        let mut mantissa = self.get_mantissa();

        match exp.cmp(&0) {
            Ordering::Less => {
                // mmmm * 2^-e == (mmmm * 5^e) * 10^-e.
                let e5 = BigInt::from_u64(5).powi((-exp) as u64);
                mantissa.inplace_mul(&e5);
                exp = -exp;
            }
            Ordering::Equal | Ordering::Greater => {
                // Already an integer, just align it.
                mantissa.shift_left(exp as usize);
                exp = 0;
            }
        }

        (mantissa, exp)
    }

    /// Trim decimal digits that carry more precision than the value
    /// actually holds. Only digits behind the decimal point are removed.
    fn reduce_printed_integer_length(
        &self,
        integer: &mut BigInt,
        exp: &mut i64,
    ) {
        let mantissa_len = self.get_semantics().mantissa_len() as usize;
        let bits = integer.msb_index();
        if bits <= mantissa_len {
            return;
        }
        let needed_bits = bits - mantissa_len;
        // Convert from bits to base-10 digits: log(2)/log(10) ==> 59/196.
        let mut digits_to_remove = ((needed_bits * 59) / 196) as i64;

        if digits_to_remove > *exp {
            digits_to_remove = *exp;
        }
        *exp -= digits_to_remove;
        let ten = BigInt::from_u64(10);
        let divisor = ten.powi(digits_to_remove as u64);
        integer.inplace_div(&divisor);
    }

    fn convert_normal_to_string(&self) -> String {
        let (mut integer, mut exp) = self.convert_to_integer();
        self.reduce_printed_integer_length(&mut integer, &mut exp);

        let mut buff: Vec<char> = integer
            .to_decimal_digits()
            .iter()
            .map(|&d| (b'0' + d) as char)
            .collect();
        if buff == ['0'] {
            buff.clear();
        }

        debug_assert!(exp >= 0);
        while (buff.len() as i64) < exp {
            buff.insert(0, '0');
        }

        buff.insert(buff.len() - exp as usize, '.');
        while !buff.is_empty() && buff[buff.len() - 1] == '0' {
            buff.pop();
        }
        String::from_iter(buff)
    }
}

/// Prints the value in plain decimal notation. This keeps the round-trip
/// simple and does not attempt scientific notation or shortest-form
/// digits.
impl Display for Real {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.get_sign() { "-" } else { "" };
        let body: String = match self.get_category() {
            Category::Infinity => "Inf".to_string(),
            Category::NaN => "NaN".to_string(),
            Category::Zero => "0.0".to_string(),
            Category::Normal => self.convert_normal_to_string(),
        };
        write!(f, "{}{}", sign, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BINARY32, BINARY64};

    const F64_SEM: Semantics = Semantics::new(11, 53);

    fn parse_f64(s: &str) -> f64 {
        let v = Real::parse(s, F64_SEM, RoundingMode::NearestEven).unwrap();
        let (bits, _) = v.round_to_format(&BINARY64, RoundingMode::NearestEven);
        f64::from_bits(bits)
    }

    #[test]
    fn test_parse_simple_decimals() {
        assert_eq!(parse_f64("0"), 0.0);
        assert_eq!(parse_f64("1"), 1.0);
        assert_eq!(parse_f64("-1"), -1.0);
        assert_eq!(parse_f64("4.5"), 4.5);
        assert_eq!(parse_f64("1.2323"), 1.2323);
        assert_eq!(parse_f64("-0.1"), -0.1);
        assert_eq!(parse_f64("256."), 256.0);
        assert_eq!(parse_f64(".5"), 0.5);
        assert_eq!(parse_f64("1995.1995"), 1995.1995);
    }

    #[test]
    fn test_parse_exponents() {
        assert_eq!(parse_f64("1e3"), 1000.0);
        assert_eq!(parse_f64("2.5e-3"), 0.0025);
        assert_eq!(parse_f64("3.4028235e38"), 3.4028235e38);
        assert_eq!(parse_f64("1e-46"), 1e-46);
        assert_eq!(parse_f64("5e-324"), 5e-324);
        assert_eq!(parse_f64("1E+2"), 100.0);
    }

    #[test]
    fn test_parse_signed_zero_keeps_sign() {
        let v = Real::parse("-0.0", F64_SEM, RoundingMode::NearestEven).unwrap();
        assert!(v.is_zero());
        assert!(v.get_sign());
    }

    #[test]
    fn test_parse_out_of_range() {
        // Beyond every binary format, but the sign of the error survives.
        assert_eq!(parse_f64("1e400"), f64::INFINITY);
        assert_eq!(parse_f64("-1e400"), f64::NEG_INFINITY);
        assert_eq!(parse_f64("1e-400"), 0.0);

        // Saturated decimal exponents keep the direction. In the wide
        // working shape the value stays normal, so the range decision is
        // left to the conversion target.
        let v =
            Real::parse("1e-90000", Semantics::arbitrary(53), RoundingMode::TowardZero)
                .unwrap();
        assert!(v.is_normal());
        let (bits, acc) = v.round_to_format(&BINARY32, RoundingMode::TowardZero);
        assert_eq!(bits, BINARY32.zero(false));
        assert_eq!(acc, crate::policy::Accuracy::Below);
    }

    #[test]
    fn test_parse_specials() {
        assert_eq!(parse_f64("inf"), f64::INFINITY);
        assert_eq!(parse_f64("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_f64("nan").is_nan());
        assert!(parse_f64("-NaN").is_nan());
    }

    #[test]
    fn test_parse_hexfloat() {
        assert_eq!(parse_f64("0x1p0"), 1.0);
        assert_eq!(parse_f64("0x1.8p3"), 12.0);
        assert_eq!(parse_f64("-0x1.8p-1"), -0.75);
        assert_eq!(parse_f64("0xa.bp0"), 10.6875);
        assert_eq!(parse_f64("0x1.fffffep127"), f32::MAX as f64);
        assert_eq!(parse_f64("0x10"), 16.0);
    }

    #[test]
    fn test_parse_errors() {
        let parse = |s| Real::parse(s, F64_SEM, RoundingMode::NearestEven);
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("-"), Err(ParseError::Empty));
        assert_eq!(parse("abc"), Err(ParseError::InvalidDigit));
        assert_eq!(parse("1.2.3"), Err(ParseError::InvalidDigit));
        assert_eq!(parse("1e"), Err(ParseError::InvalidDigit));
        assert_eq!(parse("0x"), Err(ParseError::InvalidDigit));
        assert_eq!(parse("."), Err(ParseError::InvalidDigit));
    }

    #[test]
    fn test_parse_respects_rounding_mode() {
        // 1.2323 does not fit 24 bits of significand; the direction of the
        // parse rounding must follow the mode.
        let sem = BINARY32.semantics();
        let down = Real::parse("1.2323", sem, RoundingMode::TowardZero).unwrap();
        let up =
            Real::parse("1.2323", sem, RoundingMode::TowardPositive).unwrap();
        let (down_bits, _) = down.round_to_format(&BINARY32, RoundingMode::TowardZero);
        let (up_bits, _) = up.round_to_format(&BINARY32, RoundingMode::TowardZero);
        assert_eq!(down_bits, 0x3f9dbc01);
        assert_eq!(up_bits, 0x3f9dbc02);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_display_decimal() {
        use alloc::format;

        let print = |v: f64| -> String {
            format!("{}", Real::from_bits(&BINARY64, v.to_bits()))
        };
        assert_eq!(print(0.0), "0.0");
        assert_eq!(print(-0.0), "-0.0");
        assert_eq!(print(4.5), "4.5");
        assert_eq!(print(256.0), "256.");
        assert_eq!(print(f64::INFINITY), "Inf");
        assert_eq!(print(f64::NEG_INFINITY), "-Inf");
        assert_eq!(print(f64::NAN), "NaN");
        assert_eq!(print(0.1), ".1");
        assert_eq!(print(-10.0), "-10.");
    }

    #[test]
    fn test_parse_print_roundtrip() {
        // Values that are exact in binary survive a print-parse loop.
        for v in [0.5f64, 2.0, 1.375, -256.0, 0.0625, 123456.0] {
            let r = Real::from_bits(&BINARY64, v.to_bits());
            let s = r.to_string();
            assert_eq!(parse_f64(&s), v, "{} printed as {}", v, s);
        }
    }
}
