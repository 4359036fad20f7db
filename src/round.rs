//! The rounder family. One routine per rounding mode, all sharing a single
//! decomposition of the carrier mantissa.
//!
//! The carrier holds the retained target mantissa in its high slice, the
//! half bit immediately below it, and the tail in the remaining low bits.
//! The sticky flag summarizes precision lost before the carrier was built
//! (from the exponent alignment of values subnormal in the target) and
//! participates in the tail. Each mode is then a pure function of four
//! booleans: the half bit `H`, the combined tail `T`, the retained LSB `L`,
//! and the sign `S`.
//!
//! Rounding up means adding one to the exponent‖mantissa composite, so a
//! mantissa carry ripples into the exponent field on its own. A carry out
//! of the exponent field is the caller's problem: it re-classifies the
//! result as an overflow.

use crate::layout::FloatFormat;
use crate::policy::{Accuracy, RoundingMode};
use crate::utils::mask;

/// The shared mantissa decomposition.
pub(crate) struct SplitMantissa {
    /// The high slice that becomes the target mantissa field.
    pub retained: u64,
    /// The first bit below the retained slice.
    pub half: bool,
    /// True if any bit below the half bit is set, or precision was lost
    /// during alignment.
    pub tail: bool,
    /// Parity of the retained slice, for the nearest-* tie breaks.
    pub lsb: bool,
}

/// Slice `carrier` into the retained/half/tail pieces. `extra` is the
/// number of carrier bits below the retained slice; it is at least one
/// because every conversion source is strictly wider than its target.
pub(crate) fn split_carrier(
    carrier: u64,
    extra: u32,
    sticky: bool,
) -> SplitMantissa {
    debug_assert!(extra >= 1);
    let retained = carrier >> extra;
    let half = (carrier >> (extra - 1)) & 1 == 1;
    let tail = carrier & mask(extra - 1) != 0 || sticky;
    SplitMantissa {
        retained,
        half,
        tail,
        lsb: retained & 1 == 1,
    }
}

// The eight rounding decisions: should one be added to the composite?

fn toward_zero(_m: &SplitMantissa, _sign: bool) -> bool {
    false
}

fn toward_negative(m: &SplitMantissa, sign: bool) -> bool {
    (m.half || m.tail) && sign
}

fn toward_positive(m: &SplitMantissa, sign: bool) -> bool {
    (m.half || m.tail) && !sign
}

fn half_toward_zero(m: &SplitMantissa, _sign: bool) -> bool {
    m.half && m.tail
}

fn half_toward_negative(m: &SplitMantissa, sign: bool) -> bool {
    (m.half && m.tail) || (m.half && !m.tail && sign)
}

fn half_toward_positive(m: &SplitMantissa, sign: bool) -> bool {
    (m.half && m.tail) || (m.half && !m.tail && !sign)
}

fn nearest_even(m: &SplitMantissa, _sign: bool) -> bool {
    (m.half && m.tail) || (m.half && !m.tail && m.lsb)
}

fn nearest_odd(m: &SplitMantissa, _sign: bool) -> bool {
    (m.half && m.tail) || (m.half && !m.tail && !m.lsb)
}

/// Round the carrier mantissa into a target bit pattern.
///
/// `biased_exponent` is the value the target exponent field should hold
/// before any rounding carry. The result accuracy is `Exact` only when no
/// precision at all was dropped. Overflow and underflow are never decided
/// here; a rounding carry past the maximum finite exponent leaves an
/// all-ones exponent field for the caller to detect.
pub(crate) fn apply(
    mode: RoundingMode,
    sign: bool,
    biased_exponent: u64,
    carrier: u64,
    sticky: bool,
    target: &FloatFormat,
    extra: u32,
) -> (u64, Accuracy) {
    let m = split_carrier(carrier, extra, sticky);

    let add_one = match mode {
        RoundingMode::TowardZero => toward_zero(&m, sign),
        RoundingMode::TowardNegative => toward_negative(&m, sign),
        RoundingMode::TowardPositive => toward_positive(&m, sign),
        RoundingMode::HalfTowardZero => half_toward_zero(&m, sign),
        RoundingMode::HalfTowardNegative => half_toward_negative(&m, sign),
        RoundingMode::HalfTowardPositive => half_toward_positive(&m, sign),
        RoundingMode::NearestEven => nearest_even(&m, sign),
        RoundingMode::NearestOdd => nearest_odd(&m, sign),
    };

    // The exponent field sits right above the mantissa field, so a mantissa
    // carry increments it for free.
    let mut composite =
        (biased_exponent << target.mantissa_len()) | m.retained;
    if add_one {
        composite += 1;
    }
    let bits = composite | ((sign as u64) << (target.width() - 1));

    // Rounding up a positive value, or truncating a negative one, lands
    // above the input; the other two cases land below it.
    let accuracy = if !m.half && !m.tail {
        Accuracy::Exact
    } else if add_one != sign {
        Accuracy::Above
    } else {
        Accuracy::Below
    };

    (bits, accuracy)
}
