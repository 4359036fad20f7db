//! The range classifier and the two conversion entry points: one from a
//! wider fixed-width binary encoding, one from an arbitrary-precision real.

use crate::bounds::{saturate_overflow, saturate_underflow};
use crate::float::Real;
use crate::layout::{FloatFormat, BINARY32, BINARY64};
use crate::policy::{
    Accuracy, OverflowPolicy, RoundingMode, Status, UnderflowPolicy,
};
use crate::round;
use crate::utils::mask;

/// The result triple every conversion produces: the target bit pattern,
/// where the encoded value landed relative to the input, and whether the
/// input fit the target's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub bits: u64,
    pub accuracy: Accuracy,
    pub status: Status,
}

impl Conversion {
    fn fits(bits: u64, accuracy: Accuracy) -> Conversion {
        Conversion {
            bits,
            accuracy,
            status: Status::Fits,
        }
    }
}

/// Convert the bit pattern `bits` of the wider binary format `source` into
/// the narrower format `target`.
///
/// The source must be strictly wider in the mantissa and at least as wide
/// in the exponent; anything else is a caller bug. Infinities, NaNs and
/// zeros map to their canonical target patterns. Finite values are
/// classified against the target's range: beyond the largest finite
/// magnitude the overflow policy answers, strictly below the smallest
/// subnormal the underflow policy answers, and everything in between is
/// rounded with `rm`.
pub fn convert_bits(
    bits: u64,
    source: &FloatFormat,
    target: &FloatFormat,
    rm: RoundingMode,
    op: OverflowPolicy,
    up: UnderflowPolicy,
) -> Conversion {
    debug_assert!(source.mantissa_len() > target.mantissa_len());
    debug_assert!(source.exponent_len() >= target.exponent_len());

    let sign = source.sign_of(bits);
    let exp_field = source.exponent_field(bits);
    let mant_field = source.mantissa_field(bits);

    // Infinities and NaNs convert to their counterparts exactly; every NaN
    // becomes the canonical NaN with the source sign.
    if exp_field == source.exponent_all_ones() {
        if mant_field == 0 {
            return Conversion::fits(target.infinity(sign), Accuracy::Exact);
        }
        return Conversion::fits(target.quiet_nan(sign), Accuracy::Exact);
    }

    // Signed zeros convert exactly.
    if exp_field == 0 && mant_field == 0 {
        return Conversion::fits(target.zero(sign), Accuracy::Exact);
    }

    // The number of carrier bits below the target's mantissa slice.
    let extra = source.mantissa_len() - target.mantissa_len();
    let source_subnormal = exp_field == 0;
    let unbiased = if source_subnormal {
        source.min_exp()
    } else {
        exp_field as i64 - source.bias()
    };

    // Beyond the largest finite target value. The boundary case sits at the
    // maximum exponent with every retained bit set and some precision left
    // over: past max-normal but not yet at the next exponent.
    if unbiased > target.max_exp()
        || (unbiased == target.max_exp()
            && mant_field >> extra == mask(target.mantissa_len())
            && mant_field & mask(extra) != 0)
    {
        return saturate_overflow(sign, op, target);
    }

    let mut carrier = mant_field;
    let mut sticky = false;
    let biased_target: u64;

    if unbiased < target.min_exp() {
        // Subnormal in the target. Restore the leading integer bit (unless
        // the source itself was subnormal), then shift the carrier until
        // the exponents align, collecting everything that falls off into
        // the sticky bit.
        if !source_subnormal {
            carrier |= 1u64 << source.mantissa_len();
        }
        let shift = (target.min_exp() - unbiased) as u32;
        if shift >= 64 {
            sticky = carrier != 0;
            carrier = 0;
        } else {
            sticky = carrier & mask(shift) != 0;
            carrier >>= shift;
        }
        biased_target = 0;

        // All the remaining precision is below the target's mantissa: the
        // magnitude is smaller than the smallest subnormal.
        if carrier >> extra == 0 && (carrier & mask(extra) != 0 || sticky) {
            return saturate_underflow(sign, up, target);
        }
    } else if source_subnormal {
        // The source is subnormal but the exponent ranges coincide
        // (binary32 to bfloat16): the carrier is already aligned, with no
        // leading bit and a zero exponent field.
        biased_target = 0;
        if carrier >> extra == 0 && carrier & mask(extra) != 0 {
            return saturate_underflow(sign, up, target);
        }
    } else {
        biased_target = (unbiased + target.bias()) as u64;
    }

    let (out, accuracy) =
        round::apply(rm, sign, biased_target, carrier, sticky, target, extra);

    // A rounding carry past the maximum finite exponent leaves an all-ones
    // exponent field. The pre-round test already rejects everything beyond
    // max-normal for the supported formats, but the policy still owns the
    // answer if it ever fires. Rounding past the largest finite value
    // always lands away from zero.
    if target.exponent_field(out) == target.exponent_all_ones() {
        let mut res = saturate_overflow(sign, op, target);
        res.accuracy = if sign { Accuracy::Below } else { Accuracy::Above };
        return res;
    }

    Conversion::fits(out, accuracy)
}

/// The wider binary format a real value is reduced through on its way to
/// `target`.
fn intermediate_format(target: &FloatFormat) -> &'static FloatFormat {
    if target.mantissa_len() >= BINARY32.mantissa_len() {
        &BINARY64
    } else {
        &BINARY32
    }
}

/// Convert the arbitrary-precision value `input` into the format `target`.
///
/// The value is first reduced to the target's wider intermediate format by
/// truncation toward zero, then handed to [`convert_bits`]. A reduction
/// helper may legitimately land on ±infinity or ±zero for inputs beyond
/// the intermediate range; those results are substituted with the
/// intermediate's extreme finite patterns so that the downstream
/// classifier attributes the overflow or underflow to the original input
/// rather than to the reduction.
pub fn convert_real(
    input: &Real,
    target: &FloatFormat,
    rm: RoundingMode,
    op: OverflowPolicy,
    up: UnderflowPolicy,
) -> Conversion {
    let inter = intermediate_format(target);
    let (bits, accuracy) =
        input.round_to_format(inter, RoundingMode::TowardZero);

    let reduced = if bits == inter.infinity(false) && accuracy == Accuracy::Above
    {
        // Beyond the largest intermediate value: the downstream overflow
        // test fires on the max-normal pattern.
        inter.max_normal(false)
    } else if bits == inter.infinity(true) && accuracy == Accuracy::Below {
        inter.max_normal(true)
    } else if bits == inter.zero(false) && accuracy == Accuracy::Below {
        // Strictly between zero and the smallest intermediate subnormal:
        // the downstream underflow test fires on the min-subnormal pattern.
        inter.min_subnormal(false)
    } else if bits == inter.zero(true) && accuracy == Accuracy::Above {
        inter.min_subnormal(true)
    } else if input.is_normal()
        && ((!input.get_sign() && accuracy == Accuracy::Above)
            || (input.get_sign() && accuracy == Accuracy::Below))
    {
        // The helper rounded away from zero; one ulp down restores
        // truncation.
        bits - 1
    } else {
        bits
    };

    convert_bits(reduced, inter, target, rm, op, up)
}
