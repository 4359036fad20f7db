//! The out-of-range handlers. Given the sign of the offending input and a
//! policy, each returns the dictated bit pattern, accuracy and status.

use crate::convert::Conversion;
use crate::layout::FloatFormat;
use crate::policy::{Accuracy, OverflowPolicy, Status, UnderflowPolicy};

/// The result of a conversion whose magnitude exceeds the target's largest
/// finite value.
pub(crate) fn saturate_overflow(
    sign: bool,
    policy: OverflowPolicy,
    target: &FloatFormat,
) -> Conversion {
    let (bits, accuracy) = match policy {
        // NaN is unordered; the reported accuracy keeps the convention of
        // the saturate-inf row.
        OverflowPolicy::MakeNan => {
            let acc = if sign { Accuracy::Below } else { Accuracy::Above };
            (target.quiet_nan(sign), acc)
        }
        // The largest finite value is smaller in magnitude than anything
        // that overflows.
        OverflowPolicy::SaturateMax => {
            let acc = if sign { Accuracy::Above } else { Accuracy::Below };
            (target.max_normal(sign), acc)
        }
        // Infinity is beyond every finite input.
        OverflowPolicy::SaturateInf => {
            let acc = if sign { Accuracy::Below } else { Accuracy::Above };
            (target.infinity(sign), acc)
        }
    };
    Conversion {
        bits,
        accuracy,
        status: Status::Overflow,
    }
}

/// The result of a conversion whose magnitude lies strictly between zero
/// and the target's smallest subnormal.
pub(crate) fn saturate_underflow(
    sign: bool,
    policy: UnderflowPolicy,
    target: &FloatFormat,
) -> Conversion {
    let (bits, accuracy) = match policy {
        // Zero underestimates the magnitude.
        UnderflowPolicy::FlushToZero => {
            let acc = if sign { Accuracy::Above } else { Accuracy::Below };
            (target.zero(sign), acc)
        }
        // The smallest subnormal overestimates it.
        UnderflowPolicy::SaturateMin => {
            let acc = if sign { Accuracy::Below } else { Accuracy::Above };
            (target.min_subnormal(sign), acc)
        }
    };
    Conversion {
        bits,
        accuracy,
        status: Status::Underflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BFLOAT16, BINARY16, BINARY32};

    #[test]
    fn test_overflow_table() {
        for fmt in [&BINARY32, &BINARY16, &BFLOAT16] {
            let rows = [
                (OverflowPolicy::MakeNan, false, fmt.quiet_nan(false), Accuracy::Above),
                (OverflowPolicy::MakeNan, true, fmt.quiet_nan(true), Accuracy::Below),
                (OverflowPolicy::SaturateMax, false, fmt.max_normal(false), Accuracy::Below),
                (OverflowPolicy::SaturateMax, true, fmt.max_normal(true), Accuracy::Above),
                (OverflowPolicy::SaturateInf, false, fmt.infinity(false), Accuracy::Above),
                (OverflowPolicy::SaturateInf, true, fmt.infinity(true), Accuracy::Below),
            ];
            for (policy, sign, bits, accuracy) in rows {
                let res = saturate_overflow(sign, policy, fmt);
                assert_eq!(res.bits, bits);
                assert_eq!(res.accuracy, accuracy);
                assert_eq!(res.status, Status::Overflow);
            }
        }
    }

    #[test]
    fn test_underflow_table() {
        for fmt in [&BINARY32, &BINARY16, &BFLOAT16] {
            let rows = [
                (UnderflowPolicy::FlushToZero, false, fmt.zero(false), Accuracy::Below),
                (UnderflowPolicy::FlushToZero, true, fmt.zero(true), Accuracy::Above),
                (UnderflowPolicy::SaturateMin, false, fmt.min_subnormal(false), Accuracy::Above),
                (UnderflowPolicy::SaturateMin, true, fmt.min_subnormal(true), Accuracy::Below),
            ];
            for (policy, sign, bits, accuracy) in rows {
                let res = saturate_underflow(sign, policy, fmt);
                assert_eq!(res.bits, bits);
                assert_eq!(res.accuracy, accuracy);
                assert_eq!(res.status, Status::Underflow);
            }
        }
    }
}
