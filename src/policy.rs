//! The policy enums that parameterize a conversion: the rounding mode, the
//! out-of-range policies, and the two indicators every conversion reports.

use core::fmt::{Display, Formatter, Result};

/// Defines the supported rounding modes.
///
/// The four `toward-*`/`half-toward-*` pairs are directed; the `nearest-*`
/// modes break ties on the parity of the retained mantissa LSB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    TowardZero,
    TowardNegative,
    TowardPositive,
    HalfTowardZero,
    HalfTowardNegative,
    HalfTowardPositive,
    NearestEven,
    NearestOdd,
}

impl RoundingMode {
    /// All modes, in declaration order. Tests iterate this.
    pub const ALL: [RoundingMode; 8] = [
        RoundingMode::TowardZero,
        RoundingMode::TowardNegative,
        RoundingMode::TowardPositive,
        RoundingMode::HalfTowardZero,
        RoundingMode::HalfTowardNegative,
        RoundingMode::HalfTowardPositive,
        RoundingMode::NearestEven,
        RoundingMode::NearestOdd,
    ];
}

impl Display for RoundingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let name = match self {
            RoundingMode::TowardZero => "toward-zero",
            RoundingMode::TowardNegative => "toward-negative-inf",
            RoundingMode::TowardPositive => "toward-positive-inf",
            RoundingMode::HalfTowardZero => "half-toward-zero",
            RoundingMode::HalfTowardNegative => "half-toward-negative-inf",
            RoundingMode::HalfTowardPositive => "half-toward-positive-inf",
            RoundingMode::NearestEven => "nearest-even",
            RoundingMode::NearestOdd => "nearest-odd",
        };
        write!(f, "{}", name)
    }
}

/// What a conversion produces when the rounded result exceeds the target's
/// largest finite magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Encode the canonical NaN, keeping the sign.
    MakeNan,
    /// Saturate at the largest finite value, keeping the sign.
    SaturateMax,
    /// Saturate at infinity, keeping the sign.
    SaturateInf,
}

impl OverflowPolicy {
    pub const ALL: [OverflowPolicy; 3] = [
        OverflowPolicy::MakeNan,
        OverflowPolicy::SaturateMax,
        OverflowPolicy::SaturateInf,
    ];
}

impl Display for OverflowPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let name = match self {
            OverflowPolicy::MakeNan => "make-NaN",
            OverflowPolicy::SaturateMax => "saturate-max",
            OverflowPolicy::SaturateInf => "saturate-inf",
        };
        write!(f, "{}", name)
    }
}

/// What a conversion produces when the input magnitude is strictly between
/// zero and the target's smallest subnormal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderflowPolicy {
    /// Saturate at the smallest subnormal, keeping the sign.
    SaturateMin,
    /// Flush to zero, keeping the sign.
    FlushToZero,
}

impl UnderflowPolicy {
    pub const ALL: [UnderflowPolicy; 2] =
        [UnderflowPolicy::SaturateMin, UnderflowPolicy::FlushToZero];
}

impl Display for UnderflowPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let name = match self {
            UnderflowPolicy::SaturateMin => "saturate-min",
            UnderflowPolicy::FlushToZero => "flush-to-zero",
        };
        write!(f, "{}", name)
    }
}

/// Relates the encoded output value to the exact input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    /// The encoded value equals the input.
    Exact,
    /// The encoded value is strictly less than the input.
    Below,
    /// The encoded value is strictly greater than the input.
    Above,
}

impl Accuracy {
    /// The accuracy of the same conversion applied to the negated input.
    pub fn flip(&self) -> Accuracy {
        match self {
            Accuracy::Exact => Accuracy::Exact,
            Accuracy::Below => Accuracy::Above,
            Accuracy::Above => Accuracy::Below,
        }
    }
}

impl Display for Accuracy {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let name = match self {
            Accuracy::Exact => "exact",
            Accuracy::Below => "below",
            Accuracy::Above => "above",
        };
        write!(f, "{}", name)
    }
}

/// Whether the input fit the target's range, and if not, which bound it
/// crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Fits,
    Overflow,
    Underflow,
    /// Reserved for formats that lack an encoding for some special value.
    /// Never produced by the formats supported here.
    NoEncoding,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let name = match self {
            Status::Fits => "fits",
            Status::Overflow => "overflow",
            Status::Underflow => "underflow",
            Status::NoEncoding => "no-encoding",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_stringified_names() {
        assert_eq!(RoundingMode::TowardZero.to_string(), "toward-zero");
        assert_eq!(
            RoundingMode::HalfTowardNegative.to_string(),
            "half-toward-negative-inf"
        );
        assert_eq!(RoundingMode::NearestOdd.to_string(), "nearest-odd");
        assert_eq!(OverflowPolicy::MakeNan.to_string(), "make-NaN");
        assert_eq!(UnderflowPolicy::FlushToZero.to_string(), "flush-to-zero");
        assert_eq!(Accuracy::Above.to_string(), "above");
        assert_eq!(Status::NoEncoding.to_string(), "no-encoding");
    }

    #[test]
    fn test_accuracy_flip() {
        assert_eq!(Accuracy::Exact.flip(), Accuracy::Exact);
        assert_eq!(Accuracy::Below.flip(), Accuracy::Above);
        assert_eq!(Accuracy::Above.flip(), Accuracy::Below);
    }
}
