//! The arbitrary-precision real value that conversions consume, and the
//! machinery that reduces it to a fixed-width binary encoding.

extern crate alloc;

use crate::bigint::{BigInt, Loss};
use crate::layout::FloatFormat;
use crate::policy::{Accuracy, RoundingMode};
use crate::utils::mask;
use core::cmp::Ordering;

/// The working shape of a value: how many bits define the exponent range
/// and how many bits of significand are carried (mantissa plus the leading
/// integer bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantics {
    exponent: u32,
    precision: u32,
}

/// The exponent width used for values that do not belong to a concrete
/// binary format. Wide enough that every literal the parser accepts stays
/// a normal value in the working shape, so range decisions are always made
/// against the conversion target, never against the working semantics.
const WIDE_EXPONENT: u32 = 27;

impl Semantics {
    pub const fn new(exponent: u32, precision: u32) -> Self {
        Semantics {
            exponent,
            precision,
        }
    }

    /// Working semantics for an arbitrary value with `precision` bits of
    /// significand.
    pub const fn arbitrary(precision: u32) -> Self {
        Semantics::new(WIDE_EXPONENT, precision)
    }

    /// Returns the precision in bits.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the length of the mantissa in bits (precision - 1).
    pub fn mantissa_len(&self) -> u32 {
        self.precision - 1
    }

    pub fn exponent_len(&self) -> u32 {
        self.exponent
    }

    /// Returns the exponent bias, as a positive number.
    pub(crate) fn bias(&self) -> i64 {
        ((1u64 << (self.exponent - 1)) - 1) as i64
    }

    /// Returns the lower and upper bounds of the unbiased exponent.
    pub(crate) fn exp_bounds(&self) -> (i64, i64) {
        let exp_min = -self.bias() + 1;
        // The all-ones exponent field is reserved for Inf and NaN.
        let exp_max = (1i64 << self.exponent) - self.bias() - 2;
        (exp_min, exp_max)
    }
}

/// The category of the value. Conversions branch on this before they ever
/// look at the significand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Infinity,
    NaN,
    Normal,
    Zero,
}

/// An arbitrary-precision binary floating-point value.
///
/// The significand includes the leading integer bit and is kept aligned so
/// that its most significant bit sits at the precision index; the value is
/// `mantissa * 2^(exp - (precision - 1))`. This is the input type of
/// [`convert_real`](crate::convert_real) and carries exactly the
/// information the range classifier needs: sign, unbiased exponent,
/// significand, and category.
#[derive(Debug, Clone)]
pub struct Real {
    sem: Semantics,
    sign: bool,
    exp: i64,
    mantissa: BigInt,
    category: Category,
}

impl Real {
    /// Create a new normal value. A zero mantissa collapses to a signed
    /// zero.
    pub fn new(sem: Semantics, sign: bool, exp: i64, mantissa: BigInt) -> Self {
        if mantissa.is_zero() {
            return Real::zero(sem, sign);
        }
        Real {
            sem,
            sign,
            exp,
            mantissa,
            category: Category::Normal,
        }
    }

    pub(crate) fn raw(
        sem: Semantics,
        sign: bool,
        exp: i64,
        mantissa: BigInt,
        category: Category,
    ) -> Self {
        Real {
            sem,
            sign,
            exp,
            mantissa,
            category,
        }
    }

    pub fn zero(sem: Semantics, sign: bool) -> Self {
        Real {
            sem,
            sign,
            exp: 0,
            mantissa: BigInt::zero(),
            category: Category::Zero,
        }
    }

    pub fn inf(sem: Semantics, sign: bool) -> Self {
        Real {
            sem,
            sign,
            exp: 0,
            mantissa: BigInt::zero(),
            category: Category::Infinity,
        }
    }

    pub fn nan(sem: Semantics, sign: bool) -> Self {
        Real {
            sem,
            sign,
            exp: 0,
            mantissa: BigInt::zero(),
            category: Category::NaN,
        }
    }

    pub fn is_inf(&self) -> bool {
        matches!(self.category, Category::Infinity)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.category, Category::NaN)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.category, Category::Zero)
    }

    /// Returns true if this value is neither Zero, NaN nor Inf.
    pub fn is_normal(&self) -> bool {
        matches!(self.category, Category::Normal)
    }

    /// Returns the sign of the value. True means negative.
    pub fn get_sign(&self) -> bool {
        self.sign
    }

    pub fn get_exp(&self) -> i64 {
        self.exp
    }

    pub fn get_mantissa(&self) -> BigInt {
        self.mantissa.clone()
    }

    pub fn get_category(&self) -> Category {
        self.category
    }

    pub fn get_semantics(&self) -> Semantics {
        self.sem
    }

    /// Returns a new value with a flipped sign.
    pub fn neg(&self) -> Self {
        Self::raw(
            self.sem,
            !self.sign,
            self.exp,
            self.mantissa.clone(),
            self.category,
        )
    }

    pub(crate) fn shift_significand_left(&mut self, amt: u64) {
        self.exp -= amt as i64;
        self.mantissa.shift_left(amt as usize);
    }

    pub(crate) fn shift_significand_right(&mut self, amt: u64) -> Loss {
        self.exp += amt as i64;
        let loss = self.mantissa.loss_below(amt as usize);
        self.mantissa.shift_right(amt as usize);
        loss
    }

    /// Returns true if rounding must move the value away from zero
    /// (increment the significand).
    pub(crate) fn round_away_from_zero(
        &self,
        rm: RoundingMode,
        loss: Loss,
    ) -> bool {
        debug_assert!(self.is_normal() || self.is_zero());
        match rm {
            RoundingMode::TowardZero => false,
            RoundingMode::TowardNegative => self.sign,
            RoundingMode::TowardPositive => !self.sign,
            RoundingMode::HalfTowardZero => loss.is_mt_half(),
            RoundingMode::HalfTowardNegative => {
                loss.is_mt_half() || (loss.is_exactly_half() && self.sign)
            }
            RoundingMode::HalfTowardPositive => {
                loss.is_mt_half() || (loss.is_exactly_half() && !self.sign)
            }
            RoundingMode::NearestEven => {
                loss.is_mt_half()
                    || (loss.is_exactly_half() && self.mantissa.is_odd())
            }
            RoundingMode::NearestOdd => {
                loss.is_mt_half()
                    || (loss.is_exactly_half() && self.mantissa.is_even())
            }
        }
    }

    /// The value left the exponent range during normalization. Saturate
    /// according to the rounding mode and report where the result landed
    /// relative to the input.
    fn overflow(&mut self, rm: RoundingMode) -> Accuracy {
        let bounds = self.sem.exp_bounds();
        let inf = Self::inf(self.sem, self.sign);
        let max = Self::new(
            self.sem,
            self.sign,
            bounds.1,
            BigInt::all1s(self.sem.precision() as usize),
        );

        let to_inf = match rm {
            RoundingMode::TowardZero => false,
            RoundingMode::TowardPositive => !self.sign,
            RoundingMode::TowardNegative => self.sign,
            RoundingMode::HalfTowardZero
            | RoundingMode::HalfTowardNegative
            | RoundingMode::HalfTowardPositive
            | RoundingMode::NearestEven
            | RoundingMode::NearestOdd => true,
        };

        *self = if to_inf { inf } else { max };
        match (to_inf, self.sign) {
            (true, false) => Accuracy::Above,
            (true, true) => Accuracy::Below,
            (false, false) => Accuracy::Below,
            (false, true) => Accuracy::Above,
        }
    }

    /// Normalize the value: align the significand to the precision, clamp
    /// the exponent to the legal range, and round away the bits that do not
    /// fit, folding `loss` (precision already gone below bit zero) into the
    /// decision. Returns where the normalized value landed relative to the
    /// exact one.
    pub(crate) fn normalize(&mut self, rm: RoundingMode, loss: Loss) -> Accuracy {
        if !self.is_normal() {
            return Accuracy::Exact;
        }
        let mut loss = loss;
        let bounds = self.sem.exp_bounds();
        let nmsb = self.mantissa.msb_index() as i64;

        // Step I - adjust the exponent.
        if nmsb > 0 {
            // Align the number so that the MSB bit will be at the precision
            // index.
            let mut exp_change = nmsb - self.sem.precision() as i64;

            if self.exp + exp_change > bounds.1 {
                return self.overflow(rm);
            }

            // Don't go below the legal exponent range: values this small
            // become subnormal in the working shape.
            if self.exp + exp_change < bounds.0 {
                exp_change = bounds.0 - self.exp;
            }

            if exp_change < 0 {
                debug_assert!(loss.is_exactly_zero(), "losing information");
                self.shift_significand_left(-exp_change as u64);
                return Accuracy::Exact;
            }

            if exp_change > 0 {
                let lost = self.shift_significand_right(exp_change as u64);
                loss = Loss::combine(lost, loss);
            }
        }

        // Step II - round.
        if loss.is_exactly_zero() {
            if self.mantissa.is_zero() {
                *self = Self::zero(self.sem, self.sign);
            }
            return Accuracy::Exact;
        }

        if self.round_away_from_zero(rm, loss) {
            if self.mantissa.is_zero() {
                // Everything was shifted out; rounding away from zero
                // produces the smallest subnormal.
                self.exp = bounds.0;
            }
            self.mantissa.inplace_add(&BigInt::one());

            // Did the significand overflow the precision?
            if self.mantissa.msb_index() > self.sem.precision() as usize {
                if self.exp < bounds.1 {
                    let _ = self.shift_significand_right(1);
                } else {
                    *self = Self::inf(self.sem, self.sign);
                }
            }
            if self.sign {
                Accuracy::Below
            } else {
                Accuracy::Above
            }
        } else {
            if self.mantissa.is_zero() {
                *self = Self::zero(self.sem, self.sign);
            }
            if self.sign {
                Accuracy::Above
            } else {
                Accuracy::Below
            }
        }
    }

    /// Re-reference the value to different semantics without rounding. The
    /// exponent moves by the difference in mantissa lengths so the value is
    /// unchanged.
    fn recast(&self, sem: Semantics) -> Real {
        let exp_delta =
            self.sem.mantissa_len() as i64 - sem.mantissa_len() as i64;
        Real::raw(
            sem,
            self.sign,
            self.exp - exp_delta,
            self.mantissa.clone(),
            self.category,
        )
    }

    /// Convert the value to the semantics `sem`, rounding with `rm`.
    pub fn cast(&self, sem: Semantics, rm: RoundingMode) -> Real {
        let mut x = self.recast(sem);
        let _ = x.normalize(rm, Loss::ExactlyZero);
        x
    }

    /// Reduce this value to the bit pattern of the binary format `fmt`,
    /// rounding with `rm`. Returns the encoding and where it landed
    /// relative to this value. Out-of-range magnitudes saturate the way
    /// `rm` dictates (toward-zero pins at the largest finite value, the
    /// nearest modes go to infinity), so a truncating reduction never
    /// rounds past infinity.
    pub(crate) fn round_to_format(
        &self,
        fmt: &FloatFormat,
        rm: RoundingMode,
    ) -> (u64, Accuracy) {
        let mut x = self.recast(fmt.semantics());
        let accuracy = x.normalize(rm, Loss::ExactlyZero);
        (x.encode(fmt), accuracy)
    }

    /// Encode a normalized value in the bit layout of `fmt`. The value
    /// must already carry the format's semantics.
    pub(crate) fn encode(&self, fmt: &FloatFormat) -> u64 {
        debug_assert_eq!(self.sem, fmt.semantics());
        match self.category {
            Category::Infinity => fmt.infinity(self.sign),
            Category::NaN => fmt.quiet_nan(self.sign),
            Category::Zero => fmt.zero(self.sign),
            Category::Normal => {
                let mut exp_field = (self.exp + fmt.bias()) as u64;
                debug_assert!(exp_field > 0);
                let m = self.mantissa.as_u64();
                // A significand without the leading integer bit at the
                // minimum exponent is a subnormal; its exponent field is
                // zero.
                if exp_field == 1 && (m >> fmt.mantissa_len()) == 0 {
                    exp_field = 0;
                }
                fmt.pack(self.sign, exp_field, m & mask(fmt.mantissa_len()))
            }
        }
    }

    /// Decode the bit pattern `bits` of the binary format `fmt`.
    pub fn from_bits(fmt: &FloatFormat, bits: u64) -> Real {
        let sem = fmt.semantics();
        let sign = fmt.sign_of(bits);
        let biased = fmt.exponent_field(bits);
        let mut mantissa = fmt.mantissa_field(bits);

        if biased == fmt.exponent_all_ones() {
            if mantissa == 0 {
                return Real::inf(sem, sign);
            }
            return Real::nan(sem, sign);
        }
        if biased == 0 && mantissa == 0 {
            return Real::zero(sem, sign);
        }

        let mut exp = biased as i64 - fmt.bias();
        if biased != 0 {
            // Make the implicit leading bit explicit.
            mantissa |= 1u64 << fmt.mantissa_len();
        } else {
            // Subnormal: no leading bit, and the exponent is pinned to the
            // minimum.
            exp += 1;
        }

        Real::new(sem, sign, exp, BigInt::from_u64(mantissa))
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        let bitwise = self.sign == other.sign
            && self.exp == other.exp
            && self.mantissa == other.mantissa
            && self.category == other.category;

        match self.category {
            Category::Infinity | Category::Normal => bitwise,
            Category::Zero => other.is_zero(),
            Category::NaN => false,
        }
    }
}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        debug_assert_eq!(self.get_semantics(), other.get_semantics());
        let bool_to_ord = |is_less: bool| -> Option<Ordering> {
            if is_less {
                Some(Ordering::Less)
            } else {
                Some(Ordering::Greater)
            }
        };

        match (self.category, other.category) {
            (Category::NaN, _) | (_, Category::NaN) => None,
            (Category::Zero, Category::Zero) => Some(Ordering::Equal),
            (Category::Infinity, Category::Infinity) => {
                if self.sign == other.sign {
                    Some(Ordering::Equal)
                } else {
                    bool_to_ord(self.sign)
                }
            }
            (Category::Infinity, Category::Normal)
            | (Category::Infinity, Category::Zero)
            | (Category::Normal, Category::Zero) => bool_to_ord(self.sign),

            (Category::Normal, Category::Infinity)
            | (Category::Zero, Category::Infinity)
            | (Category::Zero, Category::Normal) => bool_to_ord(!other.sign),

            (Category::Normal, Category::Normal) => {
                if self.sign != other.sign {
                    bool_to_ord(self.sign)
                } else if self.exp < other.exp {
                    bool_to_ord(!other.sign)
                } else if self.exp > other.exp {
                    bool_to_ord(self.sign)
                } else if self.sign {
                    Some(other.mantissa.cmp(&self.mantissa))
                } else {
                    Some(self.mantissa.cmp(&other.mantissa))
                }
            }
        }
    }
}
