//! Addition and subtraction of arbitrary-precision values. The conversion
//! engine itself never adds; this exists so callers can report the
//! difference between an encoded result and the original input.

use crate::bigint::{BigInt, Loss};
use crate::float::{Category, Real};
use crate::policy::RoundingMode;

impl Real {
    /// An inner function that performs the addition and subtraction of
    /// normal numbers (no NaN, Inf, Zeros).
    fn add_or_sub_normals(
        mut a: Real,
        mut b: Real,
        subtract: bool,
    ) -> (Real, Loss) {
        debug_assert_eq!(a.get_semantics(), b.get_semantics());
        let loss;
        let sem = a.get_semantics();

        // Align the input numbers on the same exponent.
        let bits = a.get_exp() - b.get_exp();

        // Can transform (a-b) to (a + -b), either way, there are cases
        // where subtraction needs to happen.
        let subtract = subtract ^ (a.get_sign() ^ b.get_sign());
        if subtract {
            // Align the inputs. The left-hand side is shifted one bit to
            // the left to allow a borrow as a result of the subtraction.
            match bits.cmp(&0) {
                core::cmp::Ordering::Equal => {
                    loss = Loss::ExactlyZero;
                }
                core::cmp::Ordering::Greater => {
                    loss = b.shift_significand_right((bits - 1) as u64);
                    a.shift_significand_left(1);
                }
                core::cmp::Ordering::Less => {
                    loss = a.shift_significand_right((-bits - 1) as u64);
                    b.shift_significand_left(1);
                }
            }

            let a_mantissa = a.get_mantissa();
            let b_mantissa = b.get_mantissa();
            let ab_mantissa;
            let mut sign = a.get_sign();

            // The bits that fell off during the alignment borrow from the
            // subtraction.
            let c = BigInt::from_u64(!loss.is_exactly_zero() as u64);

            // Subtract the smaller mantissa from the larger one so the
            // result cannot underflow.
            if a_mantissa < b_mantissa {
                ab_mantissa = b_mantissa - a_mantissa - c;
                sign = !sign;
            } else {
                ab_mantissa = a_mantissa - b_mantissa - c;
            }
            (
                Real::new(sem, sign, a.get_exp(), ab_mantissa),
                loss.invert(),
            )
        } else {
            // The easy case of addition.
            if bits > 0 {
                loss = b.shift_significand_right(bits as u64);
            } else {
                loss = a.shift_significand_right(-bits as u64);
            }
            debug_assert_eq!(a.get_exp(), b.get_exp());
            let ab_mantissa = a.get_mantissa() + b.get_mantissa();
            (Real::new(sem, a.get_sign(), a.get_exp(), ab_mantissa), loss)
        }
    }

    /// Computes a+b, rounding with `rm`.
    pub fn add_with_rm(a: &Real, b: &Real, rm: RoundingMode) -> Real {
        Self::add_sub(a.clone(), b.clone(), false, rm)
    }

    /// Computes a-b, rounding with `rm`.
    pub fn sub_with_rm(a: &Real, b: &Real, rm: RoundingMode) -> Real {
        Self::add_sub(a.clone(), b.clone(), true, rm)
    }

    fn add_sub(a: Real, b: Real, subtract: bool, rm: RoundingMode) -> Real {
        let sem = a.get_semantics();
        match (a.get_category(), b.get_category()) {
            (Category::NaN, _)
            | (Category::Normal, Category::Zero)
            | (Category::Infinity, Category::Normal)
            | (Category::Infinity, Category::Zero) => a,

            (Category::Zero, Category::NaN)
            | (Category::Normal, Category::NaN)
            | (Category::Infinity, Category::NaN) => {
                Real::nan(sem, b.get_sign())
            }

            (Category::Normal, Category::Infinity)
            | (Category::Zero, Category::Infinity) => {
                Real::inf(sem, b.get_sign() ^ subtract)
            }

            (Category::Zero, Category::Normal) => {
                if subtract {
                    b.neg()
                } else {
                    b
                }
            }

            (Category::Zero, Category::Zero) => {
                Real::zero(sem, a.get_sign() && (b.get_sign() ^ subtract))
            }

            (Category::Infinity, Category::Infinity) => {
                if a.get_sign() ^ b.get_sign() ^ subtract {
                    return Real::nan(sem, a.get_sign() ^ b.get_sign());
                }
                Real::inf(sem, a.get_sign())
            }

            (Category::Normal, Category::Normal) => {
                let b = if subtract { b.neg() } else { b };
                let (mut res, loss) =
                    Self::add_or_sub_normals(a, b, false);
                let _ = res.normalize(rm, loss);
                res
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BINARY64;
    use crate::policy::RoundingMode::NearestEven;

    fn sub_f64(a: f64, b: f64) -> f64 {
        let a = Real::from_bits(&BINARY64, a.to_bits());
        let b = Real::from_bits(&BINARY64, b.to_bits());
        let c = Real::sub_with_rm(&a, &b, NearestEven);
        let (bits, _) = c.round_to_format(&BINARY64, NearestEven);
        f64::from_bits(bits)
    }

    fn add_f64(a: f64, b: f64) -> f64 {
        let a = Real::from_bits(&BINARY64, a.to_bits());
        let b = Real::from_bits(&BINARY64, b.to_bits());
        let c = Real::add_with_rm(&a, &b, NearestEven);
        let (bits, _) = c.round_to_format(&BINARY64, NearestEven);
        f64::from_bits(bits)
    }

    #[test]
    fn test_addition() {
        assert_eq!(add_f64(0., -4.), -4.);
        assert_eq!(add_f64(-4., 0.), -4.);
        assert_eq!(add_f64(1., 1.), 2.);
        assert_eq!(add_f64(8., 4.), 12.);
        assert_eq!(add_f64(128., -8.), 120.);
        assert_eq!(add_f64(64., -60.), 4.);
        assert_eq!(add_f64(69., 69.), 138.);
        assert_eq!(add_f64(-128., -8.), -136.);
        assert_eq!(add_f64(64., -65.), -1.);
        assert_eq!(add_f64(-15., 15.), 0.);

        for i in -4..15 {
            for j in i..15 {
                assert_eq!(
                    add_f64(f64::from(j), f64::from(i)),
                    f64::from(i) + f64::from(j)
                );
            }
        }
    }

    #[test]
    fn test_subtraction() {
        assert_eq!(sub_f64(1., 1.), 0.);
        assert_eq!(sub_f64(1.5, 1.25), 0.25);
        assert_eq!(sub_f64(-4., 4.), -8.);
        assert_eq!(sub_f64(0.1, 0.1), 0.);
        assert_eq!(sub_f64(65504., 65504.), 0.);
        assert_eq!(sub_f64(1e300, 1e300), 0.);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_add_random_vals() {
        let mut lfsr = crate::utils::Lfsr::new();

        for _ in 0..5000 {
            let v0 = lfsr.get64();
            let v1 = lfsr.get64();

            let f0 = f64::from_bits(v0);
            let f1 = f64::from_bits(v1);

            let r0 = add_f64(f0, f1);
            let r1 = f0 + f1;

            assert_eq!(r0.is_finite(), r1.is_finite());
            assert_eq!(r0.is_nan(), r1.is_nan());
            assert_eq!(r0.is_infinite(), r1.is_infinite());
            // Results are bit identical, or both NaN.
            assert!(r1.is_nan() || r0.to_bits() == r1.to_bits());
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_add_special_values() {
        for v0 in crate::utils::get_special_test_values() {
            for v1 in crate::utils::get_special_test_values() {
                let r0 = add_f64(v0, v1);
                let r1 = v0 + v1;
                assert_eq!(r0.is_nan(), r1.is_nan());
                assert_eq!(r0.is_infinite(), r1.is_infinite());
                assert!(!r0.is_normal() || r0.to_bits() == r1.to_bits());
            }
        }
    }
}
