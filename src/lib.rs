//!
//! Floatcast reduces a real number, supplied as an arbitrary-precision
//! value or as a wider binary encoding, to the bit pattern of a narrower
//! IEEE-754-style format. Every conversion reports the resulting bits,
//! whether the encoded value sits exactly on, below, or above the input,
//! and whether the input fit the target's range. Rounding is explicit,
//! and what happens beyond the target's range is chosen by policy rather
//! than hard-wired.
//!
//!### Example
//!```
//!  use floatcast::{convert_bits, BINARY32, BFLOAT16};
//!  use floatcast::{RoundingMode, OverflowPolicy, UnderflowPolicy};
//!
//!  // Reduce 1.2323f32 to bfloat16, truncating.
//!  let res = convert_bits(
//!      1.2323f32.to_bits() as u64,
//!      &BINARY32,
//!      &BFLOAT16,
//!      RoundingMode::TowardZero,
//!      OverflowPolicy::SaturateMax,
//!      UnderflowPolicy::FlushToZero,
//!  );
//!
//!  assert_eq!(res.bits, 0x3f9d);
//!```
//!
//! Arbitrary-precision inputs go through [`Real`], which carries a sign,
//! an unbiased exponent and a big-integer significand. Literals parse at
//! any working precision:
//!
//!```
//!  use floatcast::{convert_real, Real, Semantics, BINARY16};
//!  use floatcast::{RoundingMode, OverflowPolicy, UnderflowPolicy};
//!
//!  let x = Real::parse("1.2323", Semantics::arbitrary(53),
//!                      RoundingMode::NearestEven).unwrap();
//!  let res = convert_real(
//!      &x,
//!      &BINARY16,
//!      RoundingMode::TowardPositive,
//!      OverflowPolicy::SaturateMax,
//!      UnderflowPolicy::FlushToZero,
//!  );
//!
//!  assert_eq!(res.bits, 0x3cee); // one ulp above 1.2323
//!```
//!
//! The bit pattern of a result can be decomposed into its fields for
//! display:
//!
//!```
//!  use floatcast::{decompose_bits, BINARY16};
//!
//!  let fields = decompose_bits(0x3ced, &BINARY16);
//!  assert_eq!(fields.bit_string(), "0011110011101101");
//!```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod arithmetic;
mod bigint;
mod bounds;
mod convert;
mod decompose;
mod float;
mod layout;
mod policy;
mod round;
mod string;
mod utils;

pub use self::bigint::BigInt;
pub use self::convert::{convert_bits, convert_real, Conversion};
pub use self::decompose::{decompose_bits, FieldBits};
pub use self::float::{Category, Real, Semantics};
pub use self::layout::{FloatFormat, BFLOAT16, BINARY16, BINARY32, BINARY64};
pub use self::policy::{
    Accuracy, OverflowPolicy, RoundingMode, Status, UnderflowPolicy,
};
pub use self::string::ParseError;
