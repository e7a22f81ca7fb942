//! Software floating point numbers with configurable bit widths.
//!
//! A number is a sign bit, a two's complement exponent and an unsigned
//! mantissa. Unlike IEEE floats the exponent is a power of ten, and the
//! mantissa is a decimal integer scaled by a width dependent multiplier:
//!
//! ```
//! use decfloat::FP32;
//!
//! let x = FP32::from_f64(119.0).unwrap();
//! assert_eq!(x.get_exp(), 2);
//! assert_eq!(x.get_mantissa(), 119000);
//! assert_eq!(x.to_string(), "1.19e2");
//!
//! let y: FP32 = "0.5".parse().unwrap();
//! assert_eq!((x * y).to_string(), "5.95e1");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod arithmetic;
pub mod bits;
mod cast;
mod error;
mod float;
pub mod scale;
mod string;
mod utils;

#[cfg(feature = "python")]
mod py;

pub use self::bits::{Bits, Overflow};
pub use self::error::{FloatError, ParseErrorKind, Result};
pub use self::float::{check_widths, widths_are_valid, Float, FP16, FP32, FP64};
