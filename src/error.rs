//! Error types reported by the codec, the conversions and the arithmetic.

use thiserror::Error;

/// Describes why a string could not be parsed into a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Empty,
    InvalidDigit,
    InvalidExponent,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatError {
    /// The integer can't be stored in a field of `width` bits.
    #[error("value {value} does not fit in {width} bits")]
    OutOfRange { value: i128, width: usize },

    #[error("NaN and infinity have no representation")]
    NotFinite,

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid widths: {exponent} exponent bits, {mantissa} mantissa bits")]
    InvalidWidth { exponent: usize, mantissa: usize },

    #[error("failed to parse number: {0:?}")]
    Parse(ParseErrorKind),
}

pub type Result<T> = core::result::Result<T, FloatError>;
