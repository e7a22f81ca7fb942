use super::bits::{self, Bits, Overflow};
use super::error::{FloatError, Result};
use super::scale;

/// Returns true if a float with `exponent` exponent bits and `mantissa`
/// mantissa bits can be constructed.
pub const fn widths_are_valid(exponent: usize, mantissa: usize) -> bool {
    exponent >= 2
        && exponent <= 127
        && mantissa >= 4
        && mantissa <= 64
        && 1 + exponent + mantissa <= 128
}

/// Verify that the widths describe a legal float layout: a sign bit, at least
/// 2 exponent bits, between 4 and 64 mantissa bits, and at most 128 bits in
/// total.
pub const fn check_widths(exponent: usize, mantissa: usize) -> Result<()> {
    if widths_are_valid(exponent, mantissa) {
        return Ok(());
    }
    Err(FloatError::InvalidWidth { exponent, mantissa })
}

/// This is the main data structure of this library. It represents a floating
/// point number that is made of a sign bit, an exponent field of `EXPONENT`
/// bits and a mantissa field of `MANTISSA` bits.
///
/// Unlike IEEE-754 the exponent is a power of ten, stored in two's
/// complement. The mantissa is an unsigned integer that is implicitly divided
/// by `mantissa_multiplier(MANTISSA)`, so normalized mantissas represent the
/// digits d.ddddd in [1, 10). The value is `(-1)^sign * m / mult * 10^exp`.
///
/// Floats are immutable values. Every operation returns a new number. The
/// widths are part of the type, so two floats of different layouts can't be
/// mixed. Illegal widths are rejected at compile time:
///
/// ```compile_fail
/// // 1 + 100 + 60 bits is wider than 128 bits.
/// let _ = decfloat::Float::<100, 60>::zero(false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Float<const EXPONENT: usize, const MANTISSA: usize> {
    // The Sign bit. True means negative.
    sign: bool,
    // The decimal exponent, in two's complement.
    exponent: Bits<EXPONENT>,
    // The significant digits, scaled by the mantissa multiplier.
    mantissa: Bits<MANTISSA>,
}

impl<const EXPONENT: usize, const MANTISSA: usize> Float<EXPONENT, MANTISSA> {
    /// The number of bits that the encoding occupies.
    pub const TOTAL_BITS: usize = 1 + EXPONENT + MANTISSA;

    /// Returns the width checks for this layout as a runtime result.
    pub const fn check_widths() -> Result<()> {
        check_widths(EXPONENT, MANTISSA)
    }

    /// Create a new float from the raw fields.
    pub const fn from_parts(
        sign: bool,
        exponent: Bits<EXPONENT>,
        mantissa: Bits<MANTISSA>,
    ) -> Self {
        const {
            assert!(
                widths_are_valid(EXPONENT, MANTISSA),
                "invalid float widths: need 2..=127 exponent bits, 4..=64 \
                 mantissa bits and at most 128 bits in total"
            )
        };
        Float {
            sign,
            exponent,
            mantissa,
        }
    }

    /// Create a new float from integer fields. The mantissa is stored as-is
    /// (it is not normalized). Values that don't fit in the fields are
    /// handled according to `overflow`.
    pub fn from_integers(
        sign: bool,
        exp: i128,
        mantissa: u128,
        overflow: Overflow,
    ) -> Result<Self> {
        Self::pack(sign, exp, mantissa, overflow)
    }

    /// Returns a new zero float.
    pub const fn zero(sign: bool) -> Self {
        Self::from_parts(sign, Bits::zeros(), Bits::zeros())
    }

    /// Returns a new float with the value one.
    pub fn one(sign: bool) -> Self {
        let mantissa = bits::unsigned_to_bits(Self::multiplier());
        Self::from_parts(sign, Bits::zeros(), mantissa)
    }

    /// Returns the largest magnitude that this format can hold: the largest
    /// exponent and the largest normalized mantissa (9.999..).
    pub fn max_magnitude(sign: bool) -> Self {
        let (_, max_exp) = bits::signed_bounds::<EXPONENT>();
        let (_, high) = scale::canonical_range(MANTISSA);
        Self::from_parts(
            sign,
            bits::signed_to_bits(max_exp),
            bits::unsigned_to_bits(high - 1),
        )
    }

    /// Returns the power of ten that scales the mantissa integer.
    pub const fn multiplier() -> u128 {
        scale::mantissa_multiplier(MANTISSA)
    }

    /// Returns the width of the exponent field in bits.
    pub fn get_exponent_len(&self) -> usize {
        EXPONENT
    }

    /// Returns the width of the mantissa field in bits.
    pub fn get_mantissa_len(&self) -> usize {
        MANTISSA
    }

    /// Returns the sign of the float. True means negative.
    pub fn get_sign(&self) -> bool {
        self.sign
    }

    /// Returns true if the Float is negative.
    pub fn is_negative(&self) -> bool {
        self.sign
    }

    /// Returns the decimal exponent as an integer.
    pub fn get_exp(&self) -> i128 {
        bits::bits_to_signed(&self.exponent)
    }

    /// Returns the mantissa as an unsigned integer.
    pub fn get_mantissa(&self) -> u128 {
        bits::bits_to_unsigned(&self.mantissa)
    }

    pub fn get_exponent_bits(&self) -> Bits<EXPONENT> {
        self.exponent
    }

    pub fn get_mantissa_bits(&self) -> Bits<MANTISSA> {
        self.mantissa
    }

    /// Returns true if the Float is +- zero. Any exponent with a zero mantissa
    /// is a zero.
    pub fn is_zero(&self) -> bool {
        self.get_mantissa() == 0
    }

    /// Returns true if the mantissa is in its canonical decade, or if this is
    /// a zero with a zero exponent.
    pub fn is_normalized(&self) -> bool {
        let mantissa = self.get_mantissa();
        if mantissa == 0 {
            return self.get_exp() == 0;
        }
        let (low, high) = scale::canonical_range(MANTISSA);
        mantissa >= low && mantissa < high
    }

    /// Returns the number without the sign.
    pub fn abs(&self) -> Self {
        Self::from_parts(false, self.exponent, self.mantissa)
    }

    /// Returns a normalized copy of this number.
    pub fn normalized(&self, overflow: Overflow) -> Result<Self> {
        Self::normalize(self.sign, self.get_exp(), self.get_mantissa(), overflow)
    }

    /// Prints the number using the internal representation.
    #[cfg(feature = "std")]
    pub fn dump(&self) {
        use std::println;
        let sign = if self.sign { "-" } else { "+" };
        println!(
            "FP[{} E={:4} M = {}] ({} | {})",
            sign,
            self.get_exp(),
            self.get_mantissa(),
            self.exponent,
            self.mantissa
        );
    }
}

impl<const EXPONENT: usize, const MANTISSA: usize> Float<EXPONENT, MANTISSA> {
    /// Store the integer fields in the bit fields. With `Overflow::Saturate` an
    /// exponent that is too large turns into the largest magnitude, and an
    /// exponent that is too small flushes to zero.
    pub(crate) fn pack(
        sign: bool,
        exp: i128,
        mantissa: u128,
        overflow: Overflow,
    ) -> Result<Self> {
        if overflow == Overflow::Saturate && !bits::fits_signed::<EXPONENT>(exp)
        {
            tracing::debug!(exp, width = EXPONENT, "saturating the exponent");
            if exp > 0 {
                return Ok(Self::max_magnitude(sign));
            }
            return Ok(Self::zero(sign));
        }
        let exponent = bits::pack_signed::<EXPONENT>(exp, overflow)?;
        let mantissa = bits::pack_unsigned::<MANTISSA>(mantissa, overflow)?;
        Ok(Self::from_parts(sign, exponent, mantissa))
    }

    /// Normalize the number by moving the mantissa into the canonical decade
    /// [mult, 10 * mult) and adjusting the exponent to keep the value. Digits
    /// that are shifted out are truncated (rounding toward zero). A zero
    /// mantissa becomes a zero with a zero exponent.
    pub(crate) fn normalize(
        sign: bool,
        exp: i128,
        mantissa: u128,
        overflow: Overflow,
    ) -> Result<Self> {
        if mantissa == 0 {
            return Ok(Self::zero(sign));
        }
        let (exp, mantissa) = Self::canonical_fields(exp, mantissa);
        Self::pack(sign, exp, mantissa, overflow)
    }

    /// Moves a non-zero `mantissa` into the canonical decade and returns the
    /// adjusted exponent and mantissa, without checking the field widths.
    pub(crate) fn canonical_fields(exp: i128, mantissa: u128) -> (i128, u128) {
        if mantissa == 0 {
            return (0, 0);
        }
        let (low, high) = scale::canonical_range(MANTISSA);
        let mut mantissa = mantissa;
        let mut shift = 0i128;
        while mantissa >= high {
            mantissa /= 10;
            shift += 1;
        }
        while mantissa < low {
            mantissa *= 10;
            shift -= 1;
        }
        if shift != 0 {
            tracing::trace!(exp, shift, "renormalized the mantissa");
        }
        (exp.saturating_add(shift), mantissa)
    }

    /// Returns the exponent and the mantissa of this number after moving the
    /// mantissa into the canonical decade. The exponent may be outside of the
    /// exponent field.
    pub(crate) fn canonical_parts(&self) -> (i128, u128) {
        Self::canonical_fields(self.get_exp(), self.get_mantissa())
    }
}

impl<const EXPONENT: usize, const MANTISSA: usize> Default
    for Float<EXPONENT, MANTISSA>
{
    fn default() -> Self {
        Self::zero(false)
    }
}

/// Predefined float with 5 exponent bits, and 10 mantissa bits.
pub type FP16 = Float<5, 10>;
/// Predefined float with 8 exponent bits, and 23 mantissa bits.
pub type FP32 = Float<8, 23>;
/// Predefined float with 11 exponent bits, and 52 mantissa bits.
pub type FP64 = Float<11, 52>;

#[test]
fn test_widths() {
    assert_eq!(check_widths(8, 23), Ok(()));
    assert_eq!(check_widths(2, 4), Ok(()));
    assert_eq!(check_widths(63, 64), Ok(()));
    assert_eq!(
        check_widths(127, 0),
        Err(FloatError::InvalidWidth {
            exponent: 127,
            mantissa: 0
        })
    );
    assert_eq!(
        check_widths(100, 60),
        Err(FloatError::InvalidWidth {
            exponent: 100,
            mantissa: 60
        })
    );
    assert!(!widths_are_valid(64, 64));
    assert!(!widths_are_valid(1, 23));
    assert!(!widths_are_valid(8, 3));
    assert!(!widths_are_valid(8, 65));
    assert_eq!(FP32::check_widths(), Ok(()));
    assert_eq!(FP32::TOTAL_BITS, 32);
    assert_eq!(FP16::TOTAL_BITS, 16);
    assert_eq!(FP64::TOTAL_BITS, 64);
    assert_eq!(Float::<63, 64>::TOTAL_BITS, 128);
}

#[test]
fn test_default_is_zero() {
    let x = FP32::default();
    assert!(x.is_zero());
    assert!(!x.is_negative());
    assert!(x.is_normalized());
    assert_eq!(x.get_exp(), 0);
    assert_eq!(x.get_mantissa(), 0);
    assert_eq!(x, FP32::zero(false));
}

#[test]
fn test_constructors() {
    let one = FP32::one(false);
    assert_eq!(one.get_exp(), 0);
    assert_eq!(one.get_mantissa(), 100000);
    assert!(one.is_normalized());

    let max = FP16::max_magnitude(true);
    assert!(max.is_negative());
    assert_eq!(max.get_exp(), 15);
    assert_eq!(max.get_mantissa(), 999);
    assert_eq!(max.get_exponent_len(), 5);
    assert_eq!(max.get_mantissa_len(), 10);
    assert_eq!(
        1 + one.get_exponent_len() + one.get_mantissa_len(),
        FP32::TOTAL_BITS
    );

    let x = FP32::from_integers(false, -3, 250000, Overflow::Reject).unwrap();
    assert_eq!(x.get_exp(), -3);
    assert_eq!(x.get_mantissa(), 250000);
    assert_eq!(x.get_exponent_bits(), bits::signed_to_bits(-3));
    assert_eq!(x.get_mantissa_bits(), bits::unsigned_to_bits(250000));
    assert_eq!(x.abs(), x);
    assert_eq!(
        FP32::from_integers(false, 128, 1, Overflow::Reject),
        Err(FloatError::OutOfRange {
            value: 128,
            width: 8
        })
    );
    assert_eq!(
        FP32::from_integers(false, 0, 1 << 23, Overflow::Reject),
        Err(FloatError::OutOfRange {
            value: 1 << 23,
            width: 23
        })
    );
}

#[test]
fn test_normalize() {
    // 1250 stored with too many digits.
    let x = FP32::normalize(false, 1, 12500000, Overflow::Reject).unwrap();
    assert_eq!(x.get_exp(), 3);
    assert_eq!(x.get_mantissa(), 125000);

    // 0.003 stored with too few digits.
    let x = FP32::normalize(true, -1, 3000, Overflow::Reject).unwrap();
    assert_eq!(x.get_exp(), -3);
    assert_eq!(x.get_mantissa(), 300000);
    assert!(x.is_negative());

    // Truncation of shifted-out digits.
    let x = FP32::normalize(false, 0, 1999999, Overflow::Reject).unwrap();
    assert_eq!(x.get_exp(), 1);
    assert_eq!(x.get_mantissa(), 199999);

    // Zero is canonical.
    let x = FP32::normalize(false, 17, 0, Overflow::Reject).unwrap();
    assert_eq!(x, FP32::zero(false));

    let x = FP32::from_integers(false, 5, 30, Overflow::Reject).unwrap();
    assert!(!x.is_normalized());
    let y = x.normalized(Overflow::Reject).unwrap();
    assert!(y.is_normalized());
    assert_eq!(y.get_exp(), 1);
}

#[test]
fn test_pack_saturation() {
    let x = FP32::normalize(false, 127, 50000000, Overflow::Saturate).unwrap();
    assert_eq!(x, FP32::max_magnitude(false));
    let x = FP32::normalize(true, -128, 50000, Overflow::Saturate).unwrap();
    assert_eq!(x, FP32::zero(true));
    let x = FP32::normalize(false, 127, 50000000, Overflow::Reject);
    assert_eq!(
        x,
        Err(FloatError::OutOfRange {
            value: 129,
            width: 8
        })
    );
}
