//! Decimal (base-10) scaling helpers.
//!
//! The numbers in this crate are stored as `m / multiplier * 10^e`, where `m`
//! is an unsigned mantissa integer and `multiplier` is a power of ten chosen
//! from the width of the mantissa field. Every decimal step here is a loop of
//! multiplications or divisions by ten, so no logarithm or `floor` from a math
//! library is needed.

use super::error::{FloatError, Result};

/// Returns the integer `e` such that `magnitude / 10^e` is in [1, 10).
/// Zero is defined to have the exponent zero. The result is computed by
/// repeated division (or multiplication) by ten and is only as exact as the
/// native float arithmetic.
pub fn decimal_exponent(magnitude: f64) -> Result<i128> {
    if !magnitude.is_finite() {
        return Err(FloatError::NotFinite);
    }
    let mut value = if magnitude < 0.0 { -magnitude } else { magnitude };
    if value == 0.0 {
        return Ok(0);
    }

    let mut exp = 0;
    while value >= 10.0 {
        exp += 1;
        value /= 10.0;
    }
    while value < 1.0 {
        exp -= 1;
        value *= 10.0;
    }
    Ok(exp)
}

/// Returns 10^exp. Negative exponents are computed as the reciprocal of the
/// positive power. Exponents outside of the f64 range produce inf or zero.
pub fn power_of_ten(exp: i128) -> f64 {
    let mut result = 1.0f64;
    for _ in 0..exp.unsigned_abs() {
        if !result.is_finite() {
            break;
        }
        result *= 10.0;
    }

    if exp < 0 {
        return 1.0 / result;
    }
    result
}

/// Returns `value * 10^exp`. If the power of ten itself is out of the f64
/// range the scaling is done in two halves, which keeps very small and very
/// large values (such as subnormals) representable.
pub fn scale_by_power_of_ten(value: f64, exp: i128) -> f64 {
    fn scale(value: f64, exp: i128) -> f64 {
        if exp < 0 {
            value / power_of_ten(exp.saturating_neg())
        } else {
            value * power_of_ten(exp)
        }
    }

    // Zero stays zero even when the power of ten is inf.
    if value == 0.0 {
        return value;
    }
    let direct = scale(value, exp);
    if direct.is_finite() && direct != 0.0 {
        return direct;
    }
    let half = exp / 2;
    scale(scale(value, half), exp - half)
}

/// Returns 10^exp as an integer, or None if it does not fit in 128 bits.
pub const fn integer_power_of_ten(exp: u32) -> Option<u128> {
    10u128.checked_pow(exp)
}

/// Returns the power of ten that scales a mantissa of `m` bits. This is the
/// largest power `p` where a full decade [p, 10p) still fits in `m` bits. For
/// 23 bits that's 10^5, so mantissas are in [100000, 1000000).
pub const fn mantissa_multiplier(m: usize) -> u128 {
    assert!(m >= 4 && m <= 64, "mantissa widths are limited to 4..=64");
    let limit = 1u128 << m;
    let mut p = 1;
    while p * 100 <= limit {
        p *= 10;
    }
    p
}

/// Returns the number of decimal digits after the point that a mantissa of
/// `m` bits holds, i.e. log10 of `mantissa_multiplier(m)`.
pub const fn mantissa_digits(m: usize) -> u32 {
    let mut p = mantissa_multiplier(m);
    let mut digits = 0;
    while p > 1 {
        p /= 10;
        digits += 1;
    }
    digits
}

/// Returns the canonical [low, high) range of a normalized `m`-bit mantissa.
pub const fn canonical_range(m: usize) -> (u128, u128) {
    let low = mantissa_multiplier(m);
    (low, low * 10)
}

/// Returns the mantissa integer of `magnitude` for the decimal exponent `exp`:
/// `magnitude / 10^exp * mantissa_multiplier(m)`, truncated toward zero.
pub fn mantissa_unsigned(magnitude: f64, exp: i128, m: usize) -> u128 {
    let digits = scale_by_power_of_ten(magnitude, -exp);
    // The cast truncates toward zero (and saturates on overflow).
    (digits * mantissa_multiplier(m) as f64) as u128
}

#[test]
fn test_decimal_exponent() {
    assert_eq!(decimal_exponent(0.01), Ok(-2));
    assert_eq!(decimal_exponent(0.05), Ok(-2));
    assert_eq!(decimal_exponent(0.1), Ok(-1));
    assert_eq!(decimal_exponent(1.0), Ok(0));
    assert_eq!(decimal_exponent(10.0), Ok(1));
    assert_eq!(decimal_exponent(50.0), Ok(1));
    assert_eq!(decimal_exponent(100.0), Ok(2));
    assert_eq!(decimal_exponent(999.0), Ok(2));
    assert_eq!(decimal_exponent(-50.0), Ok(1));
    assert_eq!(decimal_exponent(1e10), Ok(10));
    assert_eq!(decimal_exponent(5e-324), Ok(-324));
}

#[test]
fn test_decimal_exponent_special() {
    assert_eq!(decimal_exponent(0.0), Ok(0));
    assert_eq!(decimal_exponent(-0.0), Ok(0));
    assert_eq!(decimal_exponent(f64::NAN), Err(FloatError::NotFinite));
    assert_eq!(decimal_exponent(f64::INFINITY), Err(FloatError::NotFinite));
    assert_eq!(decimal_exponent(f64::NEG_INFINITY), Err(FloatError::NotFinite));
}

#[test]
fn test_power_of_ten() {
    assert_eq!(power_of_ten(0), 1.0);
    assert_eq!(power_of_ten(1), 10.0);
    assert_eq!(power_of_ten(5), 100000.0);
    assert_eq!(power_of_ten(22), 1e22);
    assert_eq!(power_of_ten(-1), 0.1);
    assert_eq!(power_of_ten(-3), 1.0 / 1000.0);
    assert_eq!(power_of_ten(400), f64::INFINITY);
    assert_eq!(power_of_ten(-400), 0.0);
    // Huge exponents terminate early.
    assert_eq!(power_of_ten(1 << 100), f64::INFINITY);
}

#[test]
fn test_scale_by_power_of_ten() {
    assert_eq!(scale_by_power_of_ten(1.5, 2), 150.0);
    assert_eq!(scale_by_power_of_ten(150.0, -2), 1.5);
    assert_eq!(scale_by_power_of_ten(0.0, 500), 0.0);
    assert_eq!(scale_by_power_of_ten(0.0, -500), 0.0);
    assert!(scale_by_power_of_ten(-0.0, 500).is_sign_negative());
    let tiny = scale_by_power_of_ten(4.9, -324);
    assert!(tiny > 0.0);
    let back = scale_by_power_of_ten(5e-324, 324);
    assert!(back > 4.0 && back < 6.0);
}

#[test]
fn test_mantissa_multiplier() {
    assert_eq!(mantissa_multiplier(4), 1);
    assert_eq!(mantissa_multiplier(7), 10);
    assert_eq!(mantissa_multiplier(10), 100);
    assert_eq!(mantissa_multiplier(23), 100000);
    assert_eq!(mantissa_multiplier(52), 100000000000000);
    assert_eq!(mantissa_multiplier(64), 1000000000000000000);
    assert_eq!(mantissa_digits(23), 5);
    assert_eq!(mantissa_digits(4), 0);
    assert_eq!(canonical_range(23), (100000, 1000000));

    // A full decade always fits in the field.
    for m in 4..=64 {
        let (_, high) = canonical_range(m);
        assert!(high - 1 <= crate::utils::mask(m));
    }
}

#[test]
fn test_mantissa_unsigned() {
    assert_eq!(mantissa_unsigned(50.0, 1, 23), 500000);
    assert_eq!(mantissa_unsigned(2.0, 0, 23), 200000);
    assert_eq!(mantissa_unsigned(0.05, -2, 23), 500000);
    assert_eq!(mantissa_unsigned(1.2345678, 0, 23), 123456);
    assert_eq!(integer_power_of_ten(3), Some(1000));
    assert_eq!(integer_power_of_ten(39), None);
}
