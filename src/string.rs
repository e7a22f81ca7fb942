//! This module contains the implementation of string conversion.
//!
//! The mantissa is a decimal integer, so numbers are printed and parsed
//! exactly, without going through a native float.

use super::bits::Overflow;
use super::error::{FloatError, ParseErrorKind, Result};
use super::float::Float;
use super::scale;
use core::fmt::Display;
use core::str::FromStr;

#[cfg(test)]
use super::float::{FP16, FP32};

impl<const EXPONENT: usize, const MANTISSA: usize> Float<EXPONENT, MANTISSA> {
    /// Parse a number in the format `[+-]digits[.digits][(e|E)[+-]digits]`.
    /// Digits that don't fit in the mantissa are truncated. Exponents that
    /// don't fit in the exponent field are handled according to `overflow`.
    pub fn parse_with(value: &str, overflow: Overflow) -> Result<Self> {
        let (sign, body) = match value.as_bytes().first() {
            None => return Err(FloatError::Parse(ParseErrorKind::Empty)),
            Some(b'-') => (true, &value[1..]),
            Some(b'+') => (false, &value[1..]),
            Some(_) => (false, value),
        };

        // Split the number to the digits and the exponent.
        let (number, exp) = match body.find(|c| c == 'e' || c == 'E') {
            Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };
        let mut exp = match exp {
            Some(exp) => parse_exponent(exp)?,
            None => 0,
        };

        let (integral, fraction) = number.split_once('.').unwrap_or((number, ""));
        if integral.is_empty() && fraction.is_empty() {
            return Err(FloatError::Parse(ParseErrorKind::InvalidDigit));
        }

        // Collect the significant digits that fit in a normalized mantissa.
        // The number is then `acc * 10^exp`.
        let max_digits = scale::mantissa_digits(MANTISSA) + 1;
        let mut acc: u128 = 0;
        let mut digits = 0;
        let chars = integral.bytes().map(|c| (c, false));
        let chars = chars.chain(fraction.bytes().map(|c| (c, true)));
        for (c, is_fraction) in chars {
            if !c.is_ascii_digit() {
                return Err(FloatError::Parse(ParseErrorKind::InvalidDigit));
            }
            let digit = (c - b'0') as u128;

            if acc == 0 && digit == 0 {
                // Leading zeros only move the point.
                if is_fraction {
                    exp = exp.saturating_sub(1);
                }
            } else if digits < max_digits {
                acc = acc * 10 + digit;
                digits += 1;
                if is_fraction {
                    exp = exp.saturating_sub(1);
                }
            } else if !is_fraction {
                // Truncated digit of the integral part.
                exp = exp.saturating_add(1);
            }
        }

        let exp = exp.saturating_add(scale::mantissa_digits(MANTISSA) as i128);
        Self::normalize(sign, exp, acc, overflow)
    }
}

/// Parse the decimal exponent `[+-]digits`. Exponents beyond the i128 range
/// saturate, and are later handled like any exponent that doesn't fit.
fn parse_exponent(value: &str) -> Result<i128> {
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    if digits.is_empty() {
        return Err(FloatError::Parse(ParseErrorKind::InvalidExponent));
    }

    let mut exp: i128 = 0;
    for c in digits.bytes() {
        if !c.is_ascii_digit() {
            return Err(FloatError::Parse(ParseErrorKind::InvalidExponent));
        }
        let digit = (c - b'0') as i128;
        exp = exp.saturating_mul(10);
        exp = if negative {
            exp.saturating_sub(digit)
        } else {
            exp.saturating_add(digit)
        };
    }
    Ok(exp)
}

impl<const EXPONENT: usize, const MANTISSA: usize> FromStr
    for Float<EXPONENT, MANTISSA>
{
    type Err = FloatError;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse_with(value, Overflow::Reject)
    }
}

/// Prints the number in scientific notation (for example `-1.25e-3`), with
/// all of the digits that the mantissa holds and no trailing zeros.
impl<const EXPONENT: usize, const MANTISSA: usize> Display
    for Float<EXPONENT, MANTISSA>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.get_sign() {
            write!(f, "-")?;
        }
        let mut mantissa = self.get_mantissa();
        if mantissa == 0 {
            return write!(f, "0");
        }

        // Extract the digits: Div10-Mod10-Div10-Mod10 ....
        let mut buff = [0u8; 40];
        let mut len = 0;
        while mantissa > 0 {
            buff[len] = (mantissa % 10) as u8;
            mantissa /= 10;
            len += 1;
        }
        let digits = &mut buff[..len];
        digits.reverse();

        let mut end = len;
        while end > 1 && digits[end - 1] == 0 {
            end -= 1;
        }

        write!(f, "{}", digits[0])?;
        if end > 1 {
            write!(f, ".")?;
            for d in &digits[1..end] {
                write!(f, "{}", d)?;
            }
        }

        // The mantissa is scaled by 10^digits, and we print one digit before
        // the point.
        let exp = self.get_exp() - scale::mantissa_digits(MANTISSA) as i128
            + (len as i128 - 1);
        if exp != 0 {
            write!(f, "e{}", exp)?;
        }
        Ok(())
    }
}

#[test]
fn test_print() {
    assert_eq!(FP32::from_f64(119.0).unwrap().to_string(), "1.19e2");
    assert_eq!(FP32::from_f64(-0.5).unwrap().to_string(), "-5e-1");
    assert_eq!(FP32::from_f64(2.0).unwrap().to_string(), "2");
    assert_eq!(FP32::one(false).to_string(), "1");
    assert_eq!(FP32::zero(false).to_string(), "0");
    assert_eq!(FP32::zero(true).to_string(), "-0");
    let third = FP32::checked_div(FP32::one(false), FP32::from_f64(3.0).unwrap());
    assert_eq!(third.unwrap().to_string(), "3.33333e-1");
    assert_eq!(FP16::max_magnitude(false).to_string(), "9.99e15");

    // Mantissas that are not normalized print the same value.
    let x = FP32::from_integers(false, 5, 30, Overflow::Reject).unwrap();
    assert_eq!(x.to_string(), "3e1");
}

#[test]
fn test_parse() {
    let x: FP32 = "1.19e2".parse().unwrap();
    assert_eq!(x.get_exp(), 2);
    assert_eq!(x.get_mantissa(), 119000);

    let x: FP32 = "-0.05".parse().unwrap();
    assert!(x.get_sign());
    assert_eq!(x.get_exp(), -2);
    assert_eq!(x.get_mantissa(), 500000);

    let x: FP32 = "+42".parse().unwrap();
    assert_eq!(x.get_exp(), 1);
    assert_eq!(x.get_mantissa(), 420000);

    let x: FP32 = "5E-3".parse().unwrap();
    assert_eq!(x.get_exp(), -3);
    assert_eq!(x.get_mantissa(), 500000);

    let x: FP32 = ".25".parse().unwrap();
    assert_eq!(x.as_f64(), 0.25);
    let x: FP32 = "7.".parse().unwrap();
    assert_eq!(x.as_f64(), 7.0);

    // Extra digits are truncated.
    let x: FP32 = "1234567.89".parse().unwrap();
    assert_eq!(x.get_exp(), 6);
    assert_eq!(x.get_mantissa(), 123456);
    let x: FP32 = "0.000123456789".parse().unwrap();
    assert_eq!(x.get_exp(), -4);
    assert_eq!(x.get_mantissa(), 123456);
}

#[test]
fn test_parse_zero() {
    assert_eq!("0".parse::<FP32>(), Ok(FP32::zero(false)));
    assert_eq!("-0.000".parse::<FP32>(), Ok(FP32::zero(true)));
    assert_eq!("0e99".parse::<FP32>(), Ok(FP32::zero(false)));
}

#[test]
fn test_parse_errors() {
    use ParseErrorKind::*;
    let err = |kind| Err(FloatError::Parse(kind));
    assert_eq!("".parse::<FP32>(), err(Empty));
    assert_eq!("-".parse::<FP32>(), err(InvalidDigit));
    assert_eq!(".".parse::<FP32>(), err(InvalidDigit));
    assert_eq!("12a".parse::<FP32>(), err(InvalidDigit));
    assert_eq!("1.2.3".parse::<FP32>(), err(InvalidDigit));
    assert_eq!("nan".parse::<FP32>(), err(InvalidDigit));
    assert_eq!("1e".parse::<FP32>(), err(InvalidExponent));
    assert_eq!("1e5x".parse::<FP32>(), err(InvalidExponent));
    assert_eq!(
        "1e200".parse::<FP32>(),
        Err(FloatError::OutOfRange {
            value: 200,
            width: 8
        })
    );
    assert_eq!(
        FP32::parse_with("1e200", Overflow::Saturate),
        Ok(FP32::max_magnitude(false))
    );
    assert_eq!("1e+".parse::<FP32>(), err(InvalidExponent));
    assert_eq!("1e-x".parse::<FP32>(), err(InvalidExponent));
}

#[test]
fn test_parse_huge_exponents() {
    let huge = "1e99999999999999999999999999999999999999999999";
    assert!(matches!(
        huge.parse::<FP32>(),
        Err(FloatError::OutOfRange { width: 8, .. })
    ));
    assert_eq!(
        FP32::parse_with(huge, Overflow::Saturate),
        Ok(FP32::max_magnitude(false))
    );

    let tiny = "-1e-99999999999999999999999999999999999999999999";
    assert!(matches!(
        tiny.parse::<FP32>(),
        Err(FloatError::OutOfRange { width: 8, .. })
    ));
    assert_eq!(
        FP32::parse_with(tiny, Overflow::Saturate),
        Ok(FP32::zero(true))
    );

    // A zero is a zero with any exponent.
    assert_eq!(
        "0e99999999999999999999999999999999999999999999".parse::<FP32>(),
        Ok(FP32::zero(false))
    );
    let x: FP32 = "2.5e+3".parse().unwrap();
    assert_eq!(x.as_f64(), 2500.0);
}

#[test]
fn test_print_parse_round_trip() {
    for v in super::utils::get_test_values() {
        let x = FP32::from_f64(v).unwrap();
        let y: FP32 = x.to_string().parse().unwrap();
        assert_eq!(x, y);
    }
}
