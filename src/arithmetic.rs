use super::bits::Overflow;
use super::error::{FloatError, Result};
use super::float::Float;
use super::scale;
use core::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(test)]
use super::{float::FP32, utils};

impl<const EXPONENT: usize, const MANTISSA: usize> Float<EXPONENT, MANTISSA> {
    /// Returns a new float which has a flipped sign (negated value).
    pub fn neg(&self) -> Self {
        Self::from_parts(
            !self.get_sign(),
            self.get_exponent_bits(),
            self.get_mantissa_bits(),
        )
    }

    /// Drop the low `decades` decimal digits of `mantissa`, to align it with a
    /// number that has a larger exponent.
    fn align_mantissa(mantissa: u128, decades: i128) -> u128 {
        let divisor = u32::try_from(decades)
            .ok()
            .and_then(scale::integer_power_of_ten);
        match divisor {
            Some(divisor) => mantissa / divisor,
            // Every digit is shifted out.
            None => 0,
        }
    }

    /// Computes a+b, handling exponents that overflow according to
    /// `overflow`. The smaller operand is aligned to the larger exponent by
    /// dropping its low digits, and the sum is normalized (digits that don't
    /// fit are truncated).
    pub fn add_with(a: Self, b: Self, overflow: Overflow) -> Result<Self> {
        match (a.is_zero(), b.is_zero()) {
            (true, true) => {
                return Ok(Self::zero(a.get_sign() && b.get_sign()));
            }
            (true, false) => return b.normalized(overflow),
            (false, true) => return a.normalized(overflow),
            (false, false) => {}
        }

        let (a_exp, mut a_mantissa) = a.canonical_parts();
        let (b_exp, mut b_mantissa) = b.canonical_parts();

        // Align the input numbers on the same exponent.
        let delta = a_exp.saturating_sub(b_exp);
        if delta > 0 {
            b_mantissa = Self::align_mantissa(b_mantissa, delta);
        } else if delta < 0 {
            a_mantissa = Self::align_mantissa(a_mantissa, -delta);
        }
        tracing::trace!(a_exp, b_exp, "aligned the operands");

        // The mantissas are at most 64 bits wide, so the signed sum can't
        // overflow.
        let a_val = a_mantissa as i128;
        let b_val = b_mantissa as i128;
        let a_val = if a.get_sign() { -a_val } else { a_val };
        let b_val = if b.get_sign() { -b_val } else { b_val };
        let sum = a_val + b_val;

        Self::normalize(sum < 0, a_exp.max(b_exp), sum.unsigned_abs(), overflow)
    }

    /// Computes a-b, handling exponents that overflow according to
    /// `overflow`.
    pub fn sub_with(a: Self, b: Self, overflow: Overflow) -> Result<Self> {
        Self::add_with(a, b.neg(), overflow)
    }

    /// Computes a*b, handling exponents that overflow according to
    /// `overflow`. The operands are normalized first, and the mantissa
    /// product is truncated.
    pub fn mul_with(a: Self, b: Self, overflow: Overflow) -> Result<Self> {
        let sign = a.get_sign() ^ b.get_sign();
        let (a_exp, a_mantissa) = a.canonical_parts();
        let (b_exp, b_mantissa) = b.canonical_parts();
        let exp = a_exp.saturating_add(b_exp);
        // Both mantissas are below 2^64, so the product fits in 128 bits.
        let product = a_mantissa * b_mantissa / Self::multiplier();
        Self::normalize(sign, exp, product, overflow)
    }

    /// Computes a/b, handling exponents that overflow according to
    /// `overflow`. The mantissa quotient is truncated.
    pub fn div_with(a: Self, b: Self, overflow: Overflow) -> Result<Self> {
        if b.is_zero() {
            return Err(FloatError::DivisionByZero);
        }
        let sign = a.get_sign() ^ b.get_sign();
        if a.is_zero() {
            return Ok(Self::zero(sign));
        }

        // Compute one extra digit to keep the precision when a < b:
        // (ma / mult) / (mb / mult) == (ma * 10 * mult / mb) / mult / 10.
        // 10 * mult fits in MANTISSA bits, so the product fits in 128 bits.
        let (a_exp, a_mantissa) = a.canonical_parts();
        let (b_exp, b_mantissa) = b.canonical_parts();
        let exp = a_exp.saturating_sub(b_exp).saturating_sub(1);
        let scaled = a_mantissa * (Self::multiplier() * 10);
        Self::normalize(sign, exp, scaled / b_mantissa, overflow)
    }

    /// Computes 1/x, handling exponents that overflow according to
    /// `overflow`.
    pub fn reciprocal_with(&self, overflow: Overflow) -> Result<Self> {
        Self::div_with(Self::one(false), *self, overflow)
    }

    /// Computes a+b. Exponents that overflow are reported as errors.
    pub fn checked_add(a: Self, b: Self) -> Result<Self> {
        Self::add_with(a, b, Overflow::Reject)
    }

    /// Computes a-b. Exponents that overflow are reported as errors.
    pub fn checked_sub(a: Self, b: Self) -> Result<Self> {
        Self::sub_with(a, b, Overflow::Reject)
    }

    /// Computes a*b. Exponents that overflow are reported as errors.
    pub fn checked_mul(a: Self, b: Self) -> Result<Self> {
        Self::mul_with(a, b, Overflow::Reject)
    }

    /// Computes a/b. Exponents that overflow are reported as errors.
    pub fn checked_div(a: Self, b: Self) -> Result<Self> {
        Self::div_with(a, b, Overflow::Reject)
    }

    /// Computes 1/x. Exponents that overflow are reported as errors.
    pub fn reciprocal(&self) -> Result<Self> {
        self.reciprocal_with(Overflow::Reject)
    }

    /// Returns an approximation of 1/x that only negates the exponent and
    /// keeps the mantissa and the sign. This is exact only when the mantissa
    /// represents 1.0, so for example 1/4 becomes 4. Use `reciprocal` for the
    /// real value.
    pub fn approximate_reciprocal(&self) -> Result<Self> {
        let exp = self.get_exp().saturating_neg();
        Self::pack(self.get_sign(), exp, self.get_mantissa(), Overflow::Reject)
    }

    /// Computes a * approximate_reciprocal(b). This is close to a/b only when
    /// the mantissa of `b` represents 1.0 (a power of ten).
    pub fn approximate_divide(a: Self, b: Self) -> Result<Self> {
        Self::checked_mul(a, b.approximate_reciprocal()?)
    }
}

impl<const EXPONENT: usize, const MANTISSA: usize> Neg
    for Float<EXPONENT, MANTISSA>
{
    type Output = Self;
    fn neg(self) -> Self {
        Float::neg(&self)
    }
}

// The operators never fail: exponents that overflow saturate to the largest
// magnitude, and exponents that underflow flush to zero.

impl<const EXPONENT: usize, const MANTISSA: usize> Add
    for Float<EXPONENT, MANTISSA>
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::add_with(self, rhs, Overflow::Saturate)
            .unwrap_or_else(|_| Self::max_magnitude(self.get_sign()))
    }
}

impl<const EXPONENT: usize, const MANTISSA: usize> Sub
    for Float<EXPONENT, MANTISSA>
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::add(self, Float::neg(&rhs))
    }
}

impl<const EXPONENT: usize, const MANTISSA: usize> Mul
    for Float<EXPONENT, MANTISSA>
{
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let sign = self.get_sign() ^ rhs.get_sign();
        Self::mul_with(self, rhs, Overflow::Saturate)
            .unwrap_or_else(|_| Self::max_magnitude(sign))
    }
}

/// Division by zero saturates to the largest magnitude, with the sign of the
/// quotient.
impl<const EXPONENT: usize, const MANTISSA: usize> Div
    for Float<EXPONENT, MANTISSA>
{
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let sign = self.get_sign() ^ rhs.get_sign();
        Self::div_with(self, rhs, Overflow::Saturate)
            .unwrap_or_else(|_| Self::max_magnitude(sign))
    }
}

#[cfg(test)]
fn close(x: FP32, expected: f64) -> bool {
    utils::approx_eq(x.as_f64(), expected, 1e-4)
}

#[cfg(test)]
fn fp(v: f64) -> FP32 {
    FP32::from_f64(v).unwrap()
}

#[test]
fn test_negate() {
    let x = fp(100.0);
    let y = x.neg();
    assert_eq!(y.as_f64(), -100.0);
    assert_eq!(y.get_exponent_bits(), x.get_exponent_bits());
    assert_eq!(y.get_mantissa_bits(), x.get_mantissa_bits());
    assert_eq!((-y), x);
    assert!(FP32::zero(false).neg().is_zero());
}

#[test]
fn test_addition() {
    fn add_helper(a: f64, b: f64) -> f64 {
        FP32::checked_add(fp(a), fp(b)).unwrap().as_f64()
    }

    assert_eq!(add_helper(99.0, 20.0), 119.0);
    assert_eq!(add_helper(100.0, -20.0), 80.0);
    assert_eq!(add_helper(0., -4.), -4.);
    assert_eq!(add_helper(-4., 0.), -4.);
    assert_eq!(add_helper(1., 1.), 2.);
    assert_eq!(add_helper(8., 4.), 12.);
    assert_eq!(add_helper(128., -8.), 120.);
    assert_eq!(add_helper(64., -60.), 4.);
    assert_eq!(add_helper(69., -65.), 4.);
    assert_eq!(add_helper(64., -65.), -1.);
    assert_eq!(add_helper(-64., -65.), -129.);
    assert_eq!(add_helper(-15., -15.), -30.);
    assert_eq!(add_helper(-15., 15.), 0.);

    for i in -4..15 {
        for j in i..15 {
            assert_eq!(
                add_helper(f64::from(j), f64::from(i)),
                f64::from(i) + f64::from(j)
            );
        }
    }
}

#[test]
fn test_addition_normalizes() {
    // The carry moves the result into the next decade.
    let x = FP32::checked_add(fp(99.0), fp(20.0)).unwrap();
    assert!(x.is_normalized());
    assert_eq!(x.get_exp(), 2);
    assert_eq!(x.get_mantissa(), 119000);

    // The borrow moves the result into the previous decade.
    let x = FP32::checked_add(fp(100.0), fp(-99.0)).unwrap();
    assert!(x.is_normalized());
    assert_eq!(x.get_exp(), 0);
    assert_eq!(x.as_f64(), 1.0);

    // The zero result is canonical.
    let x = FP32::checked_add(fp(7.5), fp(-7.5)).unwrap();
    assert_eq!(x, FP32::zero(false));
}

#[test]
fn test_addition_alignment_loss() {
    // The small operand is shifted out completely.
    let x = FP32::checked_add(fp(1e20), fp(1.0)).unwrap();
    assert_eq!(x.as_f64(), 1e20);
    // Only the digits that align survive: 1000 + 0.123456 = 1000.12.
    let x = FP32::checked_add(fp(1000.0), fp(0.123456)).unwrap();
    assert_eq!(x.get_mantissa(), 100012);
    assert_eq!(x.get_exp(), 3);
}

#[test]
fn test_subtraction() {
    assert_eq!(FP32::checked_sub(fp(100.0), fp(-20.0)).unwrap().as_f64(), 120.0);
    assert_eq!(FP32::checked_sub(fp(100.0), fp(20.0)).unwrap().as_f64(), 80.0);
    assert_eq!(FP32::checked_sub(fp(3.0), fp(3.0)).unwrap(), FP32::zero(false));
    assert_eq!((fp(5.0) - fp(7.0)).as_f64(), -2.0);
}

#[test]
fn test_multiplication() {
    assert_eq!(FP32::checked_mul(fp(100.0), fp(0.5)).unwrap().as_f64(), 50.0);
    assert_eq!(FP32::checked_mul(fp(-24.0), fp(0.5)).unwrap().as_f64(), -12.0);
    assert_eq!(FP32::checked_mul(fp(-3.0), fp(-3.0)).unwrap().as_f64(), 9.0);

    // 5 * 5 carries into the next decade.
    let x = FP32::checked_mul(fp(5.0), fp(5.0)).unwrap();
    assert!(x.is_normalized());
    assert_eq!(x.get_exp(), 1);
    assert_eq!(x.get_mantissa(), 250000);

    let x = FP32::checked_mul(fp(0.0), fp(-3.0)).unwrap();
    assert!(x.is_zero());
    assert!(x.is_negative());

    let values = [-5.0, 24., 1., 11., 10000., 256., 0.1, 3., 17.5];
    for v0 in values {
        for v1 in values {
            let r = FP32::checked_mul(fp(v0), fp(v1)).unwrap();
            assert!(close(r, v0 * v1), "{} * {} = {}", v0, v1, r.as_f64());
        }
    }
}

#[test]
fn test_division() {
    assert_eq!(FP32::checked_div(fp(100.0), fp(10.0)).unwrap().as_f64(), 10.0);
    assert_eq!(FP32::checked_div(fp(100.0), fp(4.0)).unwrap().as_f64(), 25.0);
    assert_eq!(FP32::checked_div(fp(1.0), fp(-8.0)).unwrap().as_f64(), -0.125);
    assert_eq!(FP32::checked_div(fp(9.0), fp(3.0)).unwrap().as_f64(), 3.0);
    let third = FP32::checked_div(fp(1.0), fp(3.0)).unwrap();
    assert_eq!(third.get_exp(), -1);
    assert_eq!(third.get_mantissa(), 333333);
    assert!(FP32::checked_div(FP32::zero(false), fp(3.0)).unwrap().is_zero());

    let values = [-5.0, 24., 1., 11., 10000., 256., 0.1, 3., 17.5];
    for v0 in values {
        for v1 in values {
            let r = FP32::checked_div(fp(v0), fp(v1)).unwrap();
            assert!(close(r, v0 / v1), "{} / {} = {}", v0, v1, r.as_f64());
        }
    }
}

#[test]
fn test_unnormalized_operands() {
    // 1e-5, stored with a single mantissa digit.
    let a = FP32::from_integers(false, 0, 1, Overflow::Reject).unwrap();
    assert!(!a.is_normalized());

    let x = FP32::checked_mul(a, a).unwrap();
    assert_eq!(x.to_string(), "1e-10");
    let x = FP32::checked_div(a, fp(3.0)).unwrap();
    assert_eq!(x.to_string(), "3.33333e-6");
    let x = FP32::checked_div(fp(3.0), a).unwrap();
    assert_eq!(x.to_string(), "3e5");
    let x = FP32::checked_add(a, FP32::one(false)).unwrap();
    assert_eq!(x.to_string(), "1.00001");
    assert_eq!((a * fp(2.0)).to_string(), "2e-5");

    // The normalized operand is below the smallest exponent, but the
    // product fits.
    let tiny = FP32::from_integers(false, -128, 1, Overflow::Reject).unwrap();
    let x = FP32::checked_mul(tiny, fp(1e10)).unwrap();
    assert_eq!(x.to_string(), "1e-123");
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        FP32::checked_div(fp(1.0), FP32::zero(false)),
        Err(FloatError::DivisionByZero)
    );
    assert_eq!(FP32::zero(true).reciprocal(), Err(FloatError::DivisionByZero));
    assert_eq!(fp(-1.0) / FP32::zero(false), FP32::max_magnitude(true));
}

#[test]
fn test_reciprocal() {
    assert_eq!(fp(4.0).reciprocal().unwrap().as_f64(), 0.25);
    assert_eq!(fp(-0.5).reciprocal().unwrap().as_f64(), -2.0);
    assert_eq!(fp(10.0).reciprocal().unwrap().as_f64(), 0.1);
    let x = fp(3.0).reciprocal().unwrap();
    assert_eq!(x.get_mantissa(), 333333);
    assert!(x.is_normalized());
}

#[test]
fn test_approximate_reciprocal() {
    // Exact for powers of ten.
    let x = fp(100.0).approximate_reciprocal().unwrap();
    assert_eq!(x.as_f64(), 0.01);
    let x = fp(-0.001).approximate_reciprocal().unwrap();
    assert_eq!(x.as_f64(), -1000.0);

    // Otherwise only the exponent flips: 1/40 becomes 0.4.
    let x = fp(40.0).approximate_reciprocal().unwrap();
    assert_eq!(x.get_exp(), -1);
    assert_eq!(x.get_mantissa(), 400000);
    assert_eq!(x.as_f64(), 0.4);

    // The exponent -128 has no positive counterpart in 8 bits.
    let min = FP32::from_integers(false, -128, 100000, Overflow::Reject).unwrap();
    assert_eq!(
        min.approximate_reciprocal(),
        Err(FloatError::OutOfRange {
            value: 128,
            width: 8
        })
    );
}

#[test]
fn test_approximate_divide() {
    // Close to the real quotient when the divisor is a power of ten.
    let x = FP32::approximate_divide(fp(100.0), fp(10.0)).unwrap();
    assert_eq!(x.as_f64(), 10.0);
    // And off when it isn't: 100 / 4 gives 400 instead of 25.
    let x = FP32::approximate_divide(fp(100.0), fp(4.0)).unwrap();
    assert_eq!(x.as_f64(), 400.0);
}

#[test]
fn test_overflowing_exponents() {
    let big = FP32::from_integers(false, 127, 500000, Overflow::Reject).unwrap();
    assert_eq!(
        FP32::checked_mul(big, big),
        Err(FloatError::OutOfRange {
            value: 255,
            width: 8
        })
    );
    assert_eq!(big * big, FP32::max_magnitude(false));
    assert_eq!(
        FP32::mul_with(big, big, Overflow::Saturate),
        Ok(FP32::max_magnitude(false))
    );

    let small = FP32::from_integers(true, -128, 200000, Overflow::Reject).unwrap();
    assert_eq!(small * big.reciprocal().unwrap(), FP32::zero(true));
    assert_eq!(big + big, FP32::max_magnitude(false));
}

#[test]
fn test_operators() {
    let a = fp(99.0);
    let b = fp(20.0);
    assert_eq!((a + b).as_f64(), 119.0);
    assert_eq!((a - b).as_f64(), 79.0);
    assert_eq!((fp(100.0) * fp(0.5)).as_f64(), 50.0);
    assert_eq!((fp(100.0) / fp(10.0)).as_f64(), 10.0);
    assert_eq!((-fp(100.0)).as_f64(), -100.0);
}

#[test]
fn test_all_results_normalized() {
    let values = utils::get_test_values();
    for v0 in values {
        for v1 in values {
            let a = fp(v0);
            let b = fp(v1);
            assert!((a + b).is_normalized());
            assert!((a - b).is_normalized());
            assert!((a * b).is_normalized());
            assert!((a / b).is_normalized());
        }
    }
}
