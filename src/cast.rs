use super::bits::Overflow;
use super::error::{FloatError, Result};
use super::float::Float;
use super::scale;

#[cfg(test)]
use super::{float::FP32, utils};

impl<const EXPONENT: usize, const MANTISSA: usize> Float<EXPONENT, MANTISSA> {
    /// Loads and converts a native fp64 value. The mantissa keeps as many
    /// decimal digits as the field allows and the rest are truncated. Exponents
    /// that don't fit in the field are reported as `FloatError::OutOfRange`.
    pub fn from_f64(value: f64) -> Result<Self> {
        Self::from_f64_with(value, Overflow::Reject)
    }

    /// Loads and converts a native fp64 value, handling exponents that don't
    /// fit in the field according to `overflow`.
    pub fn from_f64_with(value: f64, overflow: Overflow) -> Result<Self> {
        if !value.is_finite() {
            return Err(FloatError::NotFinite);
        }

        let sign = value < 0.0;
        let magnitude = if sign { -value } else { value };
        if magnitude == 0.0 {
            return Ok(Self::zero(false));
        }

        let exp = scale::decimal_exponent(magnitude)?;
        let mantissa = scale::mantissa_unsigned(magnitude, exp, MANTISSA);
        // The native division may land the digits just outside of the
        // canonical decade, so normalize before packing.
        Self::normalize(sign, exp, mantissa, overflow)
    }

    /// Loads and converts a native fp32 value.
    pub fn from_f32(value: f32) -> Result<Self> {
        Self::from_f64(value as f64)
    }

    /// Convert this float to fp64. Mantissas with more digits than fp64 holds
    /// are rounded by the native arithmetic, and exponents outside of the fp64
    /// range become inf or zero.
    pub fn as_f64(&self) -> f64 {
        if self.is_zero() {
            return if self.get_sign() { -0.0 } else { 0.0 };
        }
        let digits = self.get_mantissa() as f64 / Self::multiplier() as f64;
        let magnitude = scale::scale_by_power_of_ten(digits, self.get_exp());
        if self.get_sign() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Convert this float to fp32.
    pub fn as_f32(&self) -> f32 {
        self.as_f64() as f32
    }
}

impl<const EXPONENT: usize, const MANTISSA: usize> TryFrom<f64>
    for Float<EXPONENT, MANTISSA>
{
    type Error = FloatError;

    fn try_from(value: f64) -> Result<Self> {
        Self::from_f64(value)
    }
}

impl<const EXPONENT: usize, const MANTISSA: usize>
    From<Float<EXPONENT, MANTISSA>> for f64
{
    fn from(value: Float<EXPONENT, MANTISSA>) -> f64 {
        value.as_f64()
    }
}

#[test]
fn test_encode_fields() {
    let x = FP32::from_f64(2.0).unwrap();
    assert!(!x.get_sign());
    assert_eq!(x.get_exp(), 0);
    assert_eq!(x.get_mantissa(), 200000);

    let x = FP32::from_f64(-2.0).unwrap();
    assert!(x.get_sign());
    assert_eq!(x.get_exp(), 0);
    assert_eq!(x.get_mantissa(), 200000);

    let x = FP32::from_f64(99.0).unwrap();
    assert_eq!(x.get_exp(), 1);
    assert_eq!(x.get_mantissa(), 990000);

    let x = FP32::from_f64(0.05).unwrap();
    assert_eq!(x.get_exp(), -2);
    assert_eq!(x.get_mantissa(), 500000);

    // Digits beyond the field are truncated, not rounded.
    let x = FP32::from_f64(1.2345678).unwrap();
    assert_eq!(x.get_exp(), 0);
    assert_eq!(x.get_mantissa(), 123456);
}

#[test]
fn test_encode_zero() {
    let x = FP32::from_f64(0.0).unwrap();
    assert_eq!(x, FP32::zero(false));
    assert_eq!(x.as_f64(), 0.0);
    let x = FP32::from_f64(-0.0).unwrap();
    assert!(x.is_zero());
    assert_eq!(FP32::default().as_f64(), 0.0);
}

#[test]
fn test_encode_special_values() {
    assert_eq!(FP32::from_f64(f64::NAN), Err(FloatError::NotFinite));
    assert_eq!(FP32::from_f64(f64::INFINITY), Err(FloatError::NotFinite));
    assert_eq!(FP32::from_f64(f64::NEG_INFINITY), Err(FloatError::NotFinite));
    assert_eq!(FP32::from_f32(f32::NAN), Err(FloatError::NotFinite));
}

#[test]
fn test_encode_out_of_range() {
    // FP16 has 5 exponent bits, so the decimal exponent is in [-16, 15].
    use super::float::FP16;
    assert_eq!(
        FP16::from_f64(1e20),
        Err(FloatError::OutOfRange {
            value: 20,
            width: 5
        })
    );
    assert_eq!(
        FP16::from_f64_with(1e20, Overflow::Saturate),
        Ok(FP16::max_magnitude(false))
    );
    assert_eq!(
        FP16::from_f64_with(-1e-20, Overflow::Saturate),
        Ok(FP16::zero(true))
    );
    // Wrapping keeps the low exponent bits: 20 wraps to -12.
    let wrapped = FP16::from_f64_with(1e20, Overflow::Wrap).unwrap();
    assert_eq!(wrapped.get_exp(), -12);
    assert!(FP16::from_f64(1e15).is_ok());
    assert!(FP16::from_f64(2e-16).is_ok());
}

#[test]
fn test_round_trip_native_float_cast() {
    for v in utils::get_test_values() {
        let a = FP32::from_f64(v).unwrap();
        assert!(a.is_normalized());
        assert!(utils::approx_eq(a.as_f64(), v, 2e-5), "{} != {}", a.as_f64(), v);
        // Truncation only moves values toward zero.
        assert!(a.as_f64().abs() <= v.abs() * (1.0 + 1e-12));

        let b = super::float::FP64::from_f64(v).unwrap();
        assert!(utils::approx_eq(b.as_f64(), v, 1e-13));
    }
}

#[test]
fn test_cast_f32() {
    let a = FP32::from_f32(0.0134567f32).unwrap();
    assert!(utils::approx_eq(a.as_f32() as f64, 0.0134567, 2e-5));
    let a = FP32::from_f32(-2.0).unwrap();
    assert_eq!(a.as_f32(), -2.0);
    let a: FP32 = 100.0f64.try_into().unwrap();
    assert_eq!(f64::from(a), 100.0);
}

#[test]
fn test_cast_extreme_exponents() {
    type Wide = Float<16, 23>;
    let tiny = Wide::from_f64(5e-324).unwrap();
    assert_eq!(tiny.get_exp(), -324);
    assert!(tiny.as_f64() > 0.0);

    let huge = Wide::from_f64(f64::MAX).unwrap();
    assert_eq!(huge.get_exp(), 308);
    assert!(utils::approx_eq(huge.as_f64(), f64::MAX, 1e-5));

    // Values beyond the native range decode to inf.
    let x = Wide::from_integers(false, 400, 100000, Overflow::Reject).unwrap();
    assert_eq!(x.as_f64(), f64::INFINITY);
    let x = Wide::from_integers(true, -400, 100000, Overflow::Reject).unwrap();
    assert_eq!(x.as_f64(), -0.0);
}

#[test]
fn test_decode_zero_with_any_exponent() {
    use super::float::FP64;
    let z = FP64::from_integers(false, 400, 0, Overflow::Reject).unwrap();
    assert!(z.is_zero());
    assert_eq!(z.as_f64(), 0.0);
    assert!(!z.as_f64().is_nan());

    let z = FP64::from_integers(true, -400, 0, Overflow::Reject).unwrap();
    assert_eq!(z.as_f64(), 0.0);
    assert!(z.as_f64().is_sign_negative());

    let z = FP32::from_integers(false, 127, 0, Overflow::Reject).unwrap();
    assert_eq!(z.as_f32(), 0.0);
}
