use crate::{FloatError, Overflow, FP32};
use pyo3::exceptions::{PyValueError, PyZeroDivisionError};
use pyo3::prelude::*;

impl From<FloatError> for PyErr {
    fn from(err: FloatError) -> PyErr {
        match err {
            FloatError::DivisionByZero => {
                PyZeroDivisionError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// A 32-bit decimal float: 1 sign bit, 8 exponent bits (a power of ten)
/// and 23 mantissa bits.
#[pyclass]
struct Float32 {
    inner: FP32,
}

#[pymethods]
impl Float32 {
    /// Create a new number from its fields.
    ///
    /// Args:
    ///     is_negative: Whether the number is negative (sign bit)
    ///     exp: The decimal exponent
    ///     mantissa: The mantissa integer, scaled by 10^5
    #[new]
    fn new(is_negative: bool, exp: i64, mantissa: u64) -> PyResult<Self> {
        let inner = FP32::from_integers(
            is_negative,
            exp as i128,
            mantissa as u128,
            Overflow::Reject,
        )?;
        Ok(Float32 { inner })
    }

    /// Convert a python float. Raises ValueError for NaN, infinity and
    /// exponents that don't fit.
    #[staticmethod]
    fn from_float(val: f64) -> PyResult<Self> {
        Ok(Float32 {
            inner: FP32::from_f64(val)?,
        })
    }

    /// Parse a number such as "-1.25e3".
    #[staticmethod]
    fn parse(val: &str) -> PyResult<Self> {
        Ok(Float32 {
            inner: val.parse()?,
        })
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
    fn __repr__(&self) -> String {
        format!(
            "Float32(sign={}, exp={}, mantissa={})",
            self.inner.get_sign(),
            self.inner.get_exp(),
            self.inner.get_mantissa()
        )
    }
    /// Returns the mantissa integer.
    fn get_mantissa(&self) -> u64 {
        // The mantissa field is 23 bits wide.
        self.inner.get_mantissa() as u64
    }
    /// Returns the decimal exponent.
    fn get_exponent(&self) -> i64 {
        // The exponent field is 8 bits wide.
        self.inner.get_exp() as i64
    }
    /// Returns the width of the exponent field in bits.
    fn get_exponent_len(&self) -> usize {
        self.inner.get_exponent_len()
    }
    /// Returns the width of the mantissa field in bits.
    fn get_mantissa_len(&self) -> usize {
        self.inner.get_mantissa_len()
    }
    /// Returns true if the number is negative
    fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }
    /// Returns true if the number is +- zero.
    fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }
    /// convert to f64.
    fn to_float(&self) -> f64 {
        self.inner.as_f64()
    }

    fn __add__(&self, other: &Float32) -> PyResult<Float32> {
        Ok(Float32 {
            inner: FP32::checked_add(self.inner, other.inner)?,
        })
    }
    fn __sub__(&self, other: &Float32) -> PyResult<Float32> {
        Ok(Float32 {
            inner: FP32::checked_sub(self.inner, other.inner)?,
        })
    }
    fn __mul__(&self, other: &Float32) -> PyResult<Float32> {
        Ok(Float32 {
            inner: FP32::checked_mul(self.inner, other.inner)?,
        })
    }
    fn __truediv__(&self, other: &Float32) -> PyResult<Float32> {
        Ok(Float32 {
            inner: FP32::checked_div(self.inner, other.inner)?,
        })
    }
    fn __neg__(&self) -> Float32 {
        Float32 {
            inner: self.inner.neg(),
        }
    }
    fn __eq__(&self, other: &Float32) -> bool {
        self.inner == other.inner
    }
    /// Returns 1/x.
    fn reciprocal(&self) -> PyResult<Float32> {
        Ok(Float32 {
            inner: self.inner.reciprocal()?,
        })
    }
    /// Returns 1/x computed by negating the exponent only. This is exact
    /// only for powers of ten.
    fn approximate_reciprocal(&self) -> PyResult<Float32> {
        Ok(Float32 {
            inner: self.inner.approximate_reciprocal()?,
        })
    }
    /// Prints the number using the internal representation.
    fn dump(&self) {
        self.inner.dump();
    }
} // impl Float32

#[pymodule]
fn _decfloat(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Float32>()?;
    Ok(())
}
