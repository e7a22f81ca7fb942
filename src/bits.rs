//! Fixed-width bit sequences and their conversion to and from integers.
//!
//! Bit sequences are stored most-significant bit first. Signed values use the
//! two's complement encoding, where bit zero carries the weight -2^(N-1).

use super::error::{FloatError, Result};
use super::utils::mask;
use core::fmt::Display;
use core::ops::Index;

/// A fixed-length sequence of bits, most significant bit first. The length is
/// part of the type and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bits<const N: usize>([bool; N]);

impl<const N: usize> Bits<N> {
    /// Wraps the array `bits`, where `bits[0]` is the most significant bit.
    pub const fn new(bits: [bool; N]) -> Self {
        Bits(bits)
    }

    /// Returns a sequence where every bit is cleared.
    pub const fn zeros() -> Self {
        Bits([false; N])
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns the bit at index `idx` (zero is the MSB), if it exists.
    pub fn get(&self, idx: usize) -> Option<bool> {
        self.0.get(idx).copied()
    }

    pub fn as_array(&self) -> &[bool; N] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }
}

impl<const N: usize> Default for Bits<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> From<[bool; N]> for Bits<N> {
    fn from(bits: [bool; N]) -> Self {
        Bits(bits)
    }
}

impl<const N: usize> Index<usize> for Bits<N> {
    type Output = bool;
    fn index(&self, idx: usize) -> &bool {
        &self.0[idx]
    }
}

impl<const N: usize> Display for Bits<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for bit in self.iter() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Selects what happens when an integer does not fit in the destination
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Report the value as `FloatError::OutOfRange`.
    Reject,
    /// Keep the low bits and drop the high bits.
    Wrap,
    /// Clamp the value to the closest representable value.
    Saturate,
}

/// Returns the largest unsigned value that fits in `N` bits.
pub const fn max_unsigned<const N: usize>() -> u128 {
    mask(N)
}

/// Returns the (min, max) range of a two's complement integer of `N` bits.
pub const fn signed_bounds<const N: usize>() -> (i128, i128) {
    const { assert!(N >= 2 && N <= 128, "signed fields need 2..=128 bits") };
    (i128::MIN >> (128 - N), i128::MAX >> (128 - N))
}

/// Returns true if `value` can be stored as an unsigned integer of `N` bits.
pub const fn fits_unsigned<const N: usize>(value: u128) -> bool {
    value <= max_unsigned::<N>()
}

/// Returns true if `value` can be stored as a signed integer of `N` bits.
pub const fn fits_signed<const N: usize>(value: i128) -> bool {
    let (min, max) = signed_bounds::<N>();
    value >= min && value <= max
}

/// Converts the bits to an unsigned integer. Bit zero has the weight 2^(N-1).
pub fn bits_to_unsigned<const N: usize>(bits: &Bits<N>) -> u128 {
    const { assert!(N <= 128, "fields are limited to 128 bits") };
    bits.iter().fold(0u128, |acc, bit| (acc << 1) | bit as u128)
}

/// Converts the bits to a two's complement signed integer. Bit zero is the
/// sign bit and has the weight -2^(N-1).
pub fn bits_to_signed<const N: usize>(bits: &Bits<N>) -> i128 {
    const { assert!(N >= 2 && N <= 128, "signed fields need 2..=128 bits") };
    let rest = bits
        .iter()
        .skip(1)
        .fold(0u128, |acc, bit| (acc << 1) | bit as u128);
    // The lower N-1 bits are below 2^127, so this cast is lossless.
    let rest = rest as i128;
    if bits[0] {
        ((-1i128) << (N - 1)) + rest
    } else {
        rest
    }
}

/// Converts `value` to `N` bits. Values that don't fit are truncated to the
/// low `N` bits. See `pack_unsigned` for the checked version.
pub fn unsigned_to_bits<const N: usize>(value: u128) -> Bits<N> {
    const { assert!(N <= 128, "fields are limited to 128 bits") };
    let mut bits = [false; N];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (value >> (N - 1 - i)) & 1 == 1;
    }
    Bits(bits)
}

/// Converts `value` to `N` bits of two's complement. Values that don't fit
/// wrap around modulo 2^N. See `pack_signed` for the checked version.
pub fn signed_to_bits<const N: usize>(value: i128) -> Bits<N> {
    const { assert!(N >= 2 && N <= 128, "signed fields need 2..=128 bits") };
    unsigned_to_bits::<N>(value as u128)
}

/// Converts `value` to `N` bits, resolving values that don't fit according to
/// `overflow`.
pub fn pack_unsigned<const N: usize>(
    value: u128,
    overflow: Overflow,
) -> Result<Bits<N>> {
    if fits_unsigned::<N>(value) {
        return Ok(unsigned_to_bits::<N>(value));
    }

    match overflow {
        Overflow::Reject => {
            tracing::debug!(value, width = N, "unsigned value out of range");
            Err(FloatError::OutOfRange {
                value: i128::try_from(value).unwrap_or(i128::MAX),
                width: N,
            })
        }
        Overflow::Wrap => {
            tracing::debug!(value, width = N, "wrapping unsigned value");
            Ok(unsigned_to_bits::<N>(value))
        }
        Overflow::Saturate => {
            tracing::debug!(value, width = N, "saturating unsigned value");
            Ok(unsigned_to_bits::<N>(max_unsigned::<N>()))
        }
    }
}

/// Converts `value` to `N` bits of two's complement, resolving values that
/// don't fit according to `overflow`.
pub fn pack_signed<const N: usize>(
    value: i128,
    overflow: Overflow,
) -> Result<Bits<N>> {
    if fits_signed::<N>(value) {
        return Ok(signed_to_bits::<N>(value));
    }

    match overflow {
        Overflow::Reject => {
            tracing::debug!(value, width = N, "signed value out of range");
            Err(FloatError::OutOfRange { value, width: N })
        }
        Overflow::Wrap => {
            tracing::debug!(value, width = N, "wrapping signed value");
            Ok(signed_to_bits::<N>(value))
        }
        Overflow::Saturate => {
            tracing::debug!(value, width = N, "saturating signed value");
            let (min, max) = signed_bounds::<N>();
            Ok(signed_to_bits::<N>(value.clamp(min, max)))
        }
    }
}

#[test]
fn test_bits_to_unsigned() {
    assert_eq!(bits_to_unsigned(&Bits::new([false, false])), 0);
    assert_eq!(bits_to_unsigned(&Bits::new([false, true])), 1);
    assert_eq!(bits_to_unsigned(&Bits::new([true, false])), 2);
    assert_eq!(bits_to_unsigned(&Bits::new([true, true])), 3);
    assert_eq!(bits_to_unsigned(&Bits::new([true, false, true, true])), 11);
    assert_eq!(bits_to_unsigned(&Bits::<0>::zeros()), 0);
    assert_eq!(bits_to_unsigned(&Bits::new([true; 128])), u128::MAX);
}

#[test]
fn test_bits_to_signed() {
    assert_eq!(bits_to_signed(&Bits::new([false, false])), 0);
    assert_eq!(bits_to_signed(&Bits::new([false, true])), 1);
    assert_eq!(bits_to_signed(&Bits::new([true, false])), -2);
    assert_eq!(bits_to_signed(&Bits::new([true, true])), -1);
    assert_eq!(bits_to_signed(&Bits::new([false, false, true])), 1);
    assert_eq!(bits_to_signed(&Bits::new([true, true, true])), -1);
    assert_eq!(bits_to_signed(&Bits::new([true, true, false])), -2);
    assert_eq!(bits_to_signed(&Bits::new([true, false, true])), -3);
    assert_eq!(bits_to_signed(&Bits::new([true, false, false])), -4);

    let mut min = [false; 128];
    min[0] = true;
    assert_eq!(bits_to_signed(&Bits::new(min)), i128::MIN);
    assert_eq!(bits_to_signed(&Bits::new([true; 128])), -1);
}

#[test]
fn test_to_bits() {
    assert_eq!(unsigned_to_bits::<2>(0), Bits::new([false, false]));
    assert_eq!(unsigned_to_bits::<2>(1), Bits::new([false, true]));
    assert_eq!(unsigned_to_bits::<2>(2), Bits::new([true, false]));
    assert_eq!(unsigned_to_bits::<2>(3), Bits::new([true, true]));

    assert_eq!(signed_to_bits::<2>(0), Bits::new([false, false]));
    assert_eq!(signed_to_bits::<2>(1), Bits::new([false, true]));
    assert_eq!(signed_to_bits::<2>(-2), Bits::new([true, false]));
    assert_eq!(signed_to_bits::<2>(-1), Bits::new([true, true]));
    assert_eq!(signed_to_bits::<3>(1), Bits::new([false, false, true]));
    assert_eq!(signed_to_bits::<3>(-1), Bits::new([true, true, true]));
    assert_eq!(signed_to_bits::<3>(-2), Bits::new([true, true, false]));
    assert_eq!(signed_to_bits::<3>(-3), Bits::new([true, false, true]));
    assert_eq!(signed_to_bits::<3>(-4), Bits::new([true, false, false]));
}

#[test]
fn test_truncating_conversions() {
    // 5 = 0b101, only the low two bits survive.
    assert_eq!(unsigned_to_bits::<2>(5), Bits::new([false, true]));
    // 4 wraps to -4 in three bits.
    assert_eq!(bits_to_signed(&signed_to_bits::<3>(4)), -4);
    assert_eq!(bits_to_signed(&signed_to_bits::<3>(-5)), 3);
}

#[test]
fn test_pack_policies() {
    assert_eq!(
        pack_unsigned::<3>(8, Overflow::Reject),
        Err(FloatError::OutOfRange { value: 8, width: 3 })
    );
    assert_eq!(pack_unsigned::<3>(7, Overflow::Reject), Ok(Bits::new([true; 3])));
    assert_eq!(
        pack_unsigned::<3>(9, Overflow::Wrap),
        Ok(Bits::new([false, false, true]))
    );
    assert_eq!(pack_unsigned::<3>(9, Overflow::Saturate), Ok(Bits::new([true; 3])));

    assert_eq!(
        pack_signed::<3>(4, Overflow::Reject),
        Err(FloatError::OutOfRange { value: 4, width: 3 })
    );
    assert_eq!(
        pack_signed::<3>(-5, Overflow::Reject),
        Err(FloatError::OutOfRange { value: -5, width: 3 })
    );
    let saturated = pack_signed::<3>(100, Overflow::Saturate).unwrap();
    assert_eq!(bits_to_signed(&saturated), 3);
    let saturated = pack_signed::<3>(-100, Overflow::Saturate).unwrap();
    assert_eq!(bits_to_signed(&saturated), -4);
    let wrapped = pack_signed::<3>(4, Overflow::Wrap).unwrap();
    assert_eq!(bits_to_signed(&wrapped), -4);
}

#[test]
fn test_bounds() {
    assert_eq!(signed_bounds::<2>(), (-2, 1));
    assert_eq!(signed_bounds::<8>(), (-128, 127));
    assert_eq!(signed_bounds::<128>(), (i128::MIN, i128::MAX));
    assert!(fits_unsigned::<128>(u128::MAX));
    assert!(!fits_unsigned::<64>(1 << 64));
    assert!(fits_signed::<8>(-128));
    assert!(!fits_signed::<8>(128));
}

#[test]
fn test_bits_display() {
    let bits = unsigned_to_bits::<6>(0b100110);
    assert_eq!(std::format!("{}", bits), "100110");
    assert_eq!(bits.len(), 6);
    assert_eq!(bits.get(0), Some(true));
    assert_eq!(bits.get(1), Some(false));
    assert_eq!(bits.get(6), None);
    assert_eq!(Bits::<4>::default(), Bits::zeros());
}
