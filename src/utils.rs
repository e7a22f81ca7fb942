//! This file contains simple helper functions and test helpers.

/// Returns a mask full of 1s, of `b` bits (up to 128).
pub const fn mask(b: usize) -> u128 {
    if b == 0 {
        return 0;
    }
    u128::MAX >> (128 - b)
}

#[test]
fn test_masking() {
    assert_eq!(mask(0), 0x0);
    assert_eq!(mask(1), 0x1);
    assert_eq!(mask(8), 255);
    assert_eq!(mask(64), u64::MAX as u128);
    assert_eq!(mask(128), u128::MAX);
}

/// Returns a list of finite values that various tests use to catch edge
/// cases in the decimal conversion.
#[cfg(test)]
pub(crate) fn get_test_values() -> [f64; 18] {
    [
        1.0,
        -1.0,
        0.1,
        0.05,
        0.0134567,
        2.0,
        -2.0,
        9.999,
        10.0,
        99.0,
        100.0,
        -0.00001,
        355. / 113.,
        core::f64::consts::PI,
        core::f64::consts::E,
        123456.789,
        1e-30,
        -7.5e22,
    ]
}

/// Returns true if `a` and `b` differ by at most `tolerance`, relative to the
/// magnitude of `b`.
#[cfg(test)]
pub(crate) fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if b == 0.0 {
        return a == 0.0;
    }
    let diff = if a > b { a - b } else { b - a };
    let scale = if b < 0.0 { -b } else { b };
    diff / scale <= tolerance
}
