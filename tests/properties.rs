use decfloat::bits::{
    bits_to_signed, bits_to_unsigned, pack_signed, pack_unsigned,
    signed_to_bits, unsigned_to_bits,
};
use decfloat::{Float, Overflow, FP16, FP32, FP64};
use proptest::prelude::*;

fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        return actual.abs();
    }
    ((actual - expected) / expected).abs()
}

// Finite values with a decimal exponent that fits in FP32.
fn fp32_value() -> impl Strategy<Value = f64> {
    (-1e30f64..1e30f64).prop_filter("not too small", |v| {
        *v == 0.0 || v.abs() > 1e-30
    })
}

proptest! {
    #[test]
    fn unsigned_bits_round_trip(v in 0u128..(1 << 23)) {
        prop_assert_eq!(bits_to_unsigned(&unsigned_to_bits::<23>(v)), v);
    }

    #[test]
    fn signed_bits_round_trip(v in -128i128..128) {
        prop_assert_eq!(bits_to_signed(&signed_to_bits::<8>(v)), v);
    }

    #[test]
    fn wide_bits_round_trip(u in any::<u64>(), s in any::<i64>()) {
        let u = u as u128;
        let s = s as i128;
        prop_assert_eq!(bits_to_unsigned(&unsigned_to_bits::<64>(u)), u);
        prop_assert_eq!(bits_to_signed(&signed_to_bits::<65>(s)), s);
    }

    #[test]
    fn pack_matches_field_range(v in -1000i128..1000) {
        let fits = (-512..512).contains(&v);
        prop_assert_eq!(pack_signed::<10>(v, Overflow::Reject).is_ok(), fits);
        if fits {
            let bits = pack_signed::<10>(v, Overflow::Reject).unwrap();
            prop_assert_eq!(bits_to_signed(&bits), v);
        }
        let wrapped = pack_signed::<10>(v, Overflow::Wrap).unwrap();
        prop_assert_eq!((bits_to_signed(&wrapped) - v).rem_euclid(1024), 0);
        let saturated = pack_signed::<10>(v, Overflow::Saturate).unwrap();
        prop_assert_eq!(bits_to_signed(&saturated), v.clamp(-512, 511));
        let saturated = pack_unsigned::<9>(v.unsigned_abs(), Overflow::Saturate);
        prop_assert_eq!(bits_to_unsigned(&saturated.unwrap()), v.unsigned_abs().min(511));
    }

    #[test]
    fn encode_is_sign_symmetric(v in fp32_value()) {
        let pos = FP32::from_f64(v).unwrap();
        let neg = FP32::from_f64(-v).unwrap();
        prop_assert_eq!(pos.get_exp(), neg.get_exp());
        prop_assert_eq!(pos.get_mantissa(), neg.get_mantissa());
        prop_assert_eq!(pos.as_f64(), -neg.as_f64());
    }

    #[test]
    fn negate_flips_decoded_value(v in fp32_value()) {
        let x = FP32::from_f64(v).unwrap();
        let negated = x.neg();
        prop_assert_eq!(negated.get_exponent_bits(), x.get_exponent_bits());
        prop_assert_eq!(negated.get_mantissa_bits(), x.get_mantissa_bits());
        prop_assert_eq!(negated.as_f64(), -x.as_f64());
        prop_assert!(relative_error(negated.as_f64(), -v) < 2e-5);
        prop_assert_eq!(-negated, x);

        let y = FP64::from_f64(v).unwrap();
        prop_assert!(relative_error((-y).as_f64(), -v) < 1e-13);
    }

    #[test]
    fn encode_decode_error_is_bounded(v in fp32_value()) {
        let x = FP32::from_f64(v).unwrap();
        prop_assert!(x.is_normalized());
        // Five digits after the leading one are kept.
        prop_assert!(relative_error(x.as_f64(), v) < 2e-5);

        let y = FP64::from_f64(v).unwrap();
        prop_assert!(relative_error(y.as_f64(), v) < 1e-13);
    }

    #[test]
    fn arithmetic_results_are_normalized(a in fp32_value(), b in fp32_value()) {
        let a = FP32::from_f64(a).unwrap();
        let b = FP32::from_f64(b).unwrap();
        for r in [a + b, a - b, a * b, a / b] {
            prop_assert!(r.is_normalized(), "{:?}", r);
        }
        if let Ok(r) = FP32::checked_mul(a, b) {
            prop_assert!(r.is_normalized());
        }
    }

    #[test]
    fn add_is_commutative(a in fp32_value(), b in fp32_value()) {
        let a = FP32::from_f64(a).unwrap();
        let b = FP32::from_f64(b).unwrap();
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!(a * b, b * a);
    }

    #[test]
    fn arithmetic_tracks_native(a in 1.0f64..1000.0, b in 1.0f64..1000.0) {
        let x = FP64::from_f64(a).unwrap();
        let y = FP64::from_f64(b).unwrap();
        prop_assert!(relative_error((x + y).as_f64(), a + b) < 1e-12);
        prop_assert!(relative_error((x * y).as_f64(), a * b) < 1e-12);
        prop_assert!(relative_error((x / y).as_f64(), a / b) < 1e-12);
    }

    #[test]
    fn print_parse_round_trip(v in fp32_value()) {
        let x = FP32::from_f64(v).unwrap();
        let y: FP32 = x.to_string().parse().unwrap();
        prop_assert_eq!(x, y);

        let x = FP16::from_f64_with(v, Overflow::Saturate).unwrap();
        let y: FP16 = x.to_string().parse().unwrap();
        prop_assert_eq!(x, y);
    }

    #[test]
    fn custom_widths(v in -1e6f64..1e6f64) {
        type Small = Float<4, 12>;
        let x = Small::from_f64(v).unwrap();
        prop_assert!(x.is_normalized());
        // 12 mantissa bits keep two digits.
        prop_assert!(v == 0.0 || relative_error(x.as_f64(), v) < 0.1);
    }
}
