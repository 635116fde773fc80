//! Property-based tests for the BLS12-381 engine

use bls381::bls12_381::Bls12_381Fp as Fp;
use bls381::prelude::*;
use num_bigint::BigUint;
use proptest::prelude::*;

/// Scalars drawn from 254-bit integers, always below r
fn scalar() -> impl Strategy<Value = Scalar> {
    any::<[u8; 32]>().prop_map(|mut bytes| {
        bytes[31] &= 0x3f;
        Scalar::from_bytes(&bytes).unwrap()
    })
}

fn field_modulus() -> BigUint {
    BigUint::parse_bytes(
        bls381::params::pairing::bls12_381::BLS12_381_FIELD_MODULUS.as_bytes(),
        10,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn scalar_field_laws(a in scalar(), b in scalar(), c in scalar()) {
        prop_assert_eq!((a + b) * c, a * c + b * c);
        prop_assert_eq!(a * b, b * a);
        prop_assert_eq!(a - a, Scalar::zero());
        if !bool::from(a.is_zero()) {
            prop_assert_eq!(a * a.invert().unwrap(), Scalar::one());
        }
    }

    #[test]
    fn scalar_bytes_round_trip(a in scalar()) {
        let bytes = a.to_bytes();
        prop_assert_eq!(Scalar::from_bytes(&bytes).unwrap(), a);
        prop_assert_eq!(<Scalar as Serialize>::from_bytes(&bytes).unwrap(), a);
    }

    #[test]
    fn fp_from_bytes_accepts_exactly_canonical(bytes in any::<[u8; 48]>()) {
        let canonical = BigUint::from_bytes_be(&bytes) < field_modulus();
        let decoded = Fp::from_bytes(&bytes);
        prop_assert_eq!(bool::from(decoded.is_some()), canonical);
        if canonical {
            prop_assert_eq!(decoded.unwrap().to_bytes(), bytes);
        }
    }

    #[test]
    fn g1_decoding_never_accepts_invalid_points(bytes in any::<[u8; 48]>()) {
        if let Ok(p) = G1Affine::from_compressed(&bytes) {
            prop_assert!(bool::from(p.is_on_curve()));
            prop_assert!(bool::from(p.is_torsion_free()));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn g1_mul_glv_matches_scalar_mul(k in scalar()) {
        let p = G1Projective::generator() * Scalar::from(5u64);
        prop_assert_eq!(p.mul_glv(&k).unwrap(), p * k);
    }

    #[test]
    fn g1_compression_round_trip(k in scalar()) {
        let p = G1Affine::from(G1Projective::generator() * k);
        prop_assert_eq!(G1Affine::from_compressed(&p.to_compressed()).unwrap(), p);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn g2_mul_gls_matches_scalar_mul(k in scalar()) {
        let p = G2Projective::generator();
        prop_assert_eq!(p.mul_gls(&k).unwrap(), p * k);
    }

    #[test]
    fn g2_compression_round_trip(k in scalar()) {
        let p = G2Affine::from(G2Projective::generator() * k);
        prop_assert_eq!(G2Affine::from_compressed(&p.to_compressed()).unwrap(), p);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(3))]

    #[test]
    fn pairing_is_bilinear(a in scalar(), b in scalar()) {
        let p = G1Affine::from(G1Projective::generator() * a);
        let q = G2Affine::from(G2Projective::generator() * b);
        prop_assert_eq!(pairing(&p, &q), Gt::generator() * (a * b));
    }
}
