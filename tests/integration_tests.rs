//! Cross-crate integration tests for the bls381 facade

use bls381::api::{Error as ApiError, ResultExt};
use bls381::bls12_381::{parameters, Bls12_381Fp as Fp, Fp2};
use bls381::params::pairing::bls12_381 as consts;
use bls381::prelude::*;

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

#[test]
fn test_signature_style_pairing_check() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);

    let sk = Bls12::random_scalar(&mut rng).unwrap();
    let pk = Bls12::g2_mul(&Bls12::g2_generator(), &sk);
    let h = G1Affine::from(G1Projective::random(&mut rng).unwrap());
    let sig = Bls12::g1_mul(&h, &sk);

    // e(sig, -G2) e(H, pk) = 1
    let check = Bls12::multi_pairing(&[(sig, -Bls12::g2_generator()), (h, pk)]);
    assert!(bool::from(check.is_identity()));

    // A signature under a different key fails
    let forged = Bls12::g1_mul(&h, &(sk + Scalar::one()));
    let check = Bls12::multi_pairing(&[(forged, -Bls12::g2_generator()), (h, pk)]);
    assert!(!bool::from(check.is_identity()));
}

#[test]
fn test_aggregate_verification_with_prepared_keys() {
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let g2 = G2Prepared::from(-G2Affine::generator());

    let mut sig = G1Projective::identity();
    let mut hashes = Vec::new();
    let mut keys = Vec::new();
    for _ in 0..3 {
        let sk = Scalar::random(&mut rng).unwrap();
        let h = G1Affine::from(G1Projective::random(&mut rng).unwrap());
        sig += h * sk;
        hashes.push(h);
        keys.push(G2Prepared::from(G2Affine::from(G2Projective::generator() * sk)));
    }
    let sig = G1Affine::from(sig);

    let mut terms: Vec<(&G1Affine, &G2Prepared)> = vec![(&sig, &g2)];
    terms.extend(hashes.iter().zip(keys.iter()));
    let result = multi_miller_loop(&terms).final_exponentiation();
    assert_eq!(result, Gt::identity());
}

#[test]
fn test_encoding_sizes_match_params() {
    let g1 = G1Affine::generator();
    let g2 = G2Affine::generator();

    assert_eq!(g1.to_compressed().len(), consts::BLS12_381_G1_COMPRESSED_SIZE);
    assert_eq!(g1.to_uncompressed().len(), consts::BLS12_381_G1_UNCOMPRESSED_SIZE);
    assert_eq!(g2.to_compressed().len(), consts::BLS12_381_G2_COMPRESSED_SIZE);
    assert_eq!(g2.to_uncompressed().len(), consts::BLS12_381_G2_UNCOMPRESSED_SIZE);
    assert_eq!(Scalar::one().to_bytes().len(), consts::BLS12_381_SCALAR_SIZE);
    assert_eq!(Fp::one().to_bytes().len(), consts::BLS12_381_FIELD_ELEMENT_SIZE);
}

#[test]
fn test_parameters_match_decimal_constants() {
    let p = parameters();
    assert_eq!(p.field_modulus.to_string(), consts::BLS12_381_FIELD_MODULUS);
    assert_eq!(p.group_order.to_string(), consts::BLS12_381_GROUP_ORDER);
    assert_eq!(p.x.magnitude().to_string(), consts::BLS12_381_X);

    let g1 = G1Affine::generator();
    assert_eq!(
        g1.x(),
        Fp::from_decimal(consts::BLS12_381_G1_GENERATOR_X).unwrap()
    );
    assert_eq!((g1.x(), g1.y()), p.g1_generator);

    let g2 = G2Affine::generator();
    assert_eq!(
        g2.x(),
        Fp2::new(
            Fp::from_decimal(consts::BLS12_381_G2_GENERATOR_X_C0).unwrap(),
            Fp::from_decimal(consts::BLS12_381_G2_GENERATOR_X_C1).unwrap(),
        )
    );
    assert_eq!((g2.x(), g2.y()), p.g2_generator);
}

#[test]
fn test_errors_surface_as_api_errors() {
    let err = <G1Affine as Serialize>::from_bytes(&[0u8; 48]).unwrap_err();
    assert!(matches!(
        err,
        ApiError::SerializationError {
            context: "G1Affine",
            ..
        }
    ));

    let err = <G2Affine as Serialize>::from_bytes(&[0u8; 95])
        .with_context("public key")
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::InvalidLength {
            context: "public key",
            expected: 96,
            actual: 95,
        }
    );

    let err = <Scalar as SerializeSecret>::from_bytes(&[0xffu8; 32]).unwrap_err();
    assert!(err.to_string().contains("Scalar"));

    let err = <G1Affine as Serialize>::from_bytes(&[0u8; 48])
        .with_message("signature rejected")
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::SerializationError {
            context: "G1Affine",
            message: "signature rejected".to_string(),
        }
    );

    let err = <Scalar as Serialize>::from_bytes(&[0u8; 31])
        .wrap_err(|| "short secret key")
        .unwrap_err();
    assert_eq!(err, "short secret key");
}

#[test]
fn test_engine_name_and_generators() {
    assert_eq!(Bls12::name(), "BLS12-381");
    assert_eq!(
        Bls12::pairing(&Bls12::g1_generator(), &Bls12::g2_generator()),
        Gt::generator()
    );
}
