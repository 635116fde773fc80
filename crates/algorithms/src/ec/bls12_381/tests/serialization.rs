//! Serialization and deserialization tests for BLS12-381

use super::super::{G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use super::groups::{g1_outside_subgroup, g2_outside_subgroup};
use crate::error::Error;

use bls381_api::{Error as CoreError, Serialize, SerializeSecret};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

const G1_GENERATOR_COMPRESSED: &str = "97f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb";

const G1_GENERATOR_UNCOMPRESSED: &str = "17f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb08b3f481e3aaa0f1a09e30ed741d8ae4fcf5e095d5d00af600db18cb2c04b3edd03cc744a2888ae40caa232946c5e7e1";

const G2_GENERATOR_COMPRESSED: &str = "93e02b6052719f607dacd3a088274f65596bd0d09920b61ab5da61bbdc7f5049334cf11213945d57e5ac7d055d042b7e024aa2b2f08f0a91260805272dc51051c6e47ad4fa403b02b4510b647ae3d1770bac0326a805bbefd48056c8c121bdb8";

const G2_GENERATOR_UNCOMPRESSED: &str = "13e02b6052719f607dacd3a088274f65596bd0d09920b61ab5da61bbdc7f5049334cf11213945d57e5ac7d055d042b7e024aa2b2f08f0a91260805272dc51051c6e47ad4fa403b02b4510b647ae3d1770bac0326a805bbefd48056c8c121bdb80606c4a02ea734cc32acd2b02bc28b99cb3e287e85a763af267492ab572e99ab3f370d275cec1da1aaa9075ff05f79be0ce5d527727d6e118cc9cdc6da2e351aadfd9baa8cbdd3a76d429a695160d12c923ac9cc3baca289e193548608b82801";

const FIELD_MODULUS: &str = "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab";

fn decode<const N: usize>(s: &str) -> [u8; N] {
    let bytes = hex::decode(s).unwrap();
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    out
}

fn g1_rejection(details: &'static str) -> Error {
    Error::Encoding {
        context: "G1Affine",
        details,
    }
}

fn g2_rejection(details: &'static str) -> Error {
    Error::Encoding {
        context: "G2Affine",
        details,
    }
}

// ============================================================================
// G1 Serialization Tests
// ============================================================================

#[test]
fn test_g1_generator_encodings() {
    let g = G1Affine::generator();
    assert_eq!(hex::encode(g.to_compressed()), G1_GENERATOR_COMPRESSED);
    assert_eq!(hex::encode(g.to_uncompressed()), G1_GENERATOR_UNCOMPRESSED);

    assert_eq!(G1Affine::from_compressed(&decode(G1_GENERATOR_COMPRESSED)).unwrap(), g);
    assert_eq!(G1Affine::from_uncompressed(&decode(G1_GENERATOR_UNCOMPRESSED)).unwrap(), g);
}

#[test]
fn test_g1_identity_encodings() {
    let id = G1Affine::identity();

    let mut compressed = [0u8; 48];
    compressed[0] = 0xc0;
    assert_eq!(id.to_compressed(), compressed);
    assert_eq!(G1Affine::from_compressed(&compressed).unwrap(), id);

    let mut uncompressed = [0u8; 96];
    uncompressed[0] = 0x40;
    assert_eq!(id.to_uncompressed(), uncompressed);
    assert_eq!(G1Affine::from_uncompressed(&uncompressed).unwrap(), id);
}

#[test]
fn test_g1_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(48);
    let g = G1Projective::generator();

    for i in 1..=8u64 {
        for p in [
            G1Affine::from(g * Scalar::from(i)),
            G1Affine::from(G1Projective::random(&mut rng).unwrap()),
        ] {
            assert_eq!(G1Affine::from_compressed(&p.to_compressed()).unwrap(), p);
            assert_eq!(G1Affine::from_uncompressed(&p.to_uncompressed()).unwrap(), p);

            // Negation flips only the sort flag
            let a = p.to_compressed();
            let b = (-p).to_compressed();
            assert_eq!(a[0] ^ b[0], 0x20);
            assert_eq!(a[1..], b[1..]);
        }
    }
}

#[test]
fn test_g1_compressed_rejections() {
    let mut bytes: [u8; 48] = decode(G1_GENERATOR_COMPRESSED);
    bytes[0] &= 0x7f;
    assert_eq!(
        G1Affine::from_compressed(&bytes),
        Err(g1_rejection("compression flag not set"))
    );

    let mut bytes = [0u8; 48];
    bytes[0] = 0xe0;
    assert_eq!(
        G1Affine::from_compressed(&bytes),
        Err(g1_rejection("sort flag set on the identity"))
    );

    bytes[0] = 0xc0;
    bytes[47] = 1;
    assert_eq!(
        G1Affine::from_compressed(&bytes),
        Err(g1_rejection("non-zero padding in identity encoding"))
    );

    let mut bytes: [u8; 48] = decode(FIELD_MODULUS);
    bytes[0] |= 0x80;
    assert_eq!(
        G1Affine::from_compressed(&bytes),
        Err(g1_rejection("non-canonical coordinate"))
    );

    // 1 + 4 is not a square mod p
    let mut bytes = [0u8; 48];
    bytes[0] = 0x80;
    bytes[47] = 1;
    assert_eq!(
        G1Affine::from_compressed(&bytes),
        Err(g1_rejection("x^3 + b is not a square"))
    );

    let outside = G1Affine::from(g1_outside_subgroup());
    assert_eq!(
        G1Affine::from_compressed(&outside.to_compressed()),
        Err(g1_rejection("point is not in the prime-order subgroup"))
    );
}

#[test]
fn test_g1_uncompressed_rejections() {
    let generator: [u8; 96] = decode(G1_GENERATOR_UNCOMPRESSED);

    let mut bytes = generator;
    bytes[0] |= 0x80;
    assert_eq!(
        G1Affine::from_uncompressed(&bytes),
        Err(g1_rejection("compression flag set on an uncompressed encoding"))
    );

    let mut bytes = generator;
    bytes[0] |= 0x20;
    assert_eq!(
        G1Affine::from_uncompressed(&bytes),
        Err(g1_rejection("sort flag set on an uncompressed encoding"))
    );

    let mut bytes = [0u8; 96];
    bytes[0] = 0x40;
    bytes[95] = 1;
    assert_eq!(
        G1Affine::from_uncompressed(&bytes),
        Err(g1_rejection("non-zero padding in identity encoding"))
    );

    let mut bytes = generator;
    bytes[48..].copy_from_slice(&decode::<48>(FIELD_MODULUS));
    assert_eq!(
        G1Affine::from_uncompressed(&bytes),
        Err(g1_rejection("non-canonical coordinate"))
    );

    let mut bytes = generator;
    bytes[95] ^= 1;
    assert_eq!(
        G1Affine::from_uncompressed(&bytes),
        Err(g1_rejection("point is not on the curve"))
    );

    let outside = G1Affine::from(g1_outside_subgroup());
    assert_eq!(
        G1Affine::from_uncompressed(&outside.to_uncompressed()),
        Err(g1_rejection("point is not in the prime-order subgroup"))
    );
}

// ============================================================================
// G2 Serialization Tests
// ============================================================================

#[test]
fn test_g2_generator_encodings() {
    let g = G2Affine::generator();
    assert_eq!(hex::encode(g.to_compressed()), G2_GENERATOR_COMPRESSED);
    assert_eq!(hex::encode(g.to_uncompressed()), G2_GENERATOR_UNCOMPRESSED);

    assert_eq!(G2Affine::from_compressed(&decode(G2_GENERATOR_COMPRESSED)).unwrap(), g);
    assert_eq!(G2Affine::from_uncompressed(&decode(G2_GENERATOR_UNCOMPRESSED)).unwrap(), g);
}

#[test]
fn test_g2_identity_encodings() {
    let id = G2Affine::identity();

    let mut compressed = [0u8; 96];
    compressed[0] = 0xc0;
    assert_eq!(id.to_compressed(), compressed);
    assert_eq!(G2Affine::from_compressed(&compressed).unwrap(), id);

    let mut uncompressed = [0u8; 192];
    uncompressed[0] = 0x40;
    assert_eq!(id.to_uncompressed(), uncompressed);
    assert_eq!(G2Affine::from_uncompressed(&uncompressed).unwrap(), id);
}

#[test]
fn test_g2_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(96);

    for _ in 0..6 {
        let p = G2Affine::from(G2Projective::random(&mut rng).unwrap());
        assert_eq!(G2Affine::from_compressed(&p.to_compressed()).unwrap(), p);
        assert_eq!(G2Affine::from_uncompressed(&p.to_uncompressed()).unwrap(), p);

        let a = p.to_compressed();
        let b = (-p).to_compressed();
        assert_eq!(a[0] ^ b[0], 0x20);
        assert_eq!(a[1..], b[1..]);
    }
}

#[test]
fn test_g2_rejections() {
    let mut bytes: [u8; 96] = decode(G2_GENERATOR_COMPRESSED);
    bytes[0] &= 0x7f;
    assert_eq!(
        G2Affine::from_compressed(&bytes),
        Err(g2_rejection("compression flag not set"))
    );

    let mut bytes = [0u8; 96];
    bytes[0] = 0xe0;
    assert_eq!(
        G2Affine::from_compressed(&bytes),
        Err(g2_rejection("sort flag set on the identity"))
    );

    // x = 0 gives 4(1 + i), a non-square
    bytes[0] = 0x80;
    assert_eq!(
        G2Affine::from_compressed(&bytes),
        Err(g2_rejection("x^3 + b is not a square"))
    );

    let mut bytes: [u8; 96] = decode(G2_GENERATOR_COMPRESSED);
    bytes[48..].copy_from_slice(&decode::<48>(FIELD_MODULUS));
    assert_eq!(
        G2Affine::from_compressed(&bytes),
        Err(g2_rejection("non-canonical coordinate"))
    );

    let mut bytes: [u8; 192] = decode(G2_GENERATOR_UNCOMPRESSED);
    bytes[0] |= 0x20;
    assert_eq!(
        G2Affine::from_uncompressed(&bytes),
        Err(g2_rejection("sort flag set on an uncompressed encoding"))
    );
    bytes[0] &= 0x1f;
    bytes[191] ^= 1;
    assert_eq!(
        G2Affine::from_uncompressed(&bytes),
        Err(g2_rejection("point is not on the curve"))
    );

    let outside = G2Affine::from(g2_outside_subgroup());
    assert_eq!(
        G2Affine::from_compressed(&outside.to_compressed()),
        Err(g2_rejection("point is not in the prime-order subgroup"))
    );
    assert_eq!(
        G2Affine::from_uncompressed(&outside.to_uncompressed()),
        Err(g2_rejection("point is not in the prime-order subgroup"))
    );
}

// ============================================================================
// Serialize Trait Tests
// ============================================================================

#[test]
fn test_serialize_trait_lengths() {
    let g1 = G1Affine::generator();
    assert_eq!(Serialize::to_bytes(&g1), g1.to_compressed().to_vec());
    assert_eq!(<G1Affine as Serialize>::from_bytes(&g1.to_compressed()).unwrap(), g1);
    assert_eq!(
        <G1Affine as Serialize>::from_bytes(&[0u8; 47]),
        Err(CoreError::InvalidLength {
            context: "G1Affine",
            expected: 48,
            actual: 47,
        })
    );

    let g2 = G2Affine::generator();
    assert_eq!(<G2Affine as Serialize>::from_bytes(&Serialize::to_bytes(&g2)).unwrap(), g2);
    assert!(matches!(
        <G2Affine as Serialize>::from_bytes(&[0u8; 192]),
        Err(CoreError::InvalidLength { expected: 96, .. })
    ));
    assert!(matches!(
        <G2Affine as Serialize>::from_bytes(&[0u8; 96]),
        Err(CoreError::SerializationError { context: "G2Affine", .. })
    ));
}

#[test]
fn test_scalar_serialization() {
    let s = Scalar::from(0x1234_5678u64);
    let bytes = Serialize::to_bytes(&s);
    assert_eq!(bytes.len(), 32);
    assert_eq!(bytes[0], 0x78);
    assert_eq!(<Scalar as Serialize>::from_bytes(&bytes).unwrap(), s);

    let secret = SerializeSecret::to_bytes_zeroizing(&s);
    assert_eq!(&secret[..], &bytes[..]);
    assert_eq!(<Scalar as SerializeSecret>::from_bytes(&secret).unwrap(), s);

    assert!(matches!(
        <Scalar as Serialize>::from_bytes(&[0xff; 32]),
        Err(CoreError::SerializationError { context: "Scalar", .. })
    ));
    assert!(matches!(
        <Scalar as Serialize>::from_bytes(&[0u8; 31]),
        Err(CoreError::InvalidLength { expected: 32, actual: 31, .. })
    ));
}
