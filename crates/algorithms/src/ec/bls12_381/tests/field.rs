//! Field tower tests for BLS12-381

use super::super::field::backend::{MontgomeryBackend, Portable, Unrolled};
use super::super::field::fp::{Fp, FpModulus, MODULUS, R};
use super::super::field::fp12::Fp12;
use super::super::field::fp2::Fp2;
use super::super::field::fp6::Fp6;
use super::super::scalar::{Scalar, ScalarModulus};
use crate::error::Error;

use num_bigint::BigUint;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use subtle::{Choice, ConditionallySelectable};

fn rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(0x0b15_1238_1000)
}

/// Entropy source that always reports failure
struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(rand_core::Error::new("entropy source unavailable"))
    }
}

// ============================================================================
// Fp Known Answers
// ============================================================================

#[test]
fn test_fp_conditional_selection() {
    let a = Fp([1, 2, 3, 4, 5, 6]);
    let b = Fp([7, 8, 9, 10, 11, 12]);

    assert_eq!(Fp::conditional_select(&a, &b, Choice::from(0u8)), a);
    assert_eq!(Fp::conditional_select(&a, &b, Choice::from(1u8)), b);
}

#[test]
fn test_fp_squaring() {
    let a = Fp([
        0xd215_d276_8e83_191b,
        0x5085_d80f_8fb2_8261,
        0xce9a_032d_df39_3a56,
        0x3e9c_4fff_2ca0_c4bb,
        0x6436_b6f7_f4d9_5dfb,
        0x1060_6628_ad4a_4d90,
    ]);
    let b = Fp([
        0x33d9_c42a_3cb3_e235,
        0xdad1_1a09_4c4c_d455,
        0xa2f1_44bd_729a_aeba,
        0xd415_0932_be9f_feac,
        0xe27b_c7c4_7d44_ee50,
        0x14b6_a78d_3ec7_a560,
    ]);

    assert_eq!(a.square(), b);
}

#[test]
fn test_fp_multiplication() {
    let a = Fp([
        0x0397_a383_2017_0cd4,
        0x734c_1b2c_9e76_1d30,
        0x5ed2_55ad_9a48_beb5,
        0x095a_3c6b_22a7_fcfc,
        0x2294_ce75_d4e2_6a27,
        0x1333_8bd8_7001_1ebb,
    ]);
    let b = Fp([
        0xb9c3_c7c5_b119_6af7,
        0x2580_e208_6ce3_35c1,
        0xf49a_ed3d_8a57_ef42,
        0x41f2_81e4_9846_e878,
        0xe076_2346_c384_52ce,
        0x0652_e893_26e5_7dc0,
    ]);
    let c = Fp([
        0xf96e_f3d7_11ab_5355,
        0xe8d4_59ea_00f1_48dd,
        0x53f7_354a_5f00_fa78,
        0x9e34_a4f3_125c_5f83,
        0x3fbe_0c47_ca74_c19e,
        0x01b0_6a8b_bd4a_dfe4,
    ]);

    assert_eq!(a * b, c);
}

#[test]
fn test_fp_from_bytes() {
    let mut a = Fp([
        0xdc90_6d9b_e3f9_5dc8,
        0x8755_caf7_4596_91a1,
        0xcff1_a7f4_e958_3ab3,
        0x9b43_821f_849e_2284,
        0xf575_54f3_a297_4f3f,
        0x085d_bea8_4ed4_7f79,
    ]);

    for _ in 0..100 {
        a = a.square();
        let tmp = a.to_bytes();
        let b = Fp::from_bytes(&tmp).unwrap();
        assert_eq!(a, b);
    }

    // Test edge case: p - 1
    assert_eq!(
        -Fp::one(),
        Fp::from_bytes(&[
            26, 1, 17, 234, 57, 127, 230, 154, 75, 27, 167, 182, 67, 75, 172, 215,
            100, 119, 75, 132, 243, 133, 18, 191, 103, 48, 210, 160, 246, 176, 246, 36,
            30, 171, 255, 254, 177, 83, 255, 255, 185, 254, 255, 255, 255, 255, 170, 170
        ])
        .unwrap()
    );

    // Test invalid: value >= p
    assert!(bool::from(
        Fp::from_bytes(&[
            27, 1, 17, 234, 57, 127, 230, 154, 75, 27, 167, 182, 67, 75, 172, 215,
            100, 119, 75, 132, 243, 133, 18, 191, 103, 48, 210, 160, 246, 176, 246, 36,
            30, 171, 255, 254, 177, 83, 255, 255, 185, 254, 255, 255, 255, 255, 170, 170
        ])
        .is_none()
    ));

    assert!(bool::from(Fp::from_bytes(&[0xff; 48]).is_none()));
}

#[test]
fn test_fp_sqrt() {
    // a = 4
    let a = Fp::from_raw_unchecked([
        0xaa27_0000_000c_fff3,
        0x53cc_0032_fc34_000a,
        0x478f_e97a_6b0a_807f,
        0xb1d3_7ebe_e6ba_24d7,
        0x8ec9_733b_bf78_ab2f,
        0x09d6_4551_3d83_de7e,
    ]);

    assert_eq!(
        // sqrt(4) = -2
        -a.sqrt().unwrap(),
        // 2
        Fp::from_raw_unchecked([
            0x3213_0000_0006_554f,
            0xb93c_0018_d6c4_0005,
            0x5760_5e0d_b0dd_bb51,
            0x8b25_6521_ed1f_9bcb,
            0x6cf2_8d79_0162_2c03,
            0x11eb_ab9d_bb81_e28c,
        ])
    );
}

#[test]
fn test_fp_inversion() {
    let a = Fp([
        0x43b4_3a50_78ac_2076,
        0x1ce0_7630_46f8_962b,
        0x724a_5276_486d_735c,
        0x6f05_c2a6_282d_48fd,
        0x2095_bd5b_b4ca_9331,
        0x03b3_5b38_94b0_f7da,
    ]);
    let b = Fp([
        0x69ec_d704_0952_148f,
        0x985c_cc20_2219_0f55,
        0xe19b_ba36_a9ad_2f41,
        0x19bb_16c9_5219_dbd8,
        0x14dc_acfd_fb47_8693,
        0x115f_f58a_fff9_a8e1,
    ]);

    assert_eq!(a.invert().unwrap(), b);
    assert!(bool::from(Fp::zero().invert().is_none()));
}

#[test]
fn test_fp_lexicographic_largest() {
    assert!(!bool::from(Fp::zero().lexicographically_largest()));
    assert!(!bool::from(Fp::one().lexicographically_largest()));
    assert!(!bool::from(
        Fp::from_raw_unchecked([
            0xa1fa_ffff_fffe_5557,
            0x995b_fff9_76a3_fffe,
            0x03f4_1d24_d174_ceb4,
            0xf654_7998_c199_5dbd,
            0x778a_468f_507a_6034,
            0x0205_5993_1f7f_8103
        ])
        .lexicographically_largest()
    ));
    assert!(bool::from(
        Fp::from_raw_unchecked([
            0x1804_0000_0001_5554,
            0x8550_0005_3ab0_0001,
            0x633c_b57c_253c_276f,
            0x6e22_d1ec_31eb_b502,
            0xd391_6126_f2d1_4ca2,
            0x17fb_b857_1a00_6596,
        ])
        .lexicographically_largest()
    ));
}


#[test]
fn test_fp2_squaring() {
    let a = Fp2 {
        c0: Fp::from_raw_unchecked([
            0xc9a2_1831_63ee_70d4,
            0xbc37_70a7_196b_5c91,
            0xa247_f8c1_304c_5f44,
            0xb01f_c2a3_726c_80b5,
            0xe1d2_93e5_bbd9_19c9,
            0x04b7_8e80_020e_f2ca,
        ]),
        c1: Fp::from_raw_unchecked([
            0x952e_a446_0462_618f,
            0x238d_5edd_f025_c62f,
            0xf6c9_4b01_2ea9_2e72,
            0x03ce_24ea_c1c9_3808,
            0x0559_50f9_45da_483c,
            0x010a_768d_0df4_eabc,
        ]),
    };
    let b = Fp2 {
        c0: Fp::from_raw_unchecked([
            0xa1e0_9175_a4d2_c1fe,
            0x8b33_acfc_204e_ff12,
            0xe244_15a1_1b45_6e42,
            0x61d9_96b1_b6ee_1936,
            0x1164_dbe8_667c_853c,
            0x0788_557a_cc7d_9c79,
        ]),
        c1: Fp::from_raw_unchecked([
            0xda6a_87cc_6f48_fa36,
            0x0fc7_b488_277c_1903,
            0x9445_ac4a_dc44_8187,
            0x0261_6d5b_c909_9209,
            0xdbed_4677_2db5_8d48,
            0x11b9_4d50_76c7_b7b1,
        ]),
    };

    assert_eq!(a.square(), b);
}

// ============================================================================
// Fp Conversions and Axioms
// ============================================================================

#[test]
fn test_fp_montgomery_encoding() {
    assert_eq!(Fp::one(), R);
    assert_eq!(Fp::from_raw([1, 0, 0, 0, 0, 0]).unwrap(), Fp::one());
    assert_eq!(Fp::one().to_raw(), [1, 0, 0, 0, 0, 0]);
    assert_eq!(Fp::zero().to_raw(), [0; 6]);

    let mut rng = rng();
    for _ in 0..32 {
        let a = Fp::random(&mut rng).unwrap();
        assert_eq!(Fp::from_raw(a.to_raw()).unwrap(), a);
        assert_eq!(Fp::from_biguint(&a.to_biguint()).unwrap(), a);
    }

    assert_eq!(Fp::zero().to_biguint(), BigUint::from(0u32));
    assert_eq!((-Fp::one()).to_biguint() + 1u32, modulus());
    assert_eq!(Fp::from_decimal("7").unwrap(), Fp::from_raw([7, 0, 0, 0, 0, 0]).unwrap());
}

fn modulus() -> BigUint {
    let mut bytes = [0u8; 48];
    for (i, limb) in MODULUS.iter().enumerate() {
        bytes[8 * i..8 * i + 8].copy_from_slice(&limb.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

#[test]
fn test_fp_out_of_bounds() {
    assert_eq!(
        Fp::from_raw(MODULUS),
        Err(Error::OutOfBounds { context: "Fp" })
    );
    assert_eq!(
        Fp::from_biguint(&modulus()),
        Err(Error::OutOfBounds { context: "Fp" })
    );
    assert_eq!(
        Fp::from_biguint(&(modulus() << 64)),
        Err(Error::OutOfBounds { context: "Fp" })
    );
    assert_eq!(Fp::from_biguint(&(modulus() - 1u32)).unwrap(), -Fp::one());
    assert!(matches!(Fp::from_decimal("12x"), Err(Error::Parameter { .. })));
}

#[test]
fn test_fp_axioms() {
    let mut rng = rng();
    let mut samples = vec![Fp::zero(), Fp::one(), -Fp::one()];
    for _ in 0..16 {
        samples.push(Fp::random(&mut rng).unwrap());
    }

    for a in &samples {
        assert_eq!(a + Fp::zero(), *a);
        assert_eq!(a * Fp::one(), *a);
        assert_eq!(a - a, Fp::zero());
        assert_eq!(a + (-a), Fp::zero());
        assert_eq!(a.double(), a + a);
        assert_eq!(a.square(), a * a);
        if !bool::from(a.is_zero()) {
            assert_eq!(a * a.invert().unwrap(), Fp::one());
            assert_eq!(a.square().sqrt().unwrap().square(), a.square());
        }
        for b in &samples {
            assert_eq!(a + b, b + a);
            assert_eq!(a * b, b * a);
            for c in samples.iter().take(6) {
                assert_eq!((a + b) + c, a + (b + c));
                assert_eq!((a * b) * c, a * (b * c));
                assert_eq!(a * (b + c), a * b + a * c);
            }
        }
    }
}

#[test]
fn test_fp_pow_vartime() {
    let mut rng = rng();
    let a = Fp::random(&mut rng).unwrap();
    assert_eq!(a.pow_vartime(&[0]), Fp::one());
    assert_eq!(a.pow_vartime(&[1]), a);
    assert_eq!(a.pow_vartime(&[5]), a.square().square() * a);
    // Fermat: a^p = a
    assert_eq!(a.pow_vartime(&MODULUS), a);
}

// ============================================================================
// Extension Tower
// ============================================================================

#[test]
fn test_fp2_against_schoolbook() {
    let mut rng = rng();
    for _ in 0..16 {
        let a = Fp2::random(&mut rng).unwrap();
        let b = Fp2::random(&mut rng).unwrap();

        // i^2 = -1
        let expected = Fp2::new(a.c0 * b.c0 - a.c1 * b.c1, a.c0 * b.c1 + a.c1 * b.c0);
        assert_eq!(a * b, expected);
        assert_eq!(a.square(), a * a);
        assert_eq!(a * a.invert().unwrap(), Fp2::one());

        let root = a.square().sqrt().unwrap();
        assert!(root == a || root == -a);

        // (1 + i) * a
        let xi = Fp2::new(Fp::one(), Fp::one());
        assert_eq!(a.mul_by_nonresidue(), a * xi);
        assert_eq!(a.mul_by_fp(&b.c0), a * Fp2::from(b.c0));
        assert_eq!(a.frobenius_map(1), a.conjugate());
        assert_eq!(a.frobenius_map(1), a.pow_vartime(&MODULUS));
        assert_eq!(a.frobenius_map(2), a);
    }
    assert!(bool::from(Fp2::zero().invert().is_none()));
}

#[test]
fn test_fp2_sqrt_of_non_residue() {
    // 1 + i is not a square in Fp2
    let xi = Fp2::new(Fp::one(), Fp::one());
    assert!(bool::from(xi.sqrt().is_none()));
}

fn fp6_schoolbook(a: &Fp6, b: &Fp6) -> Fp6 {
    // v^3 = 1 + i
    Fp6::new(
        a.c0 * b.c0 + (a.c1 * b.c2 + a.c2 * b.c1).mul_by_nonresidue(),
        a.c0 * b.c1 + a.c1 * b.c0 + (a.c2 * b.c2).mul_by_nonresidue(),
        a.c0 * b.c2 + a.c1 * b.c1 + a.c2 * b.c0,
    )
}

#[test]
fn test_fp6_against_schoolbook() {
    let mut rng = rng();
    for _ in 0..16 {
        let a = Fp6::random(&mut rng).unwrap();
        let b = Fp6::random(&mut rng).unwrap();
        let c0 = Fp2::random(&mut rng).unwrap();
        let c1 = Fp2::random(&mut rng).unwrap();

        assert_eq!(a * b, fp6_schoolbook(&a, &b));
        assert_eq!(a.square(), a * a);
        assert_eq!(a * a.invert().unwrap(), Fp6::one());
        assert_eq!(a.mul_by_1(&c1), a * Fp6::new(Fp2::zero(), c1, Fp2::zero()));
        assert_eq!(a.mul_by_01(&c0, &c1), a * Fp6::new(c0, c1, Fp2::zero()));

        let v = Fp6::new(Fp2::zero(), Fp2::one(), Fp2::zero());
        assert_eq!(a.mul_by_nonresidue(), a * v);
    }
    assert!(bool::from(Fp6::zero().invert().is_none()));
}

#[test]
fn test_fp6_frobenius() {
    let mut rng = rng();
    let a = Fp6::random(&mut rng).unwrap();

    assert_eq!(
        Fp12::from(a.frobenius_map(1)),
        Fp12::from(a).pow_vartime(&MODULUS)
    );

    let mut iterated = a;
    for power in 1..=6 {
        iterated = iterated.frobenius_map(1);
        assert_eq!(a.frobenius_map(power), iterated);
    }
    assert_eq!(iterated, a);
}

#[test]
fn test_fp12_against_schoolbook() {
    let mut rng = rng();
    for _ in 0..8 {
        let a = Fp12::random(&mut rng).unwrap();
        let b = Fp12::random(&mut rng).unwrap();

        // w^2 = v
        let expected = Fp12::new(
            a.c0 * b.c0 + (a.c1 * b.c1).mul_by_nonresidue(),
            a.c0 * b.c1 + a.c1 * b.c0,
        );
        assert_eq!(a * b, expected);
        assert_eq!(a.square(), a * a);
        assert_eq!(a * a.invert().unwrap(), Fp12::one());
        assert_eq!(a.conjugate(), Fp12::new(a.c0, -a.c1));
    }
    assert!(bool::from(Fp12::zero().invert().is_none()));
}

#[test]
fn test_fp12_mul_by_014() {
    let mut rng = rng();
    for _ in 0..8 {
        let a = Fp12::random(&mut rng).unwrap();
        let c0 = Fp2::random(&mut rng).unwrap();
        let c1 = Fp2::random(&mut rng).unwrap();
        let c4 = Fp2::random(&mut rng).unwrap();

        let dense = Fp12::new(
            Fp6::new(c0, c1, Fp2::zero()),
            Fp6::new(Fp2::zero(), c4, Fp2::zero()),
        );
        assert_eq!(a.mul_by_014(&c0, &c1, &c4), a * dense);
    }
}

#[test]
fn test_fp12_frobenius() {
    let mut rng = rng();
    let a = Fp12::random(&mut rng).unwrap();

    assert_eq!(a.frobenius_map(1), a.pow_vartime(&MODULUS));

    let mut iterated = a;
    for power in 1..=12 {
        iterated = iterated.frobenius_map(1);
        assert_eq!(a.frobenius_map(power), iterated);
    }
    assert_eq!(iterated, a);
    assert_eq!(a.frobenius_map(6), a.conjugate());
}

#[test]
fn test_fp12_cyclotomic_square() {
    let mut rng = rng();
    for _ in 0..4 {
        let f = Fp12::random(&mut rng).unwrap();

        // f^((p^6 - 1)(p^2 + 1)) lies in the cyclotomic subgroup
        let mut m = f.conjugate() * f.invert().unwrap();
        m = m.frobenius_map(2) * m;

        assert_eq!(m.cyclotomic_square(), m.square());
        assert_eq!(m * m.conjugate(), Fp12::one());
    }
}

// ============================================================================
// Backends
// ============================================================================

#[test]
fn test_backends_agree_on_fp() {
    let mut rng = rng();
    let mut samples = vec![Fp::zero(), Fp::one(), -Fp::one()];
    for _ in 0..32 {
        samples.push(Fp::random(&mut rng).unwrap());
    }

    for a in &samples {
        assert_eq!(
            Portable::square::<FpModulus>(&a.0),
            Unrolled::square::<FpModulus>(&a.0)
        );
        assert_eq!(
            Unrolled::square::<FpModulus>(&a.0),
            Unrolled::mul::<FpModulus>(&a.0, &a.0)
        );
        for b in samples.iter().take(8) {
            assert_eq!(
                Portable::mul::<FpModulus>(&a.0, &b.0),
                Unrolled::mul::<FpModulus>(&a.0, &b.0)
            );
        }
    }
}

#[test]
fn test_backends_agree_on_scalar() {
    let mut rng = rng();
    let mut samples = vec![Scalar::zero(), Scalar::one(), -Scalar::one()];
    for _ in 0..32 {
        samples.push(Scalar::random(&mut rng).unwrap());
    }

    for a in &samples {
        assert_eq!(
            Portable::square::<ScalarModulus>(&a.0),
            Unrolled::square::<ScalarModulus>(&a.0)
        );
        for b in samples.iter().take(8) {
            assert_eq!(
                Portable::mul::<ScalarModulus>(&a.0, &b.0),
                Unrolled::mul::<ScalarModulus>(&a.0, &b.0)
            );
        }
    }
}

// ============================================================================
// Sampling and Hygiene
// ============================================================================

#[test]
fn test_random_is_nonzero_and_seeded() {
    let a = Fp::random(&mut rng()).unwrap();
    let b = Fp::random(&mut rng()).unwrap();
    assert_eq!(a, b);
    assert!(!bool::from(a.is_zero()));

    let mut rng = rng();
    let c = Fp::random(&mut rng).unwrap();
    let d = Fp::random(&mut rng).unwrap();
    assert_ne!(c, d);
}

#[test]
fn test_rng_failure_propagates() {
    assert!(matches!(
        Fp::random(&mut FailingRng),
        Err(Error::RandomGeneration { .. })
    ));
    assert!(matches!(
        Fp2::random(&mut FailingRng),
        Err(Error::RandomGeneration { .. })
    ));
    assert!(matches!(
        Fp12::random(&mut FailingRng),
        Err(Error::RandomGeneration { .. })
    ));
    assert!(matches!(
        Scalar::random(&mut FailingRng),
        Err(Error::RandomGeneration { .. })
    ));
}

#[test]
fn test_fp_zeroize() {
    use zeroize::Zeroize;

    let mut a = Fp::one();
    a.zeroize();
    assert!(bool::from(a.is_zero()));

    let mut b = Fp2::one();
    b.zeroize();
    assert!(bool::from(b.is_zero()));
}
