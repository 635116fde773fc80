//! Curve parameters decoded from `bls381-params`
//!
//! The decimal strings are parsed once, on first use, into arbitrary-precision
//! integers and field elements. Everything here is read-only afterwards.

use alloc::vec::Vec;

use bls381_params::pairing::bls12_381 as consts;
use num_bigint::{BigInt, BigUint};
use num_traits::Num;
use once_cell::sync::Lazy;

use super::field::fp::Fp;
use super::field::fp2::Fp2;
use super::lattice::Lattice;
use super::scalar::Scalar;
use crate::error::{Error, Result};

/// Decoded BLS12-381 parameter set
#[derive(Clone, Debug)]
pub struct CurveParameters {
    /// Base field modulus q
    pub field_modulus: BigUint,
    /// Prime group order r
    pub group_order: BigUint,
    /// The signed curve parameter u
    pub x: BigInt,
    /// Affine G1 generator
    pub g1_generator: (Fp, Fp),
    /// Affine G2 generator
    pub g2_generator: (Fp2, Fp2),
    /// Eigenvalue of the G1 endomorphism
    pub g1_eigenvalue: Scalar,
    /// Eigenvalue of the G2 endomorphism
    pub g2_eigenvalue: Scalar,
    /// GLV lattice for G1
    pub glv: Lattice,
    /// GLS lattice for G2
    pub gls: Lattice,
}

fn uint(name: &'static str, s: &str) -> Result<BigUint> {
    BigUint::from_str_radix(s, 10).map_err(|_| Error::param(name, "malformed decimal string"))
}

fn int(name: &'static str, s: &str) -> Result<BigInt> {
    BigInt::from_str_radix(s, 10).map_err(|_| Error::param(name, "malformed decimal string"))
}

fn lattice<const M: usize>(
    name: &'static str,
    basis: &[[&str; M]; M],
    adjugate: &[&str; M],
    det: &BigUint,
) -> Result<Lattice> {
    let rows = basis
        .iter()
        .map(|row| row.iter().map(|s| int(name, s)).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;
    let adj = adjugate
        .iter()
        .map(|s| int(name, s))
        .collect::<Result<Vec<_>>>()?;
    Lattice::new(rows, adj, BigInt::from(det.clone()))
}

impl CurveParameters {
    /// Parse every constant in `bls381-params`
    pub fn decode() -> Result<Self> {
        let field_modulus = uint("field_modulus", consts::BLS12_381_FIELD_MODULUS)?;
        let group_order = uint("group_order", consts::BLS12_381_GROUP_ORDER)?;

        let mut x = int("x", consts::BLS12_381_X)?;
        if consts::BLS12_381_X_IS_NEGATIVE {
            x = -x;
        }

        let g1_generator = (
            Fp::from_decimal(consts::BLS12_381_G1_GENERATOR_X)?,
            Fp::from_decimal(consts::BLS12_381_G1_GENERATOR_Y)?,
        );
        let g2_generator = (
            Fp2::new(
                Fp::from_decimal(consts::BLS12_381_G2_GENERATOR_X_C0)?,
                Fp::from_decimal(consts::BLS12_381_G2_GENERATOR_X_C1)?,
            ),
            Fp2::new(
                Fp::from_decimal(consts::BLS12_381_G2_GENERATOR_Y_C0)?,
                Fp::from_decimal(consts::BLS12_381_G2_GENERATOR_Y_C1)?,
            ),
        );

        let glv = lattice(
            "g1_lattice",
            &consts::BLS12_381_G1_LATTICE_BASIS,
            &consts::BLS12_381_G1_LATTICE_ADJUGATE,
            &group_order,
        )?;
        let gls = lattice(
            "g2_lattice",
            &consts::BLS12_381_G2_LATTICE_BASIS,
            &consts::BLS12_381_G2_LATTICE_ADJUGATE,
            &group_order,
        )?;

        let params = CurveParameters {
            g1_eigenvalue: Scalar::from_decimal(consts::BLS12_381_G1_EIGENVALUE)?,
            g2_eigenvalue: Scalar::from_decimal(consts::BLS12_381_G2_EIGENVALUE)?,
            field_modulus,
            group_order,
            x,
            g1_generator,
            g2_generator,
            glv,
            gls,
        };

        tracing::debug!(
            field_bits = params.field_modulus.bits(),
            order_bits = params.group_order.bits(),
            glv_dimension = params.glv.dimension(),
            gls_dimension = params.gls.dimension(),
            "decoded BLS12-381 parameters"
        );
        Ok(params)
    }
}

static PARAMETERS: Lazy<CurveParameters> = Lazy::new(|| {
    // Embedded constants always decode
    CurveParameters::decode().expect("embedded BLS12-381 parameters must decode")
});

/// The process-wide parameter set
pub fn parameters() -> &'static CurveParameters {
    &PARAMETERS
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_integer::Integer;

    #[test]
    fn decoded_constants_match_limbs() {
        let p = parameters();
        assert_eq!(p.field_modulus, {
            let mut words = [0u32; 12];
            for (i, limb) in super::super::field::fp::MODULUS.iter().enumerate() {
                words[2 * i] = *limb as u32;
                words[2 * i + 1] = (*limb >> 32) as u32;
            }
            BigUint::from_slice(&words)
        });
        assert_eq!((-Fp::one()).to_biguint() + 1u32, p.field_modulus);
        assert_eq!((-Scalar::one()).to_biguint() + 1u32, p.group_order);
        assert_eq!(p.x, BigInt::from(-(super::super::BLS_X as i128)));
    }

    #[test]
    fn eigenvalues_match_x() {
        let p = parameters();
        let r = BigInt::from(p.group_order.clone());
        let x2 = &p.x * &p.x;

        let lambda1 = (-x2).mod_floor(&r);
        assert_eq!(BigInt::from(p.g1_eigenvalue.to_biguint()), lambda1);

        let lambda2 = p.x.mod_floor(&r);
        assert_eq!(BigInt::from(p.g2_eigenvalue.to_biguint()), lambda2);
    }

    #[test]
    fn lattice_rows_vanish_at_eigenvalues() {
        let p = parameters();
        let r = BigInt::from(p.group_order.clone());

        for (lattice, lambda) in [(&p.glv, p.g1_eigenvalue), (&p.gls, p.g2_eigenvalue)] {
            let lambda = BigInt::from(lambda.to_biguint());
            for row in lattice.basis() {
                let mut acc = BigInt::from(0);
                let mut power = BigInt::from(1);
                for b in row {
                    acc += b * &power;
                    power = (&power * &lambda).mod_floor(&r);
                }
                assert_eq!(acc.mod_floor(&r), BigInt::from(0));
            }
        }
    }

    #[test]
    fn decompositions_are_short_and_reconstruct() {
        use rand_chacha::ChaCha20Rng;
        use rand_core::SeedableRng;

        let p = parameters();
        let r = BigInt::from(p.group_order.clone());
        let mut rng = ChaCha20Rng::seed_from_u64(0x1a77_1ce);

        let mut scalars = alloc::vec![
            BigUint::from(0u32),
            BigUint::from(1u32),
            &p.group_order - 1u32,
            &p.group_order >> 1,
        ];
        for _ in 0..64 {
            scalars.push(Scalar::random(&mut rng).unwrap().to_biguint());
        }

        for (lattice, lambda, max_bits) in [
            (&p.glv, p.g1_eigenvalue, 128),
            (&p.gls, p.g2_eigenvalue, 64),
        ] {
            let lambda = BigInt::from(lambda.to_biguint());
            for k in &scalars {
                let coeffs = lattice.decompose(k).unwrap();
                assert_eq!(coeffs.len(), lattice.dimension());

                let mut acc = BigInt::from(0);
                let mut power = BigInt::from(1);
                for u in &coeffs {
                    assert!(u.bits() <= max_bits, "{} bits for k = {}", u.bits(), k);
                    acc += u * &power;
                    power = (&power * &lambda).mod_floor(&r);
                }
                assert_eq!(acc.mod_floor(&r), BigInt::from(k.clone()));
            }
        }
    }
}
