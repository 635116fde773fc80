//! Babai-rounding scalar decomposition for the GLV (G1) and GLS (G2) paths.
//!
//! A [`Lattice`] holds an `m x m` integer basis whose rows `b` satisfy
//! `sum_i b[i] * lambda^i = 0 (mod r)` for the eigenvalue `lambda` of an
//! efficient endomorphism, together with the first row of the adjugate and the
//! determinant `r`. [`Lattice::decompose`] turns a scalar `n < r` into `m`
//! short signed coefficients `u` with `sum_i u[i] * lambda^i = n (mod r)`, and
//! [`multi_mul`] evaluates `sum_i [u[i]] B_i` in one interleaved pass.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Add, Neg};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::error::{validate, Error, Result};

/// Decomposition lattice for an endomorphism of a prime-order group
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lattice {
    basis: Vec<Vec<BigInt>>,
    adjugate: Vec<BigInt>,
    det: BigInt,
}

impl Lattice {
    /// Build a lattice from its basis rows, first adjugate row and determinant
    pub fn new(basis: Vec<Vec<BigInt>>, adjugate: Vec<BigInt>, det: BigInt) -> Result<Self> {
        let m = basis.len();
        validate::parameter(m > 0, "basis", "lattice basis is empty")?;
        validate::parameter(
            basis.iter().all(|row| row.len() == m),
            "basis",
            "lattice basis must be square",
        )?;
        validate::parameter(
            adjugate.len() == m,
            "adjugate",
            "adjugate row length must match the basis dimension",
        )?;
        validate::parameter(det.is_positive(), "det", "determinant must be positive")?;

        Ok(Lattice {
            basis,
            adjugate,
            det,
        })
    }

    /// Number of coefficients produced by [`Lattice::decompose`]
    pub fn dimension(&self) -> usize {
        self.basis.len()
    }

    /// Basis rows
    pub fn basis(&self) -> &[Vec<BigInt>] {
        &self.basis
    }

    /// First row of the adjugate of the basis
    pub fn adjugate(&self) -> &[BigInt] {
        &self.adjugate
    }

    /// Determinant of the basis, the group order
    pub fn determinant(&self) -> &BigInt {
        &self.det
    }

    /// Split `n` into short coefficients with respect to this lattice
    ///
    /// Computes `v_j = floor((n * adj_j + det / 2) / det)` and returns
    /// `(n, 0, ..., 0) - v * B`. Fails with a parameter error when `n` is not
    /// below the determinant.
    pub fn decompose(&self, n: &BigUint) -> Result<Vec<BigInt>> {
        validate::parameter(
            n < self.det.magnitude(),
            "n",
            "scalar must be below the group order",
        )?;

        let n = BigInt::from_biguint(Sign::Plus, n.clone());
        let half: BigInt = &self.det / 2;
        let m = self.dimension();

        let v: Vec<BigInt> = self
            .adjugate
            .iter()
            .map(|a| (&n * a + &half).div_floor(&self.det))
            .collect();

        let mut out = vec![BigInt::zero(); m];
        for (vj, row) in v.iter().zip(self.basis.iter()) {
            for (o, b) in out.iter_mut().zip(row.iter()) {
                *o -= vj * b;
            }
        }
        out[0] += &n;

        tracing::trace!(
            dimension = m,
            max_bits = out.iter().map(|c| c.bits()).max().unwrap_or(0),
            "scalar decomposed"
        );
        Ok(out)
    }
}

/// Group operations needed by [`multi_mul`]
pub trait LatticeGroup: Copy + Add<Output = Self> + Neg<Output = Self> {
    /// Neutral element
    fn identity() -> Self;

    /// `self + self`
    fn double(&self) -> Self;
}

/// Compute `sum_i [coeffs[i]] bases[i]` with one shared doubling chain
///
/// Negative coefficients negate their base. All `2^m` subset sums of the bases
/// are tabulated, so each bit position costs one doubling and one addition.
/// Runs in variable time.
pub fn multi_mul<G: LatticeGroup>(bases: &[G], coeffs: &[BigInt]) -> Result<G> {
    validate::parameter(
        bases.len() == coeffs.len(),
        "coeffs",
        "one coefficient per base is required",
    )?;
    if bases.len() > 8 {
        return Err(Error::param("bases", "too many bases for a subset-sum table"));
    }

    let signed: Vec<G> = bases
        .iter()
        .zip(coeffs.iter())
        .map(|(b, c)| if c.is_negative() { -*b } else { *b })
        .collect();

    let mut table = vec![G::identity(); 1 << signed.len()];
    for mask in 1..table.len() {
        let low = mask.trailing_zeros() as usize;
        table[mask] = table[mask & (mask - 1)] + signed[low];
    }

    let magnitudes: Vec<&BigUint> = coeffs.iter().map(|c| c.magnitude()).collect();
    let bits = magnitudes.iter().map(|m| m.bits()).max().unwrap_or(0);

    let mut acc = G::identity();
    for i in (0..bits).rev() {
        acc = acc.double();
        let idx = magnitudes
            .iter()
            .enumerate()
            .fold(0usize, |idx, (j, m)| idx | ((m.bit(i) as usize) << j));
        if idx != 0 {
            acc = acc + table[idx];
        }
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_lattice() -> Lattice {
        // r = 13, lambda = 3: rows (3, -1) and (1, 4) vanish at lambda mod 13
        let basis = vec![
            vec![BigInt::from(3), BigInt::from(-1)],
            vec![BigInt::from(1), BigInt::from(4)],
        ];
        // adj(B) first row is (4, 1), det = 13
        Lattice::new(basis, vec![BigInt::from(4), BigInt::from(1)], BigInt::from(13)).unwrap()
    }

    #[test]
    fn toy_decomposition_reconstructs() {
        let lattice = toy_lattice();
        for n in 0u32..13 {
            let u = lattice.decompose(&BigUint::from(n)).unwrap();
            let recombined = (&u[0] + &u[1] * BigInt::from(3)).mod_floor(&BigInt::from(13));
            assert_eq!(recombined, BigInt::from(n));
        }
    }

    #[test]
    fn rejects_out_of_range_input() {
        let lattice = toy_lattice();
        assert!(matches!(
            lattice.decompose(&BigUint::from(13u32)),
            Err(Error::Parameter { .. })
        ));
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert!(Lattice::new(vec![], vec![], BigInt::from(1)).is_err());
        assert!(Lattice::new(
            vec![vec![BigInt::from(1)], vec![BigInt::from(1), BigInt::from(2)]],
            vec![BigInt::from(1), BigInt::from(1)],
            BigInt::from(1)
        )
        .is_err());
        assert!(Lattice::new(vec![vec![BigInt::from(1)]], vec![BigInt::from(1)], BigInt::from(0)).is_err());
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Z(i64);

    impl Add for Z {
        type Output = Z;
        fn add(self, rhs: Z) -> Z {
            Z(self.0 + rhs.0)
        }
    }

    impl Neg for Z {
        type Output = Z;
        fn neg(self) -> Z {
            Z(-self.0)
        }
    }

    impl LatticeGroup for Z {
        fn identity() -> Z {
            Z(0)
        }
        fn double(&self) -> Z {
            Z(2 * self.0)
        }
    }

    #[test]
    fn multi_mul_matches_integer_combination() {
        let bases = [Z(1), Z(1000), Z(-7)];
        let coeffs = [BigInt::from(-37), BigInt::from(5), BigInt::from(12)];
        assert_eq!(multi_mul(&bases, &coeffs).unwrap(), Z(-37 + 5000 - 84));
        assert_eq!(
            multi_mul(&bases, &[BigInt::zero(), BigInt::zero(), BigInt::zero()]).unwrap(),
            Z(0)
        );
        assert!(multi_mul(&bases, &coeffs[..2]).is_err());
    }
}
