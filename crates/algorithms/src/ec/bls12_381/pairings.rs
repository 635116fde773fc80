//! Optimal ate pairing on BLS12-381.
//!
//! The Miller loop walks the bits of |u| with Jacobian doubling and mixed
//! addition steps on the twist, accumulating each line with a sparse
//! `mul_by_014`. Line coefficients are stored without the xP and yP factors so
//! a fixed G₂ point can be prepared once and reused ([`G2Prepared`]).

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Neg, Sub};

use bls381_api::PairingEngine;
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::field::fp::Fp;
use super::field::fp12::Fp12;
use super::field::fp2::Fp2;
use super::field::fp6::Fp6;
use super::g1::{G1Affine, G1Projective};
use super::g2::{G2Affine, G2Projective};
use super::{Scalar, BLS_X, BLS_X_IS_NEGATIVE};
use crate::error::Result;

/// Number of bits of |u| below its most significant bit
const MILLER_LOOP_BITS: u32 = 63 - BLS_X.leading_zeros();

/// Output of a Miller loop, before the final exponentiation
#[derive(Copy, Clone, Debug, Default)]
pub struct MillerLoopResult(pub(crate) Fp12);

impl ConditionallySelectable for MillerLoopResult {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        MillerLoopResult(Fp12::conditional_select(&a.0, &b.0, choice))
    }
}

impl MillerLoopResult {
    /// Raise to `(p^12 - 1) / r`, landing in [`Gt`].
    pub fn final_exponentiation(&self) -> Gt {
        let f = self.0;

        // Easy part: f^((p^6 - 1)(p^2 + 1))
        // Miller loop outputs are never zero
        let f1 = f.conjugate() * f.invert().unwrap_or(Fp12::zero());
        let t2 = f1.frobenius_map(2) * f1;

        // Hard part
        let mut t1 = t2.cyclotomic_square().conjugate();
        let mut t3 = cyclotomic_exp(&t2);
        let mut t4 = t3.cyclotomic_square();
        let mut t5 = t1 * t3;
        t1 = cyclotomic_exp(&t5);
        let t0 = cyclotomic_exp(&t1);
        let mut t6 = cyclotomic_exp(&t0);
        t6 *= t4;
        t4 = cyclotomic_exp(&t6);
        t5 = t5.conjugate();
        t4 *= t5 * t2;
        t5 = t2.conjugate();
        t1 *= t2;
        t1 = t1.frobenius_map(3);
        t6 *= t5;
        t6 = t6.frobenius_map(1);
        t3 *= t0;
        t3 = t3.frobenius_map(2);
        t3 *= t1;
        t3 *= t6;

        Gt(t3 * t4)
    }
}

impl<'a, 'b> Add<&'b MillerLoopResult> for &'a MillerLoopResult {
    type Output = MillerLoopResult;

    #[inline]
    fn add(self, rhs: &'b MillerLoopResult) -> MillerLoopResult {
        MillerLoopResult(self.0 * rhs.0)
    }
}

impl Add<MillerLoopResult> for MillerLoopResult {
    type Output = MillerLoopResult;

    #[inline]
    fn add(self, rhs: MillerLoopResult) -> MillerLoopResult {
        &self + &rhs
    }
}

/// `f^|u|` in the cyclotomic subgroup, conjugated for the sign of u
fn cyclotomic_exp(f: &Fp12) -> Fp12 {
    let mut tmp = Fp12::one();
    let mut found_one = false;
    for bit in (0..64).rev().map(|b| ((BLS_X >> b) & 1) == 1) {
        if found_one {
            tmp = tmp.cyclotomic_square();
        } else {
            found_one = bit;
        }

        if bit {
            tmp *= f;
        }
    }

    if BLS_X_IS_NEGATIVE {
        tmp.conjugate()
    } else {
        tmp
    }
}

/// Element of the target group, written additively
#[derive(Copy, Clone, Debug)]
pub struct Gt(pub(crate) Fp12);

impl Default for Gt {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Gt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ConstantTimeEq for Gt {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl ConditionallySelectable for Gt {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Gt(Fp12::conditional_select(&a.0, &b.0, choice))
    }
}

impl Eq for Gt {}
impl PartialEq for Gt {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl Gt {
    /// The identity, `1` in Fp12
    pub fn identity() -> Gt {
        Gt(Fp12::one())
    }

    /// `e(G1::generator(), G2::generator())`
    pub fn generator() -> Gt {
        Gt(GT_GENERATOR)
    }

    /// Generator times a uniformly random scalar.
    pub fn random(rng: &mut impl RngCore) -> Result<Gt> {
        Ok(Gt::generator() * Scalar::random(rng)?)
    }

    /// The underlying Fp12 value
    pub fn as_fp12(&self) -> &Fp12 {
        &self.0
    }

    /// Whether this is `1` in Fp12
    pub fn is_identity(&self) -> Choice {
        self.ct_eq(&Self::identity())
    }

    /// `self + self`, a cyclotomic squaring
    pub fn double(&self) -> Gt {
        Gt(self.0.cyclotomic_square())
    }
}

impl<'a> Neg for &'a Gt {
    type Output = Gt;

    #[inline]
    fn neg(self) -> Gt {
        // Unitary inverse
        Gt(self.0.conjugate())
    }
}

impl<'a, 'b> Add<&'b Gt> for &'a Gt {
    type Output = Gt;

    #[inline]
    fn add(self, rhs: &'b Gt) -> Gt {
        Gt(self.0 * rhs.0)
    }
}

impl<'a, 'b> Sub<&'b Gt> for &'a Gt {
    type Output = Gt;

    #[inline]
    fn sub(self, rhs: &'b Gt) -> Gt {
        self + (-rhs)
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a Gt {
    type Output = Gt;

    fn mul(self, other: &'b Scalar) -> Self::Output {
        let mut acc = Gt::identity();

        // The top bit of a canonical scalar is always zero
        for bit in other
            .to_bytes()
            .iter()
            .rev()
            .flat_map(|byte| (0..8).rev().map(move |i| Choice::from((byte >> i) & 1u8)))
            .skip(1)
        {
            acc = acc.double();
            acc = Gt::conditional_select(&acc, &(acc + self), bit);
        }

        acc
    }
}

impl_neg_by_value!(Gt);
impl_add_sub_ops!(Gt);
impl_mul_ops!(Gt, Scalar);

impl<T> Sum<T> for Gt
where
    T: Borrow<Gt>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::identity(), |acc, item| acc + item.borrow())
    }
}

/// Line coefficients at positions 0, 1 and 4; the last two still need the
/// factors xP and yP
type LineCoeffs = (Fp2, Fp2, Fp2);

/// Doubling step on `r`, returning the tangent line
fn doubling_step(r: &mut G2Projective) -> LineCoeffs {
    let a = r.x.square();
    let b = r.y.square();
    let c = b.square();
    let e = a.double() + a;
    let g = e.square();
    let d = ((r.x + b).square() - a - c).double();

    let x3 = g - d.double();
    let z3 = (r.y + r.z).square() - b - r.t;
    let y3 = e * (d - x3) - c.double().double().double();

    let ell_0 = (r.x + e).square() - a - g - b.double().double();
    let ell_x = -(e * r.t).double();
    let ell_y = (z3 * r.t).double();

    *r = G2Projective {
        x: x3,
        y: y3,
        z: z3,
        t: z3.square(),
    };

    (ell_0, ell_x, ell_y)
}

/// Mixed addition step `r + q`, returning the chord
fn addition_step(r: &mut G2Projective, q: &G2Affine) -> LineCoeffs {
    let yq2 = q.y.square();
    let u2 = q.x * r.t;
    let s2 = ((q.y + r.z).square() - yq2 - r.t) * r.t;

    let h = u2 - r.x;
    let i = h.square();
    let e = i.double().double();
    let j = h * e;
    let l = s2 - r.y.double();
    let v = r.x * e;

    let x3 = l.square() - j - v.double();
    let z3 = (r.z + h).square() - r.t - i;
    let y3 = l * (v - x3) - (r.y * j).double();
    let t3 = z3.square();

    let ell_0 = (l * q.x).double() - ((q.y + z3).square() - yq2 - t3);
    let ell_x = -l.double();
    let ell_y = z3.double();

    *r = G2Projective {
        x: x3,
        y: y3,
        z: z3,
        t: t3,
    };

    (ell_0, ell_x, ell_y)
}

/// Evaluate a line at `p` and multiply it into `f`
fn ell(f: &Fp12, coeffs: &LineCoeffs, p: &G1Affine) -> Fp12 {
    let c1 = coeffs.1.mul_by_fp(&p.x);
    let c4 = coeffs.2.mul_by_fp(&p.y);
    f.mul_by_014(&coeffs.0, &c1, &c4)
}

/// Line coefficients of a fixed G₂ point, reusable across Miller loops
#[derive(Clone, Debug)]
pub struct G2Prepared {
    infinity: Choice,
    coeffs: Vec<LineCoeffs>,
}

impl From<G2Affine> for G2Prepared {
    fn from(q: G2Affine) -> G2Prepared {
        let infinity = q.is_identity();
        // The identity contributes nothing; run the schedule on the generator
        let q = G2Affine::conditional_select(&q, &G2Affine::generator(), infinity);

        let mut coeffs = Vec::with_capacity(68);
        let mut r = G2Projective::from(q);
        for i in (0..MILLER_LOOP_BITS).rev() {
            coeffs.push(doubling_step(&mut r));
            if (BLS_X >> i) & 1 == 1 {
                coeffs.push(addition_step(&mut r, &q));
            }
        }

        G2Prepared { infinity, coeffs }
    }
}

impl<'a> From<&'a G2Affine> for G2Prepared {
    fn from(q: &'a G2Affine) -> G2Prepared {
        G2Prepared::from(*q)
    }
}

impl G2Prepared {
    /// Whether the prepared point is the identity
    pub fn is_identity(&self) -> Choice {
        self.infinity
    }
}

/// Product of the Miller loops of every `(P, Q)` term, sharing the squarings.
///
/// Terms with an identity on either side are skipped. Follow with
/// [`MillerLoopResult::final_exponentiation`].
pub fn multi_miller_loop(terms: &[(&G1Affine, &G2Prepared)]) -> MillerLoopResult {
    let mut f = Fp12::one();
    let mut idx = 0;

    for (step, i) in (0..MILLER_LOOP_BITS).rev().enumerate() {
        if step != 0 {
            f = f.square();
        }

        let add = (BLS_X >> i) & 1 == 1;
        for (p, q) in terms {
            let skip = p.is_identity() | q.infinity;

            let next = ell(&f, &q.coeffs[idx], p);
            f = Fp12::conditional_select(&next, &f, skip);
            if add {
                let next = ell(&f, &q.coeffs[idx + 1], p);
                f = Fp12::conditional_select(&next, &f, skip);
            }
        }

        idx += if add { 2 } else { 1 };
    }

    if BLS_X_IS_NEGATIVE {
        f = f.conjugate();
    }

    tracing::trace!(terms = terms.len(), "multi Miller loop");
    MillerLoopResult(f)
}

/// Compute `e(p, q)`, the identity if either input is.
pub fn pairing(p: &G1Affine, q: &G2Affine) -> Gt {
    let q = G2Prepared::from(*q);
    multi_miller_loop(&[(p, &q)]).final_exponentiation()
}

/// [`PairingEngine`] over BLS12-381 with affine source groups
#[derive(Clone, Copy, Debug, Default)]
pub struct Bls12;

impl PairingEngine for Bls12 {
    type Scalar = Scalar;
    type G1 = G1Affine;
    type G2 = G2Affine;
    type Gt = Gt;

    fn name() -> &'static str {
        "BLS12-381"
    }

    fn g1_generator() -> G1Affine {
        G1Affine::generator()
    }

    fn g2_generator() -> G2Affine {
        G2Affine::generator()
    }

    fn g1_mul(point: &G1Affine, scalar: &Scalar) -> G1Affine {
        G1Affine::from(G1Projective::from(point) * scalar)
    }

    fn g2_mul(point: &G2Affine, scalar: &Scalar) -> G2Affine {
        G2Affine::from(G2Projective::from(point) * scalar)
    }

    fn pairing(p: &G1Affine, q: &G2Affine) -> Gt {
        pairing(p, q)
    }

    fn multi_pairing(terms: &[(G1Affine, G2Affine)]) -> Gt {
        let prepared: Vec<G2Prepared> = terms.iter().map(|(_, q)| G2Prepared::from(q)).collect();
        let refs: Vec<(&G1Affine, &G2Prepared)> = terms
            .iter()
            .zip(prepared.iter())
            .map(|((p, _), q)| (p, q))
            .collect();
        multi_miller_loop(&refs).final_exponentiation()
    }

    fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> bls381_api::Result<Scalar> {
        Ok(Scalar::random(rng)?)
    }
}

/// `e(G1::generator(), G2::generator())`
const GT_GENERATOR: Fp12 = Fp12 {
    c0: Fp6 {
        c0: Fp2 {
            c0: Fp::from_raw_unchecked([
                0x1972_e433_a01f_85c5,
                0x97d3_2b76_fd77_2538,
                0xc8ce_546f_c96b_cdf9,
                0xcef6_3e73_66d4_0614,
                0xa611_3427_8184_3780,
                0x13f3_448a_3fc6_d825,
            ]),
            c1: Fp::from_raw_unchecked([
                0xd263_31b0_2e9d_6995,
                0x9d68_a482_f779_7e7d,
                0x9c9b_2924_8d39_ea92,
                0xf480_1ca2_e131_07aa,
                0xa16c_0732_bdbc_b066,
                0x083c_a4af_ba36_0478,
            ]),
        },
        c1: Fp2 {
            c0: Fp::from_raw_unchecked([
                0x59e2_61db_0916_b641,
                0x2716_b6f4_b23e_960d,
                0xc8e5_5b10_a0bd_9c45,
                0x0bdb_0bd9_9c4d_eda8,
                0x8cf8_9ebf_57fd_aac5,
                0x12d6_b792_9e77_7a5e,
            ]),
            c1: Fp::from_raw_unchecked([
                0x5fc8_5188_b0e1_5f35,
                0x34a0_6e3a_8f09_6365,
                0xdb31_26a6_e02a_d62c,
                0xfc6f_5aa9_7d9a_990b,
                0xa12f_55f5_eb89_c210,
                0x1723_703a_926f_8889,
            ]),
        },
        c2: Fp2 {
            c0: Fp::from_raw_unchecked([
                0x9358_8f29_7182_8778,
                0x43f6_5b86_11ab_7585,
                0x3183_aaf5_ec27_9fdf,
                0xfa73_d7e1_8ac9_9df6,
                0x64e1_76a6_a64c_99b0,
                0x179f_a78c_5838_8f1f,
            ]),
            c1: Fp::from_raw_unchecked([
                0x672a_0a11_ca2a_ef12,
                0x0d11_b9b5_2aa3_f16b,
                0xa444_12d0_699d_056e,
                0xc01d_0177_221a_5ba5,
                0x66e0_cede_6c73_5529,
                0x05f5_a71e_9fdd_c339,
            ]),
        },
    },
    c1: Fp6 {
        c0: Fp2 {
            c0: Fp::from_raw_unchecked([
                0xd30a_88a1_b062_c679,
                0x5ac5_6a5d_35fc_8304,
                0xd0c8_34a6_a81f_290d,
                0xcd54_30c2_da37_07c7,
                0xf0c2_7ff7_8050_0af0,
                0x0924_5da6_e2d7_2eae,
            ]),
            c1: Fp::from_raw_unchecked([
                0x9f2e_0676_791b_5156,
                0xe2d1_c823_4918_fe13,
                0x4c9e_459f_3c56_1bf4,
                0xa3e8_5e53_b9d3_e3c1,
                0x820a_121e_21a7_0020,
                0x15af_6183_41c5_9acc,
            ]),
        },
        c1: Fp2 {
            c0: Fp::from_raw_unchecked([
                0x7c95_658c_2499_3ab1,
                0x73eb_3872_1ca8_86b9,
                0x5256_d749_4774_34bc,
                0x8ba4_1902_ea50_4a8b,
                0x04a3_d3f8_0c86_ce6d,
                0x18a6_4a87_fb68_6eaa,
            ]),
            c1: Fp::from_raw_unchecked([
                0xbb83_e71b_b920_cf26,
                0x2a52_77ac_92a7_3945,
                0xfc0e_e59f_94f0_46a0,
                0x7158_cdf3_7860_58f7,
                0x7cc1_061b_82f9_45f6,
                0x03f8_47aa_9fdb_e567,
            ]),
        },
        c2: Fp2 {
            c0: Fp::from_raw_unchecked([
                0x8078_dba5_6134_e657,
                0x1cd7_ec9a_4399_8a6e,
                0xb1aa_599a_1a99_3766,
                0xc9a0_f62f_0842_ee44,
                0x8e15_9be3_b605_dffa,
                0x0c86_ba0d_4af1_3fc2,
            ]),
            c1: Fp::from_raw_unchecked([
                0xe80f_f2a0_6a52_ffb1,
                0x7694_ca48_721a_906c,
                0x7583_183e_03b0_8514,
                0xf567_afdd_40ce_e4e2,
                0x9a6d_96d2_e526_a5fc,
                0x197e_9f49_861f_2242,
            ]),
        },
    },
};
