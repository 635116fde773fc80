//! G₁ group implementation for BLS12-381.
//!
//! Points live on `E(Fp): y² = x³ + 4`. [`G1Projective`] uses Jacobian
//! coordinates `(X, Y, Z)` for the affine point `(X/Z², Y/Z³)`; the identity is
//! any point with `Z = 0`.

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Neg, Sub};

use bls381_api::Serialize;
use bls381_params::pairing::bls12_381::{
    BLS12_381_G1_COMPRESSED_SIZE as COMPRESSED_SIZE,
    BLS12_381_G1_UNCOMPRESSED_SIZE as UNCOMPRESSED_SIZE,
};
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::field::fp::Fp;
use super::lattice::{multi_mul, LatticeGroup};
use super::parameters::parameters;
use super::{decode_coordinate, to_array, EncodingFlags, Scalar, BLS_X, BLS_X_IS_NEGATIVE};
use crate::error::{validate, Result};

/// G₁ affine point representation.
#[derive(Copy, Clone, Debug)]
pub struct G1Affine {
    pub(crate) x: Fp,
    pub(crate) y: Fp,
    infinity: Choice,
}

impl Default for G1Affine {
    fn default() -> G1Affine {
        G1Affine::identity()
    }
}

impl zeroize::DefaultIsZeroes for G1Affine {}

impl fmt::Display for G1Affine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<'a> From<&'a G1Projective> for G1Affine {
    fn from(p: &'a G1Projective) -> G1Affine {
        let zinv = p.z.invert().unwrap_or(Fp::zero());
        let zinv2 = zinv.square();
        let tmp = G1Affine {
            x: p.x * zinv2,
            y: p.y * zinv2 * zinv,
            infinity: Choice::from(0u8),
        };

        G1Affine::conditional_select(&tmp, &G1Affine::identity(), zinv.is_zero())
    }
}

impl From<G1Projective> for G1Affine {
    fn from(p: G1Projective) -> G1Affine {
        G1Affine::from(&p)
    }
}

impl ConstantTimeEq for G1Affine {
    fn ct_eq(&self, other: &Self) -> Choice {
        (self.infinity & other.infinity)
            | ((!self.infinity)
                & (!other.infinity)
                & self.x.ct_eq(&other.x)
                & self.y.ct_eq(&other.y))
    }
}

impl ConditionallySelectable for G1Affine {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        G1Affine {
            x: Fp::conditional_select(&a.x, &b.x, choice),
            y: Fp::conditional_select(&a.y, &b.y, choice),
            infinity: Choice::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl Eq for G1Affine {}
impl PartialEq for G1Affine {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl<'a> Neg for &'a G1Affine {
    type Output = G1Affine;

    #[inline]
    fn neg(self) -> G1Affine {
        G1Affine {
            x: self.x,
            y: Fp::conditional_select(&-self.y, &Fp::one(), self.infinity),
            infinity: self.infinity,
        }
    }
}

const B: Fp = Fp::from_raw_unchecked([
    0xaa27_0000_000c_fff3,
    0x53cc_0032_fc34_000a,
    0x478f_e97a_6b0a_807f,
    0xb1d3_7ebe_e6ba_24d7,
    0x8ec9_733b_bf78_ab2f,
    0x09d6_4551_3d83_de7e,
]);

/// Cube root of unity in Fp
pub const BETA: Fp = Fp::from_raw_unchecked([
    0x30f1_361b_798a_64e8,
    0xf3b8_ddab_7ece_5a2a,
    0x16a8_ca3a_c615_77f7,
    0xc26a_2ff8_74fd_029b,
    0x3636_b766_6070_1c6e,
    0x051b_a4ab_241b_6160,
]);

const CONTEXT: &str = "G1Affine";

impl G1Affine {
    /// Point at infinity.
    pub fn identity() -> G1Affine {
        G1Affine {
            x: Fp::zero(),
            y: Fp::one(),
            infinity: Choice::from(1u8),
        }
    }

    /// Fixed generator.
    pub fn generator() -> G1Affine {
        G1Affine {
            x: Fp::from_raw_unchecked([
                0x5cb3_8790_fd53_0c16,
                0x7817_fc67_9976_fff5,
                0x154f_95c7_143b_a1c1,
                0xf0ae_6acd_f3d0_e747,
                0xedce_6ecc_21db_f440,
                0x1201_7741_9e0b_fb75,
            ]),
            y: Fp::from_raw_unchecked([
                0xbaac_93d5_0ce7_2271,
                0x8c22_631a_7918_fd8e,
                0xdd59_5f13_5707_25ce,
                0x51ac_5829_5040_5194,
                0x0e1c_8c3f_ad00_59c0,
                0x0bbc_3efc_5008_a26a,
            ]),
            infinity: Choice::from(0u8),
        }
    }

    /// Affine x coordinate (zero for the identity)
    pub fn x(&self) -> Fp {
        Fp::conditional_select(&self.x, &Fp::zero(), self.infinity)
    }

    /// Affine y coordinate (zero for the identity)
    pub fn y(&self) -> Fp {
        Fp::conditional_select(&self.y, &Fp::zero(), self.infinity)
    }

    /// Check if point at infinity.
    #[inline]
    pub fn is_identity(&self) -> Choice {
        self.infinity
    }

    /// Curve membership check.
    pub fn is_on_curve(&self) -> Choice {
        (self.y.square() - (self.x.square() * self.x)).ct_eq(&B) | self.infinity
    }

    /// Prime-order subgroup check through the endomorphism.
    pub fn is_torsion_free(&self) -> Choice {
        G1Projective::from(self).is_torsion_free()
    }

    /// Compress to 48 bytes.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_SIZE] {
        let mut res = self.x().to_bytes();
        EncodingFlags {
            compressed: true,
            infinity: bool::from(self.infinity),
            sort: bool::from((!self.infinity) & self.y.lexicographically_largest()),
        }
        .apply(&mut res[0]);
        res
    }

    /// Serialize to 96 bytes uncompressed.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_SIZE] {
        let mut res = [0; UNCOMPRESSED_SIZE];
        res[0..48].copy_from_slice(&self.x().to_bytes());
        res[48..96].copy_from_slice(&self.y().to_bytes());
        EncodingFlags {
            infinity: bool::from(self.infinity),
            ..EncodingFlags::default()
        }
        .apply(&mut res[0]);
        res
    }

    /// Decode a 96-byte uncompressed point, checking curve and subgroup
    /// membership.
    pub fn from_uncompressed(bytes: &[u8; UNCOMPRESSED_SIZE]) -> Result<Self> {
        let mut tmp = *bytes;
        let flags = EncodingFlags::take(&mut tmp[0]);
        validate::encoding(
            !flags.compressed,
            CONTEXT,
            "compression flag set on an uncompressed encoding",
        )?;
        validate::encoding(
            !flags.sort,
            CONTEXT,
            "sort flag set on an uncompressed encoding",
        )?;

        if flags.infinity {
            validate::encoding(
                tmp.iter().all(|b| *b == 0),
                CONTEXT,
                "non-zero padding in identity encoding",
            )?;
            return Ok(G1Affine::identity());
        }

        let p = G1Affine {
            x: decode_coordinate(&tmp[0..48], CONTEXT)?,
            y: decode_coordinate(&tmp[48..96], CONTEXT)?,
            infinity: Choice::from(0u8),
        };
        validate::encoding(
            bool::from(p.is_on_curve()),
            CONTEXT,
            "point is not on the curve",
        )?;
        validate::encoding(
            bool::from(p.is_torsion_free()),
            CONTEXT,
            "point is not in the prime-order subgroup",
        )?;
        Ok(p)
    }

    /// Decode a 48-byte compressed point, recovering y from the sort flag.
    pub fn from_compressed(bytes: &[u8; COMPRESSED_SIZE]) -> Result<Self> {
        let mut tmp = *bytes;
        let flags = EncodingFlags::take(&mut tmp[0]);
        validate::encoding(flags.compressed, CONTEXT, "compression flag not set")?;

        if flags.infinity {
            validate::encoding(!flags.sort, CONTEXT, "sort flag set on the identity")?;
            validate::encoding(
                tmp.iter().all(|b| *b == 0),
                CONTEXT,
                "non-zero padding in identity encoding",
            )?;
            return Ok(G1Affine::identity());
        }

        let x = decode_coordinate(&tmp, CONTEXT)?;
        let y = Option::<Fp>::from((x.square() * x + B).sqrt());
        validate::encoding(y.is_some(), CONTEXT, "x^3 + b is not a square")?;
        let y = y.unwrap_or_default();
        let y = Fp::conditional_select(
            &y,
            &-y,
            y.lexicographically_largest() ^ Choice::from(flags.sort as u8),
        );

        let p = G1Affine {
            x,
            y,
            infinity: Choice::from(0u8),
        };
        validate::encoding(
            bool::from(p.is_torsion_free()),
            CONTEXT,
            "point is not in the prime-order subgroup",
        )?;
        Ok(p)
    }
}

impl Serialize for G1Affine {
    fn from_bytes(bytes: &[u8]) -> bls381_api::Result<Self> {
        let array: [u8; COMPRESSED_SIZE] = to_array(bytes, CONTEXT)?;
        Ok(G1Affine::from_compressed(&array)?)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_compressed().to_vec()
    }
}

/// G₁ Jacobian point representation.
#[derive(Copy, Clone, Debug)]
pub struct G1Projective {
    pub(crate) x: Fp,
    pub(crate) y: Fp,
    pub(crate) z: Fp,
}

impl Default for G1Projective {
    fn default() -> G1Projective {
        G1Projective::identity()
    }
}

impl zeroize::DefaultIsZeroes for G1Projective {}

impl fmt::Display for G1Projective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", G1Affine::from(self))
    }
}

impl<'a> From<&'a G1Affine> for G1Projective {
    fn from(p: &'a G1Affine) -> G1Projective {
        G1Projective {
            x: p.x,
            y: p.y,
            z: Fp::conditional_select(&Fp::one(), &Fp::zero(), p.infinity),
        }
    }
}

impl From<G1Affine> for G1Projective {
    fn from(p: G1Affine) -> G1Projective {
        G1Projective::from(&p)
    }
}

impl ConstantTimeEq for G1Projective {
    fn ct_eq(&self, other: &Self) -> Choice {
        // X1 Z2^2 = X2 Z1^2 and Y1 Z2^3 = Y2 Z1^3
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let x1 = self.x * z2z2;
        let x2 = other.x * z1z1;
        let y1 = self.y * z2z2 * other.z;
        let y2 = other.y * z1z1 * self.z;

        let self_is_zero = self.z.is_zero();
        let other_is_zero = other.z.is_zero();

        (self_is_zero & other_is_zero)
            | ((!self_is_zero) & (!other_is_zero) & x1.ct_eq(&x2) & y1.ct_eq(&y2))
    }
}

impl ConditionallySelectable for G1Projective {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        G1Projective {
            x: Fp::conditional_select(&a.x, &b.x, choice),
            y: Fp::conditional_select(&a.y, &b.y, choice),
            z: Fp::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl Eq for G1Projective {}
impl PartialEq for G1Projective {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl<'a> Neg for &'a G1Projective {
    type Output = G1Projective;

    #[inline]
    fn neg(self) -> G1Projective {
        G1Projective {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }
}

impl<'a, 'b> Add<&'b G1Projective> for &'a G1Projective {
    type Output = G1Projective;

    #[inline]
    fn add(self, rhs: &'b G1Projective) -> G1Projective {
        self.add(rhs)
    }
}

impl<'a, 'b> Sub<&'b G1Projective> for &'a G1Projective {
    type Output = G1Projective;

    #[inline]
    fn sub(self, rhs: &'b G1Projective) -> G1Projective {
        self + (-rhs)
    }
}

impl<'a, 'b> Add<&'b G1Affine> for &'a G1Projective {
    type Output = G1Projective;

    #[inline]
    fn add(self, rhs: &'b G1Affine) -> G1Projective {
        self.add_mixed(rhs)
    }
}

impl<'a, 'b> Sub<&'b G1Affine> for &'a G1Projective {
    type Output = G1Projective;

    #[inline]
    fn sub(self, rhs: &'b G1Affine) -> G1Projective {
        self.add_mixed(&-rhs)
    }
}

impl<'a, 'b> Add<&'b G1Projective> for &'a G1Affine {
    type Output = G1Projective;

    #[inline]
    fn add(self, rhs: &'b G1Projective) -> G1Projective {
        rhs.add_mixed(self)
    }
}

impl<'a, 'b> Sub<&'b G1Projective> for &'a G1Affine {
    type Output = G1Projective;

    #[inline]
    fn sub(self, rhs: &'b G1Projective) -> G1Projective {
        (-rhs).add_mixed(self)
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a G1Projective {
    type Output = G1Projective;

    fn mul(self, other: &'b Scalar) -> Self::Output {
        self.multiply(&other.to_bytes())
    }
}

impl<'a, 'b> Mul<&'b G1Projective> for &'a Scalar {
    type Output = G1Projective;

    #[inline]
    fn mul(self, rhs: &'b G1Projective) -> Self::Output {
        rhs * self
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a G1Affine {
    type Output = G1Projective;

    fn mul(self, other: &'b Scalar) -> Self::Output {
        G1Projective::from(self).multiply(&other.to_bytes())
    }
}

impl<'a, 'b> Mul<&'b G1Affine> for &'a Scalar {
    type Output = G1Projective;

    #[inline]
    fn mul(self, rhs: &'b G1Affine) -> Self::Output {
        rhs * self
    }
}

impl_neg_by_value!(G1Affine);
impl_neg_by_value!(G1Projective);
impl_add_sub_ops!(G1Projective);
impl_add_sub_ops!(G1Projective, G1Affine, G1Projective);
impl_add_sub_assign!(G1Projective, G1Affine);
impl_add_sub_ops!(G1Affine, G1Projective, G1Projective);
impl_mul_ops!(G1Projective, Scalar);
impl_mul_ops!(G1Affine, Scalar, G1Projective);
impl_mul_ops!(Scalar, G1Projective, G1Projective);
impl_mul_ops!(Scalar, G1Affine, G1Projective);

impl<T> Sum<T> for G1Projective
where
    T: Borrow<G1Projective>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::identity(), |acc, item| acc + item.borrow())
    }
}

impl LatticeGroup for G1Projective {
    fn identity() -> Self {
        G1Projective::identity()
    }

    fn double(&self) -> Self {
        G1Projective::double(self)
    }
}

impl G1Projective {
    /// Point at infinity.
    pub fn identity() -> G1Projective {
        G1Projective {
            x: Fp::zero(),
            y: Fp::one(),
            z: Fp::zero(),
        }
    }

    /// Fixed generator.
    pub fn generator() -> G1Projective {
        G1Projective::from(G1Affine::generator())
    }

    /// Build a point from affine coordinates, rejecting points off the curve.
    ///
    /// No subgroup check is made; use [`G1Projective::is_torsion_free`] or
    /// [`G1Projective::clear_cofactor`] when the source is untrusted.
    pub fn from_affine_coords(x: Fp, y: Fp) -> Result<Self> {
        let p = G1Affine {
            x,
            y,
            infinity: Choice::from(0u8),
        };
        validate::encoding(
            bool::from(p.is_on_curve()),
            "G1Projective",
            "point is not on the curve",
        )?;
        Ok(G1Projective::from(p))
    }

    /// Generator times a uniformly random scalar.
    pub fn random(rng: &mut impl RngCore) -> Result<Self> {
        Ok(G1Projective::generator() * Scalar::random(rng)?)
    }

    /// Check if point at infinity.
    #[inline]
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// `Y² = X³ + b Z⁶`, or the identity.
    pub fn is_on_curve(&self) -> Choice {
        let z2 = self.z.square();
        let z6 = z2.square() * z2;
        (self.y.square() - self.x.square() * self.x).ct_eq(&(z6 * B)) | self.z.is_zero()
    }

    /// Scale to `Z = 1`.
    pub fn to_affine(&self) -> G1Affine {
        G1Affine::from(self)
    }

    /// The GLV endomorphism `(X, Y, Z) -> (βX, Y, Z)`, equal to `[-u²]P` on G₁.
    pub fn endomorphism(&self) -> G1Projective {
        G1Projective {
            x: self.x * BETA,
            y: self.y,
            z: self.z,
        }
    }

    /// Point doubling (dbl-2009-l).
    pub fn double(&self) -> G1Projective {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = ((self.x + b).square() - a - c).double();
        let e = a.double() + a;
        let f = e.square();

        let x3 = f - d.double();
        let y3 = e * (d - x3) - c.double().double().double();
        let z3 = (self.y * self.z).double();

        let tmp = G1Projective {
            x: x3,
            y: y3,
            z: z3,
        };

        G1Projective::conditional_select(&tmp, &G1Projective::identity(), self.is_identity())
    }

    /// Point addition (add-2007-bl) with the exceptional cases selected.
    pub fn add(&self, rhs: &G1Projective) -> G1Projective {
        let z1z1 = self.z.square();
        let z2z2 = rhs.z.square();
        let u1 = self.x * z2z2;
        let u2 = rhs.x * z1z1;
        let s1 = self.y * rhs.z * z2z2;
        let s2 = rhs.y * self.z * z1z1;

        let h = u2 - u1;
        let i = h.double().square();
        let j = h * i;
        let r = (s2 - s1).double();
        let v = u1 * i;

        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (s1 * j).double();
        let z3 = ((self.z + rhs.z).square() - z1z1 - z2z2) * h;

        let sum = G1Projective {
            x: x3,
            y: y3,
            z: z3,
        };

        let same_x = h.is_zero();
        let same_y = r.is_zero();
        let mut res = G1Projective::conditional_select(
            &sum,
            &G1Projective::identity(),
            same_x & !same_y,
        );
        res = G1Projective::conditional_select(&res, &self.double(), same_x & same_y);
        res = G1Projective::conditional_select(&res, rhs, self.is_identity());
        G1Projective::conditional_select(&res, self, rhs.is_identity())
    }

    /// Mixed addition with an affine point (madd-2007-bl).
    pub fn add_mixed(&self, rhs: &G1Affine) -> G1Projective {
        let z1z1 = self.z.square();
        let u2 = rhs.x * z1z1;
        let s2 = rhs.y * self.z * z1z1;

        let h = u2 - self.x;
        let hh = h.square();
        let i = hh.double().double();
        let j = h * i;
        let r = (s2 - self.y).double();
        let v = self.x * i;

        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (self.y * j).double();
        let z3 = (self.z + h).square() - z1z1 - hh;

        let sum = G1Projective {
            x: x3,
            y: y3,
            z: z3,
        };

        let same_x = h.is_zero();
        let same_y = r.is_zero();
        let mut res = G1Projective::conditional_select(
            &sum,
            &G1Projective::identity(),
            same_x & !same_y,
        );
        res = G1Projective::conditional_select(&res, &self.double(), same_x & same_y);
        res = G1Projective::conditional_select(&res, &G1Projective::from(rhs), self.is_identity());
        G1Projective::conditional_select(&res, self, rhs.is_identity())
    }

    /// Constant-time double-and-add over the little-endian scalar bytes.
    fn multiply(&self, by: &[u8; 32]) -> G1Projective {
        let mut acc = G1Projective::identity();

        // The top bit of a canonical scalar is always zero
        for bit in by
            .iter()
            .rev()
            .flat_map(|byte| (0..8).rev().map(move |i| Choice::from((byte >> i) & 1u8)))
            .skip(1)
        {
            acc = acc.double();
            acc = G1Projective::conditional_select(&acc, &(acc + self), bit);
        }

        acc
    }

    /// Scalar multiplication through the two-dimensional GLV decomposition.
    ///
    /// Runs in variable time; use `*` for secret scalars.
    pub fn mul_glv(&self, by: &Scalar) -> Result<G1Projective> {
        let coeffs = parameters().glv.decompose(&by.to_biguint())?;
        multi_mul(&[*self, self.endomorphism()], &coeffs)
    }

    /// Multiply by u.
    pub(crate) fn mul_by_x(&self) -> G1Projective {
        let mut xself = G1Projective::identity();
        let mut x = BLS_X >> 1;
        let mut tmp = *self;
        while x != 0 {
            tmp = tmp.double();
            if x % 2 == 1 {
                xself += tmp;
            }
            x >>= 1;
        }
        if BLS_X_IS_NEGATIVE {
            xself = -xself;
        }
        xself
    }

    /// Map any curve point into G₁ by multiplying by `1 - u`.
    pub fn clear_cofactor(&self) -> G1Projective {
        self - self.mul_by_x()
    }

    /// Subgroup check: `φ(P) = [-u²]P`.
    pub fn is_torsion_free(&self) -> Choice {
        let minus_x_squared_times_p = -self.mul_by_x().mul_by_x();
        minus_x_squared_times_p.ct_eq(&self.endomorphism())
    }

    /// Convert a batch of points to affine with a single inversion.
    pub fn batch_normalize(p: &[Self], q: &mut [G1Affine]) -> Result<()> {
        validate::length("G1Projective::batch_normalize", q.len(), p.len())?;

        let mut acc = Fp::one();
        for (p, q) in p.iter().zip(q.iter_mut()) {
            // Running product of the non-zero Z coordinates
            q.x = acc;
            acc = Fp::conditional_select(&(acc * p.z), &acc, p.is_identity());
        }

        // Product of non-zero values, so always invertible
        acc = acc.invert().unwrap_or(Fp::zero());

        for (p, q) in p.iter().rev().zip(q.iter_mut().rev()) {
            let skip = p.is_identity();

            let zinv = q.x * acc;
            acc = Fp::conditional_select(&(acc * p.z), &acc, skip);

            let zinv2 = zinv.square();
            q.x = p.x * zinv2;
            q.y = p.y * zinv2 * zinv;
            q.infinity = Choice::from(0u8);

            *q = G1Affine::conditional_select(q, &G1Affine::identity(), skip);
        }

        Ok(())
    }
}
