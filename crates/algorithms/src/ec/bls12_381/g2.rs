//! G₂ group implementation for BLS12-381.
//!
//! Points live on the sextic twist `E'(Fp2): y² = x³ + 4(1 + i)`.
//! [`G2Projective`] is Jacobian `(X, Y, Z)` with a cached `T = Z²`, which every
//! operation keeps in sync.

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Neg, Sub};

use bls381_api::Serialize;
use bls381_params::pairing::bls12_381::{
    BLS12_381_G2_COMPRESSED_SIZE as COMPRESSED_SIZE,
    BLS12_381_G2_UNCOMPRESSED_SIZE as UNCOMPRESSED_SIZE,
};
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::field::fp::Fp;
use super::field::fp2::Fp2;
use super::lattice::{multi_mul, LatticeGroup};
use super::parameters::parameters;
use super::{decode_coordinate, to_array, EncodingFlags, Scalar, BLS_X, BLS_X_IS_NEGATIVE};
use crate::error::{validate, Result};

/// G₂ affine point representation.
#[derive(Copy, Clone, Debug)]
pub struct G2Affine {
    pub(crate) x: Fp2,
    pub(crate) y: Fp2,
    infinity: Choice,
}

impl Default for G2Affine {
    fn default() -> G2Affine {
        G2Affine::identity()
    }
}

impl zeroize::DefaultIsZeroes for G2Affine {}

impl fmt::Display for G2Affine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<'a> From<&'a G2Projective> for G2Affine {
    fn from(p: &'a G2Projective) -> G2Affine {
        let zinv = p.z.invert().unwrap_or(Fp2::zero());
        let zinv2 = zinv.square();
        let tmp = G2Affine {
            x: p.x * zinv2,
            y: p.y * zinv2 * zinv,
            infinity: Choice::from(0u8),
        };

        G2Affine::conditional_select(&tmp, &G2Affine::identity(), zinv.is_zero())
    }
}

impl From<G2Projective> for G2Affine {
    fn from(p: G2Projective) -> G2Affine {
        G2Affine::from(&p)
    }
}

impl ConstantTimeEq for G2Affine {
    fn ct_eq(&self, other: &Self) -> Choice {
        (self.infinity & other.infinity)
            | ((!self.infinity)
                & (!other.infinity)
                & self.x.ct_eq(&other.x)
                & self.y.ct_eq(&other.y))
    }
}

impl ConditionallySelectable for G2Affine {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        G2Affine {
            x: Fp2::conditional_select(&a.x, &b.x, choice),
            y: Fp2::conditional_select(&a.y, &b.y, choice),
            infinity: Choice::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl Eq for G2Affine {}
impl PartialEq for G2Affine {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl<'a> Neg for &'a G2Affine {
    type Output = G2Affine;

    #[inline]
    fn neg(self) -> G2Affine {
        G2Affine {
            x: self.x,
            y: Fp2::conditional_select(&-self.y, &Fp2::one(), self.infinity),
            infinity: self.infinity,
        }
    }
}

/// Curve constant B = 4(1 + i)
const B: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0xaa27_0000_000c_fff3,
        0x53cc_0032_fc34_000a,
        0x478f_e97a_6b0a_807f,
        0xb1d3_7ebe_e6ba_24d7,
        0x8ec9_733b_bf78_ab2f,
        0x09d6_4551_3d83_de7e,
    ]),
    c1: Fp::from_raw_unchecked([
        0xaa27_0000_000c_fff3,
        0x53cc_0032_fc34_000a,
        0x478f_e97a_6b0a_807f,
        0xb1d3_7ebe_e6ba_24d7,
        0x8ec9_733b_bf78_ab2f,
        0x09d6_4551_3d83_de7e,
    ]),
};

/// 1 / (1 + i)^((p - 1) / 3)
const PSI_COEFF_X: Fp2 = Fp2 {
    c0: Fp::zero(),
    c1: Fp::from_raw_unchecked([
        0x890d_c9e4_8675_45c3,
        0x2af3_2253_3285_a5d5,
        0x5088_0866_309b_7e2c,
        0xa20d_1b8c_7e88_1024,
        0x14e4_f04f_e2db_9068,
        0x14e5_6d3f_1564_853a,
    ]),
};

/// 1 / (1 + i)^((p - 1) / 2)
const PSI_COEFF_Y: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x3e2f_585d_a55c_9ad1,
        0x4294_213d_86c1_8183,
        0x3828_44c8_8b62_3732,
        0x92ad_2afd_1910_3e18,
        0x1d79_4e4f_ac7c_f0b9,
        0x0bd5_92fc_7d82_5ec8,
    ]),
    c1: Fp::from_raw_unchecked([
        0x7bcf_a7a2_5aa3_0fda,
        0xdc17_dec1_2a92_7e7c,
        0x2f08_8dd8_6b4e_bef1,
        0xd1ca_2087_da74_d4a7,
        0x2da2_5966_96ce_bc1d,
        0x0e2b_7eed_bbfd_87d2,
    ]),
};

/// 1 / 2^((p - 1) / 3)
const PSI2_COEFF_X: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0xcd03_c9e4_8671_f071,
        0x5dab_2246_1fcd_a5d2,
        0x5870_42af_d385_1b95,
        0x8eb6_0ebe_01ba_cb9e,
        0x03f9_7d6e_83d0_50d2,
        0x18f0_2065_5463_8741,
    ]),
    c1: Fp::zero(),
};

const CONTEXT: &str = "G2Affine";

impl G2Affine {
    /// Point at infinity.
    pub fn identity() -> G2Affine {
        G2Affine {
            x: Fp2::zero(),
            y: Fp2::one(),
            infinity: Choice::from(1u8),
        }
    }

    /// Fixed generator.
    pub fn generator() -> G2Affine {
        G2Affine {
            x: Fp2 {
                c0: Fp::from_raw_unchecked([
                    0xf5f2_8fa2_0294_0a10,
                    0xb3f5_fb26_87b4_961a,
                    0xa1a8_93b5_3e2a_e580,
                    0x9894_999d_1a3c_aee9,
                    0x6f67_b763_1863_366b,
                    0x0581_9192_4350_bcd7,
                ]),
                c1: Fp::from_raw_unchecked([
                    0xa5a9_c075_9e23_f606,
                    0xaaa0_c59d_bccd_60c3,
                    0x3bb1_7e18_e286_7806,
                    0x1b1a_b6cc_8541_b367,
                    0xc2b6_ed0e_f215_8547,
                    0x1192_2a09_7360_edf3,
                ]),
            },
            y: Fp2 {
                c0: Fp::from_raw_unchecked([
                    0x4c73_0af8_6049_4c4a,
                    0x597c_fa1f_5e36_9c5a,
                    0xe7e6_856c_aa0a_635a,
                    0xbbef_b5e9_6e0d_495f,
                    0x07d3_a975_f0ef_25a2,
                    0x0083_fd8e_7e80_dae5,
                ]),
                c1: Fp::from_raw_unchecked([
                    0xadc0_fc92_df64_b05d,
                    0x18aa_270a_2b14_61dc,
                    0x86ad_ac6a_3be4_eba0,
                    0x7949_5c4e_c93d_a33a,
                    0xe717_5850_a43c_caed,
                    0x0b2b_c2a1_63de_1bf2,
                ]),
            },
            infinity: Choice::from(0u8),
        }
    }

    /// Affine x coordinate (zero for the identity)
    pub fn x(&self) -> Fp2 {
        Fp2::conditional_select(&self.x, &Fp2::zero(), self.infinity)
    }

    /// Affine y coordinate (zero for the identity)
    pub fn y(&self) -> Fp2 {
        Fp2::conditional_select(&self.y, &Fp2::zero(), self.infinity)
    }

    /// Check if point at infinity.
    #[inline]
    pub fn is_identity(&self) -> Choice {
        self.infinity
    }

    /// Check if on curve y² = x³ + B.
    pub fn is_on_curve(&self) -> Choice {
        (self.y.square() - (self.x.square() * self.x)).ct_eq(&B) | self.infinity
    }

    /// Check subgroup membership using the psi endomorphism.
    pub fn is_torsion_free(&self) -> Choice {
        G2Projective::from(self).is_torsion_free()
    }

    /// Compress to 96 bytes: `x.c1 || x.c0` with the flags on top.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_SIZE] {
        let x = self.x();
        let mut res = [0; COMPRESSED_SIZE];

        res[0..48].copy_from_slice(&x.c1.to_bytes());
        res[48..96].copy_from_slice(&x.c0.to_bytes());

        EncodingFlags {
            compressed: true,
            infinity: bool::from(self.infinity),
            sort: bool::from((!self.infinity) & self.y.lexicographically_largest()),
        }
        .apply(&mut res[0]);
        res
    }

    /// Serialize to 192 bytes uncompressed: `x.c1 || x.c0 || y.c1 || y.c0`.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_SIZE] {
        let mut res = [0; UNCOMPRESSED_SIZE];
        let x = self.x();
        let y = self.y();

        res[0..48].copy_from_slice(&x.c1.to_bytes());
        res[48..96].copy_from_slice(&x.c0.to_bytes());
        res[96..144].copy_from_slice(&y.c1.to_bytes());
        res[144..192].copy_from_slice(&y.c0.to_bytes());

        EncodingFlags {
            infinity: bool::from(self.infinity),
            ..EncodingFlags::default()
        }
        .apply(&mut res[0]);
        res
    }

    /// Decode a 192-byte uncompressed point with curve and subgroup checks.
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
            return Ok(G2Affine::identity());
        }

        let x = Fp2 {
            c1: decode_coordinate(&tmp[0..48], CONTEXT)?,
            c0: decode_coordinate(&tmp[48..96], CONTEXT)?,
        };
        let y = Fp2 {
            c1: decode_coordinate(&tmp[96..144], CONTEXT)?,
            c0: decode_coordinate(&tmp[144..192], CONTEXT)?,
        };

        let p = G2Affine {
            x,
            y,
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

    /// Decode a 96-byte compressed point.
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
            return Ok(G2Affine::identity());
        }

        let x = Fp2 {
            c1: decode_coordinate(&tmp[0..48], CONTEXT)?,
            c0: decode_coordinate(&tmp[48..96], CONTEXT)?,
        };
        let y = Option::<Fp2>::from((x.square() * x + B).sqrt());
        validate::encoding(y.is_some(), CONTEXT, "x^3 + b is not a square")?;
        let y = y.unwrap_or_default();
        let y = Fp2::conditional_select(
            &y,
            &-y,
            y.lexicographically_largest() ^ Choice::from(flags.sort as u8),
        );

        let p = G2Affine {
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

impl Serialize for G2Affine {
    fn from_bytes(bytes: &[u8]) -> bls381_api::Result<Self> {
        let array: [u8; COMPRESSED_SIZE] = to_array(bytes, CONTEXT)?;
        Ok(G2Affine::from_compressed(&array)?)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_compressed().to_vec()
    }
}

/// G₂ Jacobian point with `t = z²`.
#[derive(Copy, Clone, Debug)]
pub struct G2Projective {
    pub(crate) x: Fp2,
    pub(crate) y: Fp2,
    pub(crate) z: Fp2,
    pub(crate) t: Fp2,
}

impl Default for G2Projective {
    fn default() -> G2Projective {
        G2Projective::identity()
    }
}

impl zeroize::DefaultIsZeroes for G2Projective {}

impl fmt::Display for G2Projective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", G2Affine::from(self))
    }
}

impl<'a> From<&'a G2Affine> for G2Projective {
    fn from(p: &'a G2Affine) -> G2Projective {
        let z = Fp2::conditional_select(&Fp2::one(), &Fp2::zero(), p.infinity);
        G2Projective {
            x: p.x,
            y: p.y,
            z,
            t: z,
        }
    }
}

impl From<G2Affine> for G2Projective {
    fn from(p: G2Affine) -> G2Projective {
        G2Projective::from(&p)
    }
}

impl ConstantTimeEq for G2Projective {
    fn ct_eq(&self, other: &Self) -> Choice {
        let x1 = self.x * other.t;
        let x2 = other.x * self.t;
        let y1 = self.y * other.t * other.z;
        let y2 = other.y * self.t * self.z;

        let self_is_zero = self.z.is_zero();
        let other_is_zero = other.z.is_zero();

        (self_is_zero & other_is_zero)
            | ((!self_is_zero) & (!other_is_zero) & x1.ct_eq(&x2) & y1.ct_eq(&y2))
    }
}

impl ConditionallySelectable for G2Projective {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        G2Projective {
            x: Fp2::conditional_select(&a.x, &b.x, choice),
            y: Fp2::conditional_select(&a.y, &b.y, choice),
            z: Fp2::conditional_select(&a.z, &b.z, choice),
            t: Fp2::conditional_select(&a.t, &b.t, choice),
        }
    }
}

impl Eq for G2Projective {}
impl PartialEq for G2Projective {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl<'a> Neg for &'a G2Projective {
    type Output = G2Projective;

    #[inline]
    fn neg(self) -> G2Projective {
        G2Projective {
            x: self.x,
            y: -self.y,
            z: self.z,
            t: self.t,
        }
    }
}

impl<'a, 'b> Add<&'b G2Projective> for &'a G2Projective {
    type Output = G2Projective;

    #[inline]
    fn add(self, rhs: &'b G2Projective) -> G2Projective {
        self.add(rhs)
    }
}

impl<'a, 'b> Sub<&'b G2Projective> for &'a G2Projective {
    type Output = G2Projective;

    #[inline]
    fn sub(self, rhs: &'b G2Projective) -> G2Projective {
        self + (-rhs)
    }
}

impl<'a, 'b> Add<&'b G2Affine> for &'a G2Projective {
    type Output = G2Projective;

    #[inline]
    fn add(self, rhs: &'b G2Affine) -> G2Projective {
        self.add_mixed(rhs)
    }
}

impl<'a, 'b> Sub<&'b G2Affine> for &'a G2Projective {
    type Output = G2Projective;

    #[inline]
    fn sub(self, rhs: &'b G2Affine) -> G2Projective {
        self.add_mixed(&-rhs)
    }
}

impl<'a, 'b> Add<&'b G2Projective> for &'a G2Affine {
    type Output = G2Projective;

    #[inline]
    fn add(self, rhs: &'b G2Projective) -> G2Projective {
        rhs.add_mixed(self)
    }
}

impl<'a, 'b> Sub<&'b G2Projective> for &'a G2Affine {
    type Output = G2Projective;

    #[inline]
    fn sub(self, rhs: &'b G2Projective) -> G2Projective {
        (-rhs).add_mixed(self)
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a G2Projective {
    type Output = G2Projective;

    fn mul(self, other: &'b Scalar) -> Self::Output {
        self.multiply(&other.to_bytes())
    }
}

impl<'a, 'b> Mul<&'b G2Projective> for &'a Scalar {
    type Output = G2Projective;

    #[inline]
    fn mul(self, rhs: &'b G2Projective) -> Self::Output {
        rhs * self
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a G2Affine {
    type Output = G2Projective;

    fn mul(self, other: &'b Scalar) -> Self::Output {
        G2Projective::from(self).multiply(&other.to_bytes())
    }
}

impl<'a, 'b> Mul<&'b G2Affine> for &'a Scalar {
    type Output = G2Projective;

    #[inline]
    fn mul(self, rhs: &'b G2Affine) -> Self::Output {
        rhs * self
    }
}

impl_neg_by_value!(G2Affine);
impl_neg_by_value!(G2Projective);
impl_add_sub_ops!(G2Projective);
impl_add_sub_ops!(G2Projective, G2Affine, G2Projective);
impl_add_sub_assign!(G2Projective, G2Affine);
impl_add_sub_ops!(G2Affine, G2Projective, G2Projective);
impl_mul_ops!(G2Projective, Scalar);
impl_mul_ops!(G2Affine, Scalar, G2Projective);
impl_mul_ops!(Scalar, G2Projective, G2Projective);
impl_mul_ops!(Scalar, G2Affine, G2Projective);

impl<T> Sum<T> for G2Projective
where
    T: Borrow<G2Projective>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::identity(), |acc, item| acc + item.borrow())
    }
}

impl LatticeGroup for G2Projective {
    fn identity() -> Self {
        G2Projective::identity()
    }

    fn double(&self) -> Self {
        G2Projective::double(self)
    }
}

impl G2Projective {
    /// Point at infinity.
    pub fn identity() -> G2Projective {
        G2Projective {
            x: Fp2::zero(),
            y: Fp2::one(),
            z: Fp2::zero(),
            t: Fp2::zero(),
        }
    }

    /// Fixed generator.
    pub fn generator() -> G2Projective {
        G2Projective::from(G2Affine::generator())
    }

    /// Build a point from affine coordinates, rejecting points off the twist.
    pub fn from_affine_coords(x: Fp2, y: Fp2) -> Result<Self> {
        let p = G2Affine {
            x,
            y,
            infinity: Choice::from(0u8),
        };
        validate::encoding(
            bool::from(p.is_on_curve()),
            "G2Projective",
            "point is not on the curve",
        )?;
        Ok(G2Projective::from(p))
    }

    /// Generator times a uniformly random scalar.
    pub fn random(rng: &mut impl RngCore) -> Result<Self> {
        Ok(G2Projective::generator() * Scalar::random(rng)?)
    }

    /// Check if point at infinity.
    #[inline]
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// `Y² = X³ + b Z⁶`, or the identity.
    pub fn is_on_curve(&self) -> Choice {
        let z6 = self.t.square() * self.t;
        (self.y.square() - self.x.square() * self.x).ct_eq(&(z6 * B)) | self.z.is_zero()
    }

    /// Scale to `Z = 1`.
    pub fn to_affine(&self) -> G2Affine {
        G2Affine::from(self)
    }

    /// Point doubling (dbl-2009-l).
    pub fn double(&self) -> G2Projective {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = ((self.x + b).square() - a - c).double();
        let e = a.double() + a;
        let f = e.square();

        let x3 = f - d.double();
        let y3 = e * (d - x3) - c.double().double().double();
        let z3 = (self.y * self.z).double();

        let tmp = G2Projective {
            x: x3,
            y: y3,
            z: z3,
            t: z3.square(),
        };

        G2Projective::conditional_select(&tmp, &G2Projective::identity(), self.is_identity())
    }

    /// Point addition (add-2007-bl) with the exceptional cases selected.
    pub fn add(&self, rhs: &G2Projective) -> G2Projective {
        let u1 = self.x * rhs.t;
        let u2 = rhs.x * self.t;
        let s1 = self.y * rhs.z * rhs.t;
        let s2 = rhs.y * self.z * self.t;

        let h = u2 - u1;
        let i = h.double().square();
        let j = h * i;
        let r = (s2 - s1).double();
        let v = u1 * i;

        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (s1 * j).double();
        let z3 = ((self.z + rhs.z).square() - self.t - rhs.t) * h;

        let sum = G2Projective {
            x: x3,
            y: y3,
            z: z3,
            t: z3.square(),
        };

        let same_x = h.is_zero();
        let same_y = r.is_zero();
        let mut res = G2Projective::conditional_select(
            &sum,
            &G2Projective::identity(),
            same_x & !same_y,
        );
        res = G2Projective::conditional_select(&res, &self.double(), same_x & same_y);
        res = G2Projective::conditional_select(&res, rhs, self.is_identity());
        G2Projective::conditional_select(&res, self, rhs.is_identity())
    }

    /// Mixed addition with an affine point (madd-2007-bl).
    pub fn add_mixed(&self, rhs: &G2Affine) -> G2Projective {
        let u2 = rhs.x * self.t;
        let s2 = rhs.y * self.z * self.t;

        let h = u2 - self.x;
        let hh = h.square();
        let i = hh.double().double();
        let j = h * i;
        let r = (s2 - self.y).double();
        let v = self.x * i;

        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (self.y * j).double();
        let z3 = (self.z + h).square() - self.t - hh;

        let sum = G2Projective {
            x: x3,
            y: y3,
            z: z3,
            t: z3.square(),
        };

        let same_x = h.is_zero();
        let same_y = r.is_zero();
        let mut res = G2Projective::conditional_select(
            &sum,
            &G2Projective::identity(),
            same_x & !same_y,
        );
        res = G2Projective::conditional_select(&res, &self.double(), same_x & same_y);
        res = G2Projective::conditional_select(&res, &G2Projective::from(rhs), self.is_identity());
        G2Projective::conditional_select(&res, self, rhs.is_identity())
    }

    /// Constant-time double-and-add over the little-endian scalar bytes.
    fn multiply(&self, by: &[u8; 32]) -> G2Projective {
        let mut acc = G2Projective::identity();

        // The top bit of a canonical scalar is always zero
        for bit in by
            .iter()
            .rev()
            .flat_map(|byte| (0..8).rev().map(move |i| Choice::from((byte >> i) & 1u8)))
            .skip(1)
        {
            acc = acc.double();
            acc = G2Projective::conditional_select(&acc, &(acc + self), bit);
        }

        acc
    }

    /// Scalar multiplication through the four-dimensional GLS decomposition
    /// over `P, ψ(P), ψ²(P), ψ³(P)`.
    ///
    /// Runs in variable time; use `*` for secret scalars.
    pub fn mul_gls(&self, by: &Scalar) -> Result<G2Projective> {
        let coeffs = parameters().gls.decompose(&by.to_biguint())?;
        let psi1 = self.psi();
        let psi2 = self.psi2();
        let psi3 = psi2.psi();
        multi_mul(&[*self, psi1, psi2, psi3], &coeffs)
    }

    /// Budroni-Pintore cofactor clearing.
    pub fn clear_cofactor(&self) -> G2Projective {
        let t1 = self.mul_by_x();
        let t2 = self.psi();
        self.double().psi2() + (t1 + t2).mul_by_x() - t1 - t2 - *self
    }

    /// Subgroup check: `ψ(P) = [u]P`.
    pub fn is_torsion_free(&self) -> Choice {
        self.psi().ct_eq(&self.mul_by_x())
    }

    /// Multiply by u.
    pub(crate) fn mul_by_x(&self) -> G2Projective {
        let mut xself = G2Projective::identity();
        let mut x = BLS_X >> 1;
        let mut acc = *self;
        while x != 0 {
            acc = acc.double();
            if x % 2 == 1 {
                xself += acc;
            }
            x >>= 1;
        }
        if BLS_X_IS_NEGATIVE {
            xself = -xself;
        }
        xself
    }

    /// The untwist-Frobenius-twist endomorphism ψ, equal to `[u]P` on G₂.
    pub fn psi(&self) -> G2Projective {
        let z = self.z.frobenius_map(1);
        G2Projective {
            x: self.x.frobenius_map(1) * PSI_COEFF_X,
            y: self.y.frobenius_map(1) * PSI_COEFF_Y,
            z,
            t: z.square(),
        }
    }

    /// ψ², which needs no Frobenius.
    pub fn psi2(&self) -> G2Projective {
        G2Projective {
            x: self.x * PSI2_COEFF_X,
            y: -self.y,
            z: self.z,
            t: self.t,
        }
    }
}
