//! BLS12-381 base field `GF(p)` where p = 0x1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigUint;
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use super::backend::{adc, sbb, ActiveBackend, MontgomeryBackend, MontgomeryModulus};
use crate::error::{validate, Error, Result};

// ============================================================================
// Field Constants
// ============================================================================

/// Field modulus p
pub(crate) const MODULUS: [u64; 6] = [
    0xb9fe_ffff_ffff_aaab,
    0x1eab_fffe_b153_ffff,
    0x6730_d2a0_f6b0_f624,
    0x6477_4b84_f385_12bf,
    0x4b1b_a7b6_434b_acd7,
    0x1a01_11ea_397f_e69a,
];

/// Montgomery parameter INV = -(p^{-1} mod 2^64) mod 2^64
const INV: u64 = 0x89f3_fffc_fffc_fffd;

/// Montgomery R = 2^384 mod p
pub(crate) const R: Fp = Fp([
    0x7609_0000_0002_fffd,
    0xebf4_000b_c40c_0002,
    0x5f48_9857_53c7_58ba,
    0x77ce_5853_7052_5745,
    0x5c07_1a97_a256_ec6d,
    0x15f6_5ec3_fa80_e493,
]);

/// Montgomery R^2 = 2^768 mod p
pub(crate) const R2: Fp = Fp([
    0xf4df_1f34_1c34_1746,
    0x0a76_e6a6_09d1_04f1,
    0x8de5_476c_4c95_b6d5,
    0x67eb_88a9_939d_83c0,
    0x9a79_3e85_b519_952d,
    0x1198_8fe5_92ca_e3aa,
]);

/// (p + 1) / 4, the square root exponent for p = 3 mod 4
const SQRT_EXP: [u64; 6] = [
    0xee7f_bfff_ffff_eaab,
    0x07aa_ffff_ac54_ffff,
    0xd9cc_34a8_3dac_3d89,
    0xd91d_d2e1_3ce1_44af,
    0x92c6_e9ed_90d2_eb35,
    0x0680_447a_8e5f_f9a6,
];

/// p - 2
const INVERT_EXP: [u64; 6] = [
    0xb9fe_ffff_ffff_aaa9,
    0x1eab_fffe_b153_ffff,
    0x6730_d2a0_f6b0_f624,
    0x6477_4b84_f385_12bf,
    0x4b1b_a7b6_434b_acd7,
    0x1a01_11ea_397f_e69a,
];

/// Mask for the 61 significant bits of the top limb
const TOP_LIMB_MASK: u64 = (1 << 61) - 1;

/// Modulus descriptor handed to the Montgomery backend
#[derive(Clone, Copy, Debug)]
pub struct FpModulus;

impl MontgomeryModulus<6> for FpModulus {
    const MODULUS: [u64; 6] = MODULUS;
    const INV: u64 = INV;
}

// ============================================================================
// Field Element Type
// ============================================================================

/// Element in Montgomery form: Fp(a) = aR mod p, with R = 2^384
#[derive(Copy, Clone)]
pub struct Fp(pub(crate) [u64; 6]);

/// Whether `limbs` encodes an integer below p
#[inline]
const fn is_canonical(limbs: &[u64; 6]) -> bool {
    let (_, borrow) = sbb(limbs[0], MODULUS[0], 0);
    let (_, borrow) = sbb(limbs[1], MODULUS[1], borrow);
    let (_, borrow) = sbb(limbs[2], MODULUS[2], borrow);
    let (_, borrow) = sbb(limbs[3], MODULUS[3], borrow);
    let (_, borrow) = sbb(limbs[4], MODULUS[4], borrow);
    let (_, borrow) = sbb(limbs[5], MODULUS[5], borrow);
    borrow != 0
}

impl Fp {
    /// Performs modular reduction after addition
    #[inline]
    const fn subtract_p(&self) -> Fp {
        let (r0, borrow) = sbb(self.0[0], MODULUS[0], 0);
        let (r1, borrow) = sbb(self.0[1], MODULUS[1], borrow);
        let (r2, borrow) = sbb(self.0[2], MODULUS[2], borrow);
        let (r3, borrow) = sbb(self.0[3], MODULUS[3], borrow);
        let (r4, borrow) = sbb(self.0[4], MODULUS[4], borrow);
        let (r5, borrow) = sbb(self.0[5], MODULUS[5], borrow);

        let r0 = (self.0[0] & borrow) | (r0 & !borrow);
        let r1 = (self.0[1] & borrow) | (r1 & !borrow);
        let r2 = (self.0[2] & borrow) | (r2 & !borrow);
        let r3 = (self.0[3] & borrow) | (r3 & !borrow);
        let r4 = (self.0[4] & borrow) | (r4 & !borrow);
        let r5 = (self.0[5] & borrow) | (r5 & !borrow);

        Fp([r0, r1, r2, r3, r4, r5])
    }
}

// ============================================================================
// Core Field Operations
// ============================================================================

impl Fp {
    /// Additive identity
    #[inline]
    pub const fn zero() -> Fp {
        Fp([0, 0, 0, 0, 0, 0])
    }

    /// Multiplicative identity
    #[inline]
    pub const fn one() -> Fp {
        R
    }

    /// Check if element is zero
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Fp::zero())
    }

    /// Wrap limbs that are already in Montgomery form
    ///
    /// Used for `const` tables; the caller guarantees the limbs are below p.
    pub const fn from_raw_unchecked(v: [u64; 6]) -> Fp {
        Fp(v)
    }

    /// Add two field elements
    #[inline]
    pub const fn add(&self, rhs: &Fp) -> Fp {
        let (d0, carry) = adc(self.0[0], rhs.0[0], 0);
        let (d1, carry) = adc(self.0[1], rhs.0[1], carry);
        let (d2, carry) = adc(self.0[2], rhs.0[2], carry);
        let (d3, carry) = adc(self.0[3], rhs.0[3], carry);
        let (d4, carry) = adc(self.0[4], rhs.0[4], carry);
        let (d5, _) = adc(self.0[5], rhs.0[5], carry);

        // p < 2^382, so the sum fits without a carry-out word
        (&Fp([d0, d1, d2, d3, d4, d5])).subtract_p()
    }

    /// Subtract two field elements
    #[inline]
    pub const fn sub(&self, rhs: &Fp) -> Fp {
        (&rhs.neg()).add(self)
    }

    /// Negate a field element
    #[inline]
    pub const fn neg(&self) -> Fp {
        let (d0, borrow) = sbb(MODULUS[0], self.0[0], 0);
        let (d1, borrow) = sbb(MODULUS[1], self.0[1], borrow);
        let (d2, borrow) = sbb(MODULUS[2], self.0[2], borrow);
        let (d3, borrow) = sbb(MODULUS[3], self.0[3], borrow);
        let (d4, borrow) = sbb(MODULUS[4], self.0[4], borrow);
        let (d5, _) = sbb(MODULUS[5], self.0[5], borrow);

        // neg(0) must stay 0, not p
        let mask = (((self.0[0] | self.0[1] | self.0[2] | self.0[3] | self.0[4] | self.0[5]) == 0)
            as u64)
            .wrapping_sub(1);

        Fp([
            d0 & mask,
            d1 & mask,
            d2 & mask,
            d3 & mask,
            d4 & mask,
            d5 & mask,
        ])
    }

    /// Multiply two field elements
    #[inline]
    pub fn mul(&self, rhs: &Fp) -> Fp {
        Fp(ActiveBackend::mul::<FpModulus>(&self.0, &rhs.0))
    }

    /// Square this element
    #[inline]
    pub fn square(&self) -> Fp {
        Fp(ActiveBackend::square::<FpModulus>(&self.0))
    }

    /// Double this element
    #[inline]
    pub const fn double(&self) -> Fp {
        self.add(self)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl Fp {
    /// Convert a canonical integer (least significant limb first) to Montgomery form
    pub fn from_raw(limbs: [u64; 6]) -> Result<Fp> {
        validate::bounds("Fp", is_canonical(&limbs))?;
        Ok(Fp(limbs).mul(&R2))
    }

    /// Leave Montgomery form, returning the canonical integer limbs
    pub fn to_raw(&self) -> [u64; 6] {
        ActiveBackend::mul::<FpModulus>(&self.0, &[1, 0, 0, 0, 0, 0])
    }

    /// Convert an arbitrary-precision integer below p
    pub fn from_biguint(value: &BigUint) -> Result<Fp> {
        let digits = value.to_u64_digits();
        validate::bounds("Fp", digits.len() <= 6)?;
        let mut limbs = [0u64; 6];
        limbs[..digits.len()].copy_from_slice(&digits);
        Fp::from_raw(limbs)
    }

    /// The canonical integer this element represents
    pub fn to_biguint(&self) -> BigUint {
        let raw = self.to_raw();
        let mut words = [0u32; 12];
        for (i, limb) in raw.iter().enumerate() {
            words[2 * i] = *limb as u32;
            words[2 * i + 1] = (*limb >> 32) as u32;
        }
        BigUint::from_slice(&words)
    }

    /// Parse a base-10 integer below p
    pub fn from_decimal(s: &str) -> Result<Fp> {
        let value = BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| Error::param("Fp", "malformed decimal string"))?;
        Fp::from_biguint(&value)
    }
}

// ============================================================================
// Advanced Field Operations
// ============================================================================

impl Fp {
    /// Variable-time exponentiation
    pub fn pow_vartime(&self, by: &[u64]) -> Self {
        let mut res = Self::one();
        for e in by.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if ((*e >> i) & 1) == 1 {
                    res *= self;
                }
            }
        }
        res
    }

    /// Compute square root if it exists
    #[inline]
    pub fn sqrt(&self) -> CtOption<Self> {
        let sqrt = self.pow_vartime(&SQRT_EXP);
        CtOption::new(sqrt, sqrt.square().ct_eq(self))
    }

    /// Multiplicative inverse, none for zero
    #[inline]
    pub fn invert(&self) -> CtOption<Self> {
        let t = self.pow_vartime(&INVERT_EXP);
        CtOption::new(t, !self.is_zero())
    }

    /// Check if element > (p-1)/2
    pub fn lexicographically_largest(&self) -> Choice {
        let tmp = self.to_raw();

        // Compare against (p-1)/2 + 1
        let (_, borrow) = sbb(tmp[0], 0xdcff_7fff_ffff_d556, 0);
        let (_, borrow) = sbb(tmp[1], 0x0f55_ffff_58a9_ffff, borrow);
        let (_, borrow) = sbb(tmp[2], 0xb398_6950_7b58_7b12, borrow);
        let (_, borrow) = sbb(tmp[3], 0xb23b_a5c2_79c2_895f, borrow);
        let (_, borrow) = sbb(tmp[4], 0x258d_d3db_21a5_d66b, borrow);
        let (_, borrow) = sbb(tmp[5], 0x0d00_88f5_1cbf_f34d, borrow);

        !Choice::from((borrow as u8) & 1)
    }
}

// ============================================================================
// Serialization
// ============================================================================

impl Fp {
    /// Decode from big-endian bytes, none if the value is not below p
    pub fn from_bytes(bytes: &[u8; 48]) -> CtOption<Fp> {
        let mut tmp = [0u64; 6];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            tmp[5 - i] = u64::from_be_bytes(word);
        }

        let is_some = Choice::from(is_canonical(&tmp) as u8);
        CtOption::new(Fp(tmp).mul(&R2), is_some)
    }

    /// Encode to big-endian bytes
    pub fn to_bytes(self) -> [u8; 48] {
        let tmp = self.to_raw();

        let mut res = [0; 48];
        for (i, chunk) in res.chunks_exact_mut(8).enumerate() {
            chunk.copy_from_slice(&tmp[5 - i].to_be_bytes());
        }
        res
    }

    /// Sample a uniform non-zero element by rejection
    pub fn random(rng: &mut impl RngCore) -> Result<Fp> {
        loop {
            let mut bytes = [0u8; 48];
            rng.try_fill_bytes(&mut bytes)
                .map_err(|e| Error::rng("Fp::random", e))?;

            let mut limbs = [0u64; 6];
            for (i, chunk) in bytes.chunks_exact(8).enumerate() {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                limbs[i] = u64::from_le_bytes(word);
            }
            limbs[5] &= TOP_LIMB_MASK;

            if is_canonical(&limbs) && limbs.iter().any(|&l| l != 0) {
                return Ok(Fp(limbs).mul(&R2));
            }
            tracing::trace!("Fp::random redraw");
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl fmt::Debug for Fp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tmp = self.to_bytes();
        write!(f, "0x")?;
        for &b in tmp.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl Default for Fp {
    fn default() -> Self {
        Fp::zero()
    }
}

impl zeroize::DefaultIsZeroes for Fp {}

impl ConstantTimeEq for Fp {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
            & self.0[4].ct_eq(&other.0[4])
            & self.0[5].ct_eq(&other.0[5])
    }
}

impl Eq for Fp {}
impl PartialEq for Fp {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl ConditionallySelectable for Fp {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
            u64::conditional_select(&a.0[4], &b.0[4], choice),
            u64::conditional_select(&a.0[5], &b.0[5], choice),
        ])
    }
}

impl<'a> Neg for &'a Fp {
    type Output = Fp;
    #[inline]
    fn neg(self) -> Fp {
        Fp::neg(self)
    }
}

impl<'a, 'b> Sub<&'b Fp> for &'a Fp {
    type Output = Fp;
    #[inline]
    fn sub(self, rhs: &'b Fp) -> Fp {
        Fp::sub(self, rhs)
    }
}

impl<'a, 'b> Add<&'b Fp> for &'a Fp {
    type Output = Fp;
    #[inline]
    fn add(self, rhs: &'b Fp) -> Fp {
        Fp::add(self, rhs)
    }
}

impl<'a, 'b> Mul<&'b Fp> for &'a Fp {
    type Output = Fp;
    #[inline]
    fn mul(self, rhs: &'b Fp) -> Fp {
        Fp::mul(self, rhs)
    }
}

impl_neg_by_value!(Fp);
impl_add_sub_ops!(Fp);
impl_mul_ops!(Fp);
