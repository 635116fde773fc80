//! BLS12-381 scalar field F_r where r = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use bls381_api::{Serialize, SerializeSecret};
use bls381_params::pairing::bls12_381::BLS12_381_SCALAR_SIZE as SCALAR_SIZE;
use num_bigint::BigUint;
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroizing;

use super::field::backend::{adc, sbb, ActiveBackend, MontgomeryBackend, MontgomeryModulus};
use crate::error::{validate, Error, Result};

/// Scalar field element of BLS12-381
/// Internal: Four 64-bit limbs in little-endian Montgomery form
#[derive(Clone, Copy, Eq)]
pub struct Scalar(pub(crate) [u64; 4]);

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tmp = self.to_bytes();
        write!(f, "0x")?;
        for &b in tmp.iter().rev() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<u64> for Scalar {
    fn from(val: u64) -> Scalar {
        Scalar([val, 0, 0, 0]) * R2
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl PartialEq for Scalar {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Scalar([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

// Constants
const MODULUS: Scalar = Scalar([
    0xffff_ffff_0000_0001,
    0x53bd_a402_fffe_5bfe,
    0x3339_d808_09a1_d805,
    0x73ed_a753_299d_7d48,
]);

/// INV = -(r^{-1} mod 2^64) mod 2^64
const INV: u64 = 0xffff_fffe_ffff_ffff;

/// R = 2^256 mod r
const R: Scalar = Scalar([
    0x0000_0001_ffff_fffe,
    0x5884_b7fa_0003_4802,
    0x998c_4fef_ecbc_4ff5,
    0x1824_b159_acc5_056f,
]);

/// R^2 = 2^512 mod r
const R2: Scalar = Scalar([
    0xc999_e990_f3f2_9c6d,
    0x2b6c_edcb_8792_5c23,
    0x05d3_1496_7254_398f,
    0x0748_d9d9_9f59_ff11,
]);

/// r - 2
const INVERT_EXP: [u64; 4] = [
    0xffff_fffe_ffff_ffff,
    0x53bd_a402_fffe_5bfe,
    0x3339_d808_09a1_d805,
    0x73ed_a753_299d_7d48,
];

/// Mask for the 255 bits a canonical scalar can occupy
const TOP_LIMB_MASK: u64 = u64::MAX >> 1;

/// Modulus descriptor handed to the Montgomery backend
#[derive(Clone, Copy, Debug)]
pub struct ScalarModulus;

impl MontgomeryModulus<4> for ScalarModulus {
    const MODULUS: [u64; 4] = MODULUS.0;
    const INV: u64 = INV;
}

impl Default for Scalar {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl zeroize::DefaultIsZeroes for Scalar {}

#[inline]
const fn is_canonical(limbs: &[u64; 4]) -> bool {
    let (_, borrow) = sbb(limbs[0], MODULUS.0[0], 0);
    let (_, borrow) = sbb(limbs[1], MODULUS.0[1], borrow);
    let (_, borrow) = sbb(limbs[2], MODULUS.0[2], borrow);
    let (_, borrow) = sbb(limbs[3], MODULUS.0[3], borrow);
    borrow != 0
}

impl Scalar {
    /// Additive identity
    #[inline]
    pub const fn zero() -> Scalar {
        Scalar([0, 0, 0, 0])
    }

    /// Multiplicative identity
    #[inline]
    pub const fn one() -> Scalar {
        R
    }

    /// Check if element is zero.
    #[inline]
    pub fn is_zero(&self) -> Choice {
        (self.0[0] | self.0[1] | self.0[2] | self.0[3]).ct_eq(&0)
    }

    /// Double this element
    #[inline]
    pub const fn double(&self) -> Scalar {
        self.add(self)
    }

    /// Create from little-endian bytes if canonical
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Scalar> {
        let limbs = limbs_from_le_bytes(bytes);
        let is_some = Choice::from(is_canonical(&limbs) as u8);

        // (a * R^2) / R = aR
        CtOption::new(Scalar(limbs) * R2, is_some)
    }

    /// Convert to little-endian bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        let tmp = self.to_raw();

        let mut res = [0; 32];
        res[0..8].copy_from_slice(&tmp[0].to_le_bytes());
        res[8..16].copy_from_slice(&tmp[1].to_le_bytes());
        res[16..24].copy_from_slice(&tmp[2].to_le_bytes());
        res[24..32].copy_from_slice(&tmp[3].to_le_bytes());

        res
    }

    /// Convert a canonical integer (four little-endian limbs) to Montgomery form
    pub fn from_raw(limbs: [u64; 4]) -> Result<Self> {
        validate::bounds("Scalar", is_canonical(&limbs))?;
        Ok(Scalar(limbs) * R2)
    }

    /// The canonical integer limbs of this scalar
    pub fn to_raw(&self) -> [u64; 4] {
        ActiveBackend::mul::<ScalarModulus>(&self.0, &[1, 0, 0, 0])
    }

    /// Convert an arbitrary-precision integer below r
    pub fn from_biguint(value: &BigUint) -> Result<Self> {
        let digits = value.to_u64_digits();
        validate::bounds("Scalar", digits.len() <= 4)?;
        let mut limbs = [0u64; 4];
        limbs[..digits.len()].copy_from_slice(&digits);
        Scalar::from_raw(limbs)
    }

    /// Canonical integer value in [0, r)
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.to_bytes())
    }

    /// Parse a base-10 integer below r
    pub fn from_decimal(s: &str) -> Result<Self> {
        let value = BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| Error::param("Scalar", "malformed decimal string"))?;
        Scalar::from_biguint(&value)
    }

    /// Sample a uniform non-zero scalar by rejection
    pub fn random(rng: &mut impl RngCore) -> Result<Self> {
        loop {
            let mut bytes = [0u8; 32];
            rng.try_fill_bytes(&mut bytes)
                .map_err(|e| Error::rng("Scalar::random", e))?;

            let mut limbs = limbs_from_le_bytes(&bytes);
            limbs[3] &= TOP_LIMB_MASK;

            if is_canonical(&limbs) && limbs.iter().any(|&l| l != 0) {
                return Ok(Scalar(limbs) * R2);
            }
            tracing::trace!("Scalar::random redraw");
        }
    }

    /// Computes the square of this scalar.
    #[inline]
    pub fn square(&self) -> Scalar {
        Scalar(ActiveBackend::square::<ScalarModulus>(&self.0))
    }

    /// Multiplies `rhs` by `self`, returning the result.
    #[inline]
    pub fn mul(&self, rhs: &Self) -> Self {
        Scalar(ActiveBackend::mul::<ScalarModulus>(&self.0, &rhs.0))
    }

    /// Exponentiates `self` by `by`, where `by` is a little-endian order integer exponent.
    ///
    /// **This operation is variable time with respect to the exponent.**
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

    /// Computes the multiplicative inverse of this element,
    /// failing if the element is zero.
    pub fn invert(&self) -> CtOption<Self> {
        CtOption::new(self.pow_vartime(&INVERT_EXP), !self.is_zero())
    }

    /// Subtracts another scalar from this one.
    #[inline]
    pub const fn sub(&self, rhs: &Self) -> Self {
        let (d0, borrow) = sbb(self.0[0], rhs.0[0], 0);
        let (d1, borrow) = sbb(self.0[1], rhs.0[1], borrow);
        let (d2, borrow) = sbb(self.0[2], rhs.0[2], borrow);
        let (d3, borrow) = sbb(self.0[3], rhs.0[3], borrow);

        // Add the modulus back on underflow
        let (d0, carry) = adc(d0, MODULUS.0[0] & borrow, 0);
        let (d1, carry) = adc(d1, MODULUS.0[1] & borrow, carry);
        let (d2, carry) = adc(d2, MODULUS.0[2] & borrow, carry);
        let (d3, _) = adc(d3, MODULUS.0[3] & borrow, carry);

        Scalar([d0, d1, d2, d3])
    }

    /// Adds another scalar to this one.
    #[inline]
    pub const fn add(&self, rhs: &Self) -> Self {
        let (d0, carry) = adc(self.0[0], rhs.0[0], 0);
        let (d1, carry) = adc(self.0[1], rhs.0[1], carry);
        let (d2, carry) = adc(self.0[2], rhs.0[2], carry);
        let (d3, _) = adc(self.0[3], rhs.0[3], carry);

        // r < 2^255, so the sum cannot overflow four limbs
        (&Scalar([d0, d1, d2, d3])).sub(&MODULUS)
    }

    /// Computes the additive negation of this scalar.
    #[inline]
    pub const fn neg(&self) -> Self {
        let (d0, borrow) = sbb(MODULUS.0[0], self.0[0], 0);
        let (d1, borrow) = sbb(MODULUS.0[1], self.0[1], borrow);
        let (d2, borrow) = sbb(MODULUS.0[2], self.0[2], borrow);
        let (d3, _) = sbb(MODULUS.0[3], self.0[3], borrow);

        let mask = (((self.0[0] | self.0[1] | self.0[2] | self.0[3]) == 0) as u64).wrapping_sub(1);

        Scalar([d0 & mask, d1 & mask, d2 & mask, d3 & mask])
    }
}

fn limbs_from_le_bytes(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(word);
    }
    limbs
}

fn decode_slice(bytes: &[u8]) -> Result<Scalar> {
    validate::length("Scalar::from_bytes", bytes.len(), SCALAR_SIZE)?;

    let mut array = [0u8; SCALAR_SIZE];
    array.copy_from_slice(bytes);

    Option::from(Scalar::from_bytes(&array))
        .ok_or_else(|| Error::encoding("Scalar", "non-canonical scalar"))
}

impl Serialize for Scalar {
    fn from_bytes(bytes: &[u8]) -> bls381_api::Result<Self> {
        decode_slice(bytes).map_err(Into::into)
    }

    fn to_bytes(&self) -> Vec<u8> {
        Scalar::to_bytes(self).to_vec()
    }
}

impl SerializeSecret for Scalar {
    fn from_bytes(bytes: &[u8]) -> bls381_api::Result<Self> {
        decode_slice(bytes).map_err(Into::into)
    }

    fn to_bytes_zeroizing(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(Scalar::to_bytes(self).to_vec())
    }
}

impl<'a> Neg for &'a Scalar {
    type Output = Scalar;

    #[inline]
    fn neg(self) -> Scalar {
        Scalar::neg(self)
    }
}

impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    #[inline]
    fn sub(self, rhs: &'b Scalar) -> Scalar {
        Scalar::sub(self, rhs)
    }
}

impl<'a, 'b> Add<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    #[inline]
    fn add(self, rhs: &'b Scalar) -> Scalar {
        Scalar::add(self, rhs)
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    #[inline]
    fn mul(self, rhs: &'b Scalar) -> Scalar {
        Scalar::mul(self, rhs)
    }
}

impl_neg_by_value!(Scalar);
impl_add_sub_ops!(Scalar);
impl_mul_ops!(Scalar);

impl From<Scalar> for [u8; 32] {
    fn from(value: Scalar) -> [u8; 32] {
        value.to_bytes()
    }
}

impl<'a> From<&'a Scalar> for [u8; 32] {
    fn from(value: &'a Scalar) -> [u8; 32] {
        value.to_bytes()
    }
}

impl<T> core::iter::Sum<T> for Scalar
where
    T: core::borrow::Borrow<Scalar>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::zero(), |acc, item| acc + item.borrow())
    }
}

impl<T> core::iter::Product<T> for Scalar
where
    T: core::borrow::Borrow<Scalar>,
{
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::one(), |acc, item| acc * item.borrow())
    }
}

// Tests
#[test]
fn test_inv() {
    // Verify INV constant
    let mut inv = 1u64;
    for _ in 0..63 {
        inv = inv.wrapping_mul(inv);
        inv = inv.wrapping_mul(MODULUS.0[0]);
    }
    inv = inv.wrapping_neg();
    assert_eq!(inv, INV);
}

#[cfg(feature = "std")]
#[test]
fn test_debug() {
    assert_eq!(
        format!("{:?}", Scalar::zero()),
        "0x0000000000000000000000000000000000000000000000000000000000000000"
    );
    assert_eq!(
        format!("{:?}", Scalar::one()),
        "0x0000000000000000000000000000000000000000000000000000000000000001"
    );
    // Debug leaves Montgomery form, so R prints as 1
    assert_eq!(
        format!("{:?}", R),
        "0x0000000000000000000000000000000000000000000000000000000000000001"
    );
}

#[test]
fn test_to_bytes() {
    let mut one = [0u8; 32];
    one[0] = 1;
    assert_eq!(Scalar::zero().to_bytes(), [0u8; 32]);
    assert_eq!(Scalar::one().to_bytes(), one);
    assert_eq!(R.to_bytes(), one);

    assert_eq!(
        (-&Scalar::one()).to_bytes(),
        [
            0, 0, 0, 0, 255, 255, 255, 255, 254, 91, 254, 255, 2, 164, 189, 83, 5, 216, 161, 9, 8,
            216, 57, 51, 72, 125, 157, 41, 83, 167, 237, 115
        ]
    );
}

#[test]
fn test_from_bytes_rejects_modulus() {
    let mut a = R2;
    for _ in 0..100 {
        let b = Scalar::from_bytes(&a.to_bytes()).unwrap();
        assert_eq!(a, b);
        a = a.square();
    }

    let mut modulus = [0u8; 32];
    for (chunk, limb) in modulus.chunks_exact_mut(8).zip(MODULUS.0.iter()) {
        chunk.copy_from_slice(&limb.to_le_bytes());
    }
    assert!(bool::from(Scalar::from_bytes(&modulus).is_none()));
}

#[cfg(test)]
const LARGEST: Scalar = Scalar([
    0xffff_ffff_0000_0000,
    0x53bd_a402_fffe_5bfe,
    0x3339_d808_09a1_d805,
    0x73ed_a753_299d_7d48,
]);

#[test]
fn test_addition() {
    let mut tmp = LARGEST;
    tmp += &LARGEST;

    assert_eq!(
        tmp,
        Scalar([
            0xffff_fffe_ffff_ffff,
            0x53bd_a402_fffe_5bfe,
            0x3339_d808_09a1_d805,
            0x73ed_a753_299d_7d48,
        ])
    );

    let mut tmp = LARGEST;
    tmp += &Scalar([1, 0, 0, 0]);

    assert_eq!(tmp, Scalar::zero());
}

#[test]
fn test_inversion() {
    assert!(bool::from(Scalar::zero().invert().is_none()));
    assert_eq!(Scalar::one().invert().unwrap(), Scalar::one());
    assert_eq!((-&Scalar::one()).invert().unwrap(), -&Scalar::one());

    let mut tmp = R2;

    for _ in 0..100 {
        let mut tmp2 = tmp.invert().unwrap();
        tmp2 *= &tmp;

        assert_eq!(tmp2, Scalar::one());

        tmp += &R2;
    }
}

#[test]
fn test_from_raw() {
    assert_eq!(Scalar::from_raw([1, 0, 0, 0]).unwrap(), R);
    assert_eq!(
        Scalar::from_raw(LARGEST.0).unwrap(),
        -Scalar::one()
    );
    assert_eq!(
        Scalar::from_raw(MODULUS.0),
        Err(Error::OutOfBounds { context: "Scalar" })
    );
    assert!(Scalar::from_raw([u64::MAX; 4]).is_err());
}

#[test]
fn test_raw_roundtrip() {
    let mut a = R2;
    for _ in 0..50 {
        assert_eq!(Scalar::from_raw(a.to_raw()).unwrap(), a);
        a = a.square() + Scalar::one();
    }
}

#[test]
fn test_biguint_and_decimal() {
    let order = BigUint::parse_bytes(bls381_params::pairing::bls12_381::BLS12_381_GROUP_ORDER.as_bytes(), 10)
        .unwrap();
    assert!(matches!(
        Scalar::from_biguint(&order),
        Err(Error::OutOfBounds { .. })
    ));

    let minus_one = &order - 1u32;
    assert_eq!(Scalar::from_biguint(&minus_one).unwrap(), -Scalar::one());
    assert_eq!(Scalar::one().to_biguint(), BigUint::from(1u32));
    assert_eq!(Scalar::from_decimal("12345").unwrap(), Scalar::from(12345u64));
    assert!(matches!(
        Scalar::from_decimal("12x45"),
        Err(Error::Parameter { .. })
    ));
}

#[test]
fn test_zeroize() {
    use zeroize::Zeroize;

    let mut a = Scalar::from(0x1fff_3231_233f_fffd);
    a.zeroize();
    assert!(bool::from(a.is_zero()));
}
