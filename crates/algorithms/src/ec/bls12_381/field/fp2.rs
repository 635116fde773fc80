//! Quadratic extension `Fp2 = Fp[i] / (i^2 + 1)`

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use super::fp::Fp;
use crate::error::Result;

/// (p - 3) / 4
const SQRT_EXP_A: [u64; 6] = [
    0xee7f_bfff_ffff_eaaa,
    0x07aa_ffff_ac54_ffff,
    0xd9cc_34a8_3dac_3d89,
    0xd91d_d2e1_3ce1_44af,
    0x92c6_e9ed_90d2_eb35,
    0x0680_447a_8e5f_f9a6,
];

/// (p - 1) / 2
const SQRT_EXP_B: [u64; 6] = [
    0xdcff_7fff_ffff_d555,
    0x0f55_ffff_58a9_ffff,
    0xb398_6950_7b58_7b12,
    0xb23b_a5c2_79c2_895f,
    0x258d_d3db_21a5_d66b,
    0x0d00_88f5_1cbf_f34d,
];

/// Element c0 + c1 * i
#[derive(Copy, Clone, Default)]
pub struct Fp2 {
    /// Real part
    pub c0: Fp,
    /// Coefficient of i
    pub c1: Fp,
}

impl fmt::Debug for Fp2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} + {:?}*u", self.c0, self.c1)
    }
}

impl From<Fp> for Fp2 {
    fn from(f: Fp) -> Fp2 {
        Fp2 {
            c0: f,
            c1: Fp::zero(),
        }
    }
}

impl ConstantTimeEq for Fp2 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1)
    }
}

impl Eq for Fp2 {}
impl PartialEq for Fp2 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl ConditionallySelectable for Fp2 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp2 {
            c0: Fp::conditional_select(&a.c0, &b.c0, choice),
            c1: Fp::conditional_select(&a.c1, &b.c1, choice),
        }
    }
}

impl zeroize::DefaultIsZeroes for Fp2 {}

impl Fp2 {
    /// Build from components
    #[inline]
    pub const fn new(c0: Fp, c1: Fp) -> Fp2 {
        Fp2 { c0, c1 }
    }

    /// Additive identity
    #[inline]
    pub const fn zero() -> Fp2 {
        Fp2 {
            c0: Fp::zero(),
            c1: Fp::zero(),
        }
    }

    /// Multiplicative identity
    #[inline]
    pub const fn one() -> Fp2 {
        Fp2 {
            c0: Fp::one(),
            c1: Fp::zero(),
        }
    }

    /// Whether this is zero
    pub fn is_zero(&self) -> Choice {
        self.c0.is_zero() & self.c1.is_zero()
    }

    /// Sample both coordinates independently
    pub fn random(rng: &mut impl RngCore) -> Result<Fp2> {
        Ok(Fp2 {
            c0: Fp::random(rng)?,
            c1: Fp::random(rng)?,
        })
    }

    /// Raise to the p^power Frobenius
    #[inline(always)]
    pub fn frobenius_map(&self, power: usize) -> Self {
        if power % 2 == 1 {
            self.conjugate()
        } else {
            *self
        }
    }

    /// c0 - c1 * i
    #[inline(always)]
    pub fn conjugate(&self) -> Self {
        Fp2 {
            c0: self.c0,
            c1: -self.c1,
        }
    }

    /// Multiply by the sextic non-residue ξ = 1 + i
    #[inline(always)]
    pub fn mul_by_nonresidue(&self) -> Fp2 {
        // (a + bi)(1 + i) = (a - b) + (a + b)i
        Fp2 {
            c0: self.c0 - self.c1,
            c1: self.c0 + self.c1,
        }
    }

    /// Multiply both coordinates by a base field element
    #[inline]
    pub fn mul_by_fp(&self, rhs: &Fp) -> Fp2 {
        Fp2 {
            c0: self.c0 * rhs,
            c1: self.c1 * rhs,
        }
    }

    /// Sort order used by compressed G2 encodings: c1 first, then c0
    #[inline]
    pub fn lexicographically_largest(&self) -> Choice {
        self.c1.lexicographically_largest()
            | (self.c1.is_zero() & self.c0.lexicographically_largest())
    }

    /// Complex squaring
    pub fn square(&self) -> Fp2 {
        // Complex squaring:
        //
        // c0' = (c0 + c1)(c0 - c1)
        // c1' = 2 c0 c1
        let a = self.c0 + self.c1;
        let b = self.c0 - self.c1;
        let c = self.c0.double();

        Fp2 {
            c0: a * b,
            c1: c * self.c1,
        }
    }

    /// Karatsuba multiplication with i^2 = -1
    pub fn mul(&self, rhs: &Fp2) -> Fp2 {
        // Karatsuba with i^2 = -1:
        //
        // c0' = a0 b0 - a1 b1
        // c1' = (a0 + a1)(b0 + b1) - a0 b0 - a1 b1
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;

        Fp2 {
            c0: v0 - v1,
            c1: (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1,
        }
    }

    /// Addition
    #[inline]
    pub const fn add(&self, rhs: &Fp2) -> Fp2 {
        Fp2 {
            c0: Fp::add(&self.c0, &rhs.c0),
            c1: Fp::add(&self.c1, &rhs.c1),
        }
    }

    /// Subtraction
    #[inline]
    pub const fn sub(&self, rhs: &Fp2) -> Fp2 {
        Fp2 {
            c0: Fp::sub(&self.c0, &rhs.c0),
            c1: Fp::sub(&self.c1, &rhs.c1),
        }
    }

    /// Negation
    #[inline]
    pub const fn neg(&self) -> Fp2 {
        Fp2 {
            c0: Fp::neg(&self.c0),
            c1: Fp::neg(&self.c1),
        }
    }

    /// 2 * self
    #[inline]
    pub const fn double(&self) -> Fp2 {
        Fp2 {
            c0: self.c0.double(),
            c1: self.c1.double(),
        }
    }

    /// Square root, none when `self` is a non-residue
    pub fn sqrt(&self) -> CtOption<Self> {
        // Algorithm 9, https://eprint.iacr.org/2012/685.pdf
        // with constant-time candidate selection
        let a1 = self.pow_vartime(&SQRT_EXP_A);
        let alpha = a1.square() * self;
        let x0 = a1 * self;

        // alpha = -1 means a is i times a square of Fp
        let rotated = Fp2 {
            c0: -x0.c1,
            c1: x0.c0,
        };
        let generic = (alpha + Fp2::one()).pow_vartime(&SQRT_EXP_B) * x0;
        let alpha_is_minus_one = alpha.ct_eq(&(-Fp2::one()));
        let candidate = Fp2::conditional_select(&generic, &rotated, alpha_is_minus_one);

        CtOption::new(candidate, candidate.square().ct_eq(self))
    }

    /// Inverse through the norm, none for zero
    pub fn invert(&self) -> CtOption<Self> {
        // 1 / (a + bi) = (a - bi) / (a^2 + b^2)
        (self.c0.square() + self.c1.square()).invert().map(|t| Fp2 {
            c0: self.c0 * t,
            c1: self.c1 * -t,
        })
    }

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
}

impl<'a> Neg for &'a Fp2 {
    type Output = Fp2;
    #[inline]
    fn neg(self) -> Fp2 {
        Fp2::neg(self)
    }
}

impl<'a, 'b> Sub<&'b Fp2> for &'a Fp2 {
    type Output = Fp2;
    #[inline]
    fn sub(self, rhs: &'b Fp2) -> Fp2 {
        Fp2::sub(self, rhs)
    }
}

impl<'a, 'b> Add<&'b Fp2> for &'a Fp2 {
    type Output = Fp2;
    #[inline]
    fn add(self, rhs: &'b Fp2) -> Fp2 {
        Fp2::add(self, rhs)
    }
}

impl<'a, 'b> Mul<&'b Fp2> for &'a Fp2 {
    type Output = Fp2;
    #[inline]
    fn mul(self, rhs: &'b Fp2) -> Fp2 {
        Fp2::mul(self, rhs)
    }
}

impl_neg_by_value!(Fp2);
impl_add_sub_ops!(Fp2);
impl_mul_ops!(Fp2);
