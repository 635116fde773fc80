//! Cubic extension `Fp6 = Fp2[v] / (v^3 - ξ)` with ξ = 1 + i

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use super::fp::Fp;
use super::fp2::Fp2;
use crate::error::Result;

// ============================================================================
// Frobenius Coefficients
// ============================================================================

// Montgomery limbs of ξ^((p^k - 1) / 3) and ξ^(2 (p^k - 1) / 3) for k = 0..5

const FROBENIUS_COEFF_FP6_C1: [Fp2; 6] = [
    // k = 0
    Fp2 {
        c0: Fp::one(),
        c1: Fp::zero(),
    },
    // k = 1
    Fp2 {
        c0: Fp::zero(),
        c1: Fp::from_raw_unchecked([
            0xcd03_c9e4_8671_f071,
            0x5dab_2246_1fcd_a5d2,
            0x5870_42af_d385_1b95,
            0x8eb6_0ebe_01ba_cb9e,
            0x03f9_7d6e_83d0_50d2,
            0x18f0_2065_5463_8741,
        ]),
    },
    // k = 2
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0x30f1_361b_798a_64e8,
            0xf3b8_ddab_7ece_5a2a,
            0x16a8_ca3a_c615_77f7,
            0xc26a_2ff8_74fd_029b,
            0x3636_b766_6070_1c6e,
            0x051b_a4ab_241b_6160,
        ]),
        c1: Fp::zero(),
    },
    // k = 3
    Fp2 {
        c0: Fp::zero(),
        c1: Fp::one(),
    },
    // k = 4
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0xcd03_c9e4_8671_f071,
            0x5dab_2246_1fcd_a5d2,
            0x5870_42af_d385_1b95,
            0x8eb6_0ebe_01ba_cb9e,
            0x03f9_7d6e_83d0_50d2,
            0x18f0_2065_5463_8741,
        ]),
        c1: Fp::zero(),
    },
    // k = 5
    Fp2 {
        c0: Fp::zero(),
        c1: Fp::from_raw_unchecked([
            0x30f1_361b_798a_64e8,
            0xf3b8_ddab_7ece_5a2a,
            0x16a8_ca3a_c615_77f7,
            0xc26a_2ff8_74fd_029b,
            0x3636_b766_6070_1c6e,
            0x051b_a4ab_241b_6160,
        ]),
    },
];

const FROBENIUS_COEFF_FP6_C2: [Fp2; 6] = [
    // k = 0
    Fp2 {
        c0: Fp::one(),
        c1: Fp::zero(),
    },
    // k = 1
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0x890d_c9e4_8675_45c3,
            0x2af3_2253_3285_a5d5,
            0x5088_0866_309b_7e2c,
            0xa20d_1b8c_7e88_1024,
            0x14e4_f04f_e2db_9068,
            0x14e5_6d3f_1564_853a,
        ]),
        c1: Fp::zero(),
    },
    // k = 2
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0xcd03_c9e4_8671_f071,
            0x5dab_2246_1fcd_a5d2,
            0x5870_42af_d385_1b95,
            0x8eb6_0ebe_01ba_cb9e,
            0x03f9_7d6e_83d0_50d2,
            0x18f0_2065_5463_8741,
        ]),
        c1: Fp::zero(),
    },
    // k = 3
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0x43f5_ffff_fffc_aaae,
            0x32b7_fff2_ed47_fffd,
            0x07e8_3a49_a2e9_9d69,
            0xeca8_f331_8332_bb7a,
            0xef14_8d1e_a0f4_c069,
            0x040a_b326_3eff_0206,
        ]),
        c1: Fp::zero(),
    },
    // k = 4
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0x30f1_361b_798a_64e8,
            0xf3b8_ddab_7ece_5a2a,
            0x16a8_ca3a_c615_77f7,
            0xc26a_2ff8_74fd_029b,
            0x3636_b766_6070_1c6e,
            0x051b_a4ab_241b_6160,
        ]),
        c1: Fp::zero(),
    },
    // k = 5
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0xecfb_361b_798d_ba3a,
            0xc100_ddb8_9186_5a2c,
            0x0ec0_8ff1_232b_da8e,
            0xd5c1_3cc6_f1ca_4721,
            0x4722_2a47_bf7b_5c04,
            0x0110_f184_e51c_5f59,
        ]),
        c1: Fp::zero(),
    },
];

// ============================================================================
// Field Element Type
// ============================================================================

/// Element c0 + c1 * v + c2 * v^2
#[derive(Copy, Clone, Default)]
pub struct Fp6 {
    /// Constant coefficient
    pub c0: Fp2,
    /// Coefficient of v
    pub c1: Fp2,
    /// Coefficient of v^2
    pub c2: Fp2,
}

impl From<Fp2> for Fp6 {
    fn from(f: Fp2) -> Fp6 {
        Fp6 {
            c0: f,
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        }
    }
}

impl fmt::Debug for Fp6 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} + ({:?})*v + ({:?})*v^2", self.c0, self.c1, self.c2)
    }
}

impl ConstantTimeEq for Fp6 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1) & self.c2.ct_eq(&other.c2)
    }
}

impl Eq for Fp6 {}
impl PartialEq for Fp6 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl ConditionallySelectable for Fp6 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp6 {
            c0: Fp2::conditional_select(&a.c0, &b.c0, choice),
            c1: Fp2::conditional_select(&a.c1, &b.c1, choice),
            c2: Fp2::conditional_select(&a.c2, &b.c2, choice),
        }
    }
}

impl Fp6 {
    /// Build from coefficients
    #[inline]
    pub const fn new(c0: Fp2, c1: Fp2, c2: Fp2) -> Fp6 {
        Fp6 { c0, c1, c2 }
    }

    /// Additive identity
    #[inline]
    pub const fn zero() -> Self {
        Fp6 {
            c0: Fp2::zero(),
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        }
    }

    /// Multiplicative identity
    #[inline]
    pub const fn one() -> Self {
        Fp6 {
            c0: Fp2::one(),
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        }
    }

    /// Whether this is zero
    pub fn is_zero(&self) -> Choice {
        self.c0.is_zero() & self.c1.is_zero() & self.c2.is_zero()
    }

    /// Uniformly random element
    pub fn random(rng: &mut impl RngCore) -> Result<Self> {
        Ok(Fp6 {
            c0: Fp2::random(rng)?,
            c1: Fp2::random(rng)?,
            c2: Fp2::random(rng)?,
        })
    }

    /// Multiply by the sparse element `c1 * v`
    pub fn mul_by_1(&self, c1: &Fp2) -> Fp6 {
        Fp6 {
            c0: (self.c2 * c1).mul_by_nonresidue(),
            c1: self.c0 * c1,
            c2: self.c1 * c1,
        }
    }

    /// Multiply by the sparse element `c0 + c1 * v`
    pub fn mul_by_01(&self, c0: &Fp2, c1: &Fp2) -> Fp6 {
        let a_a = self.c0 * c0;
        let b_b = self.c1 * c1;

        let t1 = ((self.c1 + self.c2) * c1 - b_b).mul_by_nonresidue() + a_a;
        let t2 = (self.c0 + self.c1) * (c0 + c1) - a_a - b_b;
        let t3 = (self.c0 + self.c2) * c0 - a_a + b_b;

        Fp6 {
            c0: t1,
            c1: t2,
            c2: t3,
        }
    }

    /// Multiply by the cubic non-residue v
    #[inline(always)]
    pub fn mul_by_nonresidue(&self) -> Self {
        // (c0 + c1 v + c2 v^2) v = c2 ξ + c0 v + c1 v^2
        Fp6 {
            c0: self.c2.mul_by_nonresidue(),
            c1: self.c0,
            c2: self.c1,
        }
    }

    /// Raise to the p^power Frobenius
    pub fn frobenius_map(&self, power: usize) -> Self {
        let k = power % 6;
        Fp6 {
            c0: self.c0.frobenius_map(power),
            c1: self.c1.frobenius_map(power) * FROBENIUS_COEFF_FP6_C1[k],
            c2: self.c2.frobenius_map(power) * FROBENIUS_COEFF_FP6_C2[k],
        }
    }

    /// Karatsuba multiplication over Fp2
    pub fn mul(&self, b: &Fp6) -> Fp6 {
        // Karatsuba for cubic extensions
        let t0 = self.c0 * b.c0;
        let t1 = self.c1 * b.c1;
        let t2 = self.c2 * b.c2;

        let c0 = ((self.c1 + self.c2) * (b.c1 + b.c2) - t1 - t2).mul_by_nonresidue() + t0;
        let c1 = (self.c0 + self.c1) * (b.c0 + b.c1) - t0 - t1 + t2.mul_by_nonresidue();
        let c2 = (self.c0 + self.c2) * (b.c0 + b.c2) - t0 - t2 + t1;

        Fp6 { c0, c1, c2 }
    }

    /// Chung-Hasan SQR3
    pub fn square(&self) -> Self {
        let s0 = self.c0.square();
        let s1 = (self.c0 * self.c1).double();
        let s2 = (self.c0 - self.c1 + self.c2).square();
        let s3 = (self.c1 * self.c2).double();
        let s4 = self.c2.square();

        Fp6 {
            c0: s3.mul_by_nonresidue() + s0,
            c1: s4.mul_by_nonresidue() + s1,
            c2: s1 + s2 + s3 - s0 - s4,
        }
    }

    /// Inverse through cofactors and the Fp2 norm, none for zero
    pub fn invert(&self) -> CtOption<Self> {
        let c0 = self.c0.square() - (self.c1 * self.c2).mul_by_nonresidue();
        let c1 = self.c2.square().mul_by_nonresidue() - self.c0 * self.c1;
        let c2 = self.c1.square() - self.c0 * self.c2;

        let t = (self.c1 * c2 + self.c2 * c1).mul_by_nonresidue() + self.c0 * c0;

        t.invert().map(|t| Fp6 {
            c0: t * c0,
            c1: t * c1,
            c2: t * c2,
        })
    }

    /// Coefficient-wise addition
    #[inline]
    pub fn add(&self, rhs: &Fp6) -> Fp6 {
        Fp6 {
            c0: self.c0 + rhs.c0,
            c1: self.c1 + rhs.c1,
            c2: self.c2 + rhs.c2,
        }
    }

    /// Coefficient-wise subtraction
    #[inline]
    pub fn sub(&self, rhs: &Fp6) -> Fp6 {
        Fp6 {
            c0: self.c0 - rhs.c0,
            c1: self.c1 - rhs.c1,
            c2: self.c2 - rhs.c2,
        }
    }

    /// Coefficient-wise negation
    #[inline]
    pub fn neg(&self) -> Fp6 {
        Fp6 {
            c0: -self.c0,
            c1: -self.c1,
            c2: -self.c2,
        }
    }
}

impl<'a> Neg for &'a Fp6 {
    type Output = Fp6;
    #[inline]
    fn neg(self) -> Fp6 {
        Fp6::neg(self)
    }
}

impl<'a, 'b> Sub<&'b Fp6> for &'a Fp6 {
    type Output = Fp6;
    #[inline]
    fn sub(self, rhs: &'b Fp6) -> Fp6 {
        Fp6::sub(self, rhs)
    }
}

impl<'a, 'b> Add<&'b Fp6> for &'a Fp6 {
    type Output = Fp6;
    #[inline]
    fn add(self, rhs: &'b Fp6) -> Fp6 {
        Fp6::add(self, rhs)
    }
}

impl<'a, 'b> Mul<&'b Fp6> for &'a Fp6 {
    type Output = Fp6;
    #[inline]
    fn mul(self, rhs: &'b Fp6) -> Fp6 {
        Fp6::mul(self, rhs)
    }
}

impl_neg_by_value!(Fp6);
impl_add_sub_ops!(Fp6);
impl_mul_ops!(Fp6);
