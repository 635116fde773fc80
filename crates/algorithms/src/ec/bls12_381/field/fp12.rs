//! Target field `Fp12 = Fp6[w] / (w^2 - v)`

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use super::fp::Fp;
use super::fp2::Fp2;
use super::fp6::Fp6;
use crate::error::Result;

// ξ^((p^k - 1) / 6) for k = 0..11
const FROBENIUS_COEFF_FP12_C1: [Fp2; 12] = [
    // k = 0
    Fp2 {
        c0: Fp::one(),
        c1: Fp::zero(),
    },
    // k = 1
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0x0708_9552_b319_d465,
            0xc669_5f92_b50a_8313,
            0x97e8_3ccc_d117_228f,
            0xa35b_aeca_b2dc_29ee,
            0x1ce3_93ea_5daa_ce4d,
            0x08f2_220f_b0fb_66eb,
        ]),
        c1: Fp::from_raw_unchecked([
            0xb2f6_6aad_4ce5_d646,
            0x5842_a06b_fc49_7cec,
            0xcf48_95d4_2599_d394,
            0xc11b_9cba_40a8_e8d0,
            0x2e38_13cb_e5a0_de89,
            0x110e_efda_8884_7faf,
        ]),
    },
    // k = 2
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
    // k = 3
    Fp2 {
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
            0x3726_c30a_f242_c66c,
            0x7c2a_c1aa_d1b6_fe70,
            0xa040_07fb_ba4b_14a2,
            0xef51_7c32_6634_1429,
            0x0095_ba65_4ed2_226b,
            0x02e3_70ec_cc86_f7dd,
        ]),
        c1: Fp::from_raw_unchecked([
            0x82d8_3cf5_0dbc_e43f,
            0xa281_3e53_df9d_018f,
            0xc6f0_caa5_3c65_e181,
            0x7525_cf52_8d50_fe95,
            0x4a85_ed50_f479_8a6b,
            0x171d_a0fd_6cf8_eebd,
        ]),
    },
    // k = 6
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
    // k = 7
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0xb2f6_6aad_4ce5_d646,
            0x5842_a06b_fc49_7cec,
            0xcf48_95d4_2599_d394,
            0xc11b_9cba_40a8_e8d0,
            0x2e38_13cb_e5a0_de89,
            0x110e_efda_8884_7faf,
        ]),
        c1: Fp::from_raw_unchecked([
            0x0708_9552_b319_d465,
            0xc669_5f92_b50a_8313,
            0x97e8_3ccc_d117_228f,
            0xa35b_aeca_b2dc_29ee,
            0x1ce3_93ea_5daa_ce4d,
            0x08f2_220f_b0fb_66eb,
        ]),
    },
    // k = 8
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
    // k = 9
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0x7bcf_a7a2_5aa3_0fda,
            0xdc17_dec1_2a92_7e7c,
            0x2f08_8dd8_6b4e_bef1,
            0xd1ca_2087_da74_d4a7,
            0x2da2_5966_96ce_bc1d,
            0x0e2b_7eed_bbfd_87d2,
        ]),
        c1: Fp::from_raw_unchecked([
            0x3e2f_585d_a55c_9ad1,
            0x4294_213d_86c1_8183,
            0x3828_44c8_8b62_3732,
            0x92ad_2afd_1910_3e18,
            0x1d79_4e4f_ac7c_f0b9,
            0x0bd5_92fc_7d82_5ec8,
        ]),
    },
    // k = 10
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
    // k = 11
    Fp2 {
        c0: Fp::from_raw_unchecked([
            0x82d8_3cf5_0dbc_e43f,
            0xa281_3e53_df9d_018f,
            0xc6f0_caa5_3c65_e181,
            0x7525_cf52_8d50_fe95,
            0x4a85_ed50_f479_8a6b,
            0x171d_a0fd_6cf8_eebd,
        ]),
        c1: Fp::from_raw_unchecked([
            0x3726_c30a_f242_c66c,
            0x7c2a_c1aa_d1b6_fe70,
            0xa040_07fb_ba4b_14a2,
            0xef51_7c32_6634_1429,
            0x0095_ba65_4ed2_226b,
            0x02e3_70ec_cc86_f7dd,
        ]),
    },
];

/// Element c0 + c1 * w
#[derive(Copy, Clone, Default)]
pub struct Fp12 {
    /// Constant coefficient
    pub c0: Fp6,
    /// Coefficient of w
    pub c1: Fp6,
}

impl From<Fp6> for Fp12 {
    fn from(f: Fp6) -> Fp12 {
        Fp12 {
            c0: f,
            c1: Fp6::zero(),
        }
    }
}

impl fmt::Debug for Fp12 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} + ({:?})*w", self.c0, self.c1)
    }
}

impl ConstantTimeEq for Fp12 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1)
    }
}

impl Eq for Fp12 {}
impl PartialEq for Fp12 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl ConditionallySelectable for Fp12 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp12 {
            c0: Fp6::conditional_select(&a.c0, &b.c0, choice),
            c1: Fp6::conditional_select(&a.c1, &b.c1, choice),
        }
    }
}

impl Fp12 {
    /// Build from coefficients
    #[inline]
    pub const fn new(c0: Fp6, c1: Fp6) -> Fp12 {
        Fp12 { c0, c1 }
    }

    /// Additive identity
    #[inline]
    pub const fn zero() -> Self {
        Fp12 {
            c0: Fp6::zero(),
            c1: Fp6::zero(),
        }
    }

    /// Multiplicative identity
    #[inline]
    pub const fn one() -> Self {
        Fp12 {
            c0: Fp6::one(),
            c1: Fp6::zero(),
        }
    }

    /// Whether this is zero
    pub fn is_zero(&self) -> Choice {
        self.c0.is_zero() & self.c1.is_zero()
    }

    /// Uniformly random element
    pub fn random(rng: &mut impl RngCore) -> Result<Self> {
        Ok(Fp12 {
            c0: Fp6::random(rng)?,
            c1: Fp6::random(rng)?,
        })
    }

    /// Multiply by the sparse element with coefficients at positions 0, 1 and 4
    ///
    /// Positions index the Fp2 coordinates in the order
    /// (c0.c0, c0.c1, c0.c2, c1.c0, c1.c1, c1.c2).
    pub fn mul_by_014(&self, c0: &Fp2, c1: &Fp2, c4: &Fp2) -> Fp12 {
        let aa = self.c0.mul_by_01(c0, c1);
        let bb = self.c1.mul_by_1(c4);
        let o = c1 + c4;
        let c1 = (self.c1 + self.c0).mul_by_01(c0, &o) - aa - bb;
        let c0 = bb.mul_by_nonresidue() + aa;

        Fp12 { c0, c1 }
    }

    /// Conjugation over Fp6, the p^6 Frobenius
    #[inline(always)]
    pub fn conjugate(&self) -> Self {
        Fp12 {
            c0: self.c0,
            c1: -self.c1,
        }
    }

    /// Raise to the p^power Frobenius
    pub fn frobenius_map(&self, power: usize) -> Self {
        let coeff = FROBENIUS_COEFF_FP12_C1[power % 12];
        let c1 = self.c1.frobenius_map(power);

        Fp12 {
            c0: self.c0.frobenius_map(power),
            c1: Fp6 {
                c0: c1.c0 * coeff,
                c1: c1.c1 * coeff,
                c2: c1.c2 * coeff,
            },
        }
    }

    /// Complex squaring over Fp6
    pub fn square(&self) -> Self {
        let ab = self.c0 * self.c1;
        let c0c1 = self.c0 + self.c1;
        let c0 = self.c1.mul_by_nonresidue() + self.c0;
        let c0 = c0 * c0c1 - ab - ab.mul_by_nonresidue();

        Fp12 { c0, c1: ab + ab }
    }

    /// Granger-Scott squaring, valid only in the cyclotomic subgroup
    pub fn cyclotomic_square(&self) -> Self {
        fn fp4_square(a: Fp2, b: Fp2) -> (Fp2, Fp2) {
            let t0 = a.square();
            let t1 = b.square();
            let c0 = t1.mul_by_nonresidue() + t0;
            let c1 = (a + b).square() - t0 - t1;
            (c0, c1)
        }

        let z0 = self.c0.c0;
        let z4 = self.c0.c1;
        let z3 = self.c0.c2;
        let z2 = self.c1.c0;
        let z1 = self.c1.c1;
        let z5 = self.c1.c2;

        let (t0, t1) = fp4_square(z0, z1);
        let z0 = (t0 - z0).double() + t0;
        let z1 = (t1 + z1).double() + t1;

        let (t0, t1) = fp4_square(z2, z3);
        let (t2, t3) = fp4_square(z4, z5);

        let z4 = (t0 - z4).double() + t0;
        let z5 = (t1 + z5).double() + t1;

        let t0 = t3.mul_by_nonresidue();
        let z2 = (t0 + z2).double() + t0;
        let z3 = (t2 - z3).double() + t2;

        Fp12 {
            c0: Fp6::new(z0, z4, z3),
            c1: Fp6::new(z2, z1, z5),
        }
    }

    /// Karatsuba multiplication over Fp6
    pub fn mul(&self, b: &Fp12) -> Fp12 {
        let t0 = self.c0 * b.c0;
        let t1 = self.c1 * b.c1;
        let c1 = (self.c0 + self.c1) * (b.c0 + b.c1) - t0 - t1;
        let c0 = t1.mul_by_nonresidue() + t0;

        Fp12 { c0, c1 }
    }

    /// Inverse through the Fp6 norm, none for zero
    pub fn invert(&self) -> CtOption<Self> {
        (self.c0.square() - self.c1.square().mul_by_nonresidue())
            .invert()
            .map(|t| Fp12 {
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

    /// Addition
    #[inline]
    pub fn add(&self, rhs: &Fp12) -> Fp12 {
        Fp12 {
            c0: self.c0 + rhs.c0,
            c1: self.c1 + rhs.c1,
        }
    }

    /// Subtraction
    #[inline]
    pub fn sub(&self, rhs: &Fp12) -> Fp12 {
        Fp12 {
            c0: self.c0 - rhs.c0,
            c1: self.c1 - rhs.c1,
        }
    }

    /// Negation
    #[inline]
    pub fn neg(&self) -> Fp12 {
        Fp12 {
            c0: -self.c0,
            c1: -self.c1,
        }
    }
}

impl<'a> Neg for &'a Fp12 {
    type Output = Fp12;
    #[inline]
    fn neg(self) -> Fp12 {
        Fp12::neg(self)
    }
}

impl<'a, 'b> Sub<&'b Fp12> for &'a Fp12 {
    type Output = Fp12;
    #[inline]
    fn sub(self, rhs: &'b Fp12) -> Fp12 {
        Fp12::sub(self, rhs)
    }
}

impl<'a, 'b> Add<&'b Fp12> for &'a Fp12 {
    type Output = Fp12;
    #[inline]
    fn add(self, rhs: &'b Fp12) -> Fp12 {
        Fp12::add(self, rhs)
    }
}

impl<'a, 'b> Mul<&'b Fp12> for &'a Fp12 {
    type Output = Fp12;
    #[inline]
    fn mul(self, rhs: &'b Fp12) -> Fp12 {
        Fp12::mul(self, rhs)
    }
}

impl_neg_by_value!(Fp12);
impl_add_sub_ops!(Fp12);
impl_mul_ops!(Fp12);
