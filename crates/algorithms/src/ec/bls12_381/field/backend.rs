//! Montgomery multiplication kernels.
//!
//! [`Fp`](super::fp::Fp) and [`Scalar`](crate::ec::bls12_381::Bls12_381Scalar)
//! delegate `mul` and `square` to a [`MontgomeryBackend`]. Two kernels satisfy
//! the same value contract:
//!
//! - [`Portable`]: coarsely integrated operand scanning, one loop for any limb
//!   count.
//! - [`Unrolled`]: straight-line schoolbook product followed by a separate
//!   word-by-word reduction, specialised for 4 and 6 limbs, with a squaring
//!   that computes each cross product once.
//!
//! The crate-wide kernel is [`ActiveBackend`]; enabling the `portable` feature
//! swaps it for [`Portable`].

// ============================================================================
// Word Arithmetic
// ============================================================================

/// Compute a + b + carry, returning (result, carry)
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Compute a - (b + borrow), returning (result, borrow)
///
/// The borrow is either 0 or `u64::MAX` so it can be used directly as a mask.
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Compute a + (b * c) + carry, returning (result, carry)
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

// ============================================================================
// Strategy Interface
// ============================================================================

/// A prime modulus in `N` little-endian limbs, with its Montgomery constant
pub trait MontgomeryModulus<const N: usize> {
    /// The modulus, least significant limb first
    const MODULUS: [u64; N];

    /// `-MODULUS^{-1} mod 2^64`
    const INV: u64;
}

/// Montgomery product `a * b * 2^{-64N} mod m` for canonical inputs
pub trait MontgomeryBackend<const N: usize> {
    /// Multiply two canonical Montgomery-form values
    fn mul<M: MontgomeryModulus<N>>(a: &[u64; N], b: &[u64; N]) -> [u64; N];

    /// Square a canonical Montgomery-form value
    ///
    /// Must be bit-identical to `mul(a, a)`.
    fn square<M: MontgomeryModulus<N>>(a: &[u64; N]) -> [u64; N] {
        Self::mul::<M>(a, a)
    }
}

/// Loop-based kernel for any limb count
#[derive(Clone, Copy, Debug, Default)]
pub struct Portable;

/// Straight-line kernel for the 4-limb and 6-limb moduli
#[derive(Clone, Copy, Debug, Default)]
pub struct Unrolled;

/// Kernel used by the field types
#[cfg(not(feature = "portable"))]
pub type ActiveBackend = Unrolled;

/// Kernel used by the field types
#[cfg(feature = "portable")]
pub type ActiveBackend = Portable;

/// Subtract the modulus once unless `hi:value` is already below it
#[inline(always)]
pub(crate) fn subtract_modulus<M: MontgomeryModulus<N>, const N: usize>(
    value: [u64; N],
    hi: u64,
) -> [u64; N] {
    let mut reduced = [0u64; N];
    let mut borrow = 0;
    for i in 0..N {
        let (d, b) = sbb(value[i], M::MODULUS[i], borrow);
        reduced[i] = d;
        borrow = b;
    }
    let (_, borrow) = sbb(hi, 0, borrow);

    // borrow is all ones exactly when hi:value < modulus
    let mut out = [0u64; N];
    for i in 0..N {
        out[i] = (value[i] & borrow) | (reduced[i] & !borrow);
    }
    out
}

// ============================================================================
// Portable Kernel
// ============================================================================

impl<const N: usize> MontgomeryBackend<N> for Portable {
    fn mul<M: MontgomeryModulus<N>>(a: &[u64; N], b: &[u64; N]) -> [u64; N] {
        let mut t = [0u64; N];
        let mut hi = 0u64;

        for i in 0..N {
            // t += a * b[i]
            let mut carry = 0;
            for j in 0..N {
                let (v, c) = mac(t[j], a[j], b[i], carry);
                t[j] = v;
                carry = c;
            }
            let (top, top_carry) = adc(hi, carry, 0);

            // t = (t + k * m) / 2^64
            let k = t[0].wrapping_mul(M::INV);
            let (_, mut carry) = mac(t[0], k, M::MODULUS[0], 0);
            for j in 1..N {
                let (v, c) = mac(t[j], k, M::MODULUS[j], carry);
                t[j - 1] = v;
                carry = c;
            }
            let (v, c) = adc(top, carry, 0);
            t[N - 1] = v;
            hi = top_carry + c;
        }

        subtract_modulus::<M, N>(t, hi)
    }
}

// ============================================================================
// Unrolled Kernel: 6 limbs
// ============================================================================

impl MontgomeryBackend<6> for Unrolled {
    #[inline]
    fn mul<M: MontgomeryModulus<6>>(a: &[u64; 6], b: &[u64; 6]) -> [u64; 6] {
        let (t0, carry) = mac(0, a[0], b[0], 0);
        let (t1, carry) = mac(0, a[0], b[1], carry);
        let (t2, carry) = mac(0, a[0], b[2], carry);
        let (t3, carry) = mac(0, a[0], b[3], carry);
        let (t4, carry) = mac(0, a[0], b[4], carry);
        let (t5, t6) = mac(0, a[0], b[5], carry);

        let (t1, carry) = mac(t1, a[1], b[0], 0);
        let (t2, carry) = mac(t2, a[1], b[1], carry);
        let (t3, carry) = mac(t3, a[1], b[2], carry);
        let (t4, carry) = mac(t4, a[1], b[3], carry);
        let (t5, carry) = mac(t5, a[1], b[4], carry);
        let (t6, t7) = mac(t6, a[1], b[5], carry);

        let (t2, carry) = mac(t2, a[2], b[0], 0);
        let (t3, carry) = mac(t3, a[2], b[1], carry);
        let (t4, carry) = mac(t4, a[2], b[2], carry);
        let (t5, carry) = mac(t5, a[2], b[3], carry);
        let (t6, carry) = mac(t6, a[2], b[4], carry);
        let (t7, t8) = mac(t7, a[2], b[5], carry);

        let (t3, carry) = mac(t3, a[3], b[0], 0);
        let (t4, carry) = mac(t4, a[3], b[1], carry);
        let (t5, carry) = mac(t5, a[3], b[2], carry);
        let (t6, carry) = mac(t6, a[3], b[3], carry);
        let (t7, carry) = mac(t7, a[3], b[4], carry);
        let (t8, t9) = mac(t8, a[3], b[5], carry);

        let (t4, carry) = mac(t4, a[4], b[0], 0);
        let (t5, carry) = mac(t5, a[4], b[1], carry);
        let (t6, carry) = mac(t6, a[4], b[2], carry);
        let (t7, carry) = mac(t7, a[4], b[3], carry);
        let (t8, carry) = mac(t8, a[4], b[4], carry);
        let (t9, t10) = mac(t9, a[4], b[5], carry);

        let (t5, carry) = mac(t5, a[5], b[0], 0);
        let (t6, carry) = mac(t6, a[5], b[1], carry);
        let (t7, carry) = mac(t7, a[5], b[2], carry);
        let (t8, carry) = mac(t8, a[5], b[3], carry);
        let (t9, carry) = mac(t9, a[5], b[4], carry);
        let (t10, t11) = mac(t10, a[5], b[5], carry);

        reduce6::<M>([t0, t1, t2, t3, t4, t5, t6, t7, t8, t9, t10, t11])
    }

    #[inline]
    fn square<M: MontgomeryModulus<6>>(a: &[u64; 6]) -> [u64; 6] {
        // Off-diagonal products, each computed once
        let (t1, carry) = mac(0, a[0], a[1], 0);
        let (t2, carry) = mac(0, a[0], a[2], carry);
        let (t3, carry) = mac(0, a[0], a[3], carry);
        let (t4, carry) = mac(0, a[0], a[4], carry);
        let (t5, t6) = mac(0, a[0], a[5], carry);

        let (t3, carry) = mac(t3, a[1], a[2], 0);
        let (t4, carry) = mac(t4, a[1], a[3], carry);
        let (t5, carry) = mac(t5, a[1], a[4], carry);
        let (t6, t7) = mac(t6, a[1], a[5], carry);

        let (t5, carry) = mac(t5, a[2], a[3], 0);
        let (t6, carry) = mac(t6, a[2], a[4], carry);
        let (t7, t8) = mac(t7, a[2], a[5], carry);

        let (t7, carry) = mac(t7, a[3], a[4], 0);
        let (t8, t9) = mac(t8, a[3], a[5], carry);

        let (t9, t10) = mac(t9, a[4], a[5], 0);

        // Double them
        let t11 = t10 >> 63;
        let t10 = (t10 << 1) | (t9 >> 63);
        let t9 = (t9 << 1) | (t8 >> 63);
        let t8 = (t8 << 1) | (t7 >> 63);
        let t7 = (t7 << 1) | (t6 >> 63);
        let t6 = (t6 << 1) | (t5 >> 63);
        let t5 = (t5 << 1) | (t4 >> 63);
        let t4 = (t4 << 1) | (t3 >> 63);
        let t3 = (t3 << 1) | (t2 >> 63);
        let t2 = (t2 << 1) | (t1 >> 63);
        let t1 = t1 << 1;

        // Diagonal
        let (t0, carry) = mac(0, a[0], a[0], 0);
        let (t1, carry) = adc(t1, 0, carry);
        let (t2, carry) = mac(t2, a[1], a[1], carry);
        let (t3, carry) = adc(t3, 0, carry);
        let (t4, carry) = mac(t4, a[2], a[2], carry);
        let (t5, carry) = adc(t5, 0, carry);
        let (t6, carry) = mac(t6, a[3], a[3], carry);
        let (t7, carry) = adc(t7, 0, carry);
        let (t8, carry) = mac(t8, a[4], a[4], carry);
        let (t9, carry) = adc(t9, 0, carry);
        let (t10, carry) = mac(t10, a[5], a[5], carry);
        let (t11, _) = adc(t11, 0, carry);

        reduce6::<M>([t0, t1, t2, t3, t4, t5, t6, t7, t8, t9, t10, t11])
    }
}

/// Word-by-word Montgomery reduction of a 12-limb product
#[inline(always)]
fn reduce6<M: MontgomeryModulus<6>>(t: [u64; 12]) -> [u64; 6] {
    let m = M::MODULUS;

    let k = t[0].wrapping_mul(M::INV);
    let (_, carry) = mac(t[0], k, m[0], 0);
    let (r1, carry) = mac(t[1], k, m[1], carry);
    let (r2, carry) = mac(t[2], k, m[2], carry);
    let (r3, carry) = mac(t[3], k, m[3], carry);
    let (r4, carry) = mac(t[4], k, m[4], carry);
    let (r5, carry) = mac(t[5], k, m[5], carry);
    let (r6, r7) = adc(t[6], 0, carry);

    let k = r1.wrapping_mul(M::INV);
    let (_, carry) = mac(r1, k, m[0], 0);
    let (r2, carry) = mac(r2, k, m[1], carry);
    let (r3, carry) = mac(r3, k, m[2], carry);
    let (r4, carry) = mac(r4, k, m[3], carry);
    let (r5, carry) = mac(r5, k, m[4], carry);
    let (r6, carry) = mac(r6, k, m[5], carry);
    let (r7, r8) = adc(t[7], r7, carry);

    let k = r2.wrapping_mul(M::INV);
    let (_, carry) = mac(r2, k, m[0], 0);
    let (r3, carry) = mac(r3, k, m[1], carry);
    let (r4, carry) = mac(r4, k, m[2], carry);
    let (r5, carry) = mac(r5, k, m[3], carry);
    let (r6, carry) = mac(r6, k, m[4], carry);
    let (r7, carry) = mac(r7, k, m[5], carry);
    let (r8, r9) = adc(t[8], r8, carry);

    let k = r3.wrapping_mul(M::INV);
    let (_, carry) = mac(r3, k, m[0], 0);
    let (r4, carry) = mac(r4, k, m[1], carry);
    let (r5, carry) = mac(r5, k, m[2], carry);
    let (r6, carry) = mac(r6, k, m[3], carry);
    let (r7, carry) = mac(r7, k, m[4], carry);
    let (r8, carry) = mac(r8, k, m[5], carry);
    let (r9, r10) = adc(t[9], r9, carry);

    let k = r4.wrapping_mul(M::INV);
    let (_, carry) = mac(r4, k, m[0], 0);
    let (r5, carry) = mac(r5, k, m[1], carry);
    let (r6, carry) = mac(r6, k, m[2], carry);
    let (r7, carry) = mac(r7, k, m[3], carry);
    let (r8, carry) = mac(r8, k, m[4], carry);
    let (r9, carry) = mac(r9, k, m[5], carry);
    let (r10, r11) = adc(t[10], r10, carry);

    let k = r5.wrapping_mul(M::INV);
    let (_, carry) = mac(r5, k, m[0], 0);
    let (r6, carry) = mac(r6, k, m[1], carry);
    let (r7, carry) = mac(r7, k, m[2], carry);
    let (r8, carry) = mac(r8, k, m[3], carry);
    let (r9, carry) = mac(r9, k, m[4], carry);
    let (r10, carry) = mac(r10, k, m[5], carry);
    let (r11, hi) = adc(t[11], r11, carry);

    subtract_modulus::<M, 6>([r6, r7, r8, r9, r10, r11], hi)
}

// ============================================================================
// Unrolled Kernel: 4 limbs
// ============================================================================

impl MontgomeryBackend<4> for Unrolled {
    #[inline]
    fn mul<M: MontgomeryModulus<4>>(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
        let (r0, carry) = mac(0, a[0], b[0], 0);
        let (r1, carry) = mac(0, a[0], b[1], carry);
        let (r2, carry) = mac(0, a[0], b[2], carry);
        let (r3, r4) = mac(0, a[0], b[3], carry);

        let (r1, carry) = mac(r1, a[1], b[0], 0);
        let (r2, carry) = mac(r2, a[1], b[1], carry);
        let (r3, carry) = mac(r3, a[1], b[2], carry);
        let (r4, r5) = mac(r4, a[1], b[3], carry);

        let (r2, carry) = mac(r2, a[2], b[0], 0);
        let (r3, carry) = mac(r3, a[2], b[1], carry);
        let (r4, carry) = mac(r4, a[2], b[2], carry);
        let (r5, r6) = mac(r5, a[2], b[3], carry);

        let (r3, carry) = mac(r3, a[3], b[0], 0);
        let (r4, carry) = mac(r4, a[3], b[1], carry);
        let (r5, carry) = mac(r5, a[3], b[2], carry);
        let (r6, r7) = mac(r6, a[3], b[3], carry);

        reduce4::<M>([r0, r1, r2, r3, r4, r5, r6, r7])
    }

    #[inline]
    fn square<M: MontgomeryModulus<4>>(a: &[u64; 4]) -> [u64; 4] {
        let (r1, carry) = mac(0, a[0], a[1], 0);
        let (r2, carry) = mac(0, a[0], a[2], carry);
        let (r3, r4) = mac(0, a[0], a[3], carry);

        let (r3, carry) = mac(r3, a[1], a[2], 0);
        let (r4, r5) = mac(r4, a[1], a[3], carry);

        let (r5, r6) = mac(r5, a[2], a[3], 0);

        let r7 = r6 >> 63;
        let r6 = (r6 << 1) | (r5 >> 63);
        let r5 = (r5 << 1) | (r4 >> 63);
        let r4 = (r4 << 1) | (r3 >> 63);
        let r3 = (r3 << 1) | (r2 >> 63);
        let r2 = (r2 << 1) | (r1 >> 63);
        let r1 = r1 << 1;

        let (r0, carry) = mac(0, a[0], a[0], 0);
        let (r1, carry) = adc(0, r1, carry);
        let (r2, carry) = mac(r2, a[1], a[1], carry);
        let (r3, carry) = adc(0, r3, carry);
        let (r4, carry) = mac(r4, a[2], a[2], carry);
        let (r5, carry) = adc(0, r5, carry);
        let (r6, carry) = mac(r6, a[3], a[3], carry);
        let (r7, _) = adc(0, r7, carry);

        reduce4::<M>([r0, r1, r2, r3, r4, r5, r6, r7])
    }
}

/// Word-by-word Montgomery reduction of an 8-limb product
#[inline(always)]
fn reduce4<M: MontgomeryModulus<4>>(r: [u64; 8]) -> [u64; 4] {
    let m = M::MODULUS;

    let k = r[0].wrapping_mul(M::INV);
    let (_, carry) = mac(r[0], k, m[0], 0);
    let (r1, carry) = mac(r[1], k, m[1], carry);
    let (r2, carry) = mac(r[2], k, m[2], carry);
    let (r3, carry) = mac(r[3], k, m[3], carry);
    let (r4, carry2) = adc(r[4], 0, carry);

    let k = r1.wrapping_mul(M::INV);
    let (_, carry) = mac(r1, k, m[0], 0);
    let (r2, carry) = mac(r2, k, m[1], carry);
    let (r3, carry) = mac(r3, k, m[2], carry);
    let (r4, carry) = mac(r4, k, m[3], carry);
    let (r5, carry2) = adc(r[5], carry2, carry);

    let k = r2.wrapping_mul(M::INV);
    let (_, carry) = mac(r2, k, m[0], 0);
    let (r3, carry) = mac(r3, k, m[1], carry);
    let (r4, carry) = mac(r4, k, m[2], carry);
    let (r5, carry) = mac(r5, k, m[3], carry);
    let (r6, carry2) = adc(r[6], carry2, carry);

    let k = r3.wrapping_mul(M::INV);
    let (_, carry) = mac(r3, k, m[0], 0);
    let (r4, carry) = mac(r4, k, m[1], carry);
    let (r5, carry) = mac(r5, k, m[2], carry);
    let (r6, carry) = mac(r6, k, m[3], carry);
    let (r7, hi) = adc(r[7], carry2, carry);

    subtract_modulus::<M, 4>([r4, r5, r6, r7], hi)
}
