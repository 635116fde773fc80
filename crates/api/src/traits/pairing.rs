//! Pairing-engine trait consumed by signature and secret-sharing schemes.

use crate::Result;
use rand_core::{CryptoRng, RngCore};

/// A bilinear pairing `e: G1 x G2 -> Gt` over prime-order groups.
///
/// Signature aggregation and Feldman-style share verification only need the
/// operations below; the concrete curve arithmetic stays behind this trait.
/// `Gt` is written additively, so `e(aP, bQ) == e(P, Q) * (ab)`.
pub trait PairingEngine {
    /// Element of the scalar field shared by all three groups
    type Scalar: Copy + Eq;

    /// Element of the first source group
    type G1: Copy + Eq;

    /// Element of the second source group
    type G2: Copy + Eq;

    /// Element of the target group
    type Gt: Copy + Eq;

    /// Returns the name of this pairing engine
    fn name() -> &'static str;

    /// Fixed generator of `G1`
    fn g1_generator() -> Self::G1;

    /// Fixed generator of `G2`
    fn g2_generator() -> Self::G2;

    /// Scalar multiplication in `G1`
    fn g1_mul(point: &Self::G1, scalar: &Self::Scalar) -> Self::G1;

    /// Scalar multiplication in `G2`
    fn g2_mul(point: &Self::G2, scalar: &Self::Scalar) -> Self::G2;

    /// Evaluate the pairing on a single pair of points
    fn pairing(p: &Self::G1, q: &Self::G2) -> Self::Gt;

    /// Evaluate the sum of pairings `e(p_1, q_1) + ... + e(p_n, q_n)`
    /// with a single final exponentiation
    fn multi_pairing(terms: &[(Self::G1, Self::G2)]) -> Self::Gt;

    /// Sample a uniformly random non-zero scalar
    ///
    /// Fails only when the entropy source reports an error.
    fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self::Scalar>;
}
