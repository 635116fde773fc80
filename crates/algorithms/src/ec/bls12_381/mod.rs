//! BLS12-381 pairing-friendly elliptic curve implementation.
//!
//! The base field tower lives in [`field`], the prime-order groups in [`g1`]
//! and [`g2`], and the optimal ate pairing in [`pairings`]. Arbitrary-precision
//! parameters are decoded once by [`parameters`].
//!
//! **Warning:** Unaudited implementation. Use at your own risk.

#[macro_use]
mod ops;

pub mod field;
pub mod g1;
pub mod g2;
pub mod isogeny;
pub mod lattice;
pub mod pairings;
pub mod parameters;
pub mod scalar;

#[cfg(test)]
mod tests;

use crate::error::{validate, Result};
use field::fp::Fp;

pub use field::{fp::Fp as Bls12_381Fp, fp12::Fp12, fp2::Fp2, fp6::Fp6};
pub use g1::{G1Affine, G1Projective};
pub use g2::{G2Affine, G2Projective};
pub use isogeny::iso3;
pub use lattice::{multi_mul, Lattice, LatticeGroup};
pub use pairings::{multi_miller_loop, pairing, Bls12, G2Prepared, Gt, MillerLoopResult};
pub use parameters::{parameters, CurveParameters};
pub use scalar::Scalar as Bls12_381Scalar;

use scalar::Scalar;

/// |u| for the BLS parameter u = -0xd201000000010000
const BLS_X: u64 = 0xd201_0000_0001_0000;
/// Sign of u
const BLS_X_IS_NEGATIVE: bool = true;

/// Flag bits carried by the top of the first byte of a point encoding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct EncodingFlags {
    pub(crate) compressed: bool,
    pub(crate) infinity: bool,
    pub(crate) sort: bool,
}

impl EncodingFlags {
    const COMPRESSED: u8 = 1 << 7;
    const INFINITY: u8 = 1 << 6;
    const SORT: u8 = 1 << 5;

    /// Read the flags and clear them from `byte`
    pub(crate) fn take(byte: &mut u8) -> Self {
        let flags = EncodingFlags {
            compressed: *byte & Self::COMPRESSED != 0,
            infinity: *byte & Self::INFINITY != 0,
            sort: *byte & Self::SORT != 0,
        };
        *byte &= !(Self::COMPRESSED | Self::INFINITY | Self::SORT);
        flags
    }

    /// OR the flags into `byte`
    pub(crate) fn apply(self, byte: &mut u8) {
        if self.compressed {
            *byte |= Self::COMPRESSED;
        }
        if self.infinity {
            *byte |= Self::INFINITY;
        }
        if self.sort {
            *byte |= Self::SORT;
        }
    }
}

/// Copy a slice into a fixed-size array, rejecting any other length
pub(crate) fn to_array<const N: usize>(bytes: &[u8], context: &'static str) -> Result<[u8; N]> {
    validate::length(context, bytes.len(), N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Decode a big-endian coordinate that must already be reduced
pub(crate) fn decode_coordinate(bytes: &[u8], context: &'static str) -> Result<Fp> {
    let array: [u8; 48] = to_array(bytes, context)?;
    let fp = Option::<Fp>::from(Fp::from_bytes(&array));
    validate::encoding(fp.is_some(), context, "non-canonical coordinate")?;
    Ok(fp.unwrap_or_default())
}
