//! BLS12-381 arithmetic core
//!
//! This crate provides the Montgomery-form field tower, the Jacobian group
//! laws of G1 and G2, GLV/GLS scalar decomposition and the optimal ate pairing
//! for the BLS12-381 curve. Secret-dependent paths (scalar multiplication,
//! group-law exceptional cases, field selection) run in constant time; the
//! endomorphism-accelerated multiplications are variable-time and opt-in.
//!
//! # Example
//!
//! ```
//! use bls381_algorithms::ec::bls12_381::{pairing, Bls12_381Scalar, G1Affine, G2Affine};
//!
//! let a = Bls12_381Scalar::from(6u64);
//! let p = G1Affine::from(G1Affine::generator() * a);
//! let lhs = pairing(&p, &G2Affine::generator());
//! let rhs = pairing(&G1Affine::generator(), &G2Affine::generator()) * a;
//! assert_eq!(lhs, rhs);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

// Error module and re-exports
pub mod error;
pub use error::{validate, Error, Result};

// Elliptic curve primitives
pub mod ec;
pub use ec::bls12_381;
pub use ec::{
    bls12_381_pairing, Bls12, Bls12_381G1, Bls12_381G1Affine, Bls12_381G2, Bls12_381G2Affine,
    Bls12_381Gt, Bls12_381Scalar,
};
