//! # bls381
//!
//! A pure Rust BLS12-381 pairing engine.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! bls381 = "0.4"
//! ```
//!
//! ## Features
//!
//! - `std` (default): descriptive error messages and `std::error::Error`
//! - `portable`: loop-based Montgomery kernels instead of the unrolled ones
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from its sub-crates:
//!
//! - [`api`]: error type, serialization traits and [`PairingEngine`](api::PairingEngine)
//! - [`params`]: curve constants
//! - [`algorithms`]: field tower, groups and the optimal ate pairing
//!
//! ```
//! use bls381::prelude::*;
//!
//! let sk = Scalar::from(42u64);
//! let pk = Bls12::g2_mul(&Bls12::g2_generator(), &sk);
//! let h = Bls12::g1_mul(&Bls12::g1_generator(), &Scalar::from(7u64));
//! let sig = Bls12::g1_mul(&h, &sk);
//!
//! assert_eq!(
//!     Bls12::pairing(&sig, &Bls12::g2_generator()),
//!     Bls12::pairing(&h, &pk)
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub use bls381_algorithms as algorithms;
pub use bls381_api as api;
pub use bls381_params as params;

pub use bls381_algorithms::ec::bls12_381;

/// Common imports for bls381 users
pub mod prelude {
    pub use crate::api::{Error, PairingEngine, Result, Serialize, SerializeSecret};

    pub use crate::bls12_381::{
        multi_miller_loop, pairing, Bls12, Bls12_381Scalar as Scalar, G1Affine, G1Projective,
        G2Affine, G2Prepared, G2Projective, Gt, MillerLoopResult,
    };
}
