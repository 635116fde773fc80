//! Constant values for bls381 operations
//!
//! Curve parameters are kept as decimal strings so they can be audited against
//! published references and decoded into arbitrary-precision integers once at
//! start-up. Byte sizes are plain `usize` constants.

#![no_std]

pub mod pairing;
