//! Public API traits and types for the bls381 workspace
//!
//! This crate provides the public surface shared by the pairing engine and its
//! consumers: the error type, byte serialization traits and the
//! [`PairingEngine`] abstraction.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

pub mod error;
pub mod traits;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, Result, ResultExt};

// Re-export all traits from the traits module
pub use traits::{PairingEngine, Serialize, SerializeSecret};

// Re-export trait modules for direct access
pub use traits::{pairing, serialize};
