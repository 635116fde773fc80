//! Traits implemented by the pairing engine for its consumers

pub mod pairing;
pub mod serialize;

pub use pairing::PairingEngine;
pub use serialize::{Serialize, SerializeSecret};
