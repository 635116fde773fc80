//! Montgomery-form prime fields and the Fp2/Fp6/Fp12 extension tower

pub mod backend;
pub mod fp;
pub mod fp2;
pub mod fp6;
pub mod fp12;
