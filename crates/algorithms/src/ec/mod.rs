//! Elliptic curve primitives
//!
//! Only the BLS12-381 pairing-friendly curve is provided.

pub mod bls12_381;

pub use bls12_381::{
    pairing as bls12_381_pairing, Bls12, Bls12_381Scalar, G1Affine as Bls12_381G1Affine,
    G1Projective as Bls12_381G1, G2Affine as Bls12_381G2Affine, G2Projective as Bls12_381G2,
    Gt as Bls12_381Gt,
};
