//! Validation utilities for the arithmetic core

use super::{Error, Result};

/// Validate a parameter condition
#[inline(always)]
pub fn parameter(condition: bool, name: &'static str, reason: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::param(name, reason));
    }
    Ok(())
}

/// Validate a length
#[inline(always)]
pub fn length(context: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::Length {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validate that an integer lies below a modulus
#[inline(always)]
pub fn bounds(context: &'static str, below_modulus: bool) -> Result<()> {
    if !below_modulus {
        return Err(Error::OutOfBounds { context });
    }
    Ok(())
}

/// Validate a decoding condition
#[inline(always)]
pub fn encoding(condition: bool, context: &'static str, details: &'static str) -> Result<()> {
    if !condition {
        tracing::debug!(context, details, "rejected encoding");
        return Err(Error::encoding(context, details));
    }
    Ok(())
}
