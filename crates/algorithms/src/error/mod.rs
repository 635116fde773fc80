//! Error handling for the BLS12-381 arithmetic core

use alloc::borrow::Cow;

#[cfg(feature = "std")]
use std::fmt;

#[cfg(not(feature = "std"))]
use core::fmt;

use bls381_api::Error as CoreError;

/// The error type for the arithmetic core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Parameter validation error
    Parameter {
        /// Name of the invalid parameter
        name: Cow<'static, str>,
        /// Reason why the parameter is invalid
        reason: Cow<'static, str>,
    },

    /// Length validation error
    Length {
        /// Context where the length error occurred
        context: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// An integer is not below the modulus of the field it was meant for
    OutOfBounds {
        /// Field or type being constructed
        context: &'static str,
    },

    /// Malformed byte encoding of a point or scalar
    Encoding {
        /// Type being decoded
        context: &'static str,
        /// What was wrong with the input
        details: &'static str,
    },

    /// The caller-supplied entropy source failed
    #[cfg(feature = "std")]
    RandomGeneration {
        /// Operation that was sampling
        context: &'static str,
        /// Message reported by the source
        details: String,
    },

    /// The caller-supplied entropy source failed
    #[cfg(not(feature = "std"))]
    RandomGeneration {
        /// Operation that was sampling
        context: &'static str,
    },
}

impl Error {
    /// Shorthand to create a Parameter error
    pub fn param<N: Into<Cow<'static, str>>, R: Into<Cow<'static, str>>>(
        name: N,
        reason: R,
    ) -> Self {
        Error::Parameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand to create an Encoding error
    pub fn encoding(context: &'static str, details: &'static str) -> Self {
        Error::Encoding { context, details }
    }

    /// Wrap a failure reported by an entropy source
    pub fn rng(context: &'static str, err: rand_core::Error) -> Self {
        #[cfg(feature = "std")]
        {
            Error::RandomGeneration {
                context,
                details: err.to_string(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            let _ = err;
            Error::RandomGeneration { context }
        }
    }
}

/// Result type for arithmetic core operations
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            Error::Length {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Invalid length for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            Error::OutOfBounds { context } => {
                write!(f, "Value out of bounds for {}: not below the modulus", context)
            }
            Error::Encoding { context, details } => {
                write!(f, "Malformed {} encoding: {}", context, details)
            }
            #[cfg(feature = "std")]
            Error::RandomGeneration { context, details } => {
                write!(f, "Entropy source failed during {}: {}", context, details)
            }
            #[cfg(not(feature = "std"))]
            Error::RandomGeneration { context } => {
                write!(f, "Entropy source failed during {}", context)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<Error> for CoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Parameter { name, reason } => CoreError::InvalidParameter {
                context: match name {
                    Cow::Borrowed(s) => s,
                    Cow::Owned(_) => "parameter",
                },
                #[cfg(feature = "std")]
                message: reason.into_owned(),
            },
            Error::Length {
                context,
                expected,
                actual,
            } => CoreError::InvalidLength {
                context,
                expected,
                actual,
            },
            Error::OutOfBounds { context } => CoreError::InvalidParameter {
                context,
                #[cfg(feature = "std")]
                message: "value is not below the modulus".to_string(),
            },
            Error::Encoding { context, details } => CoreError::SerializationError {
                context,
                #[cfg(feature = "std")]
                message: details.to_string(),
            },
            #[cfg(feature = "std")]
            Error::RandomGeneration { context, details } => CoreError::RandomGenerationError {
                context,
                message: details,
            },
            #[cfg(not(feature = "std"))]
            Error::RandomGeneration { context } => CoreError::RandomGenerationError { context },
        }
    }
}

// Include the validation submodule
pub mod validate;

#[cfg(test)]
mod tests;
