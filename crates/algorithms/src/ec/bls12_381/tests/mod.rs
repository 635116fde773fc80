//! BLS12-381 test suite
//!
//! Tests are organized into focused modules for better maintainability.

#[cfg(test)]
mod field;


#[cfg(test)]
mod isogeny;


#[cfg(test)]
mod serialization;
