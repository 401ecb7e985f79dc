//! Crate-wide error type
//!
//! Every fallible operation of the simulation pipeline (input compilation,
//! lattice construction, process binding, event scheduling) reports a
//! [`KmcError`]. Input problems keep their own, more detailed
//! [`ParseError`] which converts into `KmcError` through `?`.

use thiserror::Error;

use crate::input::ParseError;

/// Errors raised while building or running a simulation
#[derive(Error, Debug)]
pub enum KmcError {
    /// The input description could not be compiled
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Lattice construction or site lookup failed
    #[error("Lattice error: {0}")]
    Lattice(String),

    /// Inconsistent or incomplete run configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A process could not be bound or executed
    #[error("Process error: {0}")]
    Process(String),

    /// A rate or time increment left the finite range
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KmcError {
    /// Create a lattice error
    pub fn lattice(message: impl Into<String>) -> Self {
        Self::Lattice(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a process error
    pub fn process(message: impl Into<String>) -> Self {
        Self::Process(message.into())
    }

    /// Create a numerical error
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_helpers() {
        let err = KmcError::lattice("site 42 out of range");
        assert_eq!(err.to_string(), "Lattice error: site 42 out of range");

        let err = KmcError::configuration("no temperature");
        assert!(matches!(err, KmcError::Configuration(_)));
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err: KmcError = ParseError::DimensionX.into();
        assert_eq!(err.to_string(), "The x dimension of lattice is not a number.");
    }
}
