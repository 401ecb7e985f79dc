//! Input errors
//!
//! Two families share one enum:
//!
//! - **fatal** errors (unreadable source, malformed lattice dimensions,
//!   pressure, temperature or time, unknown lattice type, bad debug mode)
//!   stop the run;
//! - **recoverable** errors (a malformed species or process line, a bad
//!   block count) are logged and the offending line is skipped.
//!
//! [`ParseError::is_fatal`] tells them apart.

use thiserror::Error;

/// Error raised while reading or compiling an input description
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input source could not be opened or read
    #[error("Cannot open file {path}.")]
    CannotOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("The x dimension of lattice is not a number.")]
    DimensionX,

    #[error("The y dimension of lattice is not a number.")]
    DimensionY,

    #[error("The height must be a number.")]
    Height,

    #[error("Could not read pressure from input file. Is it a number?")]
    Pressure,

    #[error("Could not read temperature from input file. Is it a number?")]
    Temperature,

    #[error("Could not read number of KMC simulation time from input file. Is it a number?")]
    Time,

    #[error("Unresolvable lattice type found: {0}. Exiting...")]
    UnknownLattice(String),

    #[error("Could not read debug mode: '{0}' (expected on or off).")]
    DebugMode(String),

    /// A keyword that needs values appeared without them
    #[error("Missing value for keyword '{0}'.")]
    MissingValue(String),

    /// Block header (`nspecies`, `nprocesses`) with a non-integer count
    #[error("The number of {keyword} is not a number: '{value}'.")]
    Count { keyword: String, value: String },

    /// Block header announcing more lines than the file holds
    #[error("Expected {expected} lines after '{keyword}', found {found}.")]
    TruncatedBlock {
        keyword: String,
        expected: usize,
        found: usize,
    },

    #[error("Missing input fields for species '{0}'.")]
    SpeciesFields(String),

    #[error("Molecular weight of species '{symbol}' is not a positive number: '{value}'.")]
    MolecularWeight { symbol: String, value: String },

    #[error("Species '{0}' is declared twice.")]
    DuplicateSpecies(String),

    #[error("Reaction '{0}' has no '->' arrow.")]
    MissingArrow(String),

    #[error("Reaction '{0}' has an empty reactant or product side.")]
    EmptySide(String),

    #[error("Process '{0}' has no energetics (expected '<reaction>, <parameters>').")]
    MissingEnergetics(String),

    #[error("Malformed steps definition: '{0}'.")]
    Steps(String),

    /// Any of the above, located in the source text
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach a line number
    pub fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }

    /// Whether this error must stop the run
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::CannotOpen { .. }
            | Self::DimensionX
            | Self::DimensionY
            | Self::Height
            | Self::Pressure
            | Self::Temperature
            | Self::Time
            | Self::UnknownLattice(_)
            | Self::DebugMode(_)
            | Self::MissingValue(_) => true,

            Self::Count { .. }
            | Self::TruncatedBlock { .. }
            | Self::SpeciesFields(_)
            | Self::MolecularWeight { .. }
            | Self::DuplicateSpecies(_)
            | Self::MissingArrow(_)
            | Self::EmptySide(_)
            | Self::MissingEnergetics(_)
            | Self::Steps(_) => false,

            Self::AtLine { source, .. } => source.is_fatal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ParseError::DimensionX.is_fatal());
        assert!(ParseError::UnknownLattice("HEX".into()).is_fatal());
        assert!(!ParseError::MissingArrow("A + *".into()).is_fatal());
        assert!(!ParseError::SpeciesFields("A".into()).is_fatal());
    }

    #[test]
    fn test_line_context_keeps_severity() {
        let err = ParseError::Temperature.at_line(7);
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "line 7: Could not read temperature from input file. Is it a number?"
        );

        let err = ParseError::DuplicateSpecies("A".into()).at_line(3);
        assert!(!err.is_fatal());
    }
}
