//! Species and process registry
//!
//! The registry is the hand-off point between the input compiler and the
//! execution framework. It owns
//!
//! - every declared [`Species`] (keyed by symbol, iterated in lexical order,
//!   which is also the order species are matched in reaction notation);
//! - every compiled [`ProcessDescriptor`], in declaration order, with a
//!   name index so rules and exports can look processes up by name.
//!
//! Both are immutable once the input has been read.

use std::collections::{BTreeMap, HashMap};

use super::error::ParseError;
use super::reaction::ProcessDescriptor;

/// A chemical species declared in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    /// Unique symbol used in reaction notation (case-sensitive)
    pub symbol: String,

    /// Molecular weight (g/mol)
    pub molecular_weight: f64,
}

impl Species {
    /// Molecular mass of one particle (kg)
    pub fn particle_mass(&self) -> f64 {
        self.molecular_weight * 1.0e-3 / crate::physics::constants::AVOGADRO
    }
}

/// Symbol → species and name → process mappings
#[derive(Debug, Clone, Default)]
pub struct Registry {
    species: BTreeMap<String, Species>,
    processes: Vec<ProcessDescriptor>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // ====== Species ======

    /// Declare a species
    ///
    /// # Errors
    ///
    /// - [`ParseError::MolecularWeight`] if the weight is not a positive finite number
    /// - [`ParseError::DuplicateSpecies`] if the symbol is already declared
    ///   (the first declaration is kept)
    pub fn add_species(&mut self, symbol: &str, molecular_weight: f64) -> Result<(), ParseError> {
        if !(molecular_weight.is_finite() && molecular_weight > 0.0) {
            return Err(ParseError::MolecularWeight {
                symbol: symbol.to_string(),
                value: molecular_weight.to_string(),
            });
        }

        if self.species.contains_key(symbol) {
            return Err(ParseError::DuplicateSpecies(symbol.to_string()));
        }

        self.species.insert(
            symbol.to_string(),
            Species {
                symbol: symbol.to_string(),
                molecular_weight,
            },
        );
        Ok(())
    }

    /// Look up a species by symbol
    pub fn species(&self, symbol: &str) -> Option<&Species> {
        self.species.get(symbol)
    }

    /// Whether `symbol` is a declared species
    pub fn contains_species(&self, symbol: &str) -> bool {
        self.species.contains_key(symbol)
    }

    /// Declared symbols, in lexical order
    pub fn species_symbols(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    /// Number of declared species
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    // ====== Processes ======

    /// Register a compiled process
    ///
    /// A descriptor whose name already exists replaces the earlier one.
    pub fn register_process(&mut self, descriptor: ProcessDescriptor) {
        match self.by_name.get(&descriptor.name) {
            Some(&index) => {
                log::warn!("Process {} redefined, keeping the last definition", descriptor.name);
                self.processes[index] = descriptor;
            }
            None => {
                self.by_name
                    .insert(descriptor.name.clone(), self.processes.len());
                self.processes.push(descriptor);
            }
        }
    }

    /// All processes, in declaration order
    pub fn processes(&self) -> &[ProcessDescriptor] {
        &self.processes
    }

    /// Look up a process by name (`Adsorption0`, ...)
    pub fn process(&self, name: &str) -> Option<&ProcessDescriptor> {
        self.by_name.get(name).map(|&i| &self.processes[i])
    }

    /// Participating species of a process
    pub fn species_of(&self, process: &str) -> Option<&[String]> {
        self.process(process).map(|p| p.species.as_slice())
    }

    /// Rate-law parameters of a process
    pub fn energetics_of(&self, process: &str) -> Option<&[f64]> {
        self.process(process).map(|p| p.energetics.as_slice())
    }

    /// Stoichiometry of a process (generic reactions only)
    pub fn stoichiometry_of(&self, process: &str) -> Option<&[i32]> {
        self.process(process).and_then(|p| p.stoichiometry.as_deref())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
