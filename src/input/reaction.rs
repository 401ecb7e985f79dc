//! Process descriptor compiler
//!
//! Compiles one process line of the input,
//!
//! ```text
//! <reactants> -> <products>, <energetics...>
//! ```
//!
//! into a typed [`ProcessDescriptor`].
//!
//! # Pipeline
//!
//! 1. Split the notation on `->` and each side on `+`.
//! 2. Classify the process by structure, first match wins:
//!    - **Adsorption**: more than one reactant term, one of them the site marker
//!    - **Desorption**: more than one product term, one of them the site marker
//!    - **Diffusion**: one reactant and one product, both containing the marker
//!    - **Reaction**: anything else
//! 3. Collect the declared species occurring (as substrings) in any term,
//!    in registry order, without duplicates.
//! 4. For generic reactions, extract stoichiometry: the longest species
//!    symbol found in a term is erased and the remainder is the coefficient.
//! 5. Read the energetics field; non-numeric tokens are kept aside as
//!    options (`arrhenius`, `constant`, `simple`, `all`).
//!
//! # Ambiguity
//!
//! When two species of the same length both occur in a term, the
//! lexically first one is used. Overlapping symbols (`H` and `H2` in
//! `H2*`) are therefore resolved deterministically but not necessarily
//! the way the author of the input meant.

use std::fmt;

use super::error::ParseError;
use super::lexer;
use super::numeric;
use super::registry::Registry;

/// Token denoting an empty lattice site
pub const SITE_MARKER: &str = "*";

/// Token separating reactants from products
pub const ARROW: &str = "->";

// =================================================================================================
// Process categories
// =================================================================================================

/// Category of an elementary surface process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Adsorption,
    Desorption,
    Diffusion,
    Reaction,
}

impl Category {
    /// Name used as prefix of process names
    pub fn name(&self) -> &'static str {
        match self {
            Category::Adsorption => "Adsorption",
            Category::Desorption => "Desorption",
            Category::Diffusion => "Diffusion",
            Category::Reaction => "Reaction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Process descriptor
// =================================================================================================

/// Compiled, read-only description of one declared process
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessDescriptor {
    /// `<Category><ordinal>`, e.g. `Adsorption0`
    pub name: String,

    /// Structural category
    pub category: Category,

    /// Reaction notation as written (simplified)
    pub reaction: String,

    /// Reactant terms
    pub reactants: Vec<String>,

    /// Product terms
    pub products: Vec<String>,

    /// Participating species, registry order, no duplicates
    pub species: Vec<String>,

    /// Numeric rate-law parameters, in input order
    pub energetics: Vec<f64>,

    /// Non-numeric energetics tokens, lowercased
    pub options: Vec<String>,

    /// Net coefficient per participating species (generic reactions only)
    pub stoichiometry: Option<Vec<i32>>,
}

impl ProcessDescriptor {
    /// Whether `option` was given in the energetics field
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(stoichiometry) = &self.stoichiometry {
            if stoichiometry.len() != self.species.len() {
                return Err(format!(
                    "{}: {} stoichiometric coefficients for {} species",
                    self.name,
                    stoichiometry.len(),
                    self.species.len()
                ));
            }
        }

        if self.energetics.iter().any(|e| !e.is_finite()) {
            return Err(format!("{}: energetics must be finite", self.name));
        }

        Ok(())
    }
}

// =================================================================================================
// Compiler
// =================================================================================================

/// Compiles reaction notation against a species registry
#[derive(Debug, Clone)]
pub struct ReactionCompiler<'a> {
    registry: &'a Registry,
    site_marker: String,
}

impl<'a> ReactionCompiler<'a> {
    /// Create a compiler using the default site marker `*`
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            site_marker: SITE_MARKER.to_string(),
        }
    }

    /// Use another token as site marker
    pub fn with_site_marker(mut self, marker: impl Into<String>) -> Self {
        self.site_marker = marker.into();
        self
    }

    /// The site marker in use
    pub fn site_marker(&self) -> &str {
        &self.site_marker
    }

    /// Compile one process line
    ///
    /// # Arguments
    ///
    /// * `line` - `<reaction-notation>, <energetics>`
    /// * `ordinal` - position of the line in its `nprocesses` block
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingArrow`], [`ParseError::EmptySide`] or
    /// [`ParseError::MissingEnergetics`]; all of them are recoverable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmc_rs::input::{Registry, ReactionCompiler, Category};
    ///
    /// let mut registry = Registry::new();
    /// registry.add_species("A", 12.0).unwrap();
    ///
    /// let compiler = ReactionCompiler::new(&registry);
    /// let process = compiler.compile("A + * -> A*, 1.0e13 71128", 0).unwrap();
    ///
    /// assert_eq!(process.name, "Adsorption0");
    /// assert_eq!(process.category, Category::Adsorption);
    /// assert_eq!(process.species, vec!["A"]);
    /// assert_eq!(process.energetics, vec![1.0e13, 71128.0]);
    /// ```
    pub fn compile(&self, line: &str, ordinal: usize) -> Result<ProcessDescriptor, ParseError> {
        let mut fields = line.splitn(2, ',');
        let notation = lexer::simplified(fields.next().unwrap_or(""));

        let (reactants, products) = self.split_reaction(&notation)?;

        let energetics_field = fields.next().map(lexer::simplified).unwrap_or_default();
        if energetics_field.is_empty() {
            return Err(ParseError::MissingEnergetics(notation));
        }

        let category = self.classify(&reactants, &products);
        let species = self.participating_species(&reactants, &products);
        let name = format!("{}{}", category.name(), ordinal);

        let stoichiometry = match category {
            Category::Reaction => Some(self.stoichiometry(&name, &reactants, &products, &species)),
            _ => None,
        };

        // Commas inside the energetics field only separate tokens
        let (energetics, options) = parse_energetics(&energetics_field.replace(',', " "));

        log::debug!(
            "{}: '{}' species {:?} energetics {:?}",
            name,
            notation,
            species,
            energetics
        );

        Ok(ProcessDescriptor {
            name,
            category,
            reaction: notation,
            reactants,
            products,
            species,
            energetics,
            options,
            stoichiometry,
        })
    }

    /// Split notation into reactant and product terms
    pub fn split_reaction(&self, notation: &str) -> Result<(Vec<String>, Vec<String>), ParseError> {
        let (left, right) = notation
            .split_once(ARROW)
            .ok_or_else(|| ParseError::MissingArrow(notation.to_string()))?;

        let reactants = lexer::split(left, "+");
        let products = lexer::split(right, "+");

        if reactants.is_empty() || products.is_empty() {
            return Err(ParseError::EmptySide(notation.to_string()));
        }

        Ok((reactants, products))
    }

    /// Structural classification, in priority order
    pub fn classify(&self, reactants: &[String], products: &[String]) -> Category {
        let marker = self.site_marker.as_str();
        let is_site = |term: &String| term == marker;

        if reactants.len() > 1 && reactants.iter().any(is_site) {
            Category::Adsorption
        } else if products.len() > 1 && products.iter().any(is_site) {
            Category::Desorption
        } else if reactants.len() == 1
            && products.len() == 1
            && reactants[0].contains(marker)
            && products[0].contains(marker)
        {
            Category::Diffusion
        } else {
            Category::Reaction
        }
    }

    /// Declared species occurring in any term
    pub fn participating_species(&self, reactants: &[String], products: &[String]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();

        for symbol in self.registry.species_symbols() {
            let occurs = reactants
                .iter()
                .chain(products.iter())
                .any(|term| term.contains(symbol));

            if occurs && !found.iter().any(|s| s == symbol) {
                found.push(symbol.to_string());
            }
        }

        found
    }

    /// Longest declared symbol contained in `term`
    ///
    /// Ties go to the lexically first symbol.
    pub fn longest_species_match(&self, term: &str) -> Option<&'a str> {
        let mut best: Option<&'a str> = None;

        for symbol in self.registry.species_symbols() {
            if !term.contains(symbol) {
                continue;
            }
            match best {
                Some(current) if current.len() >= symbol.len() => {}
                _ => best = Some(symbol),
            }
        }

        best
    }

    /// Erase every occurrence of the longest matching species from `term`
    ///
    /// Returns the erased symbol (if any) and the remainder. Applying this
    /// to its own remainder changes nothing once no declared species is
    /// left in it.
    pub fn erase_longest_match(&self, term: &str) -> (Option<&'a str>, String) {
        match self.longest_species_match(term) {
            Some(symbol) => (Some(symbol), term.replace(symbol, "")),
            None => (None, term.to_string()),
        }
    }

    /// Coefficient of the species in one term
    ///
    /// The remainder left after erasing the species (and the site marker)
    /// is the coefficient: empty means 1, a number is taken as is, anything
    /// else yields 0 with a warning.
    pub fn term_coefficient(&self, term: &str) -> Option<(&'a str, i32)> {
        let (symbol, remainder) = self.erase_longest_match(term);
        let symbol = symbol?;

        let remainder = lexer::simplified(&remainder.replace(self.site_marker.as_str(), ""));

        let coefficient = if remainder.is_empty() {
            1
        } else {
            match numeric::parse_number(&remainder) {
                Some(value) if value.fract() == 0.0 && value.abs() <= i32::MAX as f64 => {
                    value as i32
                }
                _ => {
                    log::warn!(
                        "Stoichiometric coefficient '{}' of {} in '{}' is not an integer, using 0",
                        remainder,
                        symbol,
                        term
                    );
                    0
                }
            }
        };

        Some((symbol, coefficient))
    }

    /// Net coefficient (products minus reactants) per participating species
    fn stoichiometry(
        &self,
        name: &str,
        reactants: &[String],
        products: &[String],
        species: &[String],
    ) -> Vec<i32> {
        let mut coefficients = vec![0; species.len()];

        let sides = [(reactants, -1), (products, 1)];
        for (terms, sign) in sides {
            for term in terms {
                let Some((symbol, coefficient)) = self.term_coefficient(term) else {
                    continue;
                };
                match species.iter().position(|s| s == symbol) {
                    Some(i) => coefficients[i] += sign * coefficient,
                    None => log::warn!("{}: species {} of term '{}' not tracked", name, symbol, term),
                }
            }
        }

        coefficients
    }
}

/// Split an energetics field into numeric parameters and option keywords
///
/// # Example
///
/// ```rust
/// use kmc_rs::input::reaction::parse_energetics;
///
/// let (values, options) = parse_energetics("arrhenius 1.0e13 xyz 71128");
/// assert_eq!(values, vec![1.0e13, 71128.0]);
/// assert_eq!(options, vec!["arrhenius", "xyz"]);
/// ```
pub fn parse_energetics(field: &str) -> (Vec<f64>, Vec<String>) {
    let mut values = Vec::new();
    let mut options = Vec::new();

    for token in field.split_whitespace() {
        match numeric::parse_number(token) {
            Some(value) => values.push(value),
            None => options.push(token.to_lowercase()),
        }
    }

    (values, options)
}

// =================================================================================================
// Tests
// =================================================================================================
