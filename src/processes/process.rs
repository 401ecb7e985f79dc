//! Process instances
//!
//! A [`Process`] binds a compiled [`ProcessDescriptor`] to exactly one
//! [`Rule`], one [`RateLaw`] and one [`Perform`]. The triple is chosen
//! once, from the category, the growth mode and the energetics options,
//! and is consistent by construction: a perform that fills `N` sites is
//! always paired with a rule that guarantees `N - 1` partners.
//!
//! # Binding table
//!
//! | Category   | Height mode                                   | Label mode                               |
//! |------------|-----------------------------------------------|------------------------------------------|
//! | Adsorption | `Unconditional` / `SameHeightNeighbours`, raise | `Vacant` / `VacantCluster`, cover       |
//! | Desorption | `Elevated` (or `AllNeighboursOccupied`), lower | `OccupiedBy`, uncover                   |
//! | Diffusion  | `CanDescend`, hop height                       | `CanHop`, hop                            |
//! | Reaction   |                                               | `Pair`, react                            |

use std::fmt;

use crate::error::KmcError;
use crate::input::reaction::SITE_MARKER;
use crate::input::{Category, ProcessDescriptor, ReactionCompiler, Registry};
use crate::input::numeric;
use crate::lattice::Lattice;
use crate::physics::Conditions;
use crate::solver::RandomSource;

use super::perform::{AffectedSites, Perform};
use super::rates::RateLaw;
use super::rules::Rule;

/// Option selecting the "all neighbours occupied" desorption rule
const ALL: &str = "all";

/// What a process changes on the lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Solid-on-solid growth: column heights change
    Height,

    /// Adsorbate layer: occupancy and labels change
    Label,
}

/// Executable process
#[derive(Debug, Clone)]
pub struct Process {
    descriptor: ProcessDescriptor,
    species: String,
    required_sites: usize,
    mode: Mode,
    rule: Rule,
    rate_law: RateLaw,
    perform: Perform,
}

impl Process {
    /// Assemble a process from its parts
    ///
    /// # Errors
    ///
    /// [`KmcError::Process`] if the rule and perform disagree on the number
    /// of sites involved.
    pub fn new(
        descriptor: ProcessDescriptor,
        species: impl Into<String>,
        mode: Mode,
        rule: Rule,
        rate_law: RateLaw,
        perform: Perform,
    ) -> Result<Self, KmcError> {
        let process = Self {
            species: species.into(),
            required_sites: perform.sites(),
            descriptor,
            mode,
            rule,
            rate_law,
            perform,
        };
        process.validate()?;
        Ok(process)
    }

    /// Bind a compiled descriptor
    ///
    /// # Arguments
    ///
    /// * `descriptor` - compiled process line
    /// * `registry` - declared species (for masses and term matching)
    /// * `growth_species` - species whose deposition raises the film
    ///
    /// # Errors
    ///
    /// [`KmcError::Process`] if no declared species takes part, the
    /// energetics fit no rate law, or the descriptor is inconsistent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmc_rs::input::{Registry, ReactionCompiler};
    /// use kmc_rs::processes::{Mode, Process, Rule};
    ///
    /// let mut registry = Registry::new();
    /// registry.add_species("Cu", 63.546).unwrap();
    /// let descriptor = ReactionCompiler::new(&registry).compile("Cu + * -> Cu*, 1.0", 0).unwrap();
    ///
    /// let process = Process::bind(&descriptor, &registry, &["Cu".to_string()]).unwrap();
    /// assert_eq!(process.mode(), Mode::Height);
    /// assert_eq!(process.rule(), &Rule::Unconditional);
    /// ```
    pub fn bind(
        descriptor: &ProcessDescriptor,
        registry: &Registry,
        growth_species: &[String],
    ) -> Result<Self, KmcError> {
        descriptor.validate().map_err(KmcError::process)?;

        let compiler = ReactionCompiler::new(registry);
        let species = primary_species(&compiler, descriptor).ok_or_else(|| {
            KmcError::process(format!(
                "{}: no declared species in '{}'",
                descriptor.name, descriptor.reaction
            ))
        })?;

        let mass = registry.species(species).map(|s| s.particle_mass()).unwrap_or(0.0);
        let rate_law = RateLaw::select(
            &descriptor.name,
            descriptor.category,
            &descriptor.energetics,
            &descriptor.options,
            mass,
        )?;

        let grows = growth_species.iter().any(|g| g == species);
        let mode = match descriptor.category {
            Category::Reaction => Mode::Label,
            _ if grows => Mode::Height,
            _ => Mode::Label,
        };

        let sites = match descriptor.category {
            Category::Adsorption => site_count(&descriptor.reactants),
            Category::Desorption => site_count(&descriptor.products),
            _ => 1,
        };
        let extra = sites - 1;
        let owned = species.to_string();

        let (rule, perform) = match (descriptor.category, mode) {
            (Category::Adsorption, Mode::Height) => {
                let rule = if extra == 0 {
                    Rule::Unconditional
                } else {
                    Rule::SameHeightNeighbours { required: extra }
                };
                (rule, Perform::RaiseHeight { sites })
            }

            // The site is labelled with the adsorbing reactant: `A + * -> B*`
            // covers it with `A`, the product `B` is not tracked
            (Category::Adsorption, Mode::Label) => {
                let rule = if extra == 0 {
                    Rule::Vacant
                } else {
                    Rule::VacantCluster { required: extra }
                };
                (rule, Perform::Cover { species: owned, sites })
            }

            (Category::Desorption, Mode::Height) => {
                let rule = if descriptor.has_option(ALL) {
                    Rule::AllNeighboursOccupied
                } else {
                    Rule::Elevated { required: extra }
                };
                (rule, Perform::LowerHeight { sites })
            }

            (Category::Desorption, Mode::Label) => (
                Rule::OccupiedBy {
                    species: owned.clone(),
                    required: extra,
                },
                Perform::Uncover { species: owned, sites },
            ),

            (Category::Diffusion, Mode::Height) => (Rule::CanDescend, Perform::HopHeight),

            (Category::Diffusion, Mode::Label) => (Rule::CanHop { species: owned.clone() }, Perform::Hop { species: owned }),

            (Category::Reaction, _) => reaction_strategies(&compiler, descriptor, growth_species),
        };

        log::debug!(
            "{}: species {} mode {:?}, rule '{}', rate '{}', perform '{}' on {} site(s)",
            descriptor.name,
            species,
            mode,
            rule.name(),
            rate_law,
            perform.name(),
            perform.sites()
        );

        Self::new(descriptor.clone(), species, mode, rule, rate_law, perform)
    }

    /// Rule and perform must agree on the sites an event touches
    pub fn validate(&self) -> Result<(), KmcError> {
        let consistent = match (&self.rule, &self.perform) {
            (Rule::AllNeighboursOccupied, Perform::LowerHeight { sites }) => *sites == 1,
            (_, Perform::RaiseHeight { sites })
            | (_, Perform::LowerHeight { sites })
            | (_, Perform::Cover { sites, .. })
            | (_, Perform::Uncover { sites, .. }) => *sites >= 1 && self.rule.extra_sites() == *sites - 1,
            _ => true,
        };

        if !consistent {
            return Err(KmcError::process(format!(
                "{}: rule '{}' does not guarantee the {} site(s) perform '{}' needs",
                self.name(),
                self.rule.name(),
                self.perform.sites(),
                self.perform.name()
            )));
        }

        self.rate_law
            .validate()
            .map_err(|e| KmcError::process(format!("{}: {}", self.name(), e)))
    }

    // ====== Accessors ======

    /// Synthesized name, e.g. `Adsorption0`
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn category(&self) -> Category {
        self.descriptor.category
    }

    pub fn descriptor(&self) -> &ProcessDescriptor {
        &self.descriptor
    }

    /// Species the process acts on
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Sites touched by one event
    pub fn required_sites(&self) -> usize {
        self.required_sites
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn rate_law(&self) -> &RateLaw {
        &self.rate_law
    }

    pub fn perform_strategy(&self) -> &Perform {
        &self.perform
    }

    /// Net change of the film height per event, in columns
    pub fn height_change(&self) -> i64 {
        match &self.perform {
            Perform::RaiseHeight { sites } => *sites as i64,
            Perform::LowerHeight { sites } => -(*sites as i64),
            Perform::React { grows: true, .. } => 1,
            _ => 0,
        }
    }

    // ====== Strategy calls ======

    /// Rule: may the process fire at `id`?
    pub fn is_eligible(&self, lattice: &Lattice, id: usize) -> bool {
        self.rule.is_eligible(lattice, id)
    }

    /// Type: rate at `id` under `conditions`
    pub fn rate(&self, lattice: &Lattice, id: usize, conditions: &Conditions) -> f64 {
        let neighbours = lattice.get_site(id).map(|s| s.occupied_neighbours()).unwrap_or(0);
        self.rate_law.site_rate(conditions, neighbours)
    }

    /// Perform: apply one event at `id`
    pub fn perform(
        &self,
        lattice: &mut Lattice,
        id: usize,
        random: &mut RandomSource,
    ) -> Result<AffectedSites, KmcError> {
        self.perform.execute(lattice, id, random)
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.descriptor.reaction)
    }
}

// =================================================================================================
// Binding helpers
// =================================================================================================

/// Species named by the terms a process consumes (or, for desorption, releases)
fn primary_species<'a>(compiler: &ReactionCompiler<'a>, descriptor: &ProcessDescriptor) -> Option<&'a str> {
    let terms = match descriptor.category {
        Category::Desorption => &descriptor.products,
        _ => &descriptor.reactants,
    };

    terms
        .iter()
        .filter(|t| t.as_str() != SITE_MARKER)
        .find_map(|t| compiler.longest_species_match(t))
}

/// Sites named on one side: bare markers count once, `2*` twice
fn site_count(terms: &[String]) -> usize {
    let count: usize = terms
        .iter()
        .filter_map(|term| term.strip_suffix(SITE_MARKER))
        .filter_map(|prefix| {
            let prefix = prefix.trim();
            if prefix.is_empty() {
                Some(1)
            } else {
                numeric::parse_integer(prefix).and_then(|n| usize::try_from(n).ok())
            }
        })
        .sum();

    count.max(1)
}

/// Rule and perform of a generic reaction
fn reaction_strategies(
    compiler: &ReactionCompiler<'_>,
    descriptor: &ProcessDescriptor,
    growth_species: &[String],
) -> (Rule, Perform) {
    let reactants: Vec<String> = descriptor
        .reactants
        .iter()
        .filter(|t| t.as_str() != SITE_MARKER)
        .filter_map(|t| compiler.longest_species_match(t))
        .map(str::to_string)
        .collect();

    let first = reactants.first().cloned().unwrap_or_default();
    let second = reactants.get(1).cloned();

    let product = descriptor
        .products
        .iter()
        .filter(|t| t.as_str() != SITE_MARKER && t.contains(SITE_MARKER))
        .find_map(|t| compiler.longest_species_match(t))
        .map(str::to_string);

    let grows = descriptor
        .products
        .iter()
        .filter_map(|t| compiler.longest_species_match(t))
        .any(|s| growth_species.iter().any(|g| g == s));

    (
        Rule::Pair {
            first,
            second: second.clone(),
        },
        Perform::React {
            partner: second,
            product,
            grows,
        },
    )
}
