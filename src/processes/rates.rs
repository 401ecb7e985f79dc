//! Rate laws
//!
//! A [`RateLaw`] gives the rate (1/s) of one process at one eligible site.
//! The total rate of a process is the sum over its eligible sites, so a
//! constant law contributes `rate × eligible sites`.
//!
//! # Laws
//!
//! | Law                  | Parameters              | Site rate                                              |
//! |----------------------|-------------------------|--------------------------------------------------------|
//! | `Constant`           | `[k]`                   | `k`                                                    |
//! | `HertzKnudsen`       | `[s0, y, Ctot]`         | `s0·y·P / (Ctot·√(2π·m·kB·T))`                         |
//! | `Arrhenius`          | `[v0, E]`               | `v0·exp(-(n+1)·E / (kB·T))`                            |
//! | `DiffusionArrhenius` | `[v0, E_ads, E_diff]`   | `v0·exp((E_ads-E_diff)/(kB·T))·exp(-(n+1)·E_ads/(kB·T))` |
//!
//! `n` is the cached number of occupied neighbours of the site, `m` the
//! particle mass of the adsorbing species. Energies are read in J/mol.

use std::fmt;

use crate::error::KmcError;
use crate::input::Category;
use crate::physics::Conditions;
use crate::physics::constants::{PI, per_particle};

/// Option keywords selecting a law explicitly
const CONSTANT: &str = "constant";
const ARRHENIUS: &str = "arrhenius";
const SIMPLE: &str = "simple";

/// Rate-law variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateLaw {
    /// Fixed rate per eligible site
    Constant { rate: f64 },

    /// Gas impingement on a site
    HertzKnudsen {
        /// Sticking coefficient
        sticking: f64,

        /// Molar fraction of the species in the gas
        fraction: f64,

        /// Site concentration (sites/m²)
        site_density: f64,

        /// Particle mass (kg)
        mass: f64,
    },

    /// Thermally activated, barrier grows with coordination
    Arrhenius {
        frequency: f64,

        /// Activation energy (J/mol)
        energy: f64,
    },

    /// Arrhenius hop with a lowered barrier
    DiffusionArrhenius {
        frequency: f64,
        adsorption_energy: f64,
        diffusion_energy: f64,
    },
}

impl RateLaw {
    /// Choose a law from the energetics of a process
    ///
    /// An option keyword (`constant`, `arrhenius`, `simple`) wins; without
    /// one the parameter count decides:
    ///
    /// | Category               | 1        | 2         | 3                    |
    /// |------------------------|----------|-----------|----------------------|
    /// | Adsorption             | constant | Arrhenius | Hertz–Knudsen        |
    /// | Desorption, Reaction   | constant | Arrhenius |                      |
    /// | Diffusion              | constant | Arrhenius | diffusion Arrhenius  |
    ///
    /// # Arguments
    ///
    /// * `name` - process name, for messages
    /// * `category` - process category
    /// * `energetics` - numeric parameters, in input order
    /// * `options` - lowercased option keywords
    /// * `mass` - particle mass of the primary species (kg)
    ///
    /// # Errors
    ///
    /// [`KmcError::Process`] if the parameters do not fit any law.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmc_rs::input::Category;
    /// use kmc_rs::processes::RateLaw;
    ///
    /// let law = RateLaw::select("Desorption1", Category::Desorption, &[1.0e13, 80000.0], &[], 1.0e-25).unwrap();
    /// assert_eq!(law, RateLaw::Arrhenius { frequency: 1.0e13, energy: 80000.0 });
    /// ```
    pub fn select(
        name: &str,
        category: Category,
        energetics: &[f64],
        options: &[String],
        mass: f64,
    ) -> Result<Self, KmcError> {
        let keyword = options
            .iter()
            .map(String::as_str)
            .find(|o| matches!(*o, CONSTANT | ARRHENIUS | SIMPLE));

        let invalid = || {
            KmcError::process(format!(
                "{}: cannot build a {} rate law from energetics {:?}",
                name,
                keyword.unwrap_or("default"),
                energetics
            ))
        };

        let law = match (keyword, category, energetics) {
            (Some(CONSTANT), _, [rate, ..]) | (None, _, [rate]) => Self::Constant { rate: *rate },

            (Some(SIMPLE), _, [sticking, fraction, site_density, ..])
            | (None, Category::Adsorption, [sticking, fraction, site_density]) => Self::HertzKnudsen {
                sticking: *sticking,
                fraction: *fraction,
                site_density: *site_density,
                mass,
            },

            (Some(ARRHENIUS) | None, Category::Diffusion, [frequency, adsorption_energy, diffusion_energy]) => {
                Self::DiffusionArrhenius {
                    frequency: *frequency,
                    adsorption_energy: *adsorption_energy,
                    diffusion_energy: *diffusion_energy,
                }
            }

            (Some(ARRHENIUS), _, [frequency, energy, ..]) | (None, _, [frequency, energy]) => Self::Arrhenius {
                frequency: *frequency,
                energy: *energy,
            },

            _ => return Err(invalid()),
        };

        law.validate().map_err(|e| KmcError::process(format!("{}: {}", name, e)))?;
        Ok(law)
    }

    /// Short name for logs and export headers
    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::HertzKnudsen { .. } => "Hertz-Knudsen",
            Self::Arrhenius { .. } => "Arrhenius",
            Self::DiffusionArrhenius { .. } => "diffusion Arrhenius",
        }
    }

    /// Parameters must be finite and non-negative, densities and masses positive
    pub fn validate(&self) -> Result<(), String> {
        let check = |label: &str, value: f64| -> Result<(), String> {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be finite and non-negative, got {}", label, value));
            }
            Ok(())
        };

        match *self {
            Self::Constant { rate } => check("rate", rate),
            Self::HertzKnudsen {
                sticking,
                fraction,
                site_density,
                mass,
            } => {
                check("sticking coefficient", sticking)?;
                check("molar fraction", fraction)?;
                if !(site_density.is_finite() && site_density > 0.0) {
                    return Err(format!("site concentration must be positive, got {}", site_density));
                }
                if !(mass.is_finite() && mass > 0.0) {
                    return Err(format!("particle mass must be positive, got {}", mass));
                }
                Ok(())
            }
            Self::Arrhenius { frequency, energy } => {
                check("frequency", frequency)?;
                check("activation energy", energy)
            }
            Self::DiffusionArrhenius {
                frequency,
                adsorption_energy,
                diffusion_energy,
            } => {
                check("frequency", frequency)?;
                check("adsorption energy", adsorption_energy)?;
                check("diffusion energy", diffusion_energy)
            }
        }
    }

    /// Rate at one eligible site
    ///
    /// # Arguments
    ///
    /// * `conditions` - temperature and pressure
    /// * `occupied_neighbours` - cached coordination of the site
    pub fn site_rate(&self, conditions: &Conditions, occupied_neighbours: usize) -> f64 {
        let kt = conditions.thermal_energy();
        let bonds = (occupied_neighbours + 1) as f64;

        match *self {
            Self::Constant { rate } => rate,

            Self::HertzKnudsen {
                sticking,
                fraction,
                site_density,
                mass,
            } => sticking * fraction * conditions.pressure / (site_density * (2.0 * PI * mass * kt).sqrt()),

            Self::Arrhenius { frequency, energy } => frequency * (-bonds * per_particle(energy) / kt).exp(),

            Self::DiffusionArrhenius {
                frequency,
                adsorption_energy,
                diffusion_energy,
            } => {
                let prefactor = frequency * (per_particle(adsorption_energy - diffusion_energy) / kt).exp();
                prefactor * (-bonds * per_particle(adsorption_energy) / kt).exp()
            }
        }
    }
}

impl fmt::Display for RateLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
