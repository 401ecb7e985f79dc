//! Simulation scenario definition
//!
//! A scenario is WHAT to simulate: the initial lattice, the bound
//! processes and the gas-phase conditions. How long to run and with which
//! seed is the business of the [`SolverConfiguration`](super::SolverConfiguration).

use std::collections::HashSet;
use std::fmt;

use crate::error::KmcError;
use crate::input::SimulationInput;
use crate::lattice::{Coordination, Lattice};
use crate::physics::Conditions;
use crate::processes::{Mode, Process};

/// Simulation scenario
///
/// # Examples
///
/// ```rust
/// use kmc_rs::input::InputReader;
/// use kmc_rs::solver::Scenario;
///
/// let input = InputReader::new().parse_str("
///     build_lattice FCC 6 6 10 Cu
///     nspecies 1
///     Cu 63.546
///     nprocesses 1
///     Cu + * -> Cu*, 1.0
///     temperature 500
/// ").unwrap();
///
/// let scenario = Scenario::from_input(&input).unwrap();
/// assert_eq!(scenario.processes.len(), 1);
/// assert_eq!(scenario.conditions.pressure, 0.0);
/// ```
pub struct Scenario {
    /// Initial lattice
    pub lattice: Lattice,

    /// Bound processes, in declaration order
    pub processes: Vec<Process>,

    /// Temperature and pressure
    pub conditions: Conditions,
}

impl Scenario {
    /// Create a scenario
    ///
    /// Coordination counting follows the processes: by height when any of
    /// them grows the film, by occupancy otherwise.
    pub fn new(mut lattice: Lattice, processes: Vec<Process>, conditions: Conditions) -> Self {
        let coordination = if processes.iter().any(|p| p.mode() == Mode::Height) {
            Coordination::Height
        } else {
            Coordination::Occupancy
        };
        lattice.set_coordination(coordination);

        Self {
            lattice,
            processes,
            conditions,
        }
    }

    /// Build everything an input description defines
    ///
    /// Processes that cannot be bound are logged and left out; the run
    /// goes on with the others.
    ///
    /// # Errors
    ///
    /// [`KmcError::Configuration`] without `build_lattice` or
    /// `temperature`; [`KmcError::Lattice`] if the lattice cannot be built.
    pub fn from_input(input: &SimulationInput) -> Result<Self, KmcError> {
        let config = input
            .lattice
            .clone()
            .ok_or_else(|| KmcError::configuration("No lattice defined (build_lattice is missing)"))?;

        let temperature = input
            .temperature
            .ok_or_else(|| KmcError::configuration("No temperature defined"))?;

        let pressure = input.pressure.unwrap_or_else(|| {
            log::warn!("No pressure defined, using 0 Pa");
            0.0
        });

        let lattice = Lattice::from_config(config)?;
        let growth = input.growth_species();
        if growth.is_empty() {
            log::info!("No growth species: every process acts on surface labels");
        } else {
            log::info!("Growth species: {}", growth.join(", "));
        }

        let mut processes = Vec::with_capacity(input.registry.processes().len());
        for descriptor in input.registry.processes() {
            match Process::bind(descriptor, &input.registry, &growth) {
                Ok(process) => processes.push(process),
                Err(e) => log::error!("{} ({} is skipped)", e, descriptor.name),
            }
        }

        if processes.is_empty() {
            log::warn!("No process could be bound; the run will stop immediately");
        }

        let scenario = Self::new(lattice, processes, Conditions::new(temperature, pressure));
        scenario.validate()?;
        Ok(scenario)
    }

    /// Verifying scenario content
    pub fn validate(&self) -> Result<(), KmcError> {
        self.conditions.validate()?;

        let mut names = HashSet::new();
        for process in &self.processes {
            process.validate()?;
            if !names.insert(process.name()) {
                return Err(KmcError::configuration(format!("Process {} is defined twice", process.name())));
            }
        }

        Ok(())
    }

    /// Process names, in declaration order
    pub fn process_names(&self) -> Vec<String> {
        self.processes.iter().map(|p| p.name().to_string()).collect()
    }

    /// Index of the process called `name`
    pub fn process_index(&self, name: &str) -> Option<usize> {
        self.processes.iter().position(|p| p.name() == name)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("lattice type", &self.lattice.lattice_type())
            .field("size", &(self.lattice.size_x(), self.lattice.size_y()))
            .field("coordination", &self.lattice.coordination())
            .field("processes", &self.process_names())
            .field("conditions", &self.conditions)
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputReader;

    const INPUT: &str = "
build_lattice SimpleCubic 4 4 10
nspecies 1
H 1.008
nprocesses 3
H + * -> H*, 1.0
H* -> H + *, 1.0 2.0 3.0
H* -> *H, 1.0
pressure 100
temperature 300
";

    #[test]
    fn test_from_input_skips_unbindable_processes() {
        let input = InputReader::new().parse_str(INPUT).unwrap();
        let scenario = Scenario::from_input(&input).unwrap();

        assert_eq!(scenario.process_names(), vec!["Adsorption0", "Diffusion2"]);
        assert_eq!(scenario.process_index("Diffusion2"), Some(1));
        assert_eq!(scenario.conditions, Conditions::new(300.0, 100.0));
    }

    #[test]
    fn test_single_species_grows_by_height() {
        let input = InputReader::new().parse_str(INPUT).unwrap();
        let scenario = Scenario::from_input(&input).unwrap();

        assert!(scenario.processes.iter().all(|p| p.mode() == Mode::Height));
        assert_eq!(scenario.lattice.coordination(), Coordination::Height);
    }

    #[test]
    fn test_adsorbate_layer_counts_occupancy() {
        let input = InputReader::new()
            .parse_str("build_lattice FCC 4 4 10 Si\nnspecies 2\nSi 28.0855\nH 1.008\nnprocesses 1\nH + * -> H*, 1.0\ntemperature 300\n")
            .unwrap();
        let scenario = Scenario::from_input(&input).unwrap();

        assert_eq!(scenario.processes[0].mode(), Mode::Label);
        assert_eq!(scenario.lattice.coordination(), Coordination::Occupancy);
    }

    #[test]
    fn test_missing_temperature_or_lattice() {
        let input = InputReader::new().parse_str("build_lattice FCC 4 4 10\n").unwrap();
        assert!(matches!(Scenario::from_input(&input), Err(KmcError::Configuration(_))));

        let input = InputReader::new().parse_str("temperature 300\n").unwrap();
        assert!(matches!(Scenario::from_input(&input), Err(KmcError::Configuration(_))));
    }

    #[test]
    fn test_indivisible_steps_are_fatal() {
        let input = InputReader::new()
            .parse_str("build_lattice SimpleCubic 5 4 10\nsteps 2 1 0\ntemperature 300\n")
            .unwrap();
        assert!(matches!(Scenario::from_input(&input), Err(KmcError::Lattice(_))));
    }
}
