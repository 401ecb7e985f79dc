//! Helper functions for integration tests

use std::fs;
use std::path::{Path, PathBuf};

use kmc_rs::input::InputReader;
use kmc_rs::lattice::Lattice;
use kmc_rs::solver::{KmcSolver, Scenario, SimulationResult, Solver, SolverConfiguration};

/// Compile `source` and bind its processes
pub fn scenario_from(source: &str) -> Scenario {
    let input = InputReader::new().parse_str(source).unwrap();
    Scenario::from_input(&input).unwrap()
}

/// Run `max_steps` events of `source` with a fixed seed
pub fn run(source: &str, max_steps: usize, seed: u64) -> SimulationResult {
    let scenario = scenario_from(source);
    let config = SolverConfiguration::steps(max_steps).with_seed(seed);
    KmcSolver::new().solve(&scenario, &config).unwrap()
}

/// Write `source` as `name` in `dir`
pub fn write_input(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

/// Column heights in site order
pub fn heights(lattice: &Lattice) -> Vec<i32> {
    lattice.sites().iter().map(|s| s.height()).collect()
}

/// Sum of all column heights
pub fn total_height(lattice: &Lattice) -> i64 {
    lattice.sites().iter().map(|s| s.height() as i64).sum()
}
