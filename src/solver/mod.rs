//! Event scheduling
//!
//! # Core Concepts
//!
//! The solver separates concerns into three layers, the same way for every
//! run:
//!
//! 1. **Scenario** (`Scenario`) - WHAT to simulate
//!    - Initial lattice
//!    - Bound processes (rule, rate law, perform)
//!    - Temperature and pressure
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW LONG and HOW
//!    - Run limit (end time, event budget, or both)
//!    - Random seed
//!    - Sampling interval
//!
//! 3. **Solver** (`Solver` trait) - The scheduling method
//!    - `KmcSolver`: sequential BKL selection
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver`, `RunLimit`, `SolverConfiguration`,
//!   `SimulationResult`, `Sample`, `StopReason`
//! - **`scenario`**: `Scenario` and its construction from an input file
//! - **`random`**: `RandomSource`, the seedable generator of a run
//! - **`kmc`**: `KmcSolver`, `EventTable` and `select_event`
//!
//! # Quick Start Example
//!
//! ```rust
//! use kmc_rs::input::InputReader;
//! use kmc_rs::solver::{KmcSolver, Scenario, Solver, SolverConfiguration};
//!
//! let input = InputReader::new().parse_str("
//!     build_lattice FCC 10 10 20 Cu
//!     nspecies 1
//!     Cu 63.546
//!     nprocesses 2
//!     Cu + * -> Cu*, 100.0
//!     Cu* -> Cu + *, 1.0e13 150000
//!     temperature 500
//!     time 0.1
//! ").unwrap();
//!
//! // 1. Scenario (WHAT to simulate)
//! let scenario = Scenario::from_input(&input).unwrap();
//!
//! // 2. Configuration (HOW LONG)
//! let config = SolverConfiguration::time_evolution(input.end_time.unwrap()).with_seed(7);
//!
//! // 3. Run
//! let result = KmcSolver::new().solve(&scenario, &config).unwrap();
//! println!("{} events, stopped: {}", result.steps, result.stop_reason);
//! ```
//!
//! # Error Handling
//!
//! All solver methods return `Result<T, KmcError>`. A run that cannot
//! progress (nothing eligible, zero total rate) is not an error: it ends
//! with a [`StopReason`] and the result is returned as usual.

// =================================================================================================
// Module Declarations
// =================================================================================================

mod kmc;
mod random;
mod scenario;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use kmc::{EventTable, KmcSolver, select_event};
pub use random::RandomSource;
pub use scenario::Scenario;
pub use traits::{RunLimit, Sample, SimulationResult, Solver, SolverConfiguration, StopReason};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::KmcError;

/// Validate the total rate of a step
///
/// A NaN or infinite total means a rate law left its domain (overflowing
/// prefactor, non-physical parameters); the run cannot continue.
///
/// # Arguments
///
/// * `total` - summed rate of all live events
/// * `step` - current step (for error reporting)
pub(crate) fn validate_total_rate(total: f64, step: usize) -> Result<(), KmcError> {
    if total.is_nan() {
        return Err(KmcError::numerical(format!(
            "NaN total rate at step {}. Check the energetics of the processes.",
            step
        )));
    }

    if total.is_infinite() {
        return Err(KmcError::numerical(format!(
            "Infinite total rate at step {}. A rate law overflowed.",
            step
        )));
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
