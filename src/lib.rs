//! kmc-rs: Kinetic Monte Carlo Simulation of Surface Growth
//!
//! Adsorption, desorption, diffusion and surface reactions on a periodic
//! crystal surface, scheduled with the BKL (n-fold way) algorithm.
//!
//! # Architecture
//!
//! kmc-rs is built on two core principles:
//!
//! 1. **Separation of description and execution**
//!    - The input DSL is compiled into process descriptors (what can happen)
//!    - Strategies bound to the lattice decide where, how fast and with
//!      which effect each process fires
//!    - The solver only schedules events (when it happens)
//!
//! 2. **Strategies as data**
//!    - Eligibility rules, rate laws and performs are enums, so a process is
//!      a plain value that can be inspected, cloned and tested in isolation
//!
//! Data flow:
//!
//! ```text
//! text ─► lexer ─► reaction compiler ─► registry ─► processes ─► KmcSolver ─► SimulationResult
//!                                                       │              │
//!                                                       └── lattice ◄──┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use kmc_rs::prelude::*;
//!
//! # fn main() -> Result<(), KmcError> {
//! // 1. Read the description
//! let input = InputReader::new().parse_str("
//!     build_lattice SimpleCubic 8 8 10
//!     nspecies 1
//!     Cu 63.546
//!     nprocesses 2
//!     Cu + * -> Cu*, 10.0
//!     Cu* -> *Cu, 1.0e12 80000
//!     temperature 600
//!     pressure 0
//! ")?;
//!
//! // 2. Bind processes to the lattice
//! let scenario = Scenario::from_input(&input)?;
//!
//! // 3. Run 500 events
//! let config = SolverConfiguration::steps(500).with_seed(42);
//! let result = KmcSolver::new().solve(&scenario, &config)?;
//!
//! // 4. Access results
//! assert_eq!(result.steps, 500);
//! println!("Roughness: {}", result.last_sample().unwrap().surface.roughness);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`input`]: DSL lexer, reaction compiler, species/process registry, input reader
//! - [`lattice`]: sites, geometries and the neighbour graph
//! - [`physics`]: constants and gas-phase conditions
//! - [`processes`]: eligibility rules, rate laws, performs and bound processes
//! - [`solver`]: BKL scheduler, random source, run configuration and results
//! - [`output`]: surface properties, CSV/height-map export, SVG plots
//! - [`error`]: the crate-wide [`KmcError`](error::KmcError)

pub mod error;
pub mod input;
pub mod lattice;
pub mod output;
pub mod physics;
pub mod processes;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use kmc_rs::prelude::*;
    //! ```
    pub use crate::error::KmcError;
    pub use crate::input::{InputReader, SimulationInput};
    pub use crate::lattice::{Lattice, LatticeType};
    pub use crate::output::{CsvExporter, Exporter, HeightMapExporter, SurfaceProperties};
    pub use crate::physics::Conditions;
    pub use crate::processes::{Process, RateLaw};
    pub use crate::solver::{KmcSolver, Scenario, SimulationResult, Solver, SolverConfiguration, StopReason};
}
