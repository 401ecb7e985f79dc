//! Process strategy objects
//!
//! Every declared process becomes a [`Process`] made of three
//! independently swappable behaviours:
//!
//! - **Rule** ([`Rule`]): may the process fire at this site? Read-only.
//! - **Type** ([`RateLaw`]): how fast, given temperature, pressure and the
//!   site's coordination? Read-only.
//! - **Perform** ([`Perform`]): mutate the lattice and report the
//!   [`AffectedSites`].
//!
//! All three are closed enums, so adding a category means extending the
//! `match` arms the compiler points at.
//!
//! # Example
//!
//! ```rust
//! use kmc_rs::input::InputReader;
//! use kmc_rs::processes::{Mode, Process};
//!
//! let input = InputReader::new().parse_str("
//!     build_lattice SimpleCubic 4 4 10 Cu
//!     nspecies 1
//!     Cu 63.546
//!     nprocesses 1
//!     Cu + * -> Cu*, 1.0
//! ").unwrap();
//!
//! let growth = input.growth_species();
//! let processes: Vec<Process> = input
//!     .registry
//!     .processes()
//!     .iter()
//!     .map(|d| Process::bind(d, &input.registry, &growth))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(processes[0].mode(), Mode::Height);
//! ```

pub mod perform;
pub mod process;
pub mod rates;
pub mod rules;

pub use perform::{AffectedSites, Perform};
pub use process::{Mode, Process};
pub use rates::RateLaw;
pub use rules::Rule;
