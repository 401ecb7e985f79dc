//! Input description compiler
//!
//! Turns the line-oriented input text into typed data:
//!
//! - [`numeric`]: scientific-notation recognition (`1.0e13`, `3.4D-5`)
//! - [`lexer`]: comment stripping, whitespace normalisation, tokenising
//! - [`registry`]: declared species and compiled processes
//! - [`reaction`]: reaction notation to [`ProcessDescriptor`]
//! - [`reader`]: keyword dispatch producing a [`SimulationInput`]
//!
//! # Example
//!
//! ```rust
//! use kmc_rs::input::{Category, InputReader};
//!
//! let input = InputReader::new().parse_str("
//!     nspecies 1
//!     H 1.008
//!     nprocesses 2
//!     H + * -> H*, 1.0e3     # adsorption
//!     H* -> H + *, 5.0e2     # desorption
//! ").unwrap();
//!
//! let categories: Vec<Category> = input.registry.processes().iter().map(|p| p.category).collect();
//! assert_eq!(categories, vec![Category::Adsorption, Category::Desorption]);
//! ```

pub mod error;
pub mod lexer;
pub mod numeric;
pub mod reaction;
pub mod reader;
pub mod registry;

pub use error::ParseError;
pub use reaction::{Category, ProcessDescriptor, ReactionCompiler};
pub use reader::{InputReader, SimulationInput};
pub use registry::{Registry, Species};
