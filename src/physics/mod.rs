//! Physical parameters
//!
//! Constants and operating conditions consumed by the rate laws. This
//! module holds data only; the rate laws themselves live with the
//! processes (see [`crate::processes::rates`]).
//!
//! - **`constants`**: SI constants (Boltzmann, Avogadro, gas constant, π)
//! - **`conditions`**: temperature and pressure of a run

pub mod constants;
pub mod conditions;

pub use conditions::Conditions;
