//! Common utilities for integration tests

pub mod inputs;
pub mod test_helpers;

// Re-export commonly used items
pub use inputs::{ADSORBATE_LAYER, DIFFUSION_ONLY, EVAPORATION, GROWTH, growth_input};
pub use test_helpers::{heights, run, scenario_from, total_height, write_input};
