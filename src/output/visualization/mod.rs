//! Visualization of simulation results
//!
//! SVG plots of the sampled trajectory, drawn with `plotters`.
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **series**: Surface statistics versus simulated time
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use kmc_rs::output::visualization::{plot_mean_height, plot_roughness, PlotConfig};
//!
//! let result = solver.solve(&scenario, &config)?;
//!
//! plot_roughness(&result, "roughness.svg", None)?;
//!
//! let mut config = PlotConfig::mean_height("Cu growth at 500 K");
//! config.line_width = 3;
//! plot_mean_height(&result, "height.svg", Some(&config))?;
//! ```

pub mod config;
pub mod series;

pub use config::PlotConfig;
pub use series::{plot_mean_height, plot_rms, plot_roughness, plot_series};
