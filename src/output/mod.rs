//! Output of simulation results
//!
//! - **Properties**: surface measurements (roughness, RMS, coverage, growth rate)
//! - **Export**: CSV time series and height maps for external analysis
//! - **Visualization**: SVG plots using plotters
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs
//! ├── properties.rs       ← measurements of a lattice
//! ├── export/             ← data export
//! │   ├── mod.rs          ← Exporter trait, ExportError
//! │   ├── csv.rs
//! │   └── heights.rs
//! └── visualization/      ← plots
//!     ├── mod.rs
//!     ├── config.rs
//!     └── series.rs
//! ```
//!
//! The solver samples [`SurfaceProperties`] while it runs; exporters and
//! plots only read the finished [`SimulationResult`](crate::solver::SimulationResult).

pub mod export;
pub mod properties;
pub mod visualization;

pub use export::{CsvConfig, CsvExporter, CsvMetadata, ExportError, Exporter, HeightMapExporter};
pub use properties::SurfaceProperties;
pub use visualization::{PlotConfig, plot_mean_height, plot_rms, plot_roughness};
