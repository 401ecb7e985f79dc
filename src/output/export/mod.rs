//! Export module for simulation results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module:
//!
//! | Format              | Module        | Content                               |
//! |---------------------|---------------|---------------------------------------|
//! | CSV time series     | [`csv`]       | one row per sample                    |
//! | Height map          | [`heights`]   | final column heights, one row per `y` |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use kmc_rs::output::export::{CsvExporter, Exporter, HeightMapExporter};
//!
//! let result = KmcSolver::new().solve(&scenario, &config)?;
//!
//! CsvExporter::default().export(&result, None, "growth.csv")?;
//!
//! // Downsampled to 200 rows
//! CsvExporter::default().export(&result, Some(200), "growth_light.csv")?;
//!
//! HeightMapExporter::default().export(&result, None, "heights.dat")?;
//! ```

pub mod csv;
pub mod heights;

pub use csv::{CsvConfig, CsvExporter, CsvMetadata};
pub use heights::HeightMapExporter;

use std::path::Path;

use thiserror::Error;

use crate::solver::SimulationResult;

/// Errors shared by the export formats
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to write
    #[error("Simulation result contains no samples")]
    EmptyResult,

    /// A value cannot be written as a number
    #[error("Non-finite value in column '{column}' at row {row}")]
    InvalidData { column: String, row: usize },

    /// Writing failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstraction trait for all export formats.
///
/// # Parameter `n_points`
///
/// - `None`: exports every sample
/// - `Some(n)`: uniformly downsamples to `n` rows, always keeping the
///   **first and last** samples
///
/// Formats with a single snapshot (height map) ignore it.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Write `result` to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the path is invalid or the directory does not exist
    /// - `result` contains no data
    fn export<P: AsRef<Path>>(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: P,
    ) -> Result<(), Self::Error>;
}

/// Indices of `n_points` evenly spread samples out of `len`
///
/// First and last indices are always present; `None`, or a request at
/// least as large as `len`, keeps everything.
pub(crate) fn downsample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    match n_points {
        Some(n) if n >= 2 && n < len => {
            let last = len - 1;
            let mut indices: Vec<usize> = (0..n)
                .map(|i| ((i as f64) * last as f64 / (n - 1) as f64).round() as usize)
                .collect();
            indices.dedup();
            indices
        }
        Some(1) if len > 1 => vec![len - 1],
        _ => (0..len).collect(),
    }
}
