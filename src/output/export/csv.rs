//! CSV export of the sampled trajectory
//!
//! One row per [`Sample`], compatible with spreadsheets, pandas and most
//! data analysis tools.
//!
//! # Columns
//!
//! | Column                   | Content                                  |
//! |--------------------------|------------------------------------------|
//! | `Time (s)`               | simulated time                           |
//! | `Step`                   | events executed so far                   |
//! | `Growth rate (ML/s)`     | net monolayers per second since start    |
//! | `RMS`                    | standard deviation of the heights        |
//! | `Roughness`              | bond-counting roughness                  |
//! | `Events <process>`       | cumulative events, one column per process |
//! | `Coverage <process>`     | label fraction, one column per process   |
//!
//! # Example
//!
//! ```rust,ignore
//! use kmc_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
//!
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_result(&result));
//! CsvExporter::new(config).export(&result, None, "growth.csv")?;
//! ```
//!
//! **Output** (`growth.csv`):
//! ```csv
//! # Kinetic Monte Carlo Simulation Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Lattice: FCC 10x10 (Cu)
//! # Solver: BKL kinetic Monte Carlo
//! # Seed: 42
//! # Final Time: 0.1 s
//! # Steps: 5123
//! #
//! Time (s),Step,Growth rate (ML/s),RMS,Roughness,Events Adsorption0,Coverage Adsorption0
//! 0.000000,0,0.000000,0.000000,1.000000,0,0.000000
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::solver::{Sample, SimulationResult};

use super::{ExportError, Exporter, downsample_indices};

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use kmc_rs::output::export::CsvConfig;
///
/// let config = CsvConfig::european().precision(10);
/// assert_eq!(config.delimiter, ';');
/// assert_eq!(config.decimal_separator, ',');
/// assert_eq!(config.precision, 10);
/// ```
#[derive(Clone, Debug)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// High precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only the fields that are set end up in the header.
#[derive(Clone, Debug, Default)]
pub struct CsvMetadata {
    /// Lattice description, e.g. "FCC 10x10 (Cu)"
    pub lattice: Option<String>,

    pub solver_name: Option<String>,

    pub seed: Option<u64>,

    /// Final simulated time (s)
    pub final_time: Option<f64>,

    /// Events executed
    pub steps: Option<usize>,

    /// Why the run ended
    pub stop_reason: Option<String>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Collect what a result knows about its run
    ///
    /// Temperature and pressure, when the solver recorded them, are added
    /// as custom entries.
    pub fn from_result(result: &SimulationResult) -> Self {
        let lattice = &result.lattice;
        let mut description = format!("{} {}x{}", lattice.lattice_type(), lattice.size_x(), lattice.size_y());
        if !lattice.label().is_empty() {
            description.push_str(&format!(" ({})", lattice.label()));
        }

        let mut metadata = Self {
            lattice: Some(description),
            solver_name: result.metadata.get("solver").cloned(),
            seed: Some(result.seed),
            final_time: Some(result.time),
            steps: Some(result.steps),
            stop_reason: Some(result.stop_reason.to_string()),
            custom: Vec::new(),
        };

        if let Some(t) = result.metadata.get("temperature") {
            metadata.add_custom("Temperature (K)".to_string(), t.clone());
        }
        if let Some(p) = result.metadata.get("pressure") {
            metadata.add_custom("Pressure (Pa)".to_string(), p.clone());
        }
        metadata
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header<W: Write>(writer: &mut W, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(writer, "# Kinetic Monte Carlo Simulation Data")?;

    let now = chrono::Utc::now();
    writeln!(writer, "# Generated: {}", now.to_rfc3339())?;

    if let Some(lattice) = &metadata.lattice {
        writeln!(writer, "# Lattice: {}", lattice)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(writer, "# Solver: {}", solver)?;
    }
    if let Some(seed) = metadata.seed {
        writeln!(writer, "# Seed: {}", seed)?;
    }
    if let Some(time) = metadata.final_time {
        writeln!(writer, "# Final Time: {} s", time)?;
    }
    if let Some(steps) = metadata.steps {
        writeln!(writer, "# Steps: {}", steps)?;
    }
    if let Some(reason) = &metadata.stop_reason {
        writeln!(writer, "# Stopped: {}", reason)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(writer, "# {}: {}", key, value)?;
    }

    writeln!(writer, "#")?;
    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

/// Reject samples holding NaN or infinite values
fn validate_samples(samples: &[Sample]) -> Result<(), ExportError> {
    for (row, sample) in samples.iter().enumerate() {
        let scalars = [
            ("Time (s)", sample.time),
            ("Growth rate (ML/s)", sample.growth_rate),
            ("RMS", sample.surface.rms),
            ("Roughness", sample.surface.roughness),
        ];
        for (column, value) in scalars {
            if !value.is_finite() {
                return Err(ExportError::InvalidData {
                    column: column.to_string(),
                    row,
                });
            }
        }
        if sample.coverage.iter().any(|c| !c.is_finite()) {
            return Err(ExportError::InvalidData {
                column: "Coverage".to_string(),
                row,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Exporter
// =============================================================================

/// Time-series CSV exporter
#[derive(Clone, Debug, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Write the CSV table of `result` to any writer
    ///
    /// # Errors
    ///
    /// - [`ExportError::EmptyResult`] without samples
    /// - [`ExportError::InvalidData`] on NaN or infinite values
    /// - [`ExportError::Io`] if writing fails
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        result: &SimulationResult,
        n_points: Option<usize>,
    ) -> Result<(), ExportError> {
        // ============================= Validation =============================

        if result.samples.is_empty() {
            return Err(ExportError::EmptyResult);
        }
        validate_samples(&result.samples)?;

        // ============================= Header =============================

        let config = &self.config;
        if config.include_metadata {
            if let Some(metadata) = &config.metadata {
                write_metadata_header(writer, metadata)?;
            }
        }

        let mut columns = vec![
            "Time (s)".to_string(),
            "Step".to_string(),
            "Growth rate (ML/s)".to_string(),
            "RMS".to_string(),
            "Roughness".to_string(),
        ];
        columns.extend(result.process_names.iter().map(|n| format!("Events {}", n)));
        columns.extend(result.process_names.iter().map(|n| format!("Coverage {}", n)));

        let delimiter = config.delimiter.to_string();
        writeln!(writer, "{}", columns.join(&delimiter))?;

        // ============================= Rows =============================

        for index in downsample_indices(result.samples.len(), n_points) {
            let sample = &result.samples[index];
            let mut row = vec![
                format_number(sample.time, config),
                sample.step.to_string(),
                format_number(sample.growth_rate, config),
                format_number(sample.surface.rms, config),
                format_number(sample.surface.roughness, config),
            ];
            row.extend(sample.events.iter().map(|e| e.to_string()));
            row.extend(sample.coverage.iter().map(|c| format_number(*c, config)));

            writeln!(writer, "{}", row.join(&delimiter))?;
        }

        Ok(())
    }
}

impl Exporter for CsvExporter {
    type Error = ExportError;

    fn export<P: AsRef<Path>>(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, result, n_points)?;
        writer.flush()?;

        log::info!("Time series written to {}", path.as_ref().display());
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{Lattice, LatticeType};
    use crate::output::properties::SurfaceProperties;
    use crate::solver::StopReason;
    use std::collections::HashMap;

    fn sample(time: f64, step: usize, rms: f64) -> Sample {
        Sample {
            time,
            step,
            surface: SurfaceProperties {
                mean_height: 10.0,
                roughness: 1.0 + rms,
                rms,
            },
            growth_rate: 0.5,
            events: vec![step as u64],
            coverage: vec![0.25],
        }
    }

    fn result(samples: Vec<Sample>) -> SimulationResult {
        SimulationResult {
            samples,
            lattice: Lattice::build(LatticeType::SimpleCubic, 4, 4, 10).unwrap(),
            process_names: vec!["Adsorption0".to_string()],
            event_counts: vec![3],
            time: 2.0,
            steps: 3,
            stop_reason: StopReason::EndTime,
            seed: 42,
            metadata: HashMap::new(),
        }
    }

    fn render(exporter: &CsvExporter, result: &SimulationResult, n_points: Option<usize>) -> String {
        let mut buffer = Vec::new();
        exporter.write_to(&mut buffer, result, n_points).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let result = result(vec![sample(0.0, 0, 0.0), sample(2.0, 3, 0.5)]);
        let text = render(&CsvExporter::default(), &result, None);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Time (s),Step,Growth rate (ML/s),RMS,Roughness,Events Adsorption0,Coverage Adsorption0"
        );
        assert_eq!(lines[1], "0.000000,0,0.500000,0.000000,1.000000,0,0.250000");
        assert_eq!(lines[2], "2.000000,3,0.500000,0.500000,1.500000,3,0.250000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_european_format() {
        let result = result(vec![sample(1.5, 1, 0.25)]);
        let exporter = CsvExporter::new(CsvConfig::european().precision(2));
        let text = render(&exporter, &result, None);

        assert!(text.lines().next().unwrap().contains("Time (s);Step"));
        assert_eq!(text.lines().nth(1).unwrap(), "1,50;1;0,50;0,25;1,25;1;0,25");
    }

    #[test]
    fn test_metadata_header() {
        let mut result = result(vec![sample(0.0, 0, 0.0)]);
        result.add_metadata("solver", "BKL kinetic Monte Carlo");
        result.add_metadata("temperature", "500");

        let config = CsvConfig::default().with_metadata(CsvMetadata::from_result(&result));
        let text = render(&CsvExporter::new(config), &result, None);

        assert!(text.starts_with("# Kinetic Monte Carlo Simulation Data"));
        assert!(text.contains("# Lattice: SimpleCubic 4x4"));
        assert!(text.contains("# Solver: BKL kinetic Monte Carlo"));
        assert!(text.contains("# Seed: 42"));
        assert!(text.contains("# Temperature (K): 500"));
        assert!(text.contains("\n#\nTime (s)"));
    }

    #[test]
    fn test_downsampled_rows() {
        let samples = (0..11).map(|i| sample(i as f64, i, 0.0)).collect();
        let text = render(&CsvExporter::default(), &result(samples), Some(3));
        let rows: Vec<&str> = text.lines().skip(1).collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("0.000000,0,"));
        assert!(rows[2].starts_with("10.000000,10,"));
    }

    #[test]
    fn test_empty_and_invalid_results() {
        let mut buffer = Vec::new();
        let empty = result(Vec::new());
        assert!(matches!(
            CsvExporter::default().write_to(&mut buffer, &empty, None),
            Err(ExportError::EmptyResult)
        ));

        let invalid = result(vec![sample(0.0, 0, 0.0), sample(1.0, 1, f64::NAN)]);
        match CsvExporter::default().write_to(&mut buffer, &invalid, None) {
            Err(ExportError::InvalidData { column, row }) => {
                assert_eq!(column, "RMS");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growth.csv");
        let result = result(vec![sample(0.0, 0, 0.0)]);

        CsvExporter::default().export(&result, None, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
