//! Height-map export
//!
//! The final lattice as a plain-text grid: a `Time (s): t` header, then one
//! line per row `y`, holding the column heights of sites `y * size_x ..
//! (y + 1) * size_x`.
//!
//! ```text
//! Time (s): 0.1
//! 10 11 10 10
//! 10 10 12 10
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::lattice::Lattice;
use crate::solver::SimulationResult;

use super::{ExportError, Exporter};

/// Height-map exporter
#[derive(Clone, Debug)]
pub struct HeightMapExporter {
    /// Separator between heights of a row (default: ' ')
    pub delimiter: char,
}

impl Default for HeightMapExporter {
    fn default() -> Self {
        Self { delimiter: ' ' }
    }
}

impl HeightMapExporter {
    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write the heights of `lattice`, stamped with `time`
    pub fn write_to<W: Write>(&self, writer: &mut W, lattice: &Lattice, time: f64) -> Result<(), ExportError> {
        if lattice.size() == 0 {
            return Err(ExportError::EmptyResult);
        }
        if !time.is_finite() {
            return Err(ExportError::InvalidData {
                column: "Time (s)".to_string(),
                row: 0,
            });
        }

        writeln!(writer, "Time (s): {}", time)?;

        let delimiter = self.delimiter.to_string();
        for row in lattice.sites().chunks(lattice.size_x()) {
            let line: Vec<String> = row.iter().map(|site| site.height().to_string()).collect();
            writeln!(writer, "{}", line.join(&delimiter))?;
        }
        Ok(())
    }
}

impl Exporter for HeightMapExporter {
    type Error = ExportError;

    /// Write the final lattice of `result`; `n_points` does not apply
    fn export<P: AsRef<Path>>(
        &self,
        result: &SimulationResult,
        _n_points: Option<usize>,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, &result.lattice, result.time)?;
        writer.flush()?;

        log::info!("Height map written to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::LatticeType;

    #[test]
    fn test_grid_layout() {
        let mut lattice = Lattice::build(LatticeType::SimpleCubic, 3, 2, 10).unwrap();
        lattice.get_site_mut(1).unwrap().increase_height(1);
        lattice.get_site_mut(5).unwrap().increase_height(2);

        let mut buffer = Vec::new();
        HeightMapExporter::default().write_to(&mut buffer, &lattice, 0.5).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text, "Time (s): 0.5\n10 11 10\n10 10 12\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let lattice = Lattice::build(LatticeType::Fcc, 2, 2, 7).unwrap();
        let mut buffer = Vec::new();
        HeightMapExporter::default()
            .delimiter('\t')
            .write_to(&mut buffer, &lattice, 1.0)
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().nth(1), Some("7\t7"));
    }

    #[test]
    fn test_non_finite_time_is_rejected() {
        let lattice = Lattice::build(LatticeType::SimpleCubic, 2, 2, 10).unwrap();
        let mut buffer = Vec::new();
        let err = HeightMapExporter::default()
            .write_to(&mut buffer, &lattice, f64::NAN)
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidData { .. }));
    }
}
