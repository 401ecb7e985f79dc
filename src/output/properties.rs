//! Surface properties
//!
//! Read-only measurements of a [`Lattice`]:
//!
//! - mean height;
//! - roughness `1 + Σ|Δh| / (2N)`, summed over every site and each of its
//!   neighbours, so each bond counts twice;
//! - RMS roughness, the standard deviation of the heights;
//! - coverage of a species (fraction of sites carrying its label);
//! - event-counting growth rate, net monolayers added per simulated second.

use nalgebra::DMatrix;

use crate::lattice::Lattice;

/// One measurement of the surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceProperties {
    pub mean_height: f64,
    pub roughness: f64,
    pub rms: f64,
}

impl SurfaceProperties {
    /// Measure every height statistic at once
    pub fn measure(lattice: &Lattice) -> Self {
        let heights = lattice.height_map();
        Self {
            mean_height: mean(&heights),
            roughness: roughness(lattice),
            rms: rms_of(&heights),
        }
    }
}

fn mean(heights: &DMatrix<f64>) -> f64 {
    if heights.is_empty() { 0.0 } else { heights.mean() }
}

fn rms_of(heights: &DMatrix<f64>) -> f64 {
    if heights.is_empty() {
        return 0.0;
    }
    let mean = heights.mean();
    let variance = heights.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / heights.len() as f64;
    variance.sqrt()
}

/// Average column height
pub fn mean_height(lattice: &Lattice) -> f64 {
    mean(&lattice.height_map())
}

/// Bond-counting roughness, 1 for a flat surface
pub fn roughness(lattice: &Lattice) -> f64 {
    let sites = lattice.sites();
    if sites.is_empty() {
        return 1.0;
    }

    let steps: i64 = sites
        .iter()
        .map(|site| {
            site.neighbours()
                .iter()
                .map(|&n| (site.height() - sites[n].height()).abs() as i64)
                .sum::<i64>()
        })
        .sum();

    1.0 + steps as f64 / (2.0 * sites.len() as f64)
}

/// Standard deviation of the column heights
pub fn rms(lattice: &Lattice) -> f64 {
    rms_of(&lattice.height_map())
}

/// Fraction of sites labelled `species`
pub fn coverage(lattice: &Lattice, species: &str) -> f64 {
    if lattice.size() == 0 {
        return 0.0;
    }
    lattice.count_label(species) as f64 / lattice.size() as f64
}

/// Net monolayers per second
///
/// # Arguments
///
/// * `net_columns` - columns added minus columns removed since the start
/// * `sites` - lattice size
/// * `time` - elapsed simulated time (s); zero gives a zero rate
pub fn growth_rate(net_columns: i64, sites: usize, time: f64) -> f64 {
    if sites == 0 || time <= 0.0 {
        return 0.0;
    }
    net_columns as f64 / sites as f64 / time
}
