//! Lattice and site graph
//!
//! The [`Lattice`] owns every [`Site`] in one contiguous vector indexed by
//! site identity, plus the geometry parameters it was built from. The
//! neighbour graph is computed once by [`Lattice::build`] and never changes;
//! only per-site state (height, occupancy, labels, cached neighbour counts)
//! evolves during a run.
//!
//! # Coordination
//!
//! "Occupied neighbour" has two meanings depending on how the film grows:
//!
//! - [`Coordination::Height`] (solid-on-solid growth): a neighbour counts
//!   when its column is at least as high as the site's;
//! - [`Coordination::Occupancy`] (adsorbate layers): a neighbour counts
//!   when it is occupied.
//!
//! # Example
//!
//! ```rust
//! use kmc_rs::lattice::{Lattice, LatticeType};
//!
//! let lattice = Lattice::build(LatticeType::SimpleCubic, 4, 4, 10).unwrap();
//! assert_eq!(lattice.size(), 16);
//! assert_eq!(lattice.get_site(5).unwrap().neighbours().len(), 4);
//! assert!(lattice.get_site(16).is_err());
//! ```

pub mod geometry;
pub mod site;

pub use geometry::{Geometry, LatticeType};
pub use site::Site;

use nalgebra::DMatrix;

use crate::error::KmcError;

/// Initial heights below this value leave little room for desorption
const SHALLOW_HEIGHT: i32 = 5;

// =================================================================================================
// Configuration
// =================================================================================================

/// Stepped-surface definition (`steps x y z`)
///
/// The X direction is split into `count` terraces of equal width, each one
/// `height` above the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProfile {
    /// Number of steps (terraces) along X
    pub count: usize,

    /// Height gained at each step
    pub height: i32,

    /// Third field of the keyword, currently unused
    pub depth: i32,
}

impl StepProfile {
    /// Terrace width in columns on a lattice `size_x` wide
    pub fn terrace_width(&self, size_x: usize) -> usize {
        size_x / self.count.max(1)
    }
}

/// How neighbour occupation is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coordination {
    /// Neighbour column at least as high as the site
    #[default]
    Height,

    /// Neighbour carries an adsorbate
    Occupancy,
}

/// Everything needed to build a lattice
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeConfig {
    pub lattice_type: LatticeType,
    pub size_x: usize,
    pub size_y: usize,
    pub initial_height: i32,

    /// Background species of the substrate (empty when not given)
    pub label: String,

    pub steps: Option<StepProfile>,
}

impl LatticeConfig {
    /// Flat, unlabelled lattice
    pub fn new(lattice_type: LatticeType, size_x: usize, size_y: usize, initial_height: i32) -> Self {
        Self {
            lattice_type,
            size_x,
            size_y,
            initial_height,
            label: String::new(),
            steps: None,
        }
    }

    /// Builder pattern: set the background species
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder pattern: make the surface stepped
    pub fn with_steps(mut self, steps: StepProfile) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Validate dimensions and step profile
    pub fn validate(&self) -> Result<(), KmcError> {
        if self.size_x == 0 || self.size_y == 0 {
            return Err(KmcError::lattice(format!(
                "Lattice dimensions must be positive, got {} x {}",
                self.size_x, self.size_y
            )));
        }

        if let Some(steps) = &self.steps {
            if steps.count == 0 || self.size_x % steps.count != 0 {
                return Err(KmcError::lattice(format!(
                    "Cannot create stepped surface: {} columns cannot be divided exactly into {} steps",
                    self.size_x, steps.count
                )));
            }
        }

        Ok(())
    }
}

// =================================================================================================
// Lattice
// =================================================================================================

/// Fixed-size site graph with per-site state
#[derive(Debug, Clone)]
pub struct Lattice {
    config: LatticeConfig,
    sites: Vec<Site>,
    coordination: Coordination,

    /// Height difference across the periodic seam plus one (0 when flat)
    step_diff: i32,
}

impl Lattice {
    /// Build a flat, unlabelled lattice
    ///
    /// # Errors
    ///
    /// [`KmcError::Lattice`] if a dimension is zero.
    pub fn build(
        lattice_type: LatticeType,
        size_x: usize,
        size_y: usize,
        initial_height: i32,
    ) -> Result<Self, KmcError> {
        Self::from_config(LatticeConfig::new(lattice_type, size_x, size_y, initial_height))
    }

    /// Build a lattice from a full configuration
    pub fn from_config(config: LatticeConfig) -> Result<Self, KmcError> {
        config.validate()?;

        if config.initial_height < SHALLOW_HEIGHT {
            log::warn!(
                "Initial lattice height {} is below {}: desorption may dig into the substrate floor",
                config.initial_height,
                SHALLOW_HEIGHT
            );
        }

        let size = config.size_x * config.size_y;
        let geometry = config.lattice_type;

        let mut sites: Vec<Site> = (0..size)
            .map(|id| Site::new(id, config.initial_height, &config.label))
            .collect();

        for site in sites.iter_mut() {
            site.set_neighbours(geometry.neighbours(site.id(), config.size_x, config.size_y));
        }

        let mut lattice = Self {
            config,
            sites,
            coordination: Coordination::default(),
            step_diff: 0,
        };

        if let Some(steps) = lattice.config.steps {
            lattice.apply_steps(steps);
        }

        lattice.refresh_all_neighbour_counts();

        log::info!(
            "Built {} lattice {} x {} (height {}, {} sites)",
            lattice.config.lattice_type,
            lattice.config.size_x,
            lattice.config.size_y,
            lattice.config.initial_height,
            lattice.size()
        );

        Ok(lattice)
    }

    /// Raise columns stepwise along X and mark the periodic seam
    ///
    /// Column 0 is the lower side of the seam and column X-1 the higher one.
    fn apply_steps(&mut self, steps: StepProfile) {
        let size_x = self.config.size_x;
        let base = self.config.initial_height;
        let width = steps.terrace_width(size_x);

        for site in self.sites.iter_mut() {
            let column = site.id() % size_x;
            let terrace = (column / width) as i32;
            site.set_height(base + terrace * steps.height);
            site.set_step_edges(column == 0, column == size_x - 1);
        }

        let first = self.sites[0].height();
        let last = self.sites[size_x - 1].height();
        self.step_diff = (last - first).abs() + 1;
    }

    // ====== Geometry ======

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn lattice_type(&self) -> LatticeType {
        self.config.lattice_type
    }

    pub fn size_x(&self) -> usize {
        self.config.size_x
    }

    pub fn size_y(&self) -> usize {
        self.config.size_y
    }

    /// Number of sites
    pub fn size(&self) -> usize {
        self.sites.len()
    }

    /// Background species of the substrate
    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn has_steps(&self) -> bool {
        self.config.steps.is_some()
    }

    /// Height difference across the periodic seam plus one, 0 on a flat surface
    pub fn step_diff(&self) -> i32 {
        self.step_diff
    }

    // ====== Site access ======

    /// O(1) site lookup
    ///
    /// # Errors
    ///
    /// [`KmcError::Lattice`] if `id` is out of range.
    pub fn get_site(&self, id: usize) -> Result<&Site, KmcError> {
        self.sites
            .get(id)
            .ok_or_else(|| KmcError::lattice(format!("Site {} out of range (lattice has {} sites)", id, self.size())))
    }

    /// Mutable site lookup
    pub fn get_site_mut(&mut self, id: usize) -> Result<&mut Site, KmcError> {
        let size = self.size();
        self.sites
            .get_mut(id)
            .ok_or_else(|| KmcError::lattice(format!("Site {} out of range (lattice has {} sites)", id, size)))
    }

    /// All sites, by identity
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Neighbour identities of `id` (empty if out of range)
    pub fn neighbours(&self, id: usize) -> &[usize] {
        self.sites.get(id).map(Site::neighbours).unwrap_or(&[])
    }

    // ====== Neighbour occupation ======

    pub fn coordination(&self) -> Coordination {
        self.coordination
    }

    /// Switch coordination counting and refresh every cached count
    pub fn set_coordination(&mut self, coordination: Coordination) {
        self.coordination = coordination;
        self.refresh_all_neighbour_counts();
    }

    /// Whether `neighbour` counts as occupied from the point of view of `site`
    ///
    /// In height mode a neighbour reached across the periodic seam of a
    /// stepped surface is compared against the height shifted by the step
    /// difference.
    fn counts_as_occupied(&self, site: &Site, neighbour: &Site) -> bool {
        match self.coordination {
            Coordination::Occupancy => neighbour.is_occupied(),
            Coordination::Height if self.has_steps() => {
                let threshold = if site.is_lower_step() && neighbour.is_higher_step() {
                    site.height() + self.step_diff + 1
                } else if neighbour.is_lower_step() && site.is_higher_step() {
                    site.height() - self.step_diff + 1
                } else {
                    site.height()
                };
                neighbour.height() >= threshold
            }
            Coordination::Height => neighbour.height() >= site.height(),
        }
    }

    /// Scan the neighbours of `id` and count the occupied ones
    ///
    /// Returns 0 for an out-of-range identity.
    pub fn count_occupied_neighbours(&self, id: usize) -> usize {
        let Some(site) = self.sites.get(id) else {
            return 0;
        };

        site.neighbours()
            .iter()
            .filter(|&&n| self.counts_as_occupied(site, &self.sites[n]))
            .count()
    }

    /// Recompute the cached count of one site
    pub fn refresh_neighbour_count(&mut self, id: usize) {
        if id < self.sites.len() {
            let count = self.count_occupied_neighbours(id);
            self.sites[id].set_occupied_neighbours(count);
        }
    }

    /// Recompute the cached counts of the given sites only
    pub fn refresh_neighbour_counts<'a>(&mut self, ids: impl IntoIterator<Item = &'a usize>) {
        for &id in ids {
            self.refresh_neighbour_count(id);
        }
    }

    /// Recompute every cached count
    pub fn refresh_all_neighbour_counts(&mut self) {
        for id in 0..self.sites.len() {
            self.refresh_neighbour_count(id);
        }
    }

    // ====== Views ======

    /// Heights as a `size_y` × `size_x` matrix (row = y)
    pub fn height_map(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.config.size_y, self.config.size_x, |row, col| {
            self.sites[row * self.config.size_x + col].height() as f64
        })
    }

    /// Number of sites whose current label is `species`
    pub fn count_label(&self, species: &str) -> usize {
        self.sites.iter().filter(|s| s.label() == species).count()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn all_types() -> [LatticeType; 4] {
        [LatticeType::SimpleCubic, LatticeType::Bcc, LatticeType::Fcc, LatticeType::Diamond]
    }

    #[test]
    fn test_build_allocates_sites() {
        let lattice = Lattice::build(LatticeType::SimpleCubic, 5, 3, 7).unwrap();
        assert_eq!(lattice.size(), 15);
        assert!(lattice.sites().iter().all(|s| s.height() == 7));
        assert!(lattice.sites().iter().enumerate().all(|(i, s)| s.id() == i));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(Lattice::build(LatticeType::Fcc, 0, 4, 10).is_err());
        assert!(Lattice::build(LatticeType::Fcc, 4, 0, 10).is_err());
    }

    #[test]
    fn test_out_of_range_site() {
        let mut lattice = Lattice::build(LatticeType::SimpleCubic, 2, 2, 10).unwrap();
        assert!(matches!(lattice.get_site(4), Err(KmcError::Lattice(_))));
        assert!(lattice.get_site_mut(99).is_err());
        assert!(lattice.neighbours(99).is_empty());
    }

    #[test]
    fn test_neighbour_graph_is_symmetric() {
        for lattice_type in all_types() {
            for (x, y) in [(4, 4), (5, 3), (2, 2), (1, 3), (7, 1)] {
                let lattice = Lattice::build(lattice_type, x, y, 10).unwrap();
                for site in lattice.sites() {
                    for &n in site.neighbours() {
                        assert!(
                            lattice.neighbours(n).contains(&site.id()),
                            "{lattice_type} {x}x{y}: {} -> {} not mirrored",
                            site.id(),
                            n
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_flat_surface_is_fully_coordinated() {
        let lattice = Lattice::build(LatticeType::SimpleCubic, 4, 4, 10).unwrap();
        assert!(lattice.sites().iter().all(|s| s.occupied_neighbours() == 4));
    }

    #[test]
    fn test_height_counting_after_raise() {
        let mut lattice = Lattice::build(LatticeType::SimpleCubic, 4, 4, 10).unwrap();
        lattice.get_site_mut(5).unwrap().increase_height(1);

        // The raised column sees only lower neighbours
        assert_eq!(lattice.count_occupied_neighbours(5), 0);
        // Its neighbours still see it (higher counts)
        assert_eq!(lattice.count_occupied_neighbours(6), 4);
    }

    #[test]
    fn test_occupancy_counting() {
        let mut lattice = Lattice::build(LatticeType::SimpleCubic, 4, 4, 10).unwrap();
        lattice.set_coordination(Coordination::Occupancy);
        assert!(lattice.sites().iter().all(|s| s.occupied_neighbours() == 0));

        lattice.get_site_mut(5).unwrap().cover("H");
        lattice.refresh_neighbour_counts(&[1, 4, 6, 9]);

        assert_eq!(lattice.get_site(6).unwrap().occupied_neighbours(), 1);
        assert_eq!(lattice.get_site(7).unwrap().occupied_neighbours(), 0);
    }

    fn stepped(size_x: usize, size_y: usize, count: usize) -> Lattice {
        let config = LatticeConfig::new(LatticeType::SimpleCubic, size_x, size_y, 10).with_steps(StepProfile {
            count,
            height: 1,
            depth: 0,
        });
        Lattice::from_config(config).unwrap()
    }

    #[test]
    fn test_steps() {
        let lattice = stepped(10, 2, 5);

        let row: Vec<i32> = (0..10).map(|i| lattice.get_site(i).unwrap().height()).collect();
        assert_eq!(row, vec![10, 10, 11, 11, 12, 12, 13, 13, 14, 14]);
        assert!(lattice.has_steps());
        assert_eq!(lattice.step_diff(), 5);
    }

    #[test]
    fn test_only_seam_columns_are_step_edges() {
        let lattice = stepped(4, 3, 2);

        let flags: Vec<(bool, bool)> = (0..4)
            .map(|i| {
                let site = lattice.get_site(i).unwrap();
                (site.is_lower_step(), site.is_higher_step())
            })
            .collect();
        assert_eq!(flags, vec![(true, false), (false, false), (false, false), (false, true)]);
    }

    #[test]
    fn test_seam_corrected_coordination() {
        // Heights per row: 10 10 11 11, step difference 2
        let lattice = stepped(4, 3, 2);

        // The wrapped western neighbour (column 3) no longer counts
        assert_eq!(lattice.count_occupied_neighbours(0), 3);
        // Column 1 sees its own terrace and the step up
        assert_eq!(lattice.count_occupied_neighbours(1), 4);
        // Column 2 sits at the top of the inner step
        assert_eq!(lattice.count_occupied_neighbours(2), 3);
        // Column 3 still counts the wrapped eastern neighbour (10 >= 11 - 2 + 1)
        assert_eq!(lattice.count_occupied_neighbours(3), 4);
        assert_eq!(lattice.get_site(0).unwrap().occupied_neighbours(), 3);
    }

    #[test]
    fn test_indivisible_steps_rejected() {
        let config = LatticeConfig::new(LatticeType::SimpleCubic, 5, 2, 10).with_steps(StepProfile {
            count: 2,
            height: 1,
            depth: 0,
        });
        assert!(Lattice::from_config(config).is_err());
    }

    #[test]
    fn test_height_map_layout() {
        let mut lattice = Lattice::build(LatticeType::SimpleCubic, 3, 2, 1).unwrap();
        lattice.get_site_mut(4).unwrap().set_height(9); // row 1, column 1

        let map = lattice.height_map();
        assert_eq!(map.nrows(), 2);
        assert_eq!(map.ncols(), 3);
        assert_eq!(map[(1, 1)], 9.0);
        assert_eq!(map[(0, 0)], 1.0);
    }

    #[test]
    fn test_labels() {
        let config = LatticeConfig::new(LatticeType::Fcc, 3, 3, 10).with_label("Cu");
        let lattice = Lattice::from_config(config).unwrap();
        assert_eq!(lattice.label(), "Cu");
        assert_eq!(lattice.count_label("Cu"), 9);
    }
}
