//! Lattice site

/// One lattice position
///
/// Sites are owned by the [`Lattice`](super::Lattice) and refer to their
/// neighbours by identity (index into the lattice), never by pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    id: usize,
    height: i32,
    occupied: bool,
    label: String,
    below_label: String,
    neighbours: Vec<usize>,
    occupied_neighbours: usize,
    lower_step: bool,
    higher_step: bool,
}

impl Site {
    /// Create a vacant site carrying the lattice background `label`
    pub fn new(id: usize, height: i32, label: &str) -> Self {
        Self {
            id,
            height,
            occupied: false,
            label: label.to_string(),
            below_label: label.to_string(),
            neighbours: Vec::new(),
            occupied_neighbours: 0,
            lower_step: false,
            higher_step: false,
        }
    }

    /// Identity (index in the lattice)
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set_height(&mut self, height: i32) {
        self.height = height;
    }

    /// Raise (or, with a negative `delta`, lower) the column
    pub fn increase_height(&mut self, delta: i32) {
        self.height += delta;
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
    }

    /// Species currently on top of the site
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// Label the site had before its last adsorption
    pub fn below_label(&self) -> &str {
        &self.below_label
    }

    /// Cover the site with `species`, remembering what was underneath
    pub fn cover(&mut self, species: &str) {
        self.below_label = std::mem::replace(&mut self.label, species.to_string());
        self.occupied = true;
    }

    /// Undo [`cover`](Self::cover): restore the label underneath and free the site
    pub fn uncover(&mut self) {
        self.label = self.below_label.clone();
        self.occupied = false;
    }

    /// Neighbour identities
    pub fn neighbours(&self) -> &[usize] {
        &self.neighbours
    }

    pub(crate) fn set_neighbours(&mut self, neighbours: Vec<usize>) {
        self.neighbours = neighbours;
    }

    /// Cached number of occupied neighbours
    pub fn occupied_neighbours(&self) -> usize {
        self.occupied_neighbours
    }

    pub(crate) fn set_occupied_neighbours(&mut self, count: usize) {
        self.occupied_neighbours = count;
    }

    /// Site is in column 0, the lower side of the periodic seam on a stepped surface
    pub fn is_lower_step(&self) -> bool {
        self.lower_step
    }

    /// Site is in the last column, the higher side of the seam
    pub fn is_higher_step(&self) -> bool {
        self.higher_step
    }

    pub(crate) fn set_step_edges(&mut self, lower: bool, higher: bool) {
        self.lower_step = lower;
        self.higher_step = higher;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_site_is_vacant_background() {
        let site = Site::new(3, 20, "Cu");
        assert_eq!(site.id(), 3);
        assert_eq!(site.height(), 20);
        assert!(!site.is_occupied());
        assert_eq!(site.label(), "Cu");
        assert_eq!(site.below_label(), "Cu");
    }

    #[test]
    fn test_cover_then_uncover_restores_label() {
        let mut site = Site::new(0, 1, "Si");
        site.cover("H");
        assert!(site.is_occupied());
        assert_eq!(site.label(), "H");
        assert_eq!(site.below_label(), "Si");

        site.uncover();
        assert!(!site.is_occupied());
        assert_eq!(site.label(), "Si");
    }

    #[test]
    fn test_increase_height() {
        let mut site = Site::new(0, 5, "");
        site.increase_height(1);
        site.increase_height(-3);
        assert_eq!(site.height(), 3);
    }
}
