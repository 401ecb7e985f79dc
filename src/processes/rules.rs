//! Eligibility rules
//!
//! A [`Rule`] decides whether a process may fire at a site. Rules only
//! read the lattice; they look at the site and its direct neighbours,
//! never further. This keeps the affected set of an event one hop wide.

use crate::lattice::{Lattice, Site};

/// Site eligibility predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Always eligible
    Unconditional,

    /// At least `required` neighbours at the same height
    SameHeightNeighbours { required: usize },

    /// Every neighbour counts as occupied
    AllNeighboursOccupied,

    /// Site is not occupied
    Vacant,

    /// Site is vacant and at least `required` same-height neighbours are too
    VacantCluster { required: usize },

    /// Column above the floor with at least `required` same-height neighbours
    Elevated { required: usize },

    /// Site holds `species`, as do at least `required` same-height neighbours
    OccupiedBy { species: String, required: usize },

    /// Site holds `species` and a same-height neighbour is vacant
    CanHop { species: String },

    /// Column above the floor with a neighbour that is not higher
    CanDescend,

    /// Site holds `first`; a same-height neighbour holds `second` if given
    Pair { first: String, second: Option<String> },
}

impl Rule {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unconditional => "unconditional",
            Self::SameHeightNeighbours { .. } => "same-height neighbours",
            Self::AllNeighboursOccupied => "all neighbours occupied",
            Self::Vacant => "vacant",
            Self::VacantCluster { .. } => "vacant cluster",
            Self::Elevated { .. } => "elevated",
            Self::OccupiedBy { .. } => "occupied by species",
            Self::CanHop { .. } => "can hop",
            Self::CanDescend => "can descend",
            Self::Pair { .. } => "reactant pair",
        }
    }

    /// Number of sites besides the origin this rule guarantees
    pub fn extra_sites(&self) -> usize {
        match self {
            Self::SameHeightNeighbours { required }
            | Self::VacantCluster { required }
            | Self::Elevated { required }
            | Self::OccupiedBy { required, .. } => *required,
            _ => 0,
        }
    }

    /// Whether the process may fire at `id`
    ///
    /// Out-of-range identities are never eligible.
    pub fn is_eligible(&self, lattice: &Lattice, id: usize) -> bool {
        let Ok(site) = lattice.get_site(id) else {
            return false;
        };

        match self {
            Self::Unconditional => true,

            Self::SameHeightNeighbours { required } => {
                level_neighbours(lattice, site, |_| true).count() >= *required
            }

            Self::AllNeighboursOccupied => {
                lattice.count_occupied_neighbours(id) == site.neighbours().len()
            }

            Self::Vacant => !site.is_occupied(),

            Self::VacantCluster { required } => {
                !site.is_occupied() && level_neighbours(lattice, site, |n| !n.is_occupied()).count() >= *required
            }

            Self::Elevated { required } => {
                site.height() > 0 && level_neighbours(lattice, site, |_| true).count() >= *required
            }

            Self::OccupiedBy { species, required } => {
                holds(site, species)
                    && level_neighbours(lattice, site, |n| holds(n, species)).count() >= *required
            }

            Self::CanHop { species } => {
                holds(site, species) && level_neighbours(lattice, site, |n| !n.is_occupied()).next().is_some()
            }

            Self::CanDescend => {
                site.height() > 0
                    && site
                        .neighbours()
                        .iter()
                        .any(|&n| lattice.sites()[n].height() <= site.height())
            }

            Self::Pair { first, second } => {
                holds(site, first)
                    && match second {
                        None => true,
                        Some(second) => level_neighbours(lattice, site, |n| holds(n, second)).next().is_some(),
                    }
            }
        }
    }
}

/// Occupied and labelled `species`
pub(crate) fn holds(site: &Site, species: &str) -> bool {
    site.is_occupied() && site.label() == species
}

/// Neighbours of `site` at its height that satisfy `predicate`
pub(crate) fn level_neighbours<'l, F>(
    lattice: &'l Lattice,
    site: &'l Site,
    predicate: F,
) -> impl Iterator<Item = &'l Site> + 'l
where
    F: Fn(&Site) -> bool + 'l,
{
    site.neighbours()
        .iter()
        .map(move |&n| &lattice.sites()[n])
        .filter(move |n| n.height() == site.height() && predicate(*n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{Coordination, LatticeType};

    fn flat() -> Lattice {
        Lattice::build(LatticeType::SimpleCubic, 4, 4, 10).unwrap()
    }

    #[test]
    fn test_unconditional_and_out_of_range() {
        let lattice = flat();
        assert!(Rule::Unconditional.is_eligible(&lattice, 0));
        assert!(!Rule::Unconditional.is_eligible(&lattice, 16));
    }

    #[test]
    fn test_same_height_neighbours() {
        let mut lattice = flat();
        let rule = Rule::SameHeightNeighbours { required: 1 };
        assert!(rule.is_eligible(&lattice, 5));

        lattice.get_site_mut(5).unwrap().increase_height(1);
        assert!(!rule.is_eligible(&lattice, 5));
    }

    #[test]
    fn test_all_neighbours_occupied_by_height() {
        let mut lattice = flat();
        assert!(Rule::AllNeighboursOccupied.is_eligible(&lattice, 5));

        lattice.get_site_mut(6).unwrap().increase_height(-1);
        assert!(!Rule::AllNeighboursOccupied.is_eligible(&lattice, 5));
    }

    #[test]
    fn test_vacant_cluster() {
        let mut lattice = flat();
        lattice.set_coordination(Coordination::Occupancy);
        let rule = Rule::VacantCluster { required: 4 };
        assert!(rule.is_eligible(&lattice, 5));

        lattice.get_site_mut(6).unwrap().cover("H");
        assert!(!rule.is_eligible(&lattice, 5));
        assert!(Rule::VacantCluster { required: 3 }.is_eligible(&lattice, 5));
        assert!(!rule.is_eligible(&lattice, 6));
    }

    #[test]
    fn test_elevated_floor() {
        let lattice = Lattice::build(LatticeType::SimpleCubic, 2, 2, 0).unwrap();
        assert!(!Rule::Elevated { required: 0 }.is_eligible(&lattice, 0));
        assert!(!Rule::CanDescend.is_eligible(&lattice, 0));
    }

    #[test]
    fn test_occupied_by_and_hop() {
        let mut lattice = flat();
        lattice.get_site_mut(5).unwrap().cover("H");

        let occupied = Rule::OccupiedBy {
            species: "H".into(),
            required: 0,
        };
        assert!(occupied.is_eligible(&lattice, 5));
        assert!(!occupied.is_eligible(&lattice, 6));

        let hop = Rule::CanHop { species: "H".into() };
        assert!(hop.is_eligible(&lattice, 5));

        for n in [1, 4, 6, 9] {
            lattice.get_site_mut(n).unwrap().cover("O");
        }
        assert!(!hop.is_eligible(&lattice, 5));
    }

    #[test]
    fn test_pair() {
        let mut lattice = flat();
        lattice.get_site_mut(5).unwrap().cover("A");

        let rule = Rule::Pair {
            first: "A".into(),
            second: Some("B".into()),
        };
        assert!(!rule.is_eligible(&lattice, 5));

        lattice.get_site_mut(6).unwrap().cover("B");
        assert!(rule.is_eligible(&lattice, 5));

        // A partner on another level does not count
        lattice.get_site_mut(6).unwrap().increase_height(1);
        assert!(!rule.is_eligible(&lattice, 5));
    }
}
