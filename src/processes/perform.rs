//! Perform strategies
//!
//! A [`Perform`] is the only thing allowed to mutate the lattice. Every
//! call returns the set of sites whose eligibility or rate may have
//! changed: each modified site plus its neighbours. The scheduler
//! refreshes cached coordination for exactly that set.
//!
//! Performs assume the matching [`Rule`](super::Rule) accepted the origin
//! site. When a random partner cannot be found anyway (a rule/perform
//! mismatch) they fail with [`KmcError::Process`] instead of guessing.

use std::collections::BTreeSet;

use crate::error::KmcError;
use crate::lattice::{Lattice, Site};
use crate::solver::RandomSource;

use super::rules::holds;

/// Sites to refresh after an event
pub type AffectedSites = BTreeSet<usize>;

/// Lattice mutation of one process
#[derive(Debug, Clone, PartialEq)]
pub enum Perform {
    /// Raise the origin and `sites - 1` random same-height neighbours
    RaiseHeight { sites: usize },

    /// Lower the origin and `sites - 1` random same-height neighbours
    LowerHeight { sites: usize },

    /// Cover the origin and `sites - 1` random vacant same-height neighbours
    Cover { species: String, sites: usize },

    /// Uncover the origin and `sites - 1` random same-height neighbours holding `species`
    Uncover { species: String, sites: usize },

    /// Move the top of the origin column onto a random neighbour that is not higher
    HopHeight,

    /// Move `species` from the origin to a random vacant same-height neighbour
    Hop { species: String },

    /// Consume the reactants at the origin (and a partner), leave the product
    React {
        /// Second reactant, taken from a same-height neighbour
        partner: Option<String>,

        /// Adsorbed product left on the origin
        product: Option<String>,

        /// The reaction deposits film material on the origin
        grows: bool,
    },
}

impl Perform {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::RaiseHeight { .. } => "raise height",
            Self::LowerHeight { .. } => "lower height",
            Self::Cover { .. } => "cover",
            Self::Uncover { .. } => "uncover",
            Self::HopHeight => "hop height",
            Self::Hop { .. } => "hop",
            Self::React { .. } => "react",
        }
    }

    /// Sites modified per event
    pub fn sites(&self) -> usize {
        match self {
            Self::RaiseHeight { sites }
            | Self::LowerHeight { sites }
            | Self::Cover { sites, .. }
            | Self::Uncover { sites, .. } => *sites,
            Self::HopHeight | Self::Hop { .. } => 2,
            Self::React { partner, .. } => 1 + usize::from(partner.is_some()),
        }
    }

    /// Apply the event at `id`
    ///
    /// # Errors
    ///
    /// [`KmcError::Lattice`] for an out-of-range site, [`KmcError::Process`]
    /// when a required partner site does not exist.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmc_rs::lattice::{Lattice, LatticeType};
    /// use kmc_rs::processes::Perform;
    /// use kmc_rs::solver::RandomSource;
    ///
    /// let mut lattice = Lattice::build(LatticeType::SimpleCubic, 4, 4, 10).unwrap();
    /// let mut random = RandomSource::new(1);
    ///
    /// let affected = Perform::RaiseHeight { sites: 1 }.execute(&mut lattice, 5, &mut random).unwrap();
    ///
    /// assert_eq!(lattice.get_site(5).unwrap().height(), 11);
    /// assert_eq!(affected.into_iter().collect::<Vec<_>>(), vec![1, 4, 5, 6, 9]);
    /// ```
    pub fn execute(
        &self,
        lattice: &mut Lattice,
        id: usize,
        random: &mut RandomSource,
    ) -> Result<AffectedSites, KmcError> {
        let height = lattice.get_site(id)?.height();

        let changed: Vec<usize> = match self {
            Self::RaiseHeight { sites } => {
                let cluster = pick_partners(lattice, id, sites.saturating_sub(1), random, |n| n.height() == height)?;
                for &s in &cluster {
                    lattice.get_site_mut(s)?.increase_height(1);
                }
                cluster
            }

            Self::LowerHeight { sites } => {
                let cluster = pick_partners(lattice, id, sites.saturating_sub(1), random, |n| n.height() == height)?;
                for &s in &cluster {
                    lattice.get_site_mut(s)?.increase_height(-1);
                }
                cluster
            }

            Self::Cover { species, sites } => {
                let cluster = pick_partners(lattice, id, sites.saturating_sub(1), random, |n| {
                    n.height() == height && !n.is_occupied()
                })?;
                for &s in &cluster {
                    lattice.get_site_mut(s)?.cover(species);
                }
                cluster
            }

            Self::Uncover { species, sites } => {
                let cluster = pick_partners(lattice, id, sites.saturating_sub(1), random, |n| {
                    n.height() == height && holds(n, species)
                })?;
                for &s in &cluster {
                    lattice.get_site_mut(s)?.uncover();
                }
                cluster
            }

            Self::HopHeight => {
                let target = pick_neighbour(lattice, id, random, |n| n.height() <= height)?;
                lattice.get_site_mut(id)?.increase_height(-1);
                lattice.get_site_mut(target)?.increase_height(1);
                vec![id, target]
            }

            Self::Hop { species } => {
                let target = pick_neighbour(lattice, id, random, |n| n.height() == height && !n.is_occupied())?;
                lattice.get_site_mut(id)?.uncover();
                lattice.get_site_mut(target)?.cover(species);
                vec![id, target]
            }

            Self::React {
                partner,
                product,
                grows,
            } => {
                let mut changed = vec![id];

                if let Some(partner) = partner {
                    let other = pick_neighbour(lattice, id, random, |n| n.height() == height && holds(n, partner))?;
                    lattice.get_site_mut(other)?.uncover();
                    changed.push(other);
                }

                let origin = lattice.get_site_mut(id)?;
                origin.uncover();
                if let Some(product) = product {
                    origin.cover(product);
                }
                if *grows {
                    origin.increase_height(1);
                }

                changed
            }
        };

        Ok(with_neighbours(lattice, &changed))
    }
}

/// Origin plus `count` distinct random neighbours matching `predicate`
fn pick_partners<F>(
    lattice: &Lattice,
    id: usize,
    count: usize,
    random: &mut RandomSource,
    predicate: F,
) -> Result<Vec<usize>, KmcError>
where
    F: Fn(&Site) -> bool,
{
    let mut cluster = vec![id];
    if count == 0 {
        return Ok(cluster);
    }

    let mut candidates: Vec<usize> = lattice
        .neighbours(id)
        .iter()
        .copied()
        .filter(|&n| predicate(&lattice.sites()[n]))
        .collect();

    for _ in 0..count {
        let chosen = random.take(&mut candidates).ok_or_else(|| {
            KmcError::process(format!(
                "site {}: only {} of {} partner sites available",
                id,
                cluster.len() - 1,
                count
            ))
        })?;
        cluster.push(chosen);
    }

    Ok(cluster)
}

/// One random neighbour matching `predicate`
fn pick_neighbour<F>(lattice: &Lattice, id: usize, random: &mut RandomSource, predicate: F) -> Result<usize, KmcError>
where
    F: Fn(&Site) -> bool,
{
    let cluster = pick_partners(lattice, id, 1, random, predicate)?;
    Ok(cluster[1])
}

/// Changed sites and their neighbours
fn with_neighbours(lattice: &Lattice, changed: &[usize]) -> AffectedSites {
    let mut affected = AffectedSites::new();
    for &id in changed {
        affected.insert(id);
        affected.extend(lattice.neighbours(id).iter().copied());
    }
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::LatticeType;

    fn flat() -> Lattice {
        Lattice::build(LatticeType::SimpleCubic, 4, 4, 10).unwrap()
    }

    fn sorted(affected: AffectedSites) -> Vec<usize> {
        affected.into_iter().collect()
    }

    #[test]
    fn test_single_site_adsorption_at_site_5() {
        let mut lattice = flat();
        let mut random = RandomSource::new(0xC0FFEE);

        let affected = Perform::RaiseHeight { sites: 1 }
            .execute(&mut lattice, 5, &mut random)
            .unwrap();

        assert_eq!(lattice.get_site(5).unwrap().height(), 11);
        assert_eq!(sorted(affected), vec![1, 4, 5, 6, 9]);

        let others: i32 = lattice.sites().iter().filter(|s| s.id() != 5).map(|s| s.height()).sum();
        assert_eq!(others, 15 * 10);
    }

    #[test]
    fn test_multi_site_adsorption_raises_distinct_neighbours() {
        let mut lattice = flat();
        let mut random = RandomSource::new(9);

        let affected = Perform::RaiseHeight { sites: 3 }
            .execute(&mut lattice, 5, &mut random)
            .unwrap();

        let raised: Vec<usize> = lattice.sites().iter().filter(|s| s.height() == 11).map(|s| s.id()).collect();
        assert_eq!(raised.len(), 3);
        assert!(raised.contains(&5));
        for id in &raised {
            assert!(affected.contains(id));
            for n in lattice.neighbours(*id) {
                assert!(affected.contains(n));
            }
        }
    }

    #[test]
    fn test_cover_and_uncover() {
        let mut lattice = flat();
        let mut random = RandomSource::new(1);

        Perform::Cover {
            species: "H".into(),
            sites: 2,
        }
        .execute(&mut lattice, 0, &mut random)
        .unwrap();
        assert_eq!(lattice.count_label("H"), 2);
        assert!(lattice.get_site(0).unwrap().is_occupied());

        let partner = lattice
            .neighbours(0)
            .iter()
            .copied()
            .find(|&n| lattice.get_site(n).unwrap().is_occupied())
            .unwrap();

        Perform::Uncover {
            species: "H".into(),
            sites: 2,
        }
        .execute(&mut lattice, partner, &mut random)
        .unwrap();
        assert_eq!(lattice.count_label("H"), 0);
        assert!(lattice.sites().iter().all(|s| !s.is_occupied()));
    }

    #[test]
    fn test_missing_partner_is_an_error() {
        let mut lattice = flat();
        let mut random = RandomSource::new(1);
        for n in [1, 4, 6, 9] {
            lattice.get_site_mut(n).unwrap().cover("O");
        }

        let result = Perform::Cover {
            species: "H".into(),
            sites: 2,
        }
        .execute(&mut lattice, 5, &mut random);
        assert!(matches!(result, Err(KmcError::Process(_))));
    }

    #[test]
    fn test_hop_moves_species() {
        let mut lattice = flat();
        let mut random = RandomSource::new(5);
        lattice.get_site_mut(5).unwrap().cover("H");

        let affected = Perform::Hop { species: "H".into() }
            .execute(&mut lattice, 5, &mut random)
            .unwrap();

        assert!(!lattice.get_site(5).unwrap().is_occupied());
        assert_eq!(lattice.count_label("H"), 1);
        let target = lattice.sites().iter().find(|s| s.label() == "H").unwrap().id();
        assert!(lattice.neighbours(5).contains(&target));
        assert!(affected.contains(&5) && affected.contains(&target));
    }

    #[test]
    fn test_hop_height_conserves_mass() {
        let mut lattice = flat();
        let mut random = RandomSource::new(5);
        lattice.get_site_mut(5).unwrap().increase_height(2);

        Perform::HopHeight.execute(&mut lattice, 5, &mut random).unwrap();

        assert_eq!(lattice.get_site(5).unwrap().height(), 11);
        let total: i32 = lattice.sites().iter().map(|s| s.height()).sum();
        assert_eq!(total, 16 * 10 + 2);
    }

    #[test]
    fn test_react() {
        let mut lattice = flat();
        let mut random = RandomSource::new(5);
        lattice.get_site_mut(5).unwrap().cover("A");
        lattice.get_site_mut(6).unwrap().cover("B");

        let perform = Perform::React {
            partner: Some("B".into()),
            product: Some("AB".into()),
            grows: false,
        };
        let affected = perform.execute(&mut lattice, 5, &mut random).unwrap();

        assert_eq!(lattice.get_site(5).unwrap().label(), "AB");
        assert!(!lattice.get_site(6).unwrap().is_occupied());
        assert!(affected.contains(&6) && affected.contains(&7));
        assert_eq!(perform.sites(), 2);
    }

    #[test]
    fn test_growth_reaction_raises_origin() {
        let mut lattice = flat();
        let mut random = RandomSource::new(5);
        lattice.get_site_mut(5).unwrap().cover("SiH4");

        Perform::React {
            partner: None,
            product: None,
            grows: true,
        }
        .execute(&mut lattice, 5, &mut random)
        .unwrap();

        let site = lattice.get_site(5).unwrap();
        assert_eq!(site.height(), 11);
        assert!(!site.is_occupied());
    }

    #[test]
    fn test_out_of_range_origin() {
        let mut lattice = flat();
        let mut random = RandomSource::new(5);
        let result = Perform::HopHeight.execute(&mut lattice, 99, &mut random);
        assert!(matches!(result, Err(KmcError::Lattice(_))));
    }
}
