//! Lattice geometries
//!
//! A geometry only decides *who neighbours whom*. Everything else
//! (heights, labels, processes) is geometry-agnostic, so adding a
//! geometry means implementing [`Geometry`] and nothing more.
//!
//! Sites are numbered row-major: site `id` sits at column `id % size_x`,
//! row `id / size_x`. Neighbourhoods wrap around periodically in both
//! directions.
//!
//! | Tag           | Surface model             | Neighbours |
//! |---------------|---------------------------|------------|
//! | `SimpleCubic` | square (100)              | 4          |
//! | `BCC`         | square (100)              | 4          |
//! | `Diamond`     | square (100)              | 4          |
//! | `FCC`         | triangular (111)          | 6          |

use std::fmt;

/// Neighbour-graph provider
pub trait Geometry {
    /// Tag used in input files
    fn tag(&self) -> &'static str;

    /// In-plane offsets `(dx, dy)` of the neighbours of a site
    fn offsets(&self) -> &'static [(isize, isize)];

    /// Neighbour identities of `id` on a periodic `size_x` × `size_y` lattice
    ///
    /// The result excludes `id` itself and holds no duplicates, which can
    /// only happen on lattices narrower than the neighbourhood. The
    /// relation is symmetric as long as the offsets are.
    fn neighbours(&self, id: usize, size_x: usize, size_y: usize) -> Vec<usize> {
        let x = (id % size_x) as isize;
        let y = (id / size_x) as isize;
        let (sx, sy) = (size_x as isize, size_y as isize);

        let mut result = Vec::with_capacity(self.offsets().len());
        for (dx, dy) in self.offsets() {
            let nx = (x + dx).rem_euclid(sx);
            let ny = (y + dy).rem_euclid(sy);
            let neighbour = (ny * sx + nx) as usize;

            if neighbour != id && !result.contains(&neighbour) {
                result.push(neighbour);
            }
        }
        result
    }
}

/// Square lattice: east, west, north, south
const SQUARE: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Triangular lattice on a sheared square grid
const TRIANGULAR: [(isize, isize); 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, -1), (-1, 1)];

/// Supported lattice types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeType {
    SimpleCubic,
    Bcc,
    Fcc,
    Diamond,
}

impl LatticeType {
    /// Resolve an input tag (case-insensitive)
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmc_rs::lattice::LatticeType;
    ///
    /// assert_eq!(LatticeType::from_tag("fcc"), Some(LatticeType::Fcc));
    /// assert_eq!(LatticeType::from_tag("HCP"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "simplecubic" | "simple_cubic" => Some(Self::SimpleCubic),
            "bcc" => Some(Self::Bcc),
            "fcc" => Some(Self::Fcc),
            "diamond" => Some(Self::Diamond),
            _ => None,
        }
    }
}

impl Geometry for LatticeType {
    fn tag(&self) -> &'static str {
        match self {
            Self::SimpleCubic => "SimpleCubic",
            Self::Bcc => "BCC",
            Self::Fcc => "FCC",
            Self::Diamond => "Diamond",
        }
    }

    fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Self::SimpleCubic | Self::Bcc | Self::Diamond => &SQUARE,
            Self::Fcc => &TRIANGULAR,
        }
    }
}

impl fmt::Display for LatticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
