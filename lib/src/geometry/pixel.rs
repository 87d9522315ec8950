//! Integer pixel coordinate type.

use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// A pixel position as (row, column).
///
/// Ordering is lexicographic on `(row, col)`; the orderer relies on this for
/// deterministic tie-breaks and seed selection.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(Coord, Coord)", into = "(Coord, Coord)")]
pub struct Pixel {
    pub row: Coord,
    pub col: Coord,
}

impl Pixel {
    /// Create a new pixel.
    #[inline]
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// Squared Euclidean distance, exact in integer arithmetic.
    ///
    /// Computed in `i128`, which holds the full `Coord` range.
    #[inline]
    pub fn distance_squared(&self, other: &Pixel) -> i128 {
        let (dr, dc) = *self - *other;
        dr * dr + dc * dc
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(&self, other: &Pixel) -> CoordF {
        (self.distance_squared(other) as CoordF).sqrt()
    }

    /// Convert to floating-point (row, col).
    #[inline]
    pub fn to_f64(self) -> (CoordF, CoordF) {
        (self.row as CoordF, self.col as CoordF)
    }
}

impl Sub for Pixel {
    type Output = (i128, i128);

    #[inline]
    fn sub(self, rhs: Pixel) -> Self::Output {
        (
            self.row as i128 - rhs.row as i128,
            self.col as i128 - rhs.col as i128,
        )
    }
}

impl From<(Coord, Coord)> for Pixel {
    #[inline]
    fn from((row, col): (Coord, Coord)) -> Self {
        Self::new(row, col)
    }
}

impl From<Pixel> for (Coord, Coord) {
    #[inline]
    fn from(p: Pixel) -> Self {
        (p.row, p.col)
    }
}

impl From<[Coord; 2]> for Pixel {
    #[inline]
    fn from([row, col]: [Coord; 2]) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Debug for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
