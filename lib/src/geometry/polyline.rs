//! Polyline type for ordered pixel paths.
//!
//! Used for ordered sections coming out of the orderer and for the sparse
//! polylines produced by simplification.

use super::Pixel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, Index};

/// An ordered sequence of pixels.
///
/// A polyline is open unless its first and last points coincide.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<Pixel>,
}

impl Polyline {
    /// Create a new empty polyline.
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a polyline from a vector of points.
    #[inline]
    pub fn from_points(points: Vec<Pixel>) -> Self {
        Self { points }
    }

    /// Create a polyline with the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Get the points of this polyline.
    #[inline]
    pub fn points(&self) -> &[Pixel] {
        &self.points
    }

    /// Get the number of points in the polyline.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polyline is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the polyline.
    #[inline]
    pub fn push(&mut self, point: Pixel) {
        self.points.push(point);
    }

    /// Get the first point, if any.
    #[inline]
    pub fn first(&self) -> Option<&Pixel> {
        self.points.first()
    }

    /// Get the last point, if any.
    #[inline]
    pub fn last(&self) -> Option<&Pixel> {
        self.points.last()
    }

    /// Check if this polyline is closed (first point equals last point).
    ///
    /// A single point counts as closed: it starts and ends at the same place.
    #[inline]
    pub fn is_closed(&self) -> bool {
        !self.points.is_empty() && self.points.first() == self.points.last()
    }

    /// Append the first point if the polyline does not already end on it.
    ///
    /// Returns `true` if a point was appended. Closing twice is a no-op.
    pub fn close(&mut self) -> bool {
        if self.is_empty() || self.is_closed() {
            return false;
        }
        self.points.push(self.points[0]);
        true
    }

    /// Return a closed copy of the polyline.
    pub fn closed(&self) -> Self {
        let mut result = self.clone();
        result.close();
        result
    }
}

impl fmt::Debug for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polyline({:?})", self.points)
    }
}

impl fmt::Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polyline[")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "]")
    }
}

impl Deref for Polyline {
    type Target = [Pixel];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl Index<usize> for Polyline {
    type Output = Pixel;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl FromIterator<Pixel> for Polyline {
    fn from_iter<I: IntoIterator<Item = Pixel>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Polyline {
    type Item = Pixel;
    type IntoIter = std::vec::IntoIter<Pixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Polyline {
    type Item = &'a Pixel;
    type IntoIter = std::slice::Iter<'a, Pixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl From<Vec<Pixel>> for Polyline {
    fn from(points: Vec<Pixel>) -> Self {
        Self { points }
    }
}

impl From<Polyline> for Vec<Pixel> {
    fn from(polyline: Polyline) -> Self {
        polyline.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pl(coords: &[(i32, i32)]) -> Polyline {
        coords.iter().copied().map(Pixel::from).collect()
    }

    #[test]
    fn test_close_appends_first_point() {
        let mut line = pl(&[(0, 0), (1, 0), (1, 1)]);
        assert!(!line.is_closed());
        assert!(line.close());
        assert!(line.is_closed());
        assert_eq!(line.len(), 4);
        assert_eq!(line.last(), Some(&Pixel::new(0, 0)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let once = pl(&[(2, 2), (3, 2)]).closed();
        let twice = once.closed();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_close_degenerate() {
        let mut empty = Polyline::new();
        assert!(!empty.close());
        assert!(empty.is_empty());

        let mut single = pl(&[(4, 4)]);
        assert!(single.is_closed());
        assert!(!single.close());
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_display() {
        let line = pl(&[(0, 0), (1, 2)]);
        assert_eq!(line.to_string(), "Polyline[(0, 0), (1, 2)]");
    }
}
