//! Unordered, deduplicated pixel collection for one boundary component.

use super::Pixel;
use crate::Coord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of unique pixels belonging to one connected boundary component.
///
/// Iteration runs in lexicographic `(row, col)` order, so everything built
/// from a `PixelSet` is reproducible regardless of how it was filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelSet {
    pixels: BTreeSet<Pixel>,
}

impl PixelSet {
    /// Create a new empty set.
    #[inline]
    pub fn new() -> Self {
        Self {
            pixels: BTreeSet::new(),
        }
    }

    /// Insert a pixel. Returns `false` if it was already present.
    #[inline]
    pub fn insert(&mut self, pixel: Pixel) -> bool {
        self.pixels.insert(pixel)
    }

    /// Check whether a pixel is in the set.
    #[inline]
    pub fn contains(&self, pixel: &Pixel) -> bool {
        self.pixels.contains(pixel)
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Check if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Iterate over pixels in lexicographic order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Pixel> {
        self.pixels.iter()
    }

    /// Inclusive bounds as `(min, max)` corners, or `None` when empty.
    pub fn bounds(&self) -> Option<(Pixel, Pixel)> {
        let first = self.pixels.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &self.pixels {
            min.row = min.row.min(p.row);
            min.col = min.col.min(p.col);
            max.row = max.row.max(p.row);
            max.col = max.col.max(p.col);
        }
        Some((min, max))
    }

    pub(crate) fn into_inner(self) -> BTreeSet<Pixel> {
        self.pixels
    }
}

impl FromIterator<Pixel> for PixelSet {
    fn from_iter<I: IntoIterator<Item = Pixel>>(iter: I) -> Self {
        Self {
            pixels: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(Coord, Coord)> for PixelSet {
    fn from_iter<I: IntoIterator<Item = (Coord, Coord)>>(iter: I) -> Self {
        iter.into_iter().map(Pixel::from).collect()
    }
}

impl Extend<Pixel> for PixelSet {
    fn extend<I: IntoIterator<Item = Pixel>>(&mut self, iter: I) {
        self.pixels.extend(iter);
    }
}

impl IntoIterator for PixelSet {
    type Item = Pixel;
    type IntoIter = std::collections::btree_set::IntoIter<Pixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.pixels.into_iter()
    }
}

impl<'a> IntoIterator for &'a PixelSet {
    type Item = &'a Pixel;
    type IntoIter = std::collections::btree_set::Iter<'a, Pixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicates() {
        let set: PixelSet = [(0, 0), (0, 1), (0, 0), (0, 1)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Pixel::new(0, 1)));
    }

    #[test]
    fn test_iteration_order() {
        let set: PixelSet = [(5, 5), (0, 2), (0, 1)].into_iter().collect();
        let order: Vec<_> = set.iter().copied().collect();
        assert_eq!(
            order,
            vec![Pixel::new(0, 1), Pixel::new(0, 2), Pixel::new(5, 5)]
        );
    }

    #[test]
    fn test_bounds() {
        let set: PixelSet = [(3, -1), (0, 4), (2, 2)].into_iter().collect();
        let (min, max) = set.bounds().unwrap();
        assert_eq!(min, Pixel::new(0, -1));
        assert_eq!(max, Pixel::new(3, 4));
        assert!(PixelSet::new().bounds().is_none());
    }

    #[test]
    fn test_json_round_trip_shape() {
        let set: PixelSet = [(1, 2), (0, 0)].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[[0,0],[1,2]]");
    }
}
