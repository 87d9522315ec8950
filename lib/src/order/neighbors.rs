//! Nearest-neighbour search over the remaining pixels of a component.
//!
//! Two backends answer the same queries with the same results:
//!
//! - [`LinearSearch`]: exhaustive scan over an ordered set, O(n) per query
//! - [`RTreeSearch`]: R*-tree (`rstar`), roughly O(log n) per query
//!
//! Both pick the pixel with the smallest squared distance and break ties by
//! the smallest `(row, col)`, so switching backends never changes the output
//! of the orderer.

use std::collections::BTreeSet;

use rstar::RTree;

use crate::config::SearchBackend;
use crate::geometry::{Pixel, PixelSet};

/// Pool of not-yet-ordered pixels supporting nearest queries and removal.
pub trait NeighborSearch: Send {
    /// Number of pixels still in the pool.
    fn len(&self) -> usize;

    /// Check if the pool is exhausted.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nearest remaining pixel to `from` and its squared distance.
    fn nearest(&self, from: &Pixel) -> Option<(Pixel, i128)>;

    /// Remove a pixel from the pool. Returns `false` if it was not present.
    fn remove(&mut self, pixel: &Pixel) -> bool;

    /// Remove and return the lexicographically smallest remaining pixel.
    fn pop_seed(&mut self) -> Option<Pixel>;

    /// Backend name, for logging.
    fn name(&self) -> &'static str;
}

/// Build the search backend for a component.
///
/// [`SearchBackend::Auto`] switches to the R-tree once the component has
/// more than `spatial_index_threshold` pixels.
pub fn build_search(
    pixels: PixelSet,
    backend: SearchBackend,
    spatial_index_threshold: usize,
) -> Box<dyn NeighborSearch> {
    let use_tree = match backend {
        SearchBackend::Linear => false,
        SearchBackend::RTree => true,
        SearchBackend::Auto => pixels.len() > spatial_index_threshold,
    };
    if use_tree {
        Box::new(RTreeSearch::new(pixels))
    } else {
        Box::new(LinearSearch::new(pixels))
    }
}

/// Exhaustive scan in lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct LinearSearch {
    remaining: BTreeSet<Pixel>,
}

impl LinearSearch {
    pub fn new(pixels: PixelSet) -> Self {
        Self {
            remaining: pixels.into_inner(),
        }
    }
}

impl NeighborSearch for LinearSearch {
    fn len(&self) -> usize {
        self.remaining.len()
    }

    fn nearest(&self, from: &Pixel) -> Option<(Pixel, i128)> {
        let mut best: Option<(Pixel, i128)> = None;
        // Iteration is lexicographic, so keeping the first strict minimum
        // resolves ties towards the smallest pixel.
        for p in &self.remaining {
            let d = from.distance_squared(p);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((*p, d));
            }
        }
        best
    }

    fn remove(&mut self, pixel: &Pixel) -> bool {
        self.remaining.remove(pixel)
    }

    fn pop_seed(&mut self) -> Option<Pixel> {
        self.remaining.pop_first()
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// R*-tree backed search.
///
/// The tree stores `[row, col]` as `i128` so squared distances are exact. A
/// sorted set of the same pixels provides seed selection.
pub struct RTreeSearch {
    tree: RTree<[i128; 2]>,
    seeds: BTreeSet<Pixel>,
}

impl RTreeSearch {
    pub fn new(pixels: PixelSet) -> Self {
        let seeds = pixels.into_inner();
        let entries: Vec<[i128; 2]> = seeds.iter().map(|p| to_entry(*p)).collect();
        Self {
            tree: RTree::bulk_load(entries),
            seeds,
        }
    }
}

#[inline]
fn to_entry(p: Pixel) -> [i128; 2] {
    [p.row as i128, p.col as i128]
}

#[inline]
fn from_entry(e: &[i128; 2]) -> Pixel {
    Pixel::new(e[0] as i32, e[1] as i32)
}

impl NeighborSearch for RTreeSearch {
    fn len(&self) -> usize {
        self.seeds.len()
    }

    fn nearest(&self, from: &Pixel) -> Option<(Pixel, i128)> {
        let mut iter = self
            .tree
            .nearest_neighbor_iter_with_distance_2(&to_entry(*from));
        let (first, best_d) = iter.next()?;
        let mut best = from_entry(first);
        // The iterator yields in non-decreasing distance; scan the tied shell.
        for (entry, d) in iter {
            if d > best_d {
                break;
            }
            let candidate = from_entry(entry);
            if candidate < best {
                best = candidate;
            }
        }
        Some((best, best_d))
    }

    fn remove(&mut self, pixel: &Pixel) -> bool {
        if self.seeds.remove(pixel) {
            self.tree.remove(&to_entry(*pixel));
            true
        } else {
            false
        }
    }

    fn pop_seed(&mut self) -> Option<Pixel> {
        let seed = self.seeds.pop_first()?;
        self.tree.remove(&to_entry(seed));
        Some(seed)
    }

    fn name(&self) -> &'static str {
        "rtree"
    }
}
