//! Boundary pixel ordering.
//!
//! Stitches the unordered pixels of one boundary component into continuous
//! sections using bidirectional greedy nearest-neighbour growth:
//!
//! 1. Take the smallest remaining pixel as the seed and grow forward from
//!    the section's last pixel while the nearest remaining pixel is closer
//!    than the distance threshold.
//! 2. When forward growth stalls, grow backward from the section's first
//!    pixel under the same rule.
//! 3. When both directions stall, commit the section if it has more than
//!    `min_section_size` pixels, otherwise drop it, then reseed.
//! 4. The section that exhausts the pool is always committed.
//!
//! Pixels of a dropped section are never returned to the pool. They are
//! counted in [`OrderedEdge::dropped`].

pub mod neighbors;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{SearchBackend, TraceConfig};
use crate::geometry::{Pixel, PixelSet, Polyline};
use crate::{CoordF, Error, Result};

pub use neighbors::{build_search, LinearSearch, NeighborSearch, RTreeSearch};

/// A continuously traversable run of pixels.
pub type OrderedSection = Polyline;

/// How often (in growth steps) the time budget is checked.
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Sections produced from one pixel set, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedEdge {
    /// Committed sections.
    pub sections: Vec<OrderedSection>,
    /// Pixels dropped with discarded short sections.
    pub dropped: usize,
}

impl OrderedEdge {
    /// Number of sections.
    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if no section was committed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of pixels across all sections.
    pub fn point_count(&self) -> usize {
        self.sections.iter().map(Polyline::len).sum()
    }

    /// The first committed section, if any.
    pub fn first(&self) -> Option<&OrderedSection> {
        self.sections.first()
    }

    /// Iterate over the sections.
    pub fn iter(&self) -> std::slice::Iter<'_, OrderedSection> {
        self.sections.iter()
    }

    /// Consume the edge and return its sections.
    pub fn into_sections(self) -> Vec<OrderedSection> {
        self.sections
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// The section being grown and its growth direction.
struct Growth {
    points: VecDeque<Pixel>,
    seed: Pixel,
    direction: Direction,
}

impl Growth {
    fn start(seed: Pixel) -> Self {
        let mut points = VecDeque::new();
        points.push_back(seed);
        Self {
            points,
            seed,
            direction: Direction::Forward,
        }
    }

    fn head(&self) -> Pixel {
        let end = match self.direction {
            Direction::Forward => self.points.back(),
            Direction::Backward => self.points.front(),
        };
        end.copied().unwrap_or(self.seed)
    }

    fn extend(&mut self, pixel: Pixel) {
        match self.direction {
            Direction::Forward => self.points.push_back(pixel),
            Direction::Backward => self.points.push_front(pixel),
        }
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn finish(self) -> OrderedSection {
        Polyline::from_points(self.points.into())
    }
}

/// Orders boundary pixels into sections.
#[derive(Clone, Debug)]
pub struct PathOrderer {
    distance_threshold: CoordF,
    min_section_size: usize,
    backend: SearchBackend,
    spatial_index_threshold: usize,
    time_budget: Option<Duration>,
}

impl PathOrderer {
    /// Create an orderer with the automatic search backend and no time budget.
    ///
    /// Fails with [`Error::Parameter`] if `distance_threshold` is negative or NaN.
    pub fn new(distance_threshold: CoordF, min_section_size: usize) -> Result<Self> {
        crate::config::check_non_negative("distance_threshold", distance_threshold)?;
        let defaults = TraceConfig::default();
        Ok(Self {
            distance_threshold,
            min_section_size,
            backend: defaults.search,
            spatial_index_threshold: defaults.spatial_index_threshold,
            time_budget: None,
        })
    }

    /// Create an orderer from the ordering fields of a configuration.
    pub fn from_config(config: &TraceConfig) -> Result<Self> {
        Ok(Self::new(config.distance_threshold, config.min_section_size)?
            .with_backend(config.search)
            .with_spatial_index_threshold(config.spatial_index_threshold)
            .with_time_budget(config.time_budget_ms.map(Duration::from_millis)))
    }

    /// Builder method: set the nearest-neighbour backend.
    pub fn with_backend(mut self, backend: SearchBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Builder method: set the size above which `Auto` uses the R-tree.
    pub fn with_spatial_index_threshold(mut self, threshold: usize) -> Self {
        self.spatial_index_threshold = threshold;
        self
    }

    /// Builder method: set or clear the time budget.
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    /// Distance threshold in pixels.
    pub fn distance_threshold(&self) -> CoordF {
        self.distance_threshold
    }

    /// Minimum size of a non-terminal section.
    pub fn min_section_size(&self) -> usize {
        self.min_section_size
    }

    #[inline]
    fn within_threshold(&self, distance_squared: i128) -> bool {
        (distance_squared as CoordF).sqrt() < self.distance_threshold
    }

    /// Order a pixel set into sections, consuming it.
    ///
    /// Fails with [`Error::EmptyInput`] for an empty set and with
    /// [`Error::Timeout`] if a time budget is set and exceeded.
    pub fn order(&self, pixels: PixelSet) -> Result<OrderedEdge> {
        if pixels.is_empty() {
            return Err(Error::EmptyInput("pixel set has no pixels".into()));
        }

        let total = pixels.len();
        let started = Instant::now();
        let mut pool = build_search(pixels, self.backend, self.spatial_index_threshold);
        debug!("Ordering {} pixels with {} search", total, pool.name());

        let Some(seed) = pool.pop_seed() else {
            return Err(Error::EmptyInput("pixel set has no pixels".into()));
        };
        let mut growth = Growth::start(seed);
        let mut edge = OrderedEdge::default();
        let mut steps = 0usize;

        while !pool.is_empty() {
            if steps % DEADLINE_CHECK_INTERVAL == 0 {
                self.check_deadline(started)?;
            }
            steps += 1;

            let Some((candidate, distance_squared)) = pool.nearest(&growth.head()) else {
                break;
            };

            if self.within_threshold(distance_squared) {
                pool.remove(&candidate);
                growth.extend(candidate);
                continue;
            }

            match growth.direction {
                Direction::Forward => {
                    trace!("Forward growth stalled at {}, reversing", growth.head());
                    growth.direction = Direction::Backward;
                }
                Direction::Backward => {
                    let Some(next_seed) = pool.pop_seed() else {
                        break;
                    };
                    let finished = std::mem::replace(&mut growth, Growth::start(next_seed));
                    self.close_section(&mut edge, finished);
                }
            }
        }

        let terminal = growth.finish();
        debug!("Terminal section of {} pixels", terminal.len());
        edge.sections.push(terminal);

        debug!(
            "Ordered {} pixels into {} section(s), {} dropped",
            total,
            edge.len(),
            edge.dropped
        );
        Ok(edge)
    }

    fn close_section(&self, edge: &mut OrderedEdge, growth: Growth) {
        let len = growth.len();
        if len > self.min_section_size {
            debug!("Committed section of {} pixels", len);
            edge.sections.push(growth.finish());
        } else {
            debug!(
                "Discarded section of {} pixels (minimum {})",
                len, self.min_section_size
            );
            edge.dropped += len;
        }
    }

    fn check_deadline(&self, started: Instant) -> Result<()> {
        if let Some(budget) = self.time_budget {
            let elapsed = started.elapsed();
            if elapsed >= budget {
                return Err(Error::Timeout {
                    elapsed_ms: elapsed.as_millis() as u64,
                    budget_ms: budget.as_millis() as u64,
                });
            }
        }
        Ok(())
    }
}

/// Order a pixel set with the given threshold and minimum section size.
///
/// Shorthand for [`PathOrderer::new`] followed by [`PathOrderer::order`].
pub fn order(
    pixels: PixelSet,
    distance_threshold: CoordF,
    min_section_size: usize,
) -> Result<OrderedEdge> {
    PathOrderer::new(distance_threshold, min_section_size)?.order(pixels)
}
