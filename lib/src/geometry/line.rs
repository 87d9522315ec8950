//! Line segment type.
//!
//! Provides the segment distance used by simplification: the distance from a
//! point to the closest point of the segment, not to the infinite line.

use super::Pixel;
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line segment defined by two endpoints.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub a: Pixel,
    pub b: Pixel,
}

impl Line {
    /// Create a new line segment from two points.
    #[inline]
    pub const fn new(a: Pixel, b: Pixel) -> Self {
        Self { a, b }
    }

    /// Get the squared length of the line segment.
    #[inline]
    pub fn length_squared(&self) -> i128 {
        self.a.distance_squared(&self.b)
    }

    /// Check if this line segment is a point (zero length).
    #[inline]
    pub fn is_point(&self) -> bool {
        self.a == self.b
    }

    /// Dot product of `p - a` with `b - a`.
    #[inline]
    fn dot(&self, p: &Pixel) -> i128 {
        let (dr, dc) = self.b - self.a;
        let (pr, pc) = *p - self.a;
        pr * dr + pc * dc
    }

    /// Distance from a point to this line segment.
    ///
    /// Which part of the segment is closest is decided in exact integer
    /// arithmetic; only the final division rounds. A degenerate segment
    /// (`a == b`) falls back to point-to-point distance.
    pub fn distance_to(&self, p: &Pixel) -> CoordF {
        if self.is_point() {
            return p.distance(&self.a);
        }
        let len_sq = self.length_squared();
        let dot = self.dot(p);
        if dot <= 0 {
            p.distance(&self.a)
        } else if dot >= len_sq {
            p.distance(&self.b)
        } else {
            self.distance_to_infinite(p)
        }
    }

    /// Distance from a point to the infinite line through this segment.
    pub fn distance_to_infinite(&self, p: &Pixel) -> CoordF {
        let len_sq = self.length_squared();
        if len_sq == 0 {
            return p.distance(&self.a);
        }

        // Distance = |cross(b-a, p-a)| / |b-a|
        let (dr, dc) = self.b - self.a;
        let (pr, pc) = *p - self.a;
        let cross = (dr * pc - dc * pr).abs();
        cross as CoordF / (len_sq as CoordF).sqrt()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?} -> {:?})", self.a, self.b)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.a, self.b)
    }
}
