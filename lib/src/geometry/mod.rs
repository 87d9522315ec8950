//! Geometry primitives for boundary tracing.
//!
//! - [`Pixel`] - integer (row, column) coordinate
//! - [`PixelSet`] - unordered, deduplicated pixels of one boundary component
//! - [`Line`] - segment between two pixels, with point-to-segment distance
//! - [`Polyline`] - ordered pixel path (ordered sections, simplified output)
//!
//! ## Coordinate System
//!
//! Coordinates are image pixels: `row` grows downwards, `col` grows to the
//! right. Distances and tolerances are measured in pixels.

mod line;
mod pixel;
mod pixel_set;
mod polyline;
pub mod simplify;

pub use line::Line;
pub use pixel::Pixel;
pub use pixel_set::PixelSet;
pub use polyline::Polyline;
pub use simplify::{chord, douglas_peucker, farthest_from_chord, simplify, simplify_all};

use crate::CoordF;

/// Check that every consecutive pair of points is strictly closer than `max_step`.
pub fn steps_within(points: &[Pixel], max_step: CoordF) -> bool {
    points.windows(2).all(|w| w[0].distance(&w[1]) < max_step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_within() {
        let points = vec![Pixel::new(0, 0), Pixel::new(1, 1), Pixel::new(1, 2)];
        assert!(steps_within(&points, 1.5));
        assert!(!steps_within(&points, 1.4));
        assert!(steps_within(&points[..1], 0.0));
    }
}
