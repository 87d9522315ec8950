//! Path simplification.
//!
//! Reduces an ordered section to a sparse polyline with the Douglas-Peucker
//! algorithm: a point survives only if it deviates from the chord of its
//! enclosing span by more than the tolerance.
//!
//! The implementation works on an explicit stack of index spans instead of
//! recursing, so pathological inputs (long spirals, sawtooth edges) cannot
//! exhaust the call stack.

use super::{Line, Pixel, Polyline};
use crate::{CoordF, Error, Result};

/// Chord of a span: the segment from its first to its last point.
///
/// Fails with [`Error::DegenerateSection`] for fewer than two points.
pub fn chord(points: &[Pixel]) -> Result<Line> {
    match (points.first(), points.last()) {
        (Some(&a), Some(&b)) if points.len() >= 2 => Ok(Line::new(a, b)),
        _ => Err(Error::DegenerateSection { len: points.len() }),
    }
}

/// Interior point farthest from the chord, as `(index, distance)`.
///
/// Returns `Ok(None)` when the span has no interior points. Ties keep the
/// earliest index.
pub fn farthest_from_chord(points: &[Pixel]) -> Result<Option<(usize, CoordF)>> {
    let line = chord(points)?;
    let mut best: Option<(usize, CoordF)> = None;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let dist = line.distance_to(p);
        if best.map_or(true, |(_, d)| dist > d) {
            best = Some((i, dist));
        }
    }
    Ok(best)
}

/// Douglas-Peucker line simplification.
///
/// The first and last points are always preserved. A span is split at its
/// farthest interior point when that point lies strictly farther than
/// `epsilon` from the span's chord; otherwise the whole interior is dropped.
///
/// Inputs with two or fewer points are returned unchanged.
pub fn douglas_peucker(points: &[Pixel], epsilon: CoordF) -> Vec<Pixel> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    // Track which points to keep
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0, points.len() - 1)];

    while let Some((anchor_idx, floater_idx)) = stack.pop() {
        if anchor_idx + 1 >= floater_idx {
            continue;
        }

        let line = Line::new(points[anchor_idx], points[floater_idx]);

        // Find point furthest from the anchor-floater segment
        let mut max_dist = 0.0;
        let mut furthest_idx = anchor_idx;

        for (i, p) in points
            .iter()
            .enumerate()
            .take(floater_idx)
            .skip(anchor_idx + 1)
        {
            let dist = line.distance_to(p);
            if dist > max_dist {
                max_dist = dist;
                furthest_idx = i;
            }
        }

        if furthest_idx != anchor_idx && max_dist > epsilon {
            keep[furthest_idx] = true;
            stack.push((furthest_idx, floater_idx));
            stack.push((anchor_idx, furthest_idx));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Simplify an ordered section into a sparse polyline.
///
/// `epsilon` is in pixels; larger values keep fewer points. Fails with
/// [`Error::Parameter`] if `epsilon` is negative or NaN.
pub fn simplify(section: &Polyline, epsilon: CoordF) -> Result<Polyline> {
    check_epsilon(epsilon)?;
    Ok(Polyline::from_points(douglas_peucker(section.points(), epsilon)))
}

/// Simplify several sections with the same tolerance.
pub fn simplify_all(sections: &[Polyline], epsilon: CoordF) -> Result<Vec<Polyline>> {
    check_epsilon(epsilon)?;
    Ok(sections
        .iter()
        .map(|s| Polyline::from_points(douglas_peucker(s.points(), epsilon)))
        .collect())
}

fn check_epsilon(epsilon: CoordF) -> Result<()> {
    crate::config::check_non_negative("epsilon", epsilon)
}
