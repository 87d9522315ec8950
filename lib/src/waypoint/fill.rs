//! Boustrophedon fill.
//!
//! Covers a region with horizontal strokes instead of tracing its outline.
//! Every `step`-th row from the top of the region gets one stroke between
//! the leftmost and rightmost pixel of that row, and consecutive strokes
//! alternate direction so the pen snakes down the region.

use std::collections::BTreeMap;

use super::WaypointStream;
use crate::geometry::{Pixel, PixelSet, Polyline};
use crate::{Coord, Error, Result};

/// Leftmost and rightmost column of every occupied row.
fn row_spans(region: &PixelSet) -> BTreeMap<Coord, (Coord, Coord)> {
    let mut spans = BTreeMap::new();
    for p in region {
        spans
            .entry(p.row)
            .and_modify(|(lo, hi): &mut (Coord, Coord)| {
                *lo = (*lo).min(p.col);
                *hi = (*hi).max(p.col);
            })
            .or_insert((p.col, p.col));
    }
    spans
}

/// Fill path of a region as an open polyline.
///
/// Rows `min_row`, `min_row + step`, ... are visited; a visited row with no
/// pixels is skipped but still counts toward the direction alternation.
/// Even strokes run left to right, odd strokes right to left. Each stroke
/// contributes its two end points, even when they coincide.
///
/// Fails with [`Error::Parameter`] if `step` is zero and with
/// [`Error::EmptyInput`] for an empty region.
pub fn fill_path(region: &PixelSet, step: usize) -> Result<Polyline> {
    if step == 0 {
        return Err(Error::Parameter("fill_step must be at least 1".into()));
    }
    let spans = row_spans(region);
    let Some(&min_row) = spans.keys().next() else {
        return Err(Error::EmptyInput("fill region has no pixels".into()));
    };

    let step = step as u64;
    let mut path = Polyline::with_capacity(2 * spans.len());
    for (&row, &(start, end)) in &spans {
        let offset = (row as i64 - min_row as i64) as u64;
        if offset % step != 0 {
            continue;
        }
        let (from, to) = if (offset / step) % 2 == 0 {
            (start, end)
        } else {
            (end, start)
        };
        path.push(Pixel::new(row, from));
        path.push(Pixel::new(row, to));
    }
    Ok(path)
}

/// Waypoints that fill a region.
///
/// The whole fill is one group: a pen-up travel to the first stroke, every
/// following point drawn, and a pen-up lift in place after the last stroke.
pub fn fill(region: &PixelSet, step: usize) -> Result<WaypointStream> {
    Ok(WaypointStream::from_stroke(&fill_path(region, step)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waypoint::{PenState, Waypoint};

    fn rect(rows: std::ops::RangeInclusive<i32>, cols: std::ops::RangeInclusive<i32>) -> PixelSet {
        let mut region = PixelSet::new();
        for r in rows {
            for c in cols.clone() {
                region.insert(Pixel::new(r, c));
            }
        }
        region
    }

    fn pts(coords: &[(i32, i32)]) -> Vec<Pixel> {
        coords.iter().copied().map(Pixel::from).collect()
    }

    #[test]
    fn test_rows_alternate_direction() {
        let path = fill_path(&rect(0..=4, 0..=3), 2).unwrap();
        assert_eq!(
            path.points(),
            &pts(&[(0, 0), (0, 3), (2, 3), (2, 0), (4, 0), (4, 3)])[..]
        );
    }

    #[test]
    fn test_empty_row_keeps_parity() {
        // Row 2 is a visited row with no pixels.
        let mut region = rect(0..=1, 0..=5);
        region.extend(rect(3..=6, 1..=4));
        let path = fill_path(&region, 2).unwrap();
        assert_eq!(
            path.points(),
            &pts(&[(0, 0), (0, 5), (4, 1), (4, 4), (6, 4), (6, 1)])[..]
        );
    }

    #[test]
    fn test_row_span_uses_extreme_columns() {
        // Holes inside a row do not split the stroke.
        let region: PixelSet = [(5, 9), (5, 2), (5, 4), (8, 7)].into_iter().collect();
        let path = fill_path(&region, 3).unwrap();
        assert_eq!(path.points(), &pts(&[(5, 2), (5, 9), (8, 7), (8, 7)])[..]);
    }

    #[test]
    fn test_offset_and_negative_rows() {
        let path = fill_path(&rect(-4..=3, 0..=1), 3).unwrap();
        let rows: Vec<i32> = path.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![-4, -4, -1, -1, 2, 2]);
        assert_eq!(path[2], Pixel::new(-1, 1));
    }

    #[test]
    fn test_step_one_visits_every_row() {
        let path = fill_path(&rect(0..=3, 0..=2), 1).unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(path[3], Pixel::new(1, 0));
        assert_eq!(path[5], Pixel::new(2, 2));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            fill_path(&rect(0..=2, 0..=2), 0),
            Err(Error::Parameter(_))
        ));
        assert!(matches!(
            fill_path(&PixelSet::new(), 10),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_fill_pen_states() {
        let stream = fill(&rect(0..=2, 0..=4), 2).unwrap();
        assert_eq!(stream.polyline_count(), 1);
        let pens: Vec<u8> = stream.iter().map(|w| w.pen.code()).collect();
        assert_eq!(pens, vec![1, 0, 0, 0, 1]);
        assert_eq!(stream.waypoints()[0], Waypoint::new(0, 0, PenState::Up));
        assert_eq!(stream.waypoints()[4], Waypoint::new(2, 0, PenState::Up));
        assert_eq!(stream.to_text().lines().nth(1), Some("0, 4, 0"));
    }

    #[test]
    fn test_fill_single_pixel() {
        let region: PixelSet = [(7, 7)].into_iter().collect();
        let stream = fill(&region, 10).unwrap();
        assert_eq!(
            stream.waypoints(),
            &[
                Waypoint::new(7, 7, PenState::Up),
                Waypoint::new(7, 7, PenState::Down),
                Waypoint::new(7, 7, PenState::Up),
            ]
        );
    }
}
