//! Waypoint synthesis.
//!
//! Turns simplified polylines into the flat pen-annotated waypoint stream
//! consumed by the drawing robot. Each polyline is closed into a loop, its
//! first and closing points are travel moves (pen up) and everything in
//! between is drawn (pen down). Region fills ([`fill()`]) follow the same
//! convention for an open stroke.

pub mod fill;
pub mod writer;

pub use fill::{fill, fill_path};

use crate::geometry::Polyline;
use crate::{Coord, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Pen state attached to a waypoint.
///
/// Encoded as `0` (draw while moving to the point) or `1` (travel without
/// marking) in the waypoint file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PenState {
    /// Draw while moving to this point.
    Down,
    /// Move to this point without marking.
    Up,
}

impl PenState {
    /// Numeric code written to the waypoint file.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            PenState::Down => 0,
            PenState::Up => 1,
        }
    }

    /// Returns true if the pen marks the surface.
    #[inline]
    pub fn is_drawing(self) -> bool {
        self == PenState::Down
    }
}

impl From<PenState> for u8 {
    fn from(pen: PenState) -> Self {
        pen.code()
    }
}

impl TryFrom<u8> for PenState {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(PenState::Down),
            1 => Ok(PenState::Up),
            other => Err(format!("invalid pen state {other}, expected 0 or 1")),
        }
    }
}

impl fmt::Display for PenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single actuator target.
///
/// `x` is the pixel row and `y` the pixel column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: Coord,
    pub y: Coord,
    pub pen: PenState,
}

impl Waypoint {
    #[inline]
    pub const fn new(x: Coord, y: Coord, pen: PenState) -> Self {
        Self { x, y, pen }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.pen)
    }
}

/// All waypoints for one image, grouped by polyline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointStream {
    waypoints: Vec<Waypoint>,
    /// Index of the first waypoint of each polyline.
    polyline_starts: Vec<usize>,
}

impl WaypointStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream for one open stroke: travel to its start, draw through the
    /// rest, then lift in place at its end. An empty stroke gives an empty
    /// stream.
    pub fn from_stroke(stroke: &Polyline) -> Self {
        let mut stream = Self::new();
        let (Some(first), Some(last)) = (stroke.first(), stroke.last()) else {
            return stream;
        };
        stream.polyline_starts.push(0);
        stream
            .waypoints
            .push(Waypoint::new(first.row, first.col, PenState::Up));
        stream.waypoints.extend(
            stroke
                .iter()
                .skip(1)
                .map(|p| Waypoint::new(p.row, p.col, PenState::Down)),
        );
        stream
            .waypoints
            .push(Waypoint::new(last.row, last.col, PenState::Up));
        stream
    }

    /// All waypoints in emission order.
    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if the stream has no waypoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of polylines in the stream.
    #[inline]
    pub fn polyline_count(&self) -> usize {
        self.polyline_starts.len()
    }

    /// Iterate over waypoints.
    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }

    /// Iterate over the waypoints of each polyline.
    pub fn polylines(&self) -> impl Iterator<Item = &[Waypoint]> + '_ {
        self.polyline_starts.iter().enumerate().map(move |(i, &start)| {
            let end = self
                .polyline_starts
                .get(i + 1)
                .copied()
                .unwrap_or(self.waypoints.len());
            &self.waypoints[start..end]
        })
    }

    /// Append another stream after this one.
    pub fn append(&mut self, other: WaypointStream) {
        let offset = self.waypoints.len();
        self.polyline_starts
            .extend(other.polyline_starts.into_iter().map(|s| s + offset));
        self.waypoints.extend(other.waypoints);
    }

    /// Append one closed polyline with pen states assigned.
    fn push_closed(&mut self, closed: &Polyline) {
        let last = closed.len().saturating_sub(1);
        self.polyline_starts.push(self.waypoints.len());
        self.waypoints
            .extend(closed.iter().enumerate().map(|(i, p)| {
                let pen = if i == 0 || i == last {
                    PenState::Up
                } else {
                    PenState::Down
                };
                Waypoint::new(p.row, p.col, pen)
            }));
    }

    /// Render the stream as waypoint file text.
    pub fn to_text(&self) -> String {
        writer::to_string(&self.waypoints)
    }

    /// Write the stream as a waypoint file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        writer::write_file(path, &self.waypoints)
    }
}

impl<'a> IntoIterator for &'a WaypointStream {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}

/// Build the waypoint stream for a sequence of simplified polylines.
///
/// Each polyline is closed if its last point differs from its first. Its
/// first and last waypoints are pen up, all others pen down. An empty list
/// yields an empty stream; an empty polyline fails with
/// [`Error::EmptyInput`].
pub fn synthesize(polylines: &[Polyline]) -> Result<WaypointStream> {
    let mut stream = WaypointStream::new();
    for (i, polyline) in polylines.iter().enumerate() {
        if polyline.is_empty() {
            return Err(Error::EmptyInput(format!("polyline {i} has no points")));
        }
        stream.push_closed(&polyline.closed());
    }
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Pixel;

    fn pl(coords: &[(i32, i32)]) -> Polyline {
        coords.iter().copied().map(Pixel::from).collect()
    }

    fn pens(waypoints: &[Waypoint]) -> Vec<u8> {
        waypoints.iter().map(|w| w.pen.code()).collect()
    }

    #[test]
    fn test_synthesize_two_polylines() {
        let stream =
            synthesize(&[pl(&[(0, 0), (1, 0), (1, 1)]), pl(&[(2, 2), (3, 2)])]).unwrap();
        assert_eq!(stream.len(), 7);
        assert_eq!(stream.polyline_count(), 2);

        let groups: Vec<&[Waypoint]> = stream.polylines().collect();
        assert_eq!(pens(groups[0]), vec![1, 0, 0, 1]);
        assert_eq!(pens(groups[1]), vec![1, 0, 1]);
        assert_eq!(groups[0][3], Waypoint::new(0, 0, PenState::Up));
        assert_eq!(groups[1][2], Waypoint::new(2, 2, PenState::Up));
    }

    #[test]
    fn test_synthesize_closed_input_unchanged() {
        let closed = pl(&[(0, 0), (0, 5), (5, 5), (0, 0)]);
        let once = synthesize(&[closed.clone()]).unwrap();
        let twice = synthesize(&[closed.closed().closed()]).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn test_pen_state_shape() {
        let stream = synthesize(&[
            pl(&[(0, 0), (0, 9), (9, 9), (9, 0)]),
            pl(&[(4, 4), (5, 5)]),
        ])
        .unwrap();
        for group in stream.polylines() {
            let n = group.len();
            assert!(n >= 2);
            assert_eq!(group[0].pen, PenState::Up);
            assert_eq!(group[n - 1].pen, PenState::Up);
            assert!(group[1..n - 1].iter().all(|w| w.pen.is_drawing()));
        }
    }

    #[test]
    fn test_synthesize_empty_list() {
        let stream = synthesize(&[]).unwrap();
        assert!(stream.is_empty());
        assert_eq!(stream.polyline_count(), 0);
        assert_eq!(stream.to_text(), "");
    }

    #[test]
    fn test_synthesize_empty_polyline() {
        let result = synthesize(&[pl(&[(0, 0), (0, 1)]), Polyline::new()]);
        assert!(matches!(result, Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_synthesize_single_point() {
        let stream = synthesize(&[pl(&[(7, 8)])]).unwrap();
        assert_eq!(stream.waypoints(), &[Waypoint::new(7, 8, PenState::Up)]);
    }

    #[test]
    fn test_x_is_row() {
        let stream = synthesize(&[pl(&[(3, 9), (4, 9)])]).unwrap();
        assert_eq!(stream.waypoints()[0].x, 3);
        assert_eq!(stream.waypoints()[0].y, 9);
    }

    #[test]
    fn test_append() {
        let mut a = synthesize(&[pl(&[(0, 0), (0, 1)])]).unwrap();
        let b = synthesize(&[pl(&[(5, 5), (5, 6), (6, 6)])]).unwrap();
        a.append(b);
        assert_eq!(a.polyline_count(), 2);
        let groups: Vec<&[Waypoint]> = a.polylines().collect();
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1].len(), 4);
        assert_eq!(groups[1][0], Waypoint::new(5, 5, PenState::Up));
    }

    #[test]
    fn test_from_stroke() {
        let stream = WaypointStream::from_stroke(&pl(&[(0, 0), (0, 4), (2, 4)]));
        assert_eq!(stream.polyline_count(), 1);
        assert_eq!(pens(stream.waypoints()), vec![1, 0, 0, 1]);
        assert_eq!(stream.waypoints()[3], Waypoint::new(2, 4, PenState::Up));
        assert!(WaypointStream::from_stroke(&Polyline::new()).is_empty());
    }

    #[test]
    fn test_pen_state_serde() {
        let json = serde_json::to_string(&Waypoint::new(1, 2, PenState::Down)).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2,"pen":0}"#);
        assert!(serde_json::from_str::<PenState>("2").is_err());
        assert_eq!(serde_json::from_str::<PenState>("1").unwrap(), PenState::Up);
    }
}
