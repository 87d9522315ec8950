//! # PixelPath
//!
//! Converts boundary pixel sets into pen waypoints for a drawing robot.
//!
//! The upstream image stages (bordering, colour quantisation, edge detection,
//! connected-component labelling) hand this crate one [`PixelSet`] per
//! boundary component. From there the pipeline is:
//!
//! - **Ordering**: stitch the unordered pixels into continuous sections with
//!   bidirectional greedy nearest-neighbour growth ([`order`])
//! - **Simplification**: reduce each section to a sparse polyline with
//!   Douglas-Peucker ([`simplify`])
//! - **Synthesis**: close every polyline and annotate it with pen states
//!   ([`synthesize`])
//! - **Persistence**: write `x, y, pen_state` lines ([`waypoint::writer`])
//!
//! In [`TraceMode::Fill`] the ordering and simplification stages are
//! replaced by a boustrophedon row fill of each component ([`fill()`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use pixelpath::{PixelSet, TraceConfig, TracePipeline};
//!
//! let components: Vec<PixelSet> = pixelpath::input::load_components("edges.json")?;
//! let pipeline = TracePipeline::new(TraceConfig::default())?;
//! let output = pipeline.process(components);
//! output.stream.write_to_file("image_waypoints.txt")?;
//! ```

pub mod config;
pub mod geometry;
pub mod input;
pub mod order;
pub mod pipeline;
pub mod waypoint;

pub use config::{SearchBackend, SectionPolicy, TraceConfig, TraceMode};
pub use geometry::simplify::{douglas_peucker, simplify};
pub use geometry::{Line, Pixel, PixelSet, Polyline};
pub use order::{order, OrderedEdge, OrderedSection, PathOrderer};
pub use pipeline::{ComponentReport, ComponentStatus, TraceOutput, TracePipeline, TraceStats};
pub use waypoint::{fill, fill_path, synthesize, PenState, Waypoint, WaypointStream};

/// Coordinate type for pixel rows and columns.
pub type Coord = i32;

/// Floating-point type for distances and tolerances (in pixels).
pub type CoordF = f64;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tracing operations.
///
/// Errors are local to one component: the batch pipeline records them per
/// component and keeps processing the rest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pixel set, section or polyline is empty where a point is required.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A section is too short to define a chord for distance computations.
    #[error("Degenerate section: {len} point(s), need at least 2")]
    DegenerateSection { len: usize },

    /// A numeric parameter is negative or NaN.
    #[error("Invalid parameter: {0}")]
    Parameter(String),

    /// Ordering a component exceeded its time budget.
    #[error("Timed out after {elapsed_ms} ms (budget {budget_ms} ms)")]
    Timeout { elapsed_ms: u64, budget_ms: u64 },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::DegenerateSection { len: 1 };
        assert_eq!(
            err.to_string(),
            "Degenerate section: 1 point(s), need at least 2"
        );

        let err = Error::Timeout {
            elapsed_ms: 120,
            budget_ms: 100,
        };
        assert_eq!(err.to_string(), "Timed out after 120 ms (budget 100 ms)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
