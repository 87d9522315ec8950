//! Pipeline module - orchestrates the complete tracing process.
//!
//! This module provides a high-level API for one image:
//! components → ordered sections → simplified polylines → waypoints
//!
//! In fill mode each component becomes a single boustrophedon stroke
//! instead.
//!
//! Components are independent: they are traced in parallel with rayon and
//! each one either succeeds, is skipped by the size filter, or fails on its
//! own without affecting the rest of the batch. The output keeps the input
//! component order.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixelpath::{TraceConfig, TracePipeline};
//!
//! let pipeline = TracePipeline::new(TraceConfig::default().with_epsilon(2.0))?;
//! let output = pipeline.process(components);
//! println!("{}", output.stats);
//! output.stream.write_to_file("image_waypoints.txt")?;
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{SectionPolicy, TraceConfig, TraceMode};
use crate::geometry::{simplify, PixelSet, Polyline};
use crate::order::PathOrderer;
use crate::waypoint::{fill_path, synthesize, WaypointStream};
use crate::{Error, Result};

/// Outcome of one component.
#[derive(Debug)]
pub enum ComponentStatus {
    /// Ordered, simplified and synthesized, or filled.
    Traced {
        /// Sections committed by the orderer, or fill rows drawn.
        sections: usize,
        /// Polylines emitted after the section policy.
        polylines: usize,
        /// Pixels lost with discarded short sections.
        dropped: usize,
        /// Pixels in the emitted sections before simplification.
        ordered_points: usize,
        /// Points in the emitted polylines after simplification, or in the
        /// fill path.
        simplified_points: usize,
        /// Waypoints produced, including closing points.
        waypoints: usize,
    },
    /// Below the minimum component size; not ordered.
    Skipped,
    /// Tracing failed; the component contributes no waypoints.
    Failed(Error),
}

/// Per-component entry of a batch report.
#[derive(Debug)]
pub struct ComponentReport {
    /// Position of the component in the input.
    pub index: usize,
    /// Number of input pixels.
    pub pixels: usize,
    pub status: ComponentStatus,
}

impl ComponentReport {
    pub fn is_traced(&self) -> bool {
        matches!(self.status, ComponentStatus::Traced { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ComponentStatus::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ComponentStatus::Failed(_))
    }

    /// The error of a failed component.
    pub fn error(&self) -> Option<&Error> {
        match &self.status {
            ComponentStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Aggregate counts for a batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TraceStats {
    pub components: usize,
    pub traced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub input_pixels: usize,
    pub dropped_pixels: usize,
    pub sections: usize,
    pub polylines: usize,
    pub ordered_points: usize,
    pub simplified_points: usize,
    pub waypoints: usize,
    /// Share of ordered points removed by simplification, in percent.
    pub reduction_percent: f64,
}

impl TraceStats {
    fn from_reports(reports: &[ComponentReport]) -> Self {
        let mut stats = TraceStats {
            components: reports.len(),
            ..Default::default()
        };
        for report in reports {
            stats.input_pixels += report.pixels;
            match &report.status {
                ComponentStatus::Traced {
                    sections,
                    polylines,
                    dropped,
                    ordered_points,
                    simplified_points,
                    waypoints,
                } => {
                    stats.traced += 1;
                    stats.sections += sections;
                    stats.polylines += polylines;
                    stats.dropped_pixels += dropped;
                    stats.ordered_points += ordered_points;
                    stats.simplified_points += simplified_points;
                    stats.waypoints += waypoints;
                }
                ComponentStatus::Skipped => stats.skipped += 1,
                ComponentStatus::Failed(_) => stats.failed += 1,
            }
        }
        if stats.ordered_points > 0 {
            stats.reduction_percent =
                100.0 * (1.0 - stats.simplified_points as f64 / stats.ordered_points as f64);
        }
        stats
    }

    /// Generate a JSON report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for TraceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Components: {} traced, {} skipped, {} failed",
            self.traced, self.skipped, self.failed
        )?;
        writeln!(
            f,
            "Pixels: {} input, {} ordered, {} dropped",
            self.input_pixels, self.ordered_points, self.dropped_pixels
        )?;
        writeln!(
            f,
            "Polylines: {} from {} section(s), {} points ({:.1}% reduction)",
            self.polylines, self.sections, self.simplified_points, self.reduction_percent
        )?;
        write!(f, "Waypoints: {}", self.waypoints)
    }
}

/// Result of tracing one image.
#[derive(Debug)]
pub struct TraceOutput {
    /// Waypoints of all traced components, in input order.
    pub stream: WaypointStream,
    /// One report per input component, in input order.
    pub reports: Vec<ComponentReport>,
    pub stats: TraceStats,
}

impl TraceOutput {
    /// Reports of failed components.
    pub fn failures(&self) -> impl Iterator<Item = &ComponentReport> {
        self.reports.iter().filter(|r| r.is_failed())
    }
}

/// Simplified polylines of one component, before synthesis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentTrace {
    /// Sections committed by the orderer.
    pub sections: usize,
    /// Pixels lost with discarded short sections.
    pub dropped: usize,
    /// Pixels in the sections kept by the section policy.
    pub ordered_points: usize,
    /// Simplified polylines, one per kept section.
    pub polylines: Vec<Polyline>,
}

/// The tracing pipeline for one configuration.
#[derive(Clone, Debug)]
pub struct TracePipeline {
    config: TraceConfig,
    orderer: PathOrderer,
}

impl TracePipeline {
    /// Create a pipeline, validating the configuration.
    pub fn new(config: TraceConfig) -> Result<Self> {
        config.validate()?;
        let orderer = PathOrderer::from_config(&config)?;
        Ok(Self { config, orderer })
    }

    /// Create a pipeline with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(TraceConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Order and simplify one component.
    pub fn trace_component(&self, pixels: PixelSet) -> Result<ComponentTrace> {
        let edge = self.orderer.order(pixels)?;
        let sections = edge.len();
        let dropped = edge.dropped;

        let kept: Vec<Polyline> = match self.config.sections {
            SectionPolicy::All => edge.into_sections(),
            SectionPolicy::FirstOnly => edge.into_sections().into_iter().take(1).collect(),
        };
        let ordered_points = kept.iter().map(Polyline::len).sum();

        let polylines = kept
            .iter()
            .map(|section| simplify(section, self.config.epsilon))
            .collect::<Result<Vec<_>>>()?;

        Ok(ComponentTrace {
            sections,
            dropped,
            ordered_points,
            polylines,
        })
    }

    fn run_component(&self, index: usize, pixels: PixelSet) -> (ComponentReport, WaypointStream) {
        let size = pixels.len();
        let report = |status| ComponentReport {
            index,
            pixels: size,
            status,
        };

        if size > 0 && size < self.config.min_component_size {
            debug!(
                "Component {}: {} pixels below minimum {}, skipped",
                index, size, self.config.min_component_size
            );
            return (report(ComponentStatus::Skipped), WaypointStream::new());
        }

        let traced = match self.config.mode {
            TraceMode::Outline => self.outline_component(pixels),
            TraceMode::Fill => self.fill_component(&pixels),
        };

        match traced {
            Ok((status, stream)) => {
                debug!(
                    "Component {}: {} pixels -> {} waypoints ({})",
                    index,
                    size,
                    stream.len(),
                    self.config.mode.name()
                );
                (report(status), stream)
            }
            Err(e) => {
                warn!("Component {} failed: {}", index, e);
                (report(ComponentStatus::Failed(e)), WaypointStream::new())
            }
        }
    }

    fn outline_component(&self, pixels: PixelSet) -> Result<(ComponentStatus, WaypointStream)> {
        let trace = self.trace_component(pixels)?;
        let stream = synthesize(&trace.polylines)?;
        let status = ComponentStatus::Traced {
            sections: trace.sections,
            polylines: trace.polylines.len(),
            dropped: trace.dropped,
            ordered_points: trace.ordered_points,
            simplified_points: trace.polylines.iter().map(Polyline::len).sum(),
            waypoints: stream.len(),
        };
        Ok((status, stream))
    }

    fn fill_component(&self, pixels: &PixelSet) -> Result<(ComponentStatus, WaypointStream)> {
        let path = fill_path(pixels, self.config.fill_step)?;
        let stream = WaypointStream::from_stroke(&path);
        let status = ComponentStatus::Traced {
            sections: path.len() / 2,
            polylines: 1,
            dropped: 0,
            ordered_points: pixels.len(),
            simplified_points: path.len(),
            waypoints: stream.len(),
        };
        Ok((status, stream))
    }

    /// Trace every component of an image.
    pub fn process(&self, components: Vec<PixelSet>) -> TraceOutput {
        self.process_with_callback(components, |_, _| {})
    }

    /// Trace every component with a progress callback.
    ///
    /// The callback receives (components_done, components_total) and may be
    /// called from worker threads.
    pub fn process_with_callback<F>(&self, components: Vec<PixelSet>, callback: F) -> TraceOutput
    where
        F: Fn(usize, usize) + Sync,
    {
        let total = components.len();
        let done = AtomicUsize::new(0);

        let results: Vec<(ComponentReport, WaypointStream)> = components
            .into_par_iter()
            .enumerate()
            .map(|(index, pixels)| {
                let result = self.run_component(index, pixels);
                callback(done.fetch_add(1, Ordering::Relaxed) + 1, total);
                result
            })
            .collect();

        let mut stream = WaypointStream::new();
        let mut reports = Vec::with_capacity(total);
        for (report, component_stream) in results {
            stream.append(component_stream);
            reports.push(report);
        }

        let stats = TraceStats::from_reports(&reports);
        info!(
            "Traced {}/{} components into {} waypoints ({} skipped, {} failed)",
            stats.traced, stats.components, stats.waypoints, stats.skipped, stats.failed
        );

        TraceOutput {
            stream,
            reports,
            stats,
        }
    }
}
