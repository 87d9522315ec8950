//! Trace configuration types.
//!
//! Distances and tolerances are in pixels.

use crate::{CoordF, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Parameters for ordering, simplifying and filtering boundary components.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Outline tracing or region fill.
    pub mode: TraceMode,

    // === Ordering ===
    /// Largest gap that can be bridged inside one section (strict bound).
    pub distance_threshold: CoordF,
    /// A non-terminal section is kept only if it has more pixels than this.
    pub min_section_size: usize,

    // === Simplification ===
    /// Douglas-Peucker tolerance.
    pub epsilon: CoordF,
    /// Which sections of an ordered edge are simplified and emitted.
    pub sections: SectionPolicy,

    // === Fill ===
    /// Row spacing of fill strokes.
    pub fill_step: usize,

    // === Filtering ===
    /// Components with fewer pixels are skipped.
    pub min_component_size: usize,

    // === Performance ===
    /// Nearest-neighbour backend.
    pub search: SearchBackend,
    /// Component size above which [`SearchBackend::Auto`] uses the R-tree.
    pub spatial_index_threshold: usize,
    /// Per-component ordering budget in milliseconds.
    pub time_budget_ms: Option<u64>,
}

impl TraceConfig {
    /// Create a new TraceConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values. The result is validated.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder method: set the trace mode.
    pub fn with_mode(mut self, mode: TraceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder method: set the distance threshold.
    pub fn with_distance_threshold(mut self, threshold: CoordF) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Builder method: set the minimum section size.
    pub fn with_min_section_size(mut self, size: usize) -> Self {
        self.min_section_size = size;
        self
    }

    /// Builder method: set the simplification tolerance.
    pub fn with_epsilon(mut self, epsilon: CoordF) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Builder method: set the minimum component size.
    pub fn with_min_component_size(mut self, size: usize) -> Self {
        self.min_component_size = size;
        self
    }

    /// Builder method: set the section policy.
    pub fn with_sections(mut self, policy: SectionPolicy) -> Self {
        self.sections = policy;
        self
    }

    /// Builder method: set the fill row spacing.
    pub fn with_fill_step(mut self, step: usize) -> Self {
        self.fill_step = step;
        self
    }

    /// Builder method: set the nearest-neighbour backend.
    pub fn with_search(mut self, backend: SearchBackend) -> Self {
        self.search = backend;
        self
    }

    /// Builder method: set the automatic R-tree threshold.
    pub fn with_spatial_index_threshold(mut self, threshold: usize) -> Self {
        self.spatial_index_threshold = threshold;
        self
    }

    /// Builder method: set or clear the per-component time budget.
    pub fn with_time_budget_ms(mut self, budget: Option<u64>) -> Self {
        self.time_budget_ms = budget;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("distance_threshold", self.distance_threshold)?;
        check_non_negative("epsilon", self.epsilon)?;
        if self.fill_step == 0 {
            return Err(Error::Parameter("fill_step must be at least 1".into()));
        }
        Ok(())
    }
}

pub(crate) fn check_non_negative(name: &str, value: CoordF) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(Error::Parameter(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            mode: TraceMode::Outline,
            distance_threshold: 5.0,
            min_section_size: 10,
            epsilon: 1.4,
            sections: SectionPolicy::All,
            fill_step: 10,
            min_component_size: 50,
            search: SearchBackend::Auto,
            spatial_index_threshold: 2000,
            time_budget_ms: None,
        }
    }
}

impl fmt::Display for TraceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mode == TraceMode::Fill {
            return write!(f, "TraceConfig(fill, step={})", self.fill_step);
        }
        write!(
            f,
            "TraceConfig(threshold={:.2}px, min_section={}, epsilon={:.2}px, sections={})",
            self.distance_threshold,
            self.min_section_size,
            self.epsilon,
            self.sections.name()
        )
    }
}

/// What the pipeline draws for each component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    /// Order, simplify and close the boundary pixels.
    #[default]
    Outline,
    /// Cover the component with alternating row strokes.
    Fill,
}

impl TraceMode {
    /// Returns the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            TraceMode::Outline => "outline",
            TraceMode::Fill => "fill",
        }
    }
}

/// Which sections of an ordered edge become polylines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPolicy {
    /// Every committed section is simplified and emitted.
    #[default]
    All,
    /// Only the first section of each component is kept.
    FirstOnly,
}

impl SectionPolicy {
    /// Returns the display name for this policy.
    pub fn name(&self) -> &'static str {
        match self {
            SectionPolicy::All => "all",
            SectionPolicy::FirstOnly => "first_only",
        }
    }
}

/// Nearest-neighbour search strategy used while ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBackend {
    /// Linear scan for small components, R-tree above the threshold.
    #[default]
    Auto,
    /// Always scan every remaining pixel.
    Linear,
    /// Always use an R*-tree.
    #[serde(rename = "rtree")]
    RTree,
}

impl SearchBackend {
    /// Returns the display name for this backend.
    pub fn name(&self) -> &'static str {
        match self {
            SearchBackend::Auto => "auto",
            SearchBackend::Linear => "linear",
            SearchBackend::RTree => "rtree",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_config_default() {
        let config = TraceConfig::default();
        assert!((config.distance_threshold - 5.0).abs() < 1e-9);
        assert_eq!(config.min_section_size, 10);
        assert!((config.epsilon - 1.4).abs() < 1e-9);
        assert_eq!(config.min_component_size, 50);
        assert_eq!(config.sections, SectionPolicy::All);
        assert_eq!(config.search, SearchBackend::Auto);
        assert_eq!(config.spatial_index_threshold, 2000);
        assert!(config.time_budget_ms.is_none());
        assert_eq!(config.mode, TraceMode::Outline);
        assert_eq!(config.fill_step, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trace_config_builder() {
        let config = TraceConfig::new()
            .with_distance_threshold(2.0)
            .with_min_section_size(1)
            .with_epsilon(0.5)
            .with_min_component_size(0)
            .with_sections(SectionPolicy::FirstOnly)
            .with_search(SearchBackend::RTree)
            .with_spatial_index_threshold(10)
            .with_time_budget_ms(Some(250))
            .with_mode(TraceMode::Fill)
            .with_fill_step(4);

        assert!((config.distance_threshold - 2.0).abs() < 1e-9);
        assert_eq!(config.min_section_size, 1);
        assert!((config.epsilon - 0.5).abs() < 1e-9);
        assert_eq!(config.min_component_size, 0);
        assert_eq!(config.sections, SectionPolicy::FirstOnly);
        assert_eq!(config.search, SearchBackend::RTree);
        assert_eq!(config.spatial_index_threshold, 10);
        assert_eq!(config.time_budget_ms, Some(250));
        assert_eq!(config.mode, TraceMode::Fill);
        assert_eq!(config.fill_step, 4);
    }

    #[test]
    fn test_trace_config_validation() {
        let mut config = TraceConfig::default();
        assert!(config.validate().is_ok());

        config.distance_threshold = -1.0;
        assert!(matches!(config.validate(), Err(Error::Parameter(_))));

        config.distance_threshold = 5.0;
        config.epsilon = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::Parameter(_))));

        config.epsilon = 0.0;
        assert!(config.validate().is_ok());

        config.fill_step = 0;
        assert!(matches!(config.validate(), Err(Error::Parameter(_))));
    }

    #[test]
    fn test_fill_mode_json() {
        let config: TraceConfig =
            serde_json::from_str(r#"{"mode": "fill", "fill_step": 3}"#).unwrap();
        assert_eq!(config.mode, TraceMode::Fill);
        assert_eq!(config.fill_step, 3);
        assert_eq!(config.to_string(), "TraceConfig(fill, step=3)");
        assert!(serde_json::from_str::<TraceConfig>(r#"{"mode": "hatch"}"#).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TraceConfig =
            serde_json::from_str(r#"{"epsilon": 3.0, "sections": "first_only", "search": "rtree"}"#)
                .unwrap();
        assert!((config.epsilon - 3.0).abs() < 1e-9);
        assert_eq!(config.sections, SectionPolicy::FirstOnly);
        assert_eq!(config.search, SearchBackend::RTree);
        assert_eq!(config.min_section_size, 10);
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!(
            "pixelpath_config_{}.json",
            std::process::id()
        ));
        let config = TraceConfig::new().with_time_budget_ms(Some(40));
        std::fs::write(&path, config.to_json().unwrap()).unwrap();
        let loaded = TraceConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_json_file_rejects_invalid() {
        let path = std::env::temp_dir().join(format!(
            "pixelpath_bad_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"distance_threshold": -2.0}"#).unwrap();
        let result = TraceConfig::from_json_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(Error::Parameter(_))));
    }

    #[test]
    fn test_display() {
        let config = TraceConfig::default();
        assert_eq!(
            config.to_string(),
            "TraceConfig(threshold=5.00px, min_section=10, epsilon=1.40px, sections=all)"
        );
    }
}
