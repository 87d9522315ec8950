//! Configuration for the tracing pipeline.
//!
//! All image-specific thresholds live in [`TraceConfig`], which is passed
//! explicitly to every component run.

mod trace_config;

pub use trace_config::{SearchBackend, SectionPolicy, TraceConfig, TraceMode};
pub(crate) use trace_config::check_non_negative;
