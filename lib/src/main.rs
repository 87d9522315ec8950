//! PixelPath CLI - Command-line interface for the pixelpath library
//!
//! Usage:
//!   pixelpath-cli trace <components.json> -o <waypoints.txt> [options]
//!   pixelpath-cli trace <components.txt> --config my_config.json --stats stats.json
//!   pixelpath-cli trace <regions.json> --fill --fill-step 8
//!   pixelpath-cli info <components.json>
//!   pixelpath-cli default-config

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};
use pixelpath::input::load_components;
use pixelpath::pipeline::TracePipeline;
use pixelpath::{SectionPolicy, TraceConfig, TraceMode};
use std::fs;
use std::path::PathBuf;

/// Turn boundary pixel components into pen waypoints for a drawing robot
#[derive(Parser, Debug)]
#[command(name = "pixelpath-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Order, simplify and synthesize waypoints for every component
    Trace {
        /// Component file (JSON or text)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output waypoint file
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Trace configuration file (JSON format); flags below override it
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Largest gap bridged inside a section, in pixels
        #[arg(long)]
        distance_threshold: Option<f64>,

        /// Sections with this many pixels or fewer are dropped
        #[arg(long)]
        min_section_size: Option<usize>,

        /// Simplification tolerance in pixels
        #[arg(long)]
        epsilon: Option<f64>,

        /// Components with fewer pixels are skipped
        #[arg(long)]
        min_component_size: Option<usize>,

        /// Only emit the first section of each component
        #[arg(long)]
        first_section_only: bool,

        /// Per-component ordering budget in milliseconds
        #[arg(long)]
        time_budget_ms: Option<u64>,

        /// Fill each component with row strokes instead of tracing it
        #[arg(long)]
        fill: bool,

        /// Row spacing of fill strokes, in pixels
        #[arg(long)]
        fill_step: Option<usize>,

        /// Write batch statistics as JSON to this file
        #[arg(long, value_name = "PATH")]
        stats: Option<PathBuf>,

        /// Number of threads (0 = auto)
        #[arg(short = 'j', long, default_value = "0")]
        threads: usize,
    },

    /// Show component counts and sizes of an input file
    Info {
        /// Component file (JSON or text)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Print the default configuration as JSON
    DefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Trace {
            input,
            output,
            config,
            distance_threshold,
            min_section_size,
            epsilon,
            min_component_size,
            first_section_only,
            time_budget_ms,
            fill,
            fill_step,
            stats,
            threads,
        } => {
            let overrides = Overrides {
                distance_threshold,
                min_section_size,
                epsilon,
                min_component_size,
                first_section_only,
                time_budget_ms,
                fill,
                fill_step,
            };
            cmd_trace(input, output, config, overrides, stats, threads)
        }
        Commands::Info { input } => cmd_info(input),
        Commands::DefaultConfig => cmd_default_config(),
    }
}

/// Command-line values that replace configuration file fields.
#[derive(Debug, Default)]
struct Overrides {
    distance_threshold: Option<f64>,
    min_section_size: Option<usize>,
    epsilon: Option<f64>,
    min_component_size: Option<usize>,
    first_section_only: bool,
    time_budget_ms: Option<u64>,
    fill: bool,
    fill_step: Option<usize>,
}

impl Overrides {
    fn apply(self, mut config: TraceConfig) -> TraceConfig {
        if let Some(v) = self.distance_threshold {
            config = config.with_distance_threshold(v);
        }
        if let Some(v) = self.min_section_size {
            config = config.with_min_section_size(v);
        }
        if let Some(v) = self.epsilon {
            config = config.with_epsilon(v);
        }
        if let Some(v) = self.min_component_size {
            config = config.with_min_component_size(v);
        }
        if self.first_section_only {
            config = config.with_sections(SectionPolicy::FirstOnly);
        }
        if self.time_budget_ms.is_some() {
            config = config.with_time_budget_ms(self.time_budget_ms);
        }
        if self.fill {
            config = config.with_mode(TraceMode::Fill);
        }
        if let Some(v) = self.fill_step {
            config = config.with_fill_step(v);
        }
        config
    }
}

fn cmd_trace(
    input: PathBuf,
    output: Option<PathBuf>,
    config_file: Option<PathBuf>,
    overrides: Overrides,
    stats_path: Option<PathBuf>,
    threads: usize,
) -> Result<()> {
    // Determine output path
    let output_path = output.unwrap_or_else(|| input.with_extension("waypoints.txt"));

    // Set thread count if specified
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    let base = match &config_file {
        Some(path) => {
            info!("Loading trace config from: {}", path.display());
            TraceConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None => TraceConfig::default(),
    };
    let config = overrides.apply(base);
    info!("Using {}", config);

    let pipeline = TracePipeline::new(config).context("Invalid trace configuration")?;

    info!("Loading components: {}", input.display());
    let components = load_components(&input)
        .with_context(|| format!("Failed to load components: {}", input.display()))?;
    info!("  Components: {}", components.len());

    let progress = ProgressBar::new(components.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    progress.set_message(match pipeline.config().mode {
        TraceMode::Outline => "Tracing components...",
        TraceMode::Fill => "Filling components...",
    });

    let result = pipeline.process_with_callback(components, |done, _| {
        progress.set_position(done as u64);
    });

    progress.finish_with_message("Done!");

    for report in result.failures() {
        if let Some(e) = report.error() {
            warn!(
                "Component {} ({} pixels) omitted: {}",
                report.index, report.pixels, e
            );
        }
    }

    result
        .stream
        .write_to_file(&output_path)
        .with_context(|| format!("Failed to write waypoints: {}", output_path.display()))?;

    if let Some(path) = &stats_path {
        let json = result.stats.to_json().context("Failed to serialize stats")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write stats: {}", path.display()))?;
    }

    println!();
    println!("Tracing complete!");
    println!("  Output: {}", output_path.display());
    for line in result.stats.to_string().lines() {
        println!("  {}", line);
    }

    Ok(())
}

fn cmd_info(input: PathBuf) -> Result<()> {
    info!("Loading components: {}", input.display());

    let components = load_components(&input)
        .with_context(|| format!("Failed to load components: {}", input.display()))?;

    let total: usize = components.iter().map(|c| c.len()).sum();

    println!("Component Information:");
    println!("  File: {}", input.display());
    println!("  Components: {}", components.len());
    println!("  Pixels: {}", total);

    for (i, component) in components.iter().enumerate() {
        match component.bounds() {
            Some((min, max)) => println!(
                "    #{:<4} {:>7} pixels  rows {}..={}  cols {}..={}",
                i,
                component.len(),
                min.row,
                max.row,
                min.col,
                max.col
            ),
            None => println!("    #{:<4} empty", i),
        }
    }

    Ok(())
}

fn cmd_default_config() -> Result<()> {
    let json = TraceConfig::default()
        .to_json()
        .context("Failed to serialize default config")?;
    println!("{}", json);
    Ok(())
}
