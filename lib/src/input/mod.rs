//! Boundary component input files.
//!
//! Components come from an upstream edge detection and labelling stage.
//! Two formats are accepted:
//!
//! - **JSON**: `[[[row, col], ...], ...]` or `{"components": [...]}`
//! - **Text**: one `row, col` pair per line, blank lines between
//!   components, `#` starts a comment
//!
//! Duplicate pixels within a component are collapsed.

use crate::geometry::{Pixel, PixelSet};
use crate::{Coord, Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Input file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Text,
}

impl InputFormat {
    /// Pick the format from the file extension, falling back to the content.
    pub fn detect(path: &Path, content: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("txt") => InputFormat::Text,
            _ => match content.trim_start().chars().next() {
                Some('[') | Some('{') => InputFormat::Json,
                _ => InputFormat::Text,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ComponentFile {
    Bare(Vec<PixelSet>),
    Wrapped { components: Vec<PixelSet> },
}

/// Load every component from a file.
pub fn load_components<P: AsRef<Path>>(path: P) -> Result<Vec<PixelSet>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    match InputFormat::detect(path, &content) {
        InputFormat::Json => parse_json(&content),
        InputFormat::Text => parse_text(&content),
    }
}

/// Parse components from JSON.
pub fn parse_json(content: &str) -> Result<Vec<PixelSet>> {
    let file: ComponentFile = serde_json::from_str(content)?;
    Ok(match file {
        ComponentFile::Bare(components) => components,
        ComponentFile::Wrapped { components } => components,
    })
}

/// Parse components from the line-based text format.
pub fn parse_text(content: &str) -> Result<Vec<PixelSet>> {
    let mut components = Vec::new();
    let mut current = PixelSet::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            // Comment-only lines do not end a component.
            if raw.trim().is_empty() && !current.is_empty() {
                components.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.insert(parse_pixel(line, index + 1)?);
    }

    if !current.is_empty() {
        components.push(current);
    }
    Ok(components)
}

fn parse_pixel(line: &str, line_number: usize) -> Result<Pixel> {
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();

    if fields.len() != 2 {
        return Err(Error::Parse {
            line: line_number,
            message: format!("expected `row, col`, found {} field(s)", fields.len()),
        });
    }

    let coord = |field: &str| -> Result<Coord> {
        field.parse::<Coord>().map_err(|e| Error::Parse {
            line: line_number,
            message: format!("invalid coordinate `{field}`: {e}"),
        })
    };
    Ok(Pixel::new(coord(fields[0])?, coord(fields[1])?))
}
