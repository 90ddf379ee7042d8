//! Unit output: stdout rendering and directory writing

use super::args::OutputFormat;
use crate::GeneratedUnit;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Render units for stdout.
///
/// Text output puts a `# <filename>` header above each unit when there is
/// more than one; a single unit is printed bare so it can be redirected
/// straight into a file.
pub fn render(units: &[GeneratedUnit], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(units).context("Failed to serialize units to JSON")
        }
        OutputFormat::Text => {
            if let [unit] = units {
                return Ok(unit.content.clone());
            }
            let blocks: Vec<String> = units
                .iter()
                .map(|unit| format!("# {}\n{}", unit.filename, unit.content))
                .collect();
            Ok(blocks.join("\n"))
        }
    }
}

/// Write each unit to `<dir>/<filename>`, creating `dir` if needed.
pub fn write_units(units: &[GeneratedUnit], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(units.len());
    for unit in units {
        let path = dir.join(&unit.filename);
        fs::write(&path, &unit.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Read a Compose file as UTF-8 text.
pub fn read_compose_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read compose file {}", path.display()))
}
