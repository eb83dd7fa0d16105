//! Report output for headless runs

use anyhow::{Context, Result};
use galaxy_core::{FieldConfig, FieldStats};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Machine-readable summary of a `galaxy run`
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub frames_requested: u32,
    pub frames_rendered: u64,
    pub blits: u64,
    pub circles: u64,
    pub links: u64,
    pub elapsed_ms: f64,
    pub width: u32,
    pub height: u32,
    pub painted_pixels: usize,
    pub stats: FieldStats,
    pub config: FieldConfig,
}

impl RunReport {
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        std::fs::write(path, payload)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
