//! Galaxy configuration file handling (galaxy.toml)

use anyhow::{Context, Result};
use galaxy_core::FieldConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "galaxy.toml";

/// Top-level configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GalaxyConfig {
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Headless run settings
#[derive(Debug, Deserialize, Serialize)]
pub struct RunConfig {
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pointer orbit around the surface center
    #[serde(default)]
    pub orbit: OrbitConfig,
}

fn default_frames() -> u32 {
    120
}

fn default_tick_ms() -> f64 {
    16.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            tick_ms: default_tick_ms(),
            seed: None,
            orbit: OrbitConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OrbitConfig {
    /// Orbit radius in pixels
    #[serde(default = "default_orbit_radius")]
    pub radius: f32,
    /// Time for one full turn
    #[serde(default = "default_orbit_period")]
    pub period_ms: f64,
}

fn default_orbit_radius() -> f32 {
    120.0
}

fn default_orbit_period() -> f64 {
    4000.0
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: default_orbit_radius(),
            period_ms: default_orbit_period(),
        }
    }
}

impl GalaxyConfig {
    /// Load `path`, or `galaxy.toml` from the working directory if it
    /// exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid galaxy configuration")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file() {
        let config = GalaxyConfig::from_toml(
            r#"
            [field]
            width = 640
            height = 480
            gradient = true

            [run]
            frames = 30
            [run.orbit]
            radius = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.field.width, 640.0);
        assert!(config.field.gradient);
        assert_eq!(config.field.density, 30);
        assert_eq!(config.run.frames, 30);
        assert_eq!(config.run.tick_ms, 16.0);
        assert_eq!(config.run.orbit.radius, 50.0);
        assert_eq!(config.run.orbit.period_ms, 4000.0);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = GalaxyConfig::from_toml("").unwrap();
        assert_eq!(config.run.frames, 120);
        assert_eq!(config.field.links, 5);
    }

    #[test]
    fn test_round_trip() {
        let config = GalaxyConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = GalaxyConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.field, config.field);
    }
}
