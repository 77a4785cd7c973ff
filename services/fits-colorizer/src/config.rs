//! Run configuration.
//!
//! A run is the cross product of stripe counts and color modes applied to
//! every plane of the input. Values come from defaults, an optional YAML
//! file, then command-line overrides, in that order.

use std::path::{Path, PathBuf};

use colorizer::ColorizeMode;
use renderer::RasterFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};

/// Stripe counts rendered when none are configured.
pub const DEFAULT_STRIPES: [f64; 6] = [1.0, 2.0, 10.0, 20.0, 50.0, 100.0];

/// Color modes rendered when none are configured.
pub const DEFAULT_MODES: [ColorizeMode; 5] = [
    ColorizeMode::Greyscale,
    ColorizeMode::Roygbiv,
    ColorizeMode::NickRgb,
    ColorizeMode::Binary,
    ColorizeMode::ShortNRgb,
];

/// Fractional cut points into each plane's data range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub start: f64,
    pub end: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub stripes: Vec<f64>,
    pub modes: Vec<ColorizeMode>,
    pub window: WindowConfig,
    pub format: RasterFormat,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            stripes: DEFAULT_STRIPES.to_vec(),
            modes: DEFAULT_MODES.to_vec(),
            window: WindowConfig::default(),
            format: RasterFormat::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Values supplied on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub stripes: Option<Vec<f64>>,
    pub modes: Option<Vec<ColorizeMode>>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub format: Option<RasterFormat>,
    pub output_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str, origin: &str) -> PipelineResult<Self> {
        serde_yaml::from_str(yaml).map_err(|source| PipelineError::ConfigParse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn from_yaml_file(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_yaml_str(&content, &path.display().to_string())?;
        debug!(path = %path.display(), ?config, "Loaded run configuration");
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(stripes) = overrides.stripes {
            self.stripes = stripes;
        }
        if let Some(modes) = overrides.modes {
            self.modes = modes;
        }
        if let Some(start) = overrides.start {
            self.window.start = start;
        }
        if let Some(end) = overrides.end {
            self.window.end = end;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
    }

    /// Check the run matrix before any plane is read.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.stripes.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "at least one stripe count is required".to_string(),
            ));
        }
        if let Some(bad) = self.stripes.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "stripe counts must be above zero, got {}",
                bad
            )));
        }
        if self.modes.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "at least one color mode is required".to_string(),
            ));
        }

        for (name, value) in [("start", self.window.start), ("end", self.window.end)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::InvalidConfig(format!(
                    "window {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.window.start > self.window.end {
            warn!(
                start = self.window.start,
                end = self.window.end,
                "Window is inverted, ramps will run backwards"
            );
        }

        Ok(())
    }

    /// Number of files written per plane.
    pub fn renders_per_plane(&self) -> usize {
        self.stripes.len() * self.modes.len()
    }
}
