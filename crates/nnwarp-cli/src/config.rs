//! Run configuration: defaults, an optional JSON file, then command-line
//! overrides.

use std::path::Path;
use std::str::FromStr;

use nnwarp_core::{ExecutionStrategy, ResampleOptions, RoundingMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: String, message: String },
}

/// How the rotated image is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Rotate about the center and keep the source dimensions.
    #[default]
    CropFree,
    /// Grow the canvas to the bounding box of the rotated image.
    Expand,
    /// Fixed off-center pivots, for byte-compatible output.
    Legacy,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crop-free" => Ok(Mode::CropFree),
            "expand" => Ok(Mode::Expand),
            "legacy" => Ok(Mode::Legacy),
            other => Err(format!("unknown mode `{other}` (crop-free, expand, legacy)")),
        }
    }
}

pub fn parse_rounding(s: &str) -> Result<RoundingMode, String> {
    match s {
        "nearest" | "nearest-ties-away" => Ok(RoundingMode::NearestTiesAway),
        "half-up" => Ok(RoundingMode::HalfUp),
        "truncate" | "truncate-half-up" => Ok(RoundingMode::TruncateHalfUp),
        other => Err(format!(
            "unknown rounding `{other}` (nearest, half-up, truncate)"
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub mode: Mode,
    /// JPEG quality, 1-100.
    pub quality: u8,
    pub resample: ResampleOptions,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            quality: 90,
            resample: ResampleOptions::default(),
        }
    }
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply command-line overrides; `None` keeps the current value.
    pub fn with_overrides(
        mut self,
        mode: Option<Mode>,
        quality: Option<u8>,
        rounding: Option<RoundingMode>,
        threads: Option<usize>,
    ) -> Self {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(quality) = quality {
            self.quality = quality;
        }
        if let Some(rounding) = rounding {
            self.resample.rounding = rounding;
        }
        match threads {
            Some(1) => self.resample.execution = ExecutionStrategy::Serial,
            Some(n) => self.resample.execution = ExecutionStrategy::Fixed(n),
            None => {}
        }
        self
    }
}
