use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::geometry::{BearingPolicy, DetectionPolicy, ProjectionPolicy};

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write config at {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub detection: DetectionPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Frame ticker rate.
    pub fps: u32,
    /// Draw the one-line status bar over the top row.
    pub show_status: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            show_status: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the default XDG config path (~/.config/radarsweep/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("radarsweep").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists.
    pub fn load_from_default_path() -> Result<Option<Self>, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_if_present(&path),
            None => Ok(None),
        }
    }

    /// `Ok(None)` when there is no file at `path`.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Write the commented template to the default path and return it.
    pub fn init_default_config() -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        Self::write_template(&path)?;
        Ok(path)
    }

    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, Self::generate_config_template()).map_err(write_err)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# radarsweep configuration

[display]
# Frames per second (1-240)
fps = 60
# Show the status line on the top row
show_status = true

[detection]
# Pointers outside the radar disc:
#   "unclamped" - drawn where they are, outside the rim
#   "clamped"   - pulled onto the rim at the same bearing
projection = "unclamped"
# Beam/target angle comparison:
#   "raw"     - plain difference; stops matching after the first revolution
#   "wrapped" - shortest angular distance
bearing = "raw"
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::Args) {
        if let Some(fps) = args.fps {
            self.display.fps = fps;
        }
        if args.no_status {
            self.display.show_status = false;
        }
        if args.clamp_projection {
            self.detection.projection = ProjectionPolicy::Clamped;
        }
        if args.wrap_bearing {
            self.detection.bearing = BearingPolicy::Wrapped;
        }
        self.display.fps = self.display.fps.clamp(MIN_FPS, MAX_FPS);
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.display.fps.clamp(MIN_FPS, MAX_FPS) as f64)
    }
}
