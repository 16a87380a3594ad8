use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::graphics::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_VOICE: &str = "piano";
pub const DEFAULT_BASE_PATH: &str = "instruments";
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_TITLE_SCALE: u32 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPalette {
    #[serde(with = "crate::serde_color")]
    pub inactive: Color,
    #[serde(with = "crate::serde_color")]
    pub active: Color,
}

impl KeyPalette {
    pub fn color(&self, pressed: bool) -> Color {
        if pressed { self.active } else { self.inactive }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(with = "crate::serde_color")]
    pub background: Color,
    #[serde(with = "crate::serde_color")]
    pub title: Color,
    #[serde(with = "crate::serde_color")]
    pub power_on: Color,
    #[serde(with = "crate::serde_color")]
    pub power_off: Color,
    #[serde(with = "crate::serde_color")]
    pub key_border: Color,
    pub natural: KeyPalette,
    pub accidental: KeyPalette,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: [34, 34, 40, 255],
            title: [230, 230, 230, 255],
            power_on: [80, 220, 100, 255],
            power_off: [90, 30, 30, 255],
            key_border: [20, 20, 24, 255],
            natural: KeyPalette {
                inactive: [245, 245, 240, 255],
                active: [170, 200, 255, 255],
            },
            accidental: KeyPalette {
                inactive: [25, 25, 30, 255],
                active: [70, 110, 190, 255],
            },
        }
    }
}

/// Everything a keyboard instance is created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PianoConfig {
    /// Sample set, i.e. the sub-directory of `base_path` holding one file per note.
    pub voice: String,
    pub base_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Block-font scale for the title; each glyph is 3x5 cells of this many pixels.
    pub title_scale: u32,
    /// Per-asset load deadline; zero waits forever.
    #[serde(with = "crate::serde_duration")]
    pub load_timeout: Duration,
    pub volume: f32,
    pub theme: Theme,
}

impl Default for PianoConfig {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            width: 640,
            height: 240,
            title: "PIANO".to_string(),
            title_scale: 3,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            volume: 1.0,
            theme: Theme::default(),
        }
    }
}

impl PianoConfig {
    pub fn sanitized(mut self) -> Self {
        if self.voice.trim().is_empty() {
            self.voice = DEFAULT_VOICE.to_string();
        }
        let defaults = PianoConfig::default();
        if self.width == 0 || self.height == 0 {
            self.width = defaults.width;
            self.height = defaults.height;
        }
        self.title_scale = self.title_scale.clamp(1, MAX_TITLE_SCALE);
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        (!self.load_timeout.is_zero()).then_some(self.load_timeout)
    }
}

/// Where the config file lives: `PIANO_CONFIG_PATH`, else the XDG config directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("PIANO_CONFIG_PATH") {
            return Self::at(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::at(base.join("virtual-piano").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means defaults; an unreadable or malformed one is an error.
    pub fn load(&self) -> Result<PianoConfig, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", self.path.display());
                return Ok(PianoConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice::<PianoConfig>(&bytes)
            .map(PianoConfig::sanitized)
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, config: &PianoConfig) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(&self.path, text).map_err(write_err)
    }
}
