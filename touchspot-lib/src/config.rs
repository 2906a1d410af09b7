use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::color::{Palette, Rgb};
use crate::render::Size;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid {key}: {value} (expected {expected})")]
    Invalid {
        key: &'static str,
        value: String,
        expected: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    pub fps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    pub font_size: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self { font_size: 64 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    pub channels: usize,
    pub begin_clip_ms: u64,
    pub end_clip_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            channels: 16,
            begin_clip_ms: 150,
            end_clip_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub colors: Vec<Rgb>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: Palette::default().colors().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub file: bool,
    pub directory: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: true,
            directory: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TouchspotConfig {
    /// Seed for color tie-breaking; drawn from entropy when absent.
    pub seed: Option<u64>,
    pub display: DisplayConfig,
    pub frame: FrameConfig,
    pub marker: MarkerConfig,
    pub label: LabelConfig,
    pub audio: AudioConfig,
    pub palette: PaletteConfig,
    pub log: LogConfig,
}

fn check<T>(key: &'static str, value: T, range: RangeInclusive<T>) -> Result<(), ConfigError>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            expected: format!("{}..={}", range.start(), range.end()),
        })
    }
}

impl TouchspotConfig {
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check("display.width", self.display.width, 1..=16384)?;
        check("display.height", self.display.height, 1..=16384)?;
        check("frame.fps", self.frame.fps, 1..=240)?;
        check("marker.width", self.marker.width, 1..=4096)?;
        check("marker.height", self.marker.height, 1..=4096)?;
        check("label.font_size", self.label.font_size, 1..=512)?;
        check("audio.channels", self.audio.channels, 1..=256)?;
        if self.palette.colors.is_empty() {
            return Err(ConfigError::Invalid {
                key: "palette.colors",
                value: "[]".into(),
                expected: "at least one color".into(),
            });
        }
        Ok(())
    }

    pub fn surface(&self) -> Size {
        Size::new(self.display.width, self.display.height)
    }

    pub fn marker_size(&self) -> Size {
        Size::new(self.marker.width, self.marker.height)
    }

    pub fn palette(&self) -> Palette {
        Palette::new(self.palette.colors.clone()).unwrap_or_default()
    }
}
