use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capture::FfmpegSettings;
use crate::error::{ConfigError, Result};
use crate::export::{AspectPreset, ExportFormat, ExportOptions, QualityTier, DEFAULT_FPS, MAX_FPS};
use crate::playback::DEFAULT_TICK_MS;
use crate::timeline::DEFAULT_SLIDE_DURATION_MS;
use crate::transitions::{TransitionCatalog, AUTO_MIX};

/// Main configuration for Reel-Composer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Live preview settings
    pub playback: PlaybackConfig,

    /// Export defaults
    pub export: ExportConfig,

    /// Project store location
    pub storage: StorageConfig,

    /// Rendering resources
    pub render: RenderConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.playback.validate()?;
        self.export.validate()?;
        self.render.validate()?;
        Ok(())
    }
}

/// Live preview configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Clock tick interval (ms)
    pub tick_ms: u64,

    /// Time each slide stays on screen (ms)
    pub slide_duration_ms: u64,

    /// Transition id, or `auto-mix`
    pub transition: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            slide_duration_ms: DEFAULT_SLIDE_DURATION_MS,
            transition: AUTO_MIX.to_string(),
        }
    }
}

impl PlaybackConfig {
    fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "playback.tick_ms".to_string(),
                value: self.tick_ms.to_string()
            }.into());
        }

        if self.slide_duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "playback.slide_duration_ms".to_string(),
                value: self.slide_duration_ms.to_string()
            }.into());
        }

        if !TransitionCatalog::standard().is_known_mode(&self.transition) {
            return Err(ConfigError::InvalidValue {
                key: "playback.transition".to_string(),
                value: self.transition.clone()
            }.into());
        }

        Ok(())
    }
}

/// Export defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub quality: QualityTier,
    pub format: ExportFormat,
    pub aspect: AspectPreset,

    /// Frames per second
    pub fps: u32,

    /// FFmpeg executable
    pub ffmpeg_binary: String,

    /// Video codec
    pub codec: String,

    /// Output container
    pub container: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let ffmpeg = FfmpegSettings::default();
        Self {
            quality: QualityTier::High,
            format: ExportFormat::Video,
            aspect: AspectPreset::Portrait,
            fps: DEFAULT_FPS,
            ffmpeg_binary: ffmpeg.binary,
            codec: ffmpeg.codec,
            container: ffmpeg.container,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<()> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::InvalidValue {
                key: "export.fps".to_string(),
                value: self.fps.to_string()
            }.into());
        }

        for (key, value) in [
            ("export.ffmpeg_binary", &self.ffmpeg_binary),
            ("export.codec", &self.codec),
            ("export.container", &self.container),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone()
                }.into());
            }
        }

        Ok(())
    }

    /// Export options built from these defaults
    pub fn options(&self) -> ExportOptions {
        ExportOptions::for_preset(self.quality, self.format, self.aspect).with_fps(self.fps)
    }

    /// FFmpeg invocation at the configured quality
    pub fn ffmpeg_settings(&self) -> FfmpegSettings {
        FfmpegSettings {
            binary: self.ffmpeg_binary.clone(),
            codec: self.codec.clone(),
            container: self.container.clone(),
            crf: self.quality.crf(),
        }
    }
}

/// Project store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding projects and settings
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("reel-projects.json"),
        }
    }
}

/// Rendering resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Worker threads for pixel processing
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "render.threads".to_string(),
                value: self.threads.to_string()
            }.into());
        }

        Ok(())
    }
}
