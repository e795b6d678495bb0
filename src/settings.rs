//! Viewer settings with persistence
//!
//! Settings are saved to `~/.config/posekit/settings.toml`

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use posekit_core::Color;
use posekit_playback::ViewerConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All viewer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub viewer: ViewerConfig,
    pub assets: AssetSettings,
    pub preview: PreviewSettings,
}

impl ViewerSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("posekit"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!("Failed to parse settings: {}, using defaults", e);
                Self::default()
            }),
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Where pose files look up the models they name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Base directory relative model URLs resolve against
    pub base_path: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("assets"),
        }
    }
}

/// Longest preview a settings file may ask for (one day)
const MAX_PREVIEW_SECONDS: f32 = 86_400.0;

/// Headless preview settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// How long to play each uploaded file, in seconds
    pub seconds: f32,
    /// Model tint as a hex string, e.g. "#ff8800"
    pub tint: Option<String>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            seconds: 2.0,
            tint: None,
        }
    }
}

impl PreviewSettings {
    /// Preview length, clamped to `[0, MAX_PREVIEW_SECONDS]`.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.seconds.clamp(0.0, MAX_PREVIEW_SECONDS)).unwrap_or_else(|_| {
            warn!("Ignoring invalid preview length {}", self.seconds);
            Self::default().duration()
        })
    }

    /// The tint color, if set and valid
    pub fn tint_color(&self) -> Option<Color> {
        let hex = self.tint.as_deref()?;
        let color = Color::parse_hex(hex);
        if color.is_none() {
            warn!("Ignoring invalid tint color {:?}", hex);
        }
        color
    }
}
