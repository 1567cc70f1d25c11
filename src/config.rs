//! Configuration management for the firmware exporter
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (screenforge.toml)
//! - Environment variables (SCREENFORGE__*)
//!
//! ## Example config file (screenforge.toml):
//! ```toml
//! [display]
//! width = 240
//! height = 240
//! rotation = 0
//! corner_radius = 8
//!
//! [export]
//! sketch_name = "ScreenForge_Project"
//! header_name = "images.h"
//! data_dir = "data"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Target panel settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Export bundle layout
    #[serde(default)]
    pub export: ExportConfig,
}

/// Target panel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Panel width in pixels (used for full-screen background images)
    #[serde(default = "default_dimension")]
    pub width: u32,

    /// Panel height in pixels
    #[serde(default = "default_dimension")]
    pub height: u32,

    /// Value passed to `tft.setRotation`
    #[serde(default)]
    pub rotation: u8,

    /// Corner radius for rounded rectangles
    #[serde(default = "default_corner_radius")]
    pub corner_radius: u32,
}

/// Export bundle layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Sketch base name; the archive entry is `<sketch_name>.ino`
    #[serde(default = "default_sketch_name")]
    pub sketch_name: String,

    /// Asset header file name
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Directory for LittleFS files inside the archive
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

// Default value functions
fn default_dimension() -> u32 {
    240
}

fn default_corner_radius() -> u32 {
    8
}

fn default_sketch_name() -> String {
    "ScreenForge_Project".to_string()
}

fn default_header_name() -> String {
    "images.h".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
            rotation: 0,
            corner_radius: default_corner_radius(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sketch_name: default_sketch_name(),
            header_name: default_header_name(),
            data_dir: default_data_dir(),
        }
    }
}

impl ExportConfig {
    /// Archive entry name of the main sketch
    pub fn sketch_file(&self) -> String {
        format!("{}.ino", self.sketch_name)
    }
}

impl ForgeConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, optionally layering a specific file on top
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "screenforge.toml",
            ".screenforge.toml",
            "config/screenforge.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "screenforge", "screenforge") {
            let xdg_config = config_dir.config_dir().join("screenforge.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCREENFORGE__DISPLAY__ROTATION=1 etc.
        builder = builder.add_source(
            Environment::with_prefix("SCREENFORGE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
