//! User configuration file handling
//!
//! Manages settings from ~/.config/sprite-editor/settings.json

use bevy::log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "sprite-editor";

/// User configuration from ~/.config/sprite-editor/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Mode to start in when none is given on the command line
    pub default_mode: Option<String>,
    pub show_source_texture: Option<bool>,
    pub show_sockets: Option<bool>,
    pub show_normals: Option<bool>,
    pub show_pivot: Option<bool>,
    /// Line hit tolerance in screen pixels
    pub hit_tolerance: Option<f32>,
}

impl ConfigFile {
    /// Get the path to the sprite-editor config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join(APP_DIR)
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse settings.json: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read settings.json: {}", e);
                None
            }
        }
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Initialize the user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/sprite-editor directory
    /// 2. A settings.json file with default values
    /// 3. A logs/ directory for application logs
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        let config_dir = Self::config_dir();
        fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = crate::logging::logs_dir();
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = Self::config_path();
        if !settings_path.exists() {
            let defaults = ConfigFile {
                default_mode: Some("view".to_string()),
                show_source_texture: Some(false),
                show_sockets: Some(true),
                show_normals: Some(true),
                show_pivot: Some(true),
                hit_tolerance: Some(crate::core::config::settings::DEFAULT_HIT_TOLERANCE),
            };
            defaults.save()?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - View application logs in: {:?}", logs_dir);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        assert!(ConfigFile::load_from(&path).is_none());

        let config = ConfigFile {
            default_mode: Some("collision".to_string()),
            show_normals: Some(false),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(ConfigFile::load_from(&path), Some(config));
    }

    #[test]
    fn test_partial_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, r#"{ "show_pivot": false }"#).unwrap();
        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.show_pivot, Some(false));
        assert_eq!(config.default_mode, None);

        fs::write(&path, "not json").unwrap();
        assert!(ConfigFile::load_from(&path).is_none());
    }
}
