//! Command line interface for the sprite editor
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs.

use crate::core::config::{ConfigFile, EditorSettings};
use crate::editing::EditorMode;
use bevy::log::debug;
use clap::Parser;
use std::path::PathBuf;

/// Sprite editor CLI arguments
///
/// Examples:
///   sprite-editor hero.json --stats                      # Print canvas stats
///   sprite-editor hero.json --mode collision --add-polygon
///   sprite-editor hero.json --mode render --snap -o out.json
///   sprite-editor --new-config                           # Create ~/.config/sprite-editor
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "sprite-editor",
    version,
    about = "Edit sprite collision and render geometry",
    long_about = "Loads a sprite description (JSON), applies geometry edits through the same viewport controller an interactive editor uses, and writes the result back."
)]
pub struct CliArgs {
    /// Path to the sprite file to edit
    #[clap(
        value_name = "SPRITE",
        help = "Sprite file to edit (JSON)",
        required_unless_present = "new_config"
    )]
    pub sprite: Option<PathBuf>,

    /// Editor mode to run the operations in
    #[clap(
        long = "mode",
        short = 'm',
        help = "Editor mode: view, collision, render, source",
        long_help = "Editor mode to run the operations in. 'collision' and 'render' select which polygon collection --add-polygon and --snap act on; 'source' edits the source region. Defaults to the config file setting, then 'view'."
    )]
    pub mode: Option<String>,

    #[clap(
        long = "add-polygon",
        help = "Add a seed triangle at the source region origin",
        long_help = "Append a small triangle to the geometry of the current mode, anchored at the sprite's source region origin. The geometry becomes fully custom."
    )]
    pub add_polygon: bool,

    #[clap(
        long = "snap",
        help = "Snap all vertices of the current geometry to whole pixels"
    )]
    pub snap: bool,

    #[clap(long = "stats", short = 's', help = "Print canvas statistics")]
    pub stats: bool,

    /// Where to write the edited sprite
    #[clap(
        long = "output",
        short = 'o',
        help = "Output path (defaults to overwriting the input)",
        long_help = "Where to write the edited sprite. Without this flag the input file is overwritten, but only if an edit was made."
    )]
    pub output: Option<PathBuf>,

    #[clap(long = "verbose", short = 'v', help = "Log debug output")]
    pub verbose: bool,

    #[clap(
        long = "log-file",
        help = "Also write logs to the config directory",
        long_help = "Also write logs to a daily file in ~/.config/sprite-editor/logs."
    )]
    pub log_file: bool,

    /// Initialize user configuration directory with default settings
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with default settings",
        long_help = "Initialize the ~/.config/sprite-editor directory with a settings.json file and a logs directory."
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures the sprite exists and the mode is known before anything
    /// runs, providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.sprite {
            if !path.exists() {
                return Err(format!(
                    "Sprite file does not exist: {}\nMake sure the path is correct and the file exists.",
                    path.display()
                ));
            }
            if !path.is_file() {
                return Err(format!(
                    "Sprite path is not a file: {}",
                    path.display()
                ));
            }
        }

        if let Some(mode) = &self.mode {
            if mode.parse::<EditorMode>().is_err() {
                let available: Vec<&str> = EditorMode::ALL.iter().map(|m| m.as_str()).collect();
                return Err(format!(
                    "Unknown mode: '{mode}'\nAvailable modes: {}",
                    available.join(", ")
                ));
            }
        }

        Ok(())
    }

    /// Check the requested edits against the resolved mode.
    ///
    /// Runs after the config file is loaded, since `default_mode` there can
    /// supply the mode when `--mode` is absent.
    pub fn check_edit_mode(&self, mode: EditorMode) -> Result<(), String> {
        if (self.add_polygon || self.snap) && mode.geometry_kind().is_none() {
            return Err(format!(
                "--add-polygon and --snap need the collision or render mode, not '{mode}'"
            ));
        }
        Ok(())
    }

    /// Get the editor mode from CLI args, config file, or default
    ///
    /// Priority order:
    /// 1. CLI argument (--mode)
    /// 2. Config file setting (~/.config/sprite-editor/settings.json)
    /// 3. Built-in default (view)
    pub fn resolve_mode(&self, config: Option<&ConfigFile>) -> EditorMode {
        if let Some(mode) = self.mode.as_deref().and_then(|m| m.parse().ok()) {
            debug!("Using mode from CLI: {:?}", mode);
            return mode;
        }

        if let Some(mode) = config
            .and_then(|c| c.default_mode.as_deref())
            .and_then(|m| m.parse().ok())
        {
            debug!("Using mode from config file: {:?}", mode);
            return mode;
        }

        EditorMode::default()
    }

    /// Built-in settings with config file overrides applied
    pub fn settings(&self, config: Option<&ConfigFile>) -> EditorSettings {
        match config {
            Some(config) => EditorSettings::default().with_config(config),
            None => EditorSettings::default(),
        }
    }
}
