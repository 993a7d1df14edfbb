//! Application configuration management
//!
//! This module handles all configuration aspects:
//! - Built-in editor settings
//! - User configuration files

pub mod settings;
pub mod user_config;

pub use settings::{EditorSettings, ViewFlags};
pub use user_config::ConfigFile;
