//! Core application functionality
//!
//! This module contains the command line front end:
//! - CLI parsing and validation
//! - Settings and the user config file
//! - Error handling and the batch runner

pub mod cli;
pub mod config;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config::{ConfigFile, EditorSettings};
pub use runner::{run_app, run_batch, RunReport};
