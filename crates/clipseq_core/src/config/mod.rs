//! Configuration management for clipseq.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use clipseq_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/clipseq.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Scratch root: {}", config.settings().paths.scratch_root);
//!
//! config.settings_mut().paths.output_folder = "renders".to_string();
//! config.update_section(ConfigSection::Paths).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, OutputSettings, PathSettings, Settings, ToolSettings,
};
