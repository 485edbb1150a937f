//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Output, scratch and log directories.
    #[serde(default)]
    pub paths: PathSettings,

    /// External media tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Encoding profile of the assembled file.
    #[serde(default)]
    pub output: OutputSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Check values that would otherwise only fail once ffmpeg is running.
    pub fn validate(&self) -> Result<(), String> {
        let output = &self.output;
        if output.codec.trim().is_empty() {
            return Err("output.codec must not be empty".to_string());
        }
        if output.extension.trim().is_empty() {
            return Err("output.extension must not be empty".to_string());
        }
        if output.sample_rate == 0 {
            return Err("output.sample_rate must be greater than zero".to_string());
        }
        if !(1..=8).contains(&output.channels) {
            return Err(format!(
                "output.channels must be between 1 and 8 (got {})",
                output.channels
            ));
        }
        if self.paths.scratch_root.trim().is_empty() {
            return Err("paths.scratch_root must not be empty".to_string());
        }
        Ok(())
    }
}

/// Path configuration for output, scratch and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder that receives assembled files when no output dir is given.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Base folder for per-run scratch areas.
    #[serde(default = "default_scratch_root")]
    pub scratch_root: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "output".to_string()
}

fn default_scratch_root() -> String {
    ".scratch".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            scratch_root: default_scratch_root(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Locations of ffmpeg and ffprobe.
///
/// Empty values mean "search `PATH`".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default)]
    pub ffmpeg_path: String,

    #[serde(default)]
    pub ffprobe_path: String,
}

/// Fixed encoding profile for silence segments and the final file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// ffmpeg audio encoder name.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Target bitrate passed to `-b:a`.
    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    /// Sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Channel count (1 = mono, 2 = stereo).
    #[serde(default = "default_channels")]
    pub channels: u32,

    /// File extension (container) for output and silence files.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Prefix of generated output file names.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_codec() -> String {
    "libmp3lame".to_string()
}

fn default_bitrate() -> String {
    "192k".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u32 {
    2
}

fn default_extension() -> String {
    "mp3".to_string()
}

fn default_file_prefix() -> String {
    "sequence".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            bitrate: default_bitrate(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            extension: default_extension(),
            file_prefix: default_file_prefix(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level written to run logs.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact log format (tool output only kept in the tail buffer).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool output lines to show on error.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    25
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
        }
    }
}

/// Config sections that can be rewritten independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Tools,
    Output,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Paths,
        ConfigSection::Tools,
        ConfigSection::Output,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tools => "tools",
            ConfigSection::Output => "output",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "# Output, scratch and log directories",
            ConfigSection::Tools => "# ffmpeg / ffprobe locations (empty = search PATH)",
            ConfigSection::Output => "# Encoding profile of the assembled file",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[output]"));
        assert!(toml.contains("scratch_root"));
        assert!(toml.contains("level = \"info\""));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let parsed: Settings = toml::from_str("[output]\nbitrate = \"128k\"\n").unwrap();
        assert_eq!(parsed.output.bitrate, "128k");
        assert_eq!(parsed.output.codec, "libmp3lame");
        assert_eq!(parsed.output.sample_rate, 44100);
        assert_eq!(parsed.paths.scratch_root, ".scratch");
    }

    #[test]
    fn validate_rejects_bad_output_profile() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.output.channels = 0;
        assert!(settings.validate().unwrap_err().contains("channels"));

        settings.output.channels = 2;
        settings.output.sample_rate = 0;
        assert!(settings.validate().unwrap_err().contains("sample_rate"));
    }
}
