//! Locating ffmpeg and ffprobe.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ToolSettings;

/// A media tool could not be used.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{tool} not found at configured path: {path}")]
    ConfiguredPathMissing { tool: &'static str, path: PathBuf },

    #[error("{tool} not found on PATH")]
    NotOnPath { tool: &'static str },
}

/// Resolved executables, fixed for the lifetime of a runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl MediaTools {
    /// Resolve both tools from explicit settings or `PATH`.
    pub fn resolve(settings: &ToolSettings) -> Result<Self, ToolError> {
        let search = env::var_os("PATH").unwrap_or_default();
        Self::resolve_in(settings, &search)
    }

    fn resolve_in(settings: &ToolSettings, search: &OsString) -> Result<Self, ToolError> {
        let ffmpeg = resolve_tool("ffmpeg", &settings.ffmpeg_path, search)?;
        let ffprobe = resolve_tool("ffprobe", &settings.ffprobe_path, search)?;
        tracing::debug!(
            "Media tools: ffmpeg={} ffprobe={}",
            ffmpeg.display(),
            ffprobe.display()
        );
        Ok(Self { ffmpeg, ffprobe })
    }
}

fn resolve_tool(tool: &'static str, configured: &str, search: &OsString) -> Result<PathBuf, ToolError> {
    let configured = configured.trim();
    if !configured.is_empty() {
        let path = PathBuf::from(configured);
        return if path.is_file() {
            Ok(path)
        } else {
            Err(ToolError::ConfiguredPathMissing { tool, path })
        };
    }

    env::split_paths(search)
        .map(|dir| dir.join(executable_name(tool)))
        .find(|candidate| is_executable(candidate))
        .ok_or(ToolError::NotOnPath { tool })
}

fn executable_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", tool)
    } else {
        tool.to_string()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
