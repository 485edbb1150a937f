//! ffmpeg / ffprobe integration.
//!
//! - Tool discovery (`MediaTools`)
//! - Fixed output encoding (`OutputProfile`)
//! - Command execution with logged output (`run_tool`)
//! - concat manifests
//! - The `MediaBackend` seam used by the planner and executor

mod backend;
mod command;
#[cfg(test)]
pub(crate) mod fake;
mod manifest;
mod profile;
mod tools;

pub use backend::{FfmpegBackend, MediaBackend};
pub use command::{format_command, run_tool, ToolOutput};
pub use manifest::{
    escape_concat_path, read_concat_manifest, write_concat_manifest, MANIFEST_FILE_NAME,
};
pub use profile::OutputProfile;
pub use tools::{MediaTools, ToolError};
