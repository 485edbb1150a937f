//! Media operations behind a trait so planning and execution can be
//! exercised without ffmpeg installed.

use std::path::Path;
use std::process::Command;

use super::command::run_tool;
use super::profile::OutputProfile;
use super::tools::MediaTools;
use crate::logging::RunLogger;
use crate::orchestrator::{StepError, StepResult};

/// The three media operations a run needs.
pub trait MediaBackend: Send + Sync {
    /// Extension (without dot) of generated segment files.
    fn segment_extension(&self) -> &str;

    /// Write `seconds` of silence to `output`.
    fn synthesize_silence(&self, seconds: f64, output: &Path, logger: &RunLogger)
        -> StepResult<()>;

    /// Concatenate the entries of a concat manifest into `output`.
    fn concat(&self, manifest: &Path, output: &Path, logger: &RunLogger) -> StepResult<()>;

    /// Duration of `media` in seconds.
    fn probe_duration(&self, media: &Path, logger: &RunLogger) -> StepResult<f64>;
}

/// ffmpeg/ffprobe implementation.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    tools: MediaTools,
    profile: OutputProfile,
}

impl FfmpegBackend {
    pub fn new(tools: MediaTools, profile: OutputProfile) -> Self {
        Self { tools, profile }
    }

    pub fn tools(&self) -> &MediaTools {
        &self.tools
    }

    pub fn profile(&self) -> &OutputProfile {
        &self.profile
    }

    fn ffmpeg(&self) -> Command {
        let mut cmd = Command::new(&self.tools.ffmpeg);
        cmd.args(["-hide_banner", "-nostdin", "-y"]);
        cmd
    }
}

impl MediaBackend for FfmpegBackend {
    fn segment_extension(&self) -> &str {
        &self.profile.extension
    }

    fn synthesize_silence(
        &self,
        seconds: f64,
        output: &Path,
        logger: &RunLogger,
    ) -> StepResult<()> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(StepError::invalid_input(format!(
                "silence duration must be positive, got {}",
                seconds
            )));
        }

        let source = format!(
            "anullsrc=r={}:cl={}",
            self.profile.sample_rate,
            self.profile.channel_layout()
        );

        let mut cmd = self.ffmpeg();
        cmd.args(["-f", "lavfi", "-i"])
            .arg(source)
            .arg("-t")
            .arg(format!("{:.3}", seconds))
            .args(self.profile.encode_args())
            .arg(output);

        run_tool("ffmpeg", &mut cmd, logger)?;
        Ok(())
    }

    fn concat(&self, manifest: &Path, output: &Path, logger: &RunLogger) -> StepResult<()> {
        let mut cmd = self.ffmpeg();
        cmd.args(["-f", "concat", "-safe", "0", "-i"])
            .arg(manifest)
            .arg("-vn")
            .args(self.profile.encode_args())
            .arg(output);

        run_tool("ffmpeg", &mut cmd, logger)?;
        Ok(())
    }

    fn probe_duration(&self, media: &Path, logger: &RunLogger) -> StepResult<f64> {
        let mut cmd = Command::new(&self.tools.ffprobe);
        cmd.args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(media);

        let output = run_tool("ffprobe", &mut cmd, logger)?;
        parse_duration(&output.stdout)
    }
}

fn parse_duration(stdout: &str) -> StepResult<f64> {
    let text = stdout.trim();
    text.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| StepError::parse_error("ffprobe duration", format!("'{}'", text)))
}
