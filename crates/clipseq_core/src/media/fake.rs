//! In-memory stand-in for ffmpeg used by unit tests.
//!
//! Silence files contain `silence:<seconds>`, concat output contains the
//! summed duration, and probing reads it back.

use std::fs;
use std::path::Path;

use parking_lot::Mutex;

use super::backend::MediaBackend;
use super::manifest::read_concat_manifest;
use crate::logging::RunLogger;
use crate::orchestrator::{StepError, StepResult};

#[derive(Debug, Default)]
pub struct FakeBackend {
    /// Duration credited to every user clip.
    clip_seconds: f64,
    fail_silence: bool,
    fail_concat: bool,
    fail_probe: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new(clip_seconds: f64) -> Self {
        Self {
            clip_seconds,
            ..Self::default()
        }
    }

    pub fn failing_silence(mut self) -> Self {
        self.fail_silence = true;
        self
    }

    pub fn failing_concat(mut self) -> Self {
        self.fail_concat = true;
        self
    }

    pub fn failing_probe(mut self) -> Self {
        self.fail_probe = true;
        self
    }

    /// Operations invoked so far, e.g. `silence 2.000`, `concat`, `probe`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn segment_seconds(&self, path: &Path) -> f64 {
        fs::read_to_string(path)
            .ok()
            .and_then(|c| c.strip_prefix("silence:").and_then(|s| s.parse().ok()))
            .unwrap_or(self.clip_seconds)
    }
}

impl MediaBackend for FakeBackend {
    fn segment_extension(&self) -> &str {
        "mp3"
    }

    fn synthesize_silence(
        &self,
        seconds: f64,
        output: &Path,
        _logger: &RunLogger,
    ) -> StepResult<()> {
        self.calls.lock().push(format!("silence {:.3}", seconds));
        if self.fail_silence {
            return Err(StepError::command_failed("ffmpeg", 1, "anullsrc unavailable"));
        }
        fs::write(output, format!("silence:{}", seconds))
            .map_err(|e| StepError::io_error("writing silence", e))
    }

    fn concat(&self, manifest: &Path, output: &Path, _logger: &RunLogger) -> StepResult<()> {
        self.calls.lock().push("concat".to_string());
        if self.fail_concat {
            let _ = fs::write(output, "partial");
            return Err(StepError::command_failed("ffmpeg", 1, "Invalid data found"));
        }
        let entries = read_concat_manifest(manifest)
            .map_err(|e| StepError::io_error("reading manifest", e))?;
        let total: f64 = entries.iter().map(|p| self.segment_seconds(p)).sum();
        fs::write(output, format!("total:{}", total))
            .map_err(|e| StepError::io_error("writing output", e))
    }

    fn probe_duration(&self, media: &Path, _logger: &RunLogger) -> StepResult<f64> {
        self.calls.lock().push("probe".to_string());
        if self.fail_probe {
            return Err(StepError::command_failed("ffprobe", 1, "moov atom not found"));
        }
        let content =
            fs::read_to_string(media).map_err(|e| StepError::io_error("probing output", e))?;
        content
            .strip_prefix("total:")
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| StepError::parse_error("duration", content.clone()))
    }
}
