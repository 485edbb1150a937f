//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use super::errors::{StepError, StepResult};
use super::phase::RunPhase;
use crate::config::Settings;
use crate::logging::RunLogger;
use crate::media::MediaBackend;
use crate::models::{ProcessingResult, SegmentPlan, Step};
use crate::scratch::ScratchArea;
use crate::sequence::SequenceWarning;
use crate::validation::ValidationReport;

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (step_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// File system locations of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// Sequence description to read.
    pub sequence: PathBuf,
    /// Directory that receives the output.
    pub output_dir: PathBuf,
    /// Full path of the file to produce (inside `output_dir`).
    pub output_file: PathBuf,
    /// Base directory for the run's scratch area.
    pub scratch_base: PathBuf,
}

/// Read-only context passed to pipeline steps.
///
/// Mutable state goes in `RunState`.
pub struct Context {
    pub settings: Settings,
    /// Run identifier (UUID), also names the scratch area.
    pub run_id: String,
    pub paths: RunPaths,
    pub backend: Arc<dyn MediaBackend>,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    pub fn new(
        settings: Settings,
        run_id: impl Into<String>,
        paths: RunPaths,
        backend: Arc<dyn MediaBackend>,
        logger: Arc<RunLogger>,
    ) -> Self {
        Self {
            settings,
            run_id: run_id.into(),
            paths,
            backend,
            logger,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }
}

/// Mutable run state that accumulates results from pipeline steps.
#[derive(Debug, Default)]
pub struct RunState {
    pub run_id: String,
    /// When the run started (RFC 3339).
    pub started_at: String,
    pub phase: RunPhase,
    /// Steps read from the sequence (ReadSequence).
    pub steps: Vec<Step>,
    pub warnings: Vec<SequenceWarning>,
    /// Validation verdict (ValidateInputs).
    pub validation: Option<ValidationReport>,
    /// Segment plan (PlanSegments).
    pub plan: Option<SegmentPlan>,
    /// Scratch area, owned here from planning until concatenation takes it.
    pub scratch: Option<ScratchArea>,
    /// Final result (ConcatenateSegments).
    pub result: Option<ProcessingResult>,
}

impl RunState {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: chrono::Local::now().to_rfc3339(),
            ..Default::default()
        }
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn advance(&mut self, next: RunPhase) -> StepResult<()> {
        if !self.phase.can_transition_to(next) {
            return Err(StepError::precondition_failed(format!(
                "cannot move from {} to {}",
                self.phase.name(),
                next.name()
            )));
        }
        self.phase = next;
        Ok(())
    }

    /// Enter `Failed` (if the current phase allows it) and drop the scratch area.
    pub fn mark_failed(&mut self) {
        if self.phase.can_transition_to(RunPhase::Failed) {
            self.phase = RunPhase::Failed;
        }
        if let Err(e) = self.release_scratch() {
            tracing::warn!("Failed to remove scratch area: {}", e);
        }
    }

    /// Remove the scratch area if this state still owns one.
    pub fn release_scratch(&mut self) -> std::io::Result<()> {
        match self.scratch.take() {
            Some(scratch) => scratch.close(),
            None => Ok(()),
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id.clone(),
            started_at: self.started_at.clone(),
            phase: self.phase,
            steps: self.steps.len(),
            warnings: self.warnings.len(),
            clip_segments: self.plan.as_ref().map_or(0, SegmentPlan::clip_count),
            silence_segments: self.plan.as_ref().map_or(0, SegmentPlan::silence_count),
            output: self.result.as_ref().map(|r| r.output_path.clone()),
            audio_length_seconds: self.result.as_ref().map(|r| r.audio_length_seconds),
        }
    }
}

/// Serializable snapshot of a run, written to the run log at the end.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: String,
    pub phase: RunPhase,
    pub steps: usize,
    pub warnings: usize,
    pub clip_segments: usize,
    pub silence_segments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_length_seconds: Option<f64>,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (preconditions not met, but not an error).
    Skipped(String),
}
