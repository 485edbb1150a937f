//! Sequence steps (one row of a sequence file each).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What a step contributes to the assembled file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    /// An existing audio clip, used verbatim.
    Clip { path: PathBuf },
    /// Silence of the given duration in seconds.
    Pause { seconds: f64 },
    /// Neither clip nor pause; contributes nothing.
    Empty,
}

/// One entry of a sequence, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Identifier, unique within the sequence.
    pub id: String,
    #[serde(flatten)]
    pub kind: StepKind,
}

impl Step {
    pub fn clip(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            kind: StepKind::Clip { path: path.into() },
        }
    }

    pub fn pause(id: impl Into<String>, seconds: f64) -> Self {
        Self {
            id: id.into(),
            kind: StepKind::Pause { seconds },
        }
    }

    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: StepKind::Empty,
        }
    }

    /// Clip path, if this is a clip step.
    pub fn clip_reference(&self) -> Option<&Path> {
        match &self.kind {
            StepKind::Clip { path } => Some(path),
            _ => None,
        }
    }

    /// Pause duration, if this is a pause step.
    pub fn pause_seconds(&self) -> Option<f64> {
        match self.kind {
            StepKind::Pause { seconds } => Some(seconds),
            _ => None,
        }
    }

    /// Whether this step produces a segment in the plan.
    ///
    /// Zero-length pauses are skipped.
    pub fn contributes_segment(&self) -> bool {
        match self.kind {
            StepKind::Clip { .. } => true,
            StepKind::Pause { seconds } => seconds > 0.0,
            StepKind::Empty => false,
        }
    }
}
