//! Pre-flight checks on clips and the output directory.
//!
//! Runs before any media tool is invoked so bad input never creates a
//! scratch area.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::Step;

/// A single problem found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    ClipMissing { step_id: String, path: PathBuf },
    ClipNotAFile { step_id: String, path: PathBuf },
    ClipPathNotUnicode { step_id: String, path: PathBuf },
    ClipUnreadable {
        step_id: String,
        path: PathBuf,
        reason: String,
    },
    OutputDirMissing { path: PathBuf },
    OutputNotADirectory { path: PathBuf },
    OutputNotWritable { path: PathBuf, reason: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::ClipMissing { step_id, path } => {
                write!(f, "step '{}': clip not found: {}", step_id, path.display())
            }
            ValidationIssue::ClipNotAFile { step_id, path } => {
                write!(f, "step '{}': clip is not a file: {}", step_id, path.display())
            }
            ValidationIssue::ClipPathNotUnicode { step_id, path } => write!(
                f,
                "step '{}': clip path is not valid UTF-8: {}",
                step_id,
                path.display()
            ),
            ValidationIssue::ClipUnreadable {
                step_id,
                path,
                reason,
            } => write!(
                f,
                "step '{}': clip not readable: {} ({})",
                step_id,
                path.display(),
                reason
            ),
            ValidationIssue::OutputDirMissing { path } => {
                write!(f, "output directory does not exist: {}", path.display())
            }
            ValidationIssue::OutputNotADirectory { path } => {
                write!(f, "output path is not a directory: {}", path.display())
            }
            ValidationIssue::OutputNotWritable { path, reason } => write!(
                f,
                "output directory not writable: {} ({})",
                path.display(),
                reason
            ),
        }
    }
}

/// Verdict of a validation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    /// Number of clip steps checked.
    pub clips_checked: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// One-line description of all issues.
    pub fn summary(&self) -> String {
        if self.issues.is_empty() {
            return format!("{} clip(s) OK", self.clips_checked);
        }
        self.issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Checks clips and the output directory before planning.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputValidator;

const WRITE_PROBE_NAME: &str = ".clipseq-write-probe";

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, steps: &[Step], output_dir: &Path) -> ValidationReport {
        let mut report = ValidationReport::default();

        for step in steps {
            if let Some(path) = step.clip_reference() {
                report.clips_checked += 1;
                if let Some(issue) = check_clip(&step.id, path) {
                    report.issues.push(issue);
                }
            }
        }

        if let Some(issue) = check_output_dir(output_dir) {
            report.issues.push(issue);
        }

        for issue in &report.issues {
            tracing::warn!("Validation: {}", issue);
        }

        report
    }
}

fn check_clip(step_id: &str, path: &Path) -> Option<ValidationIssue> {
    // concat manifests are text; such a path could not be listed.
    if path.to_str().is_none() {
        return Some(ValidationIssue::ClipPathNotUnicode {
            step_id: step_id.to_string(),
            path: path.to_path_buf(),
        });
    }

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(_) => {
            return Some(ValidationIssue::ClipMissing {
                step_id: step_id.to_string(),
                path: path.to_path_buf(),
            })
        }
    };

    if !metadata.is_file() {
        return Some(ValidationIssue::ClipNotAFile {
            step_id: step_id.to_string(),
            path: path.to_path_buf(),
        });
    }

    File::open(path).err().map(|e| ValidationIssue::ClipUnreadable {
        step_id: step_id.to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn check_output_dir(dir: &Path) -> Option<ValidationIssue> {
    let metadata = match fs::metadata(dir) {
        Ok(m) => m,
        Err(_) => {
            return Some(ValidationIssue::OutputDirMissing {
                path: dir.to_path_buf(),
            })
        }
    };

    if !metadata.is_dir() {
        return Some(ValidationIssue::OutputNotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let probe = dir.join(WRITE_PROBE_NAME);
    let created = OpenOptions::new().write(true).create_new(true).open(&probe);
    match created {
        Ok(file) => {
            drop(file);
            if let Err(e) = fs::remove_file(&probe) {
                tracing::warn!("Could not remove write probe {}: {}", probe.display(), e);
            }
            None
        }
        Err(e) => Some(ValidationIssue::OutputNotWritable {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}
