//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Step → Operation → Detail

use std::io;

use thiserror::Error;

use crate::sequence::SequenceError;

/// Broad class of a failure, used to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Settings or tools unusable; nothing was attempted.
    Configuration,
    /// Sequence or referenced files unusable; no media tool was run.
    Input,
    /// A media operation failed.
    Processing,
}

/// Top-level pipeline error with run context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Settings or media tools are unusable.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A step failed during execution.
    #[error("Run '{run_id}' failed at step '{step_name}': {source}")]
    StepFailed {
        run_id: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Failed to set up the run (logger, directories).
    #[error("Run '{run_id}' setup failed: {message}")]
    SetupFailed { run_id: String, message: String },
}

impl PipelineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn step_failed(
        run_id: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            run_id: run_id.into(),
            step_name: step_name.into(),
            source,
        }
    }

    pub fn setup_failed(run_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            run_id: run_id.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Configuration { .. } | PipelineError::SetupFailed { .. } => {
                ErrorCategory::Configuration
            }
            PipelineError::StepFailed { source, .. } => source.category(),
        }
    }
}

/// Error from a pipeline step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// The sequence file could not be read.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// No step yields a segment.
    #[error("nothing to process")]
    NothingToProcess,

    /// An external command failed.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A required file was not found.
    #[error("Required file not found: {path}")]
    FileNotFound { path: String },

    /// Tool output could not be parsed.
    #[error("Failed to parse {what}: {message}")]
    ParseError { what: String, message: String },

    /// A precondition was not met.
    #[error("Precondition not met: {0}")]
    PreconditionFailed(String),
}

impl StepError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    pub fn command_failed(
        tool: impl Into<String>,
        exit_code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn parse_error(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            what: what.into(),
            message: message.into(),
        }
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StepError::InvalidInput(_)
            | StepError::Sequence(_)
            | StepError::NothingToProcess
            | StepError::FileNotFound { .. } => ErrorCategory::Input,
            StepError::InvalidOutput(_)
            | StepError::CommandFailed { .. }
            | StepError::IoError { .. }
            | StepError::ParseError { .. }
            | StepError::PreconditionFailed(_) => ErrorCategory::Processing,
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_displays_context() {
        let err = StepError::command_failed("ffmpeg", 1, "Invalid data found");
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Invalid data found"));
    }

    #[test]
    fn pipeline_error_chains_context() {
        let step_err = StepError::io_error(
            "writing concat manifest",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let pipeline_err = PipelineError::step_failed("run-42", "ConcatenateSegments", step_err);

        let msg = pipeline_err.to_string();
        assert!(msg.contains("run-42"));
        assert!(msg.contains("ConcatenateSegments"));
        assert!(msg.contains("writing concat manifest"));
    }

    #[test]
    fn categories() {
        assert_eq!(
            PipelineError::configuration("ffmpeg not found").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            PipelineError::step_failed("r", "PlanSegments", StepError::NothingToProcess)
                .category(),
            ErrorCategory::Input
        );
        assert_eq!(
            PipelineError::step_failed("r", "ReadSequence", SequenceError::Empty.into())
                .category(),
            ErrorCategory::Input
        );
        assert_eq!(
            StepError::command_failed("ffprobe", 1, "x").category(),
            ErrorCategory::Processing
        );
    }
}
