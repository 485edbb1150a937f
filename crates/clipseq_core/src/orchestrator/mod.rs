//! Pipeline orchestrator for running a sequence end to end.
//!
//! # Architecture
//!
//! ```text
//! Runner
//!   └── Pipeline
//!         ├── Step: ReadSequence
//!         ├── Step: ValidateInputs
//!         ├── Step: PlanSegments
//!         └── Step: ConcatenateSegments
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use clipseq_core::config::Settings;
//! use clipseq_core::orchestrator::Runner;
//!
//! let runner = Runner::new(Settings::default()).unwrap();
//! let result = runner
//!     .run(Path::new("intro.csv"), Path::new("output"), Path::new(".scratch"))
//!     .unwrap();
//! println!("{} ({:.1}s)", result.output_path.display(), result.audio_length_seconds);
//! ```

mod errors;
mod phase;
mod pipeline;
mod runner;
mod step;
pub mod steps;
mod types;

pub use errors::{ErrorCategory, PipelineError, PipelineResult, StepError, StepResult};
pub use phase::RunPhase;
pub use pipeline::{Pipeline, PipelineRunResult};
pub use runner::{output_file_name, Runner, SharedLogCallback, SharedProgressCallback};
pub use step::PipelineStep;
pub use steps::{ConcatenateStep, PlanSegmentsStep, ReadSequenceStep, ValidateInputsStep};
pub use types::{Context, ProgressCallback, RunPaths, RunState, RunSummary, StepOutcome};

/// Create the standard pipeline:
/// 1. ReadSequence - parse the sequence file
/// 2. ValidateInputs - clips exist, output dir writable
/// 3. PlanSegments - generate silence, order segments
/// 4. ConcatenateSegments - ffmpeg concat and ffprobe duration
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ReadSequenceStep::new())
        .with_step(ValidateInputsStep::new())
        .with_step(PlanSegmentsStep::new())
        .with_step(ConcatenateStep::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_order() {
        assert_eq!(
            create_standard_pipeline().step_names(),
            vec![
                "ReadSequence",
                "ValidateInputs",
                "PlanSegments",
                "ConcatenateSegments"
            ]
        );
    }
}
