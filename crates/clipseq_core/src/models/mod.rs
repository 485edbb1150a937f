//! Data models for clipseq.
//!
//! - Steps read from a sequence file
//! - Segment plans built from them
//! - The result of a finished run

mod plan;
mod step;

pub use plan::{ProcessingResult, Segment, SegmentPlan, SegmentSource};
pub use step::{Step, StepKind};
