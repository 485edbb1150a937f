//! Pipeline step implementations.
//!
//! Each step handles one stage of assembling a sequence.

mod concat;
mod plan;
mod read;
mod validate;

pub use concat::ConcatenateStep;
pub use plan::PlanSegmentsStep;
pub use read::ReadSequenceStep;
pub use validate::ValidateInputsStep;
