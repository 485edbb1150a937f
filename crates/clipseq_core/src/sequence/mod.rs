//! Sequence file reading.

mod error;
mod reader;

pub use error::SequenceError;
pub use reader::{parse_sequence, read_sequence, Sequence, SequenceWarning};
