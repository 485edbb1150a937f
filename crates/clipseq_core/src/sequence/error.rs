//! Sequence file errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that make a sequence file unusable.
#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("Failed to read sequence file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },

    #[error("Line {line}: step id is missing")]
    MissingId { line: usize },

    #[error("Line {line}: duplicate step id '{id}' (first used on line {first_line})")]
    DuplicateId {
        id: String,
        line: usize,
        first_line: usize,
    },

    #[error("Sequence contains no steps")]
    Empty,
}

impl SequenceError {
    /// Line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            SequenceError::UnterminatedQuote { line }
            | SequenceError::MissingId { line }
            | SequenceError::DuplicateId { line, .. } => Some(*line),
            SequenceError::ReadError { .. } | SequenceError::Empty => None,
        }
    }
}
