//! clipseq core - assembles audio files from clips and pauses.
//!
//! Reads a sequence of clips and pauses, renders the pauses as silence
//! with ffmpeg and concatenates everything into one file. Holds no CLI
//! code; the `clipseq` binary is a thin layer over [`orchestrator::Runner`].

pub mod config;
pub mod executor;
pub mod logging;
pub mod media;
pub mod models;
pub mod orchestrator;
pub mod planner;
pub mod scratch;
pub mod sequence;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
