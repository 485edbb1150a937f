//! Concatenates a segment plan into the output file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use crate::logging::RunLogger;
use crate::media::{write_concat_manifest, MediaBackend};
use crate::models::{ProcessingResult, SegmentPlan};
use crate::orchestrator::{RunPhase, StepError, StepResult};
use crate::scratch::ScratchArea;

pub struct ConcatExecutor<'a> {
    backend: &'a dyn MediaBackend,
    logger: &'a RunLogger,
}

impl<'a> ConcatExecutor<'a> {
    pub fn new(backend: &'a dyn MediaBackend, logger: &'a RunLogger) -> Self {
        Self { backend, logger }
    }

    /// Concatenate `plan` into `output_path` and measure the result.
    ///
    /// Consumes the scratch area; it is gone when this returns, whatever
    /// the outcome. An existing file at `output_path` is never overwritten,
    /// and on failure no output file is left behind.
    pub fn execute(
        &self,
        plan: &SegmentPlan,
        output_path: &Path,
        scratch: ScratchArea,
    ) -> StepResult<ProcessingResult> {
        self.execute_with_phases(plan, output_path, scratch, |_| {})
    }

    /// Like `execute`, reporting `Concatenating` and `Probing` as they begin.
    pub fn execute_with_phases<F>(
        &self,
        plan: &SegmentPlan,
        output_path: &Path,
        mut scratch: ScratchArea,
        mut on_phase: F,
    ) -> StepResult<ProcessingResult>
    where
        F: FnMut(RunPhase),
    {
        let mut output_touched = false;
        let result = self.concat_and_probe(
            plan,
            output_path,
            &mut scratch,
            &mut on_phase,
            &mut output_touched,
        );

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            self.logger.warn(&format!(
                "Could not remove scratch area {}: {}",
                scratch_path.display(),
                e
            ));
        }

        if result.is_err() && output_touched {
            self.discard_output(output_path);
        }

        result
    }

    fn concat_and_probe(
        &self,
        plan: &SegmentPlan,
        output_path: &Path,
        scratch: &mut ScratchArea,
        on_phase: &mut dyn FnMut(RunPhase),
        output_touched: &mut bool,
    ) -> StepResult<ProcessingResult> {
        if plan.is_empty() {
            return Err(StepError::NothingToProcess);
        }

        claim_output(output_path)?;
        *output_touched = true;

        let dir = scratch
            .ensure()
            .map_err(|e| StepError::io_error("creating scratch area", e))?
            .to_path_buf();

        on_phase(RunPhase::Concatenating);
        let manifest = write_concat_manifest(&dir, &plan.paths())
            .map_err(|e| StepError::io_error("writing concat manifest", e))?;
        self.logger.debug(&format!(
            "Manifest {} lists {} segment(s)",
            manifest.display(),
            plan.len()
        ));

        self.backend.concat(&manifest, output_path, self.logger)?;

        on_phase(RunPhase::Probing);
        let audio_length_seconds = self.backend.probe_duration(output_path, self.logger)?;

        self.logger.success(&format!(
            "Wrote {} ({:.3}s)",
            output_path.display(),
            audio_length_seconds
        ));

        Ok(ProcessingResult {
            output_path: output_path.to_path_buf(),
            audio_length_seconds,
        })
    }

    /// Remove the file this run created at `output_path`.
    fn discard_output(&self, output_path: &Path) {
        match fs::remove_file(output_path) {
            Ok(()) => self.logger.info(&format!(
                "Removed incomplete output {}",
                output_path.display()
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => self.logger.warn(&format!(
                "Could not remove incomplete output {}: {}",
                output_path.display(),
                e
            )),
        }
    }
}

/// Create `output_path` exclusively so only this run owns (and may delete) it.
fn claim_output(output_path: &Path) -> StepResult<()> {
    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output_path)
    {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(StepError::invalid_input(
            format!("output file already exists: {}", output_path.display()),
        )),
        Err(e) => Err(StepError::io_error("creating output file", e)),
    }
}
