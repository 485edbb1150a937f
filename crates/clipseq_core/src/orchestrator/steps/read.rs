//! ReadSequence step - loads steps from the sequence file.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::sequence::read_sequence;

pub struct ReadSequenceStep;

impl ReadSequenceStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReadSequenceStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ReadSequenceStep {
    fn name(&self) -> &str {
        "ReadSequence"
    }

    fn description(&self) -> &str {
        "Read clips and pauses from the sequence file"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.paths.sequence.is_file() {
            return Err(StepError::file_not_found(
                ctx.paths.sequence.display().to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        ctx.logger
            .info(&format!("Sequence: {}", ctx.paths.sequence.display()));

        let sequence = read_sequence(&ctx.paths.sequence)?;
        for warning in &sequence.warnings {
            ctx.logger.warn(&format!(
                "line {} (step '{}'): {}",
                warning.line, warning.step_id, warning.message
            ));
        }

        ctx.logger.info(&format!(
            "Read {} step(s), {} warning(s)",
            sequence.steps.len(),
            sequence.warnings.len()
        ));

        state.steps = sequence.steps;
        state.warnings = sequence.warnings;
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.steps.is_empty() {
            return Err(StepError::invalid_output("no steps recorded"));
        }
        Ok(())
    }
}
