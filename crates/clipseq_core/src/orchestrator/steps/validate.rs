//! ValidateInputs step - clips and output directory must be usable.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::validation::InputValidator;

pub struct ValidateInputsStep {
    validator: InputValidator,
}

impl ValidateInputsStep {
    pub fn new() -> Self {
        Self {
            validator: InputValidator::new(),
        }
    }
}

impl Default for ValidateInputsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ValidateInputsStep {
    fn name(&self) -> &str {
        "ValidateInputs"
    }

    fn description(&self) -> &str {
        "Check referenced clips and the output directory"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let report = self
            .validator
            .validate(&state.steps, &ctx.paths.output_dir);

        for issue in &report.issues {
            ctx.logger.warn(&issue.to_string());
        }

        if !report.is_valid() {
            let summary = report.summary();
            state.validation = Some(report);
            return Err(StepError::invalid_input(summary));
        }

        ctx.logger.info(&report.summary());
        state.validation = Some(report);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match &state.validation {
            Some(report) if report.is_valid() => Ok(()),
            _ => Err(StepError::invalid_output("validation not recorded")),
        }
    }
}
