//! ConcatenateSegments step - joins the plan into the output file.

use crate::executor::ConcatExecutor;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::phase::RunPhase;
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};

pub struct ConcatenateStep;

impl ConcatenateStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConcatenateStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ConcatenateStep {
    fn name(&self) -> &str {
        "ConcatenateSegments"
    }

    fn description(&self) -> &str {
        "Concatenate segments with ffmpeg and probe the result"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.paths.output_dir.is_dir() {
            return Err(StepError::invalid_input(format!(
                "output directory does not exist: {}",
                ctx.paths.output_dir.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let plan = state
            .plan
            .clone()
            .ok_or_else(|| StepError::precondition_failed("no segment plan"))?;
        let scratch = state
            .scratch
            .take()
            .ok_or_else(|| StepError::precondition_failed("no scratch area"))?;

        ctx.logger
            .info(&format!("Output: {}", ctx.paths.output_file.display()));

        let executor = ConcatExecutor::new(ctx.backend.as_ref(), &ctx.logger);
        let result =
            executor.execute_with_phases(&plan, &ctx.paths.output_file, scratch, |phase| {
                ctx.logger.section(phase.name());
                if let Err(e) = state.advance(phase) {
                    ctx.logger.warn(&e.to_string());
                }
            })?;

        state.advance(RunPhase::Done)?;
        state.result = Some(result);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let result = state
            .result
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("result not recorded"))?;

        if !result.output_path.exists() {
            return Err(StepError::invalid_output(format!(
                "output file not created: {}",
                result.output_path.display()
            )));
        }
        Ok(())
    }
}
