//! PlanSegments step - resolves steps into segment files.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::phase::RunPhase;
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::planner::SegmentPlanner;
use crate::scratch::ScratchArea;

pub struct PlanSegmentsStep;

impl PlanSegmentsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlanSegmentsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for PlanSegmentsStep {
    fn name(&self) -> &str {
        "PlanSegments"
    }

    fn description(&self) -> &str {
        "Generate silence and order all segments"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        state.advance(RunPhase::Planning)?;

        // Stored before planning so a failure still finds and removes it.
        let scratch = state
            .scratch
            .insert(ScratchArea::new(&ctx.paths.scratch_base, &ctx.run_id));
        ctx.logger
            .debug(&format!("Scratch area: {}", scratch.path().display()));

        let planner = SegmentPlanner::new(ctx.backend.as_ref(), &ctx.logger);
        let plan = planner.plan(&state.steps, scratch)?;

        state.plan = Some(plan);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match &state.plan {
            Some(plan) if !plan.is_empty() => Ok(()),
            _ => Err(StepError::invalid_output("segment plan not recorded")),
        }
    }
}
