//! Turns steps into an ordered list of playable files.
//!
//! Clips pass through untouched; every positive pause is rendered to a
//! silence file in the scratch area.

use crate::logging::RunLogger;
use crate::media::MediaBackend;
use crate::models::{Segment, SegmentPlan, SegmentSource, Step, StepKind};
use crate::orchestrator::{StepError, StepResult};
use crate::scratch::ScratchArea;

pub struct SegmentPlanner<'a> {
    backend: &'a dyn MediaBackend,
    logger: &'a RunLogger,
}

impl<'a> SegmentPlanner<'a> {
    pub fn new(backend: &'a dyn MediaBackend, logger: &'a RunLogger) -> Self {
        Self { backend, logger }
    }

    /// Build the segment plan, synthesizing silence as needed.
    ///
    /// Fails with `NothingToProcess` before touching the scratch area when
    /// no step contributes a segment. Any synthesis failure fails the plan.
    pub fn plan(&self, steps: &[Step], scratch: &mut ScratchArea) -> StepResult<SegmentPlan> {
        if !steps.iter().any(Step::contributes_segment) {
            return Err(StepError::NothingToProcess);
        }

        let silence_total = steps
            .iter()
            .filter(|s| matches!(s.kind, StepKind::Pause { seconds } if seconds > 0.0))
            .count();
        let mut silence_done = 0;
        let mut plan = SegmentPlan::new();

        for (index, step) in steps.iter().enumerate() {
            match &step.kind {
                StepKind::Clip { path } => {
                    plan.push(Segment {
                        step_index: index,
                        step_id: step.id.clone(),
                        source: SegmentSource::Clip,
                        path: path.clone(),
                    });
                }
                StepKind::Pause { seconds } if *seconds > 0.0 => {
                    scratch
                        .ensure()
                        .map_err(|e| StepError::io_error("creating scratch area", e))?;
                    let output = scratch.file(&format!(
                        "silence-{}.{}",
                        index,
                        self.backend.segment_extension()
                    ));

                    self.logger.debug(&format!(
                        "Step '{}': {:.3}s of silence -> {}",
                        step.id,
                        seconds,
                        output.display()
                    ));
                    self.backend
                        .synthesize_silence(*seconds, &output, self.logger)?;

                    plan.push(Segment {
                        step_index: index,
                        step_id: step.id.clone(),
                        source: SegmentSource::Silence,
                        path: output,
                    });

                    silence_done += 1;
                    self.logger
                        .progress((silence_done * 100 / silence_total) as u32);
                }
                _ => {
                    self.logger
                        .debug(&format!("Step '{}' contributes nothing", step.id));
                }
            }
        }

        self.logger.info(&format!(
            "Planned {} segment(s): {} clip(s), {} silence",
            plan.len(),
            plan.clip_count(),
            plan.silence_count()
        ));
        Ok(plan)
    }
}
