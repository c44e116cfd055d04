//! Cleanup step - removes intermediate files once the output exists.

use crate::cleanup::cleanup;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, Stage, StepOutcome};

/// Cleanup step for deleting fetched media and embedded captions.
///
/// A caption file that did not make it into the output is kept.
pub struct CleanupStep;

impl CleanupStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CleanupStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for CleanupStep {
    fn name(&self) -> &str {
        "Cleanup"
    }

    fn stage(&self) -> Stage {
        Stage::CleaningUp
    }

    fn description(&self) -> &str {
        "CLEANUP"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        match &state.output {
            Some(output) if output.path.exists() => Ok(()),
            Some(output) => Err(StepError::invalid_input(format!(
                "Output missing, refusing to clean up: {}",
                output.path.display()
            ))),
            None => Err(StepError::invalid_input("No output produced")),
        }
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let embedded = state
            .output
            .as_ref()
            .is_some_and(|output| output.captions_embedded);

        let captions = match &state.caption_file {
            Some(file) if embedded => Some(file.path.as_path()),
            Some(file) => {
                ctx.logger
                    .info(&format!("Keeping captions file: {}", file.path.display()));
                None
            }
            None => None,
        };

        let report = cleanup(
            &ctx.logger,
            state.audio.as_ref().map(|a| a.path.as_path()),
            state.video.as_ref().map(|v| v.path.as_path()),
            captions,
        );
        if !report.failed.is_empty() {
            ctx.logger.warn(&format!(
                "{} intermediate file(s) could not be deleted",
                report.failed.len()
            ));
        }

        state.cleanup = Some(report);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.cleanup.is_none() {
            return Err(StepError::invalid_output("Cleanup not recorded"));
        }
        Ok(())
    }
}
