//! Captions step - writes the caption track matching the language.

use crate::fetch::fetch_captions;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, Stage, StepOutcome};

/// Captions step for fetching and retiming one caption track.
///
/// Never fails the job: a missing track or a broken download is logged
/// and the job continues without captions.
pub struct CaptionsStep;

impl CaptionsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CaptionsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for CaptionsStep {
    fn name(&self) -> &str {
        "Captions"
    }

    fn stage(&self) -> Stage {
        Stage::Captioning
    }

    fn description(&self) -> &str {
        "CAPTIONS"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_selection() {
            return Err(StepError::invalid_input("No stream selected"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        if state.captions.is_empty() {
            return Ok(StepOutcome::Skipped("no caption tracks offered".to_string()));
        }
        let primary = match &state.selection {
            Some(selection) => selection.primary.clone(),
            None => return Err(StepError::invalid_input("No stream selected")),
        };

        let result = fetch_captions(
            &ctx.tools(),
            ctx.catalog(),
            &state.captions,
            &ctx.options.language,
            &primary,
            &ctx.options.window,
            &ctx.options.output_dir,
        );

        match result {
            Ok(Some(artifact)) => {
                ctx.logger
                    .info(&format!("Captions written to {}", artifact.path.display()));
                state.caption_file = Some(artifact);
                Ok(StepOutcome::Success)
            }
            Ok(None) => Ok(StepOutcome::Skipped(format!(
                "no usable '{}' captions",
                ctx.options.language
            ))),
            Err(e) => {
                ctx.logger
                    .warn(&format!("Continuing without captions: {}", e));
                Ok(StepOutcome::Skipped("captions unavailable".to_string()))
            }
        }
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        match &state.caption_file {
            Some(file) if !file.path.exists() => Err(StepError::invalid_output(format!(
                "Caption file missing: {}",
                file.path.display()
            ))),
            _ => Ok(()),
        }
    }
}
