//! Finalize step - combines the fetched pieces into the output file.

use crate::mux::{finalize, MuxInput};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, Stage, StepOutcome};

/// Finalize step for muxing or re-encoding with the transcoder.
pub struct FinalizeStep;

impl FinalizeStep {
    pub fn new() -> Self {
        Self
    }

    /// Build the mux input from what earlier steps recorded.
    fn mux_input<'s>(&self, ctx: &Context, state: &'s JobState) -> MuxInput<'s> {
        let selection = state.selection.as_ref();
        let video_fps = selection
            .and_then(|s| s.video())
            .and_then(|video| video.fps);
        let transcode_hint = selection.is_some_and(|s| {
            s.is_audio_only()
                && ctx
                    .settings
                    .transcode
                    .wants_transcode(s.primary.audio_codec.as_deref())
        });

        MuxInput {
            audio: state.audio.as_ref(),
            video: state.video.as_ref(),
            captions: state.caption_file.as_ref(),
            video_fps,
            transcode_hint,
        }
    }
}

impl Default for FinalizeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for FinalizeStep {
    fn name(&self) -> &str {
        "Finalize"
    }

    fn stage(&self) -> Stage {
        Stage::Finalizing
    }

    fn description(&self) -> &str {
        "MUXING"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.media().is_empty() {
            return Err(StepError::invalid_input("No fetched media to combine"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let input = self.mux_input(ctx, state);
        let output = finalize(
            &ctx.tools(),
            &input,
            &ctx.settings.output,
            &ctx.settings.transcode,
            &ctx.options.output_dir,
        )?;

        ctx.logger
            .success(&format!("Final output file: {}", output.path.display()));
        state.output = Some(output);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let output = state
            .output
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Output not recorded"))?;
        let metadata = std::fs::metadata(&output.path)
            .map_err(|e| StepError::io_error("checking output file", e))?;
        if !metadata.is_file() {
            return Err(StepError::invalid_output(format!(
                "Output is not a file: {}",
                output.path.display()
            )));
        }
        Ok(())
    }
}
