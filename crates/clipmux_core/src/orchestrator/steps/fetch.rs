//! Fetch step - downloads the selected streams.

use crate::fetch::fetch_file;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, Stage, StepOutcome};

/// Fetch step for downloading video and audio into the output directory.
///
/// Video is fetched before audio. A failure on either aborts the job
/// and leaves whatever was already fetched on disk.
pub struct FetchStep;

impl FetchStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FetchStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for FetchStep {
    fn name(&self) -> &str {
        "Fetch"
    }

    fn stage(&self) -> Stage {
        Stage::Fetching
    }

    fn description(&self) -> &str {
        "DOWNLOADING"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_selection() {
            return Err(StepError::invalid_input("No stream selected"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let selection = state
            .selection
            .clone()
            .ok_or_else(|| StepError::invalid_input("No stream selected"))?;
        let env = ctx.tools();
        let fetch = &ctx.settings.fetch;
        let window = &ctx.options.window;
        let work_dir = &ctx.options.output_dir;

        if let Some(video) = selection.video() {
            if selection.companion.is_some() {
                ctx.logger.info("Downloading video first");
            }
            state.video = Some(fetch_file(&env, fetch, video, window, work_dir)?);
        }
        if let Some(audio) = selection.audio() {
            if selection.companion.is_some() {
                ctx.logger.info("Downloading audio as well");
            }
            state.audio = Some(fetch_file(&env, fetch, audio, window, work_dir)?);
        }

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let media = state.media();
        if media.is_empty() {
            return Err(StepError::invalid_output("Nothing was fetched"));
        }
        if let Some(missing) = media.iter().find(|a| !a.path.exists()) {
            return Err(StepError::invalid_output(format!(
                "Fetched file missing: {}",
                missing.path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StreamDescriptor, StreamKind, TimeWindow};
    use crate::orchestrator::testing::{Harness, RecordingRunner};
    use crate::selection::select;
    use crate::tools::Tool;

    fn split_state() -> JobState {
        let mut state = JobState::new("job");
        state.streams = vec![
            StreamDescriptor::new("137", StreamKind::Video, "mp4", "clip.mp4", "u137"),
            StreamDescriptor::new("251", StreamKind::Audio, "webm", "clip.webm", "u251"),
        ];
        state.selection = Some(select(&state.streams, "137").unwrap());
        state
    }

    #[test]
    fn fetches_video_then_audio() {
        let harness = Harness::new();
        let mut state = split_state();

        harness
            .with_context(|ctx| FetchStep::new().execute(ctx, &mut state))
            .unwrap();
        harness
            .with_context(|ctx| FetchStep::new().validate_output(ctx, &state))
            .unwrap();

        let calls = harness.runner.calls_to(Tool::Fetcher);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].value_of("-o"), Some("clip-video.mp4"));
        assert_eq!(calls[1].value_of("-o"), Some("clip-audio.webm"));
        assert!(harness.path().join("clip-video.mp4").exists());
        assert!(harness.logged("Downloading video first"));
    }

    #[test]
    fn window_uses_transcoder_slices() {
        let mut harness = Harness::new();
        harness.options.window = TimeWindow::new(Some(5.0), Some(10.0)).unwrap();
        let mut state = split_state();

        harness
            .with_context(|ctx| FetchStep::new().execute(ctx, &mut state))
            .unwrap();

        assert!(harness.runner.calls_to(Tool::Fetcher).is_empty());
        let slices = harness.runner.calls_to(Tool::Transcoder);
        assert_eq!(slices.len(), 2);
        assert!(slices
            .iter()
            .all(|s| s.value_of("-ss") == Some("5") && s.value_of("-t") == Some("10")));
    }

    #[test]
    fn fetcher_failure_is_a_command_failure() {
        let mut harness = Harness::new();
        harness.runner = RecordingRunner::failing(Tool::Fetcher);
        let mut state = split_state();

        let err = harness
            .with_context(|ctx| FetchStep::new().execute(ctx, &mut state))
            .unwrap_err();

        assert!(matches!(err, StepError::CommandFailed { exit_code: 1, .. }));
        assert!(state.video.is_none());
        assert_eq!(harness.runner.calls_to(Tool::Fetcher).len(), 1);
    }
}
