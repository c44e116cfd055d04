//! Select step - picks the streams to fetch.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::input::ValueKind;
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, Stage, StepOutcome};
use crate::selection::select;

/// Select step for choosing the primary stream and its audio companion.
///
/// The stream id comes from the options, or from the input source when
/// the options leave it open.
pub struct SelectStep;

impl SelectStep {
    pub fn new() -> Self {
        Self
    }

    fn requested_id(&self, ctx: &Context) -> StepResult<String> {
        if let Some(id) = &ctx.options.stream_id {
            return Ok(id.clone());
        }
        ctx.input()
            .obtain(ValueKind::StreamId, None)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StepError::missing_value(ValueKind::StreamId.to_string()))
    }
}

impl Default for SelectStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for SelectStep {
    fn name(&self) -> &str {
        "Select"
    }

    fn stage(&self) -> Stage {
        Stage::Selecting
    }

    fn description(&self) -> &str {
        "SELECTING"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.streams.is_empty() {
            return Err(StepError::invalid_input("No streams resolved"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let id = self.requested_id(ctx)?;
        let selection = select(&state.streams, &id)?;

        ctx.logger.info(&format!(
            "Downloading itag: {} ({})",
            selection.primary.id, selection.primary.kind
        ));
        if let Some(companion) = &selection.companion {
            ctx.logger
                .info(&format!("Pairing with audio stream {}", companion.id));
        }

        state.selection = Some(selection);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_selection() {
            return Err(StepError::invalid_output("Selection not recorded"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StreamDescriptor, StreamKind};
    use crate::orchestrator::input::testing::ScriptedInput;
    use crate::orchestrator::testing::Harness;
    use crate::selection::SelectionError;

    fn state_with_streams() -> JobState {
        let mut state = JobState::new("job");
        state.streams = vec![
            StreamDescriptor::new("137", StreamKind::Video, "mp4", "clip.mp4", "u137"),
            StreamDescriptor::new("251", StreamKind::Audio, "webm", "clip.webm", "u251"),
        ];
        state
    }

    #[test]
    fn option_id_wins_without_asking() {
        let mut harness = Harness::new();
        harness.options.stream_id = Some("137".to_string());
        let mut state = state_with_streams();

        harness
            .with_context(|ctx| SelectStep::new().execute(ctx, &mut state))
            .unwrap();

        let selection = state.selection.unwrap();
        assert_eq!(selection.primary.id, "137");
        assert_eq!(selection.companion.unwrap().id, "251");
        assert!(harness.input.asked.lock().is_empty());
    }

    #[test]
    fn asks_input_when_no_id_configured() {
        let mut harness = Harness::new();
        harness.input = ScriptedInput::new(&[" 251 "]);
        let mut state = state_with_streams();

        harness
            .with_context(|ctx| SelectStep::new().execute(ctx, &mut state))
            .unwrap();

        assert!(state.selection.unwrap().is_audio_only());
        assert_eq!(*harness.input.asked.lock(), vec![ValueKind::StreamId]);
    }

    #[test]
    fn exhausted_input_is_missing_value() {
        let harness = Harness::new();
        let mut state = state_with_streams();

        let err = harness
            .with_context(|ctx| SelectStep::new().execute(ctx, &mut state))
            .unwrap_err();

        assert!(matches!(err, StepError::MissingValue(_)));
    }

    #[test]
    fn unknown_id_is_selection_error() {
        let mut harness = Harness::new();
        harness.options.stream_id = Some("999".to_string());
        let mut state = state_with_streams();

        let err = harness
            .with_context(|ctx| SelectStep::new().execute(ctx, &mut state))
            .unwrap_err();

        assert!(matches!(
            err,
            StepError::Selection(SelectionError::UnknownStreamId(_))
        ));
    }
}
