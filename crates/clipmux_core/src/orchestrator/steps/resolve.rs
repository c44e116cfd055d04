//! Resolve step - asks the catalog what a URL offers.

use crate::catalog::CatalogError;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, Stage, StepOutcome};

/// Resolve step for listing streams and captions.
///
/// Reports the streams through the context's listing callback. With
/// list-only options the job finishes here.
pub struct ResolveStep;

impl ResolveStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResolveStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ResolveStep {
    fn name(&self) -> &str {
        "Resolve"
    }

    fn stage(&self) -> Stage {
        Stage::Resolving
    }

    fn description(&self) -> &str {
        "RESOLVING"
    }

    fn validate_input(&self, ctx: &Context, _state: &JobState) -> StepResult<()> {
        if ctx.url.trim().is_empty() {
            return Err(StepError::invalid_input("URL is empty"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let env = ctx.tools();
        ctx.logger.debug(&format!("Parsing url: {}", ctx.url));

        let streams = ctx.catalog().list_streams(&ctx.url, &env)?;
        if streams.is_empty() {
            return Err(CatalogError::InvalidResponse {
                url: ctx.url.clone(),
                message: "no streams offered".to_string(),
            }
            .into());
        }
        ctx.logger
            .info(&format!("Found {} stream(s)", streams.len()));
        ctx.report_streams(&streams);
        state.streams = streams;

        if ctx.options.list_only {
            return Ok(StepOutcome::Finished("stream listing requested".to_string()));
        }

        // Caption listing problems only cost the captions.
        state.captions = match ctx.catalog().list_captions(&ctx.url, &env) {
            Ok(captions) => captions,
            Err(e) => {
                ctx.logger
                    .warn(&format!("Could not list captions: {}", e));
                Vec::new()
            }
        };
        ctx.logger
            .debug(&format!("Found {} caption track(s)", state.captions.len()));

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.streams.is_empty() {
            return Err(StepError::invalid_output("No streams recorded"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StreamDescriptor, StreamKind};
    use crate::orchestrator::testing::{FakeCatalog, Harness};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn offered() -> Vec<StreamDescriptor> {
        vec![
            StreamDescriptor::new("22", StreamKind::Combined, "mp4", "clip.mp4", "u22"),
            StreamDescriptor::new("140", StreamKind::Audio, "m4a", "clip.m4a", "u140"),
        ]
    }

    #[test]
    fn records_streams_and_captions() {
        let mut harness = Harness::new();
        harness.catalog =
            FakeCatalog::with_streams(offered()).with_caption("English (en)", String::new());

        let mut state = JobState::new("job");
        let outcome = harness
            .with_context(|ctx| ResolveStep::new().execute(ctx, &mut state))
            .unwrap();

        assert_eq!(outcome, StepOutcome::Success);
        assert_eq!(state.streams.len(), 2);
        assert_eq!(state.captions.len(), 1);
    }

    #[test]
    fn list_only_finishes_after_reporting() {
        let mut harness = Harness::new();
        harness.catalog = FakeCatalog::with_streams(offered());
        harness.options.list_only = true;

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listing: crate::orchestrator::ListingCallback = Box::new(move |_, streams| {
            sink.lock().extend(streams.iter().map(|s| s.id.clone()));
        });

        let mut state = JobState::new("job");
        let outcome = harness
            .with_context(|ctx| {
                let ctx = Context::new(
                    ctx.job_name.clone(),
                    ctx.url.clone(),
                    ctx.options,
                    ctx.settings,
                    ctx.services,
                    Arc::clone(&ctx.logger),
                )
                .with_listing_callback(Some(&listing));
                ResolveStep::new().execute(&ctx, &mut state)
            })
            .unwrap();

        assert!(matches!(outcome, StepOutcome::Finished(_)));
        assert_eq!(*seen.lock(), vec!["22", "140"]);
        assert!(state.captions.is_empty());
    }

    #[test]
    fn empty_catalog_is_a_catalog_error() {
        let harness = Harness::new();
        let mut state = JobState::new("job");

        let err = harness
            .with_context(|ctx| ResolveStep::new().execute(ctx, &mut state))
            .unwrap_err();

        assert!(matches!(err, StepError::Catalog(_)));
    }
}
