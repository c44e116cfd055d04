//! Pipeline runner that executes steps in sequence.

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, JobState, Stage, StepOutcome};

/// Pipeline that runs a sequence of steps.
///
/// The pipeline executes steps in order, running validation before
/// and after each step, and moves the job through its stages. A failing
/// step leaves the job `Aborted`; the files earlier steps wrote stay on
/// disk.
pub struct Pipeline {
    /// Steps to execute in order.
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the pipeline.
    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Run the pipeline with the given context and state.
    ///
    /// Executes each step in order:
    /// 1. Enter the step's stage
    /// 2. Run `validate_input`
    /// 3. Run `execute`
    /// 4. Run `validate_output` (unless execute returned Skipped)
    ///
    /// Stops after a step returns `Finished`.
    pub fn run(&self, ctx: &Context, state: &mut JobState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult::default();

        for step in &self.steps {
            let step_name = step.name();
            state.stage = step.stage();
            ctx.logger.phase(step.description());

            ctx.logger
                .debug(&format!("Validating input for '{}'", step_name));
            if let Err(e) = step.validate_input(ctx, state) {
                ctx.logger.error(&format!("Input validation failed: {}", e));
                state.stage = Stage::Aborted;
                return Err(PipelineError::step_failed(&ctx.job_name, step_name, e));
            }

            ctx.logger.debug(&format!("Executing '{}'", step_name));
            let outcome = match step.execute(ctx, state) {
                Ok(outcome) => outcome,
                Err(e) => {
                    ctx.logger.error(&format!("{} failed: {}", step_name, e));
                    state.stage = Stage::Aborted;
                    return Err(PipelineError::step_failed(&ctx.job_name, step_name, e));
                }
            };

            match outcome {
                StepOutcome::Success | StepOutcome::Finished(_) => {
                    ctx.logger
                        .debug(&format!("Validating output for '{}'", step_name));
                    if let Err(e) = step.validate_output(ctx, state) {
                        ctx.logger.error(&format!("Output validation failed: {}", e));
                        state.stage = Stage::Aborted;
                        return Err(PipelineError::step_failed(&ctx.job_name, step_name, e));
                    }
                    result.steps_completed.push(step_name.to_string());

                    if let StepOutcome::Finished(reason) = outcome {
                        ctx.logger
                            .info(&format!("Stopping after {}: {}", step_name, reason));
                        result.finished_early = Some(reason);
                        break;
                    }
                }
                StepOutcome::Skipped(reason) => {
                    ctx.logger
                        .info(&format!("{} skipped: {}", step_name, reason));
                    result.steps_skipped.push(step_name.to_string());
                }
            }
        }

        state.stage = Stage::Done;
        Ok(result)
    }

    /// Get the number of steps in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineRunResult {
    /// Steps that completed successfully.
    pub steps_completed: Vec<String>,
    /// Steps that were skipped.
    pub steps_skipped: Vec<String>,
    /// Why the run ended before its last step, if it did.
    pub finished_early: Option<String>,
}

impl PipelineRunResult {
    /// Check if all steps completed (none skipped).
    pub fn all_completed(&self) -> bool {
        self.steps_skipped.is_empty()
    }

    /// Total number of steps that ran.
    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::errors::{StepError, StepResult};
    use crate::orchestrator::testing::Harness;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingStep {
        name: &'static str,
        stage: Stage,
        outcome: StepOutcome,
        fail: bool,
        execute_count: Arc<AtomicUsize>,
    }

    impl CountingStep {
        fn new(name: &'static str, stage: Stage, count: &Arc<AtomicUsize>) -> Self {
            Self {
                name,
                stage,
                outcome: StepOutcome::Success,
                fail: false,
                execute_count: Arc::clone(count),
            }
        }
    }

    impl PipelineStep for CountingStep {
        fn name(&self) -> &str {
            self.name
        }

        fn stage(&self) -> Stage {
            self.stage
        }

        fn validate_input(&self, _ctx: &Context, _state: &JobState) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
            assert_eq!(state.stage, self.stage);
            self.execute_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StepError::command_failed("ffmpeg", 1, "boom"));
            }
            Ok(self.outcome.clone())
        }

        fn validate_output(&self, _ctx: &Context, _state: &JobState) -> StepResult<()> {
            Ok(())
        }
    }

    #[test]
    fn pipeline_builds_correctly() {
        let count = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .with_step(CountingStep::new("Step1", Stage::Resolving, &count))
            .with_step(CountingStep::new("Step2", Stage::Selecting, &count));

        assert_eq!(pipeline.step_count(), 2);
        assert_eq!(pipeline.step_names(), vec!["Step1", "Step2"]);
    }

    #[test]
    fn runs_every_step_and_ends_done() {
        let harness = Harness::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut skipping = CountingStep::new("Captions", Stage::Captioning, &count);
        skipping.outcome = StepOutcome::Skipped("no captions".to_string());
        let pipeline = Pipeline::new()
            .with_step(CountingStep::new("Fetch", Stage::Fetching, &count))
            .with_step(skipping)
            .with_step(CountingStep::new("Finalize", Stage::Finalizing, &count));

        let mut state = JobState::new("job");
        let result = harness.with_context(|ctx| pipeline.run(ctx, &mut state)).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(result.steps_completed, vec!["Fetch", "Finalize"]);
        assert_eq!(result.steps_skipped, vec!["Captions"]);
        assert!(!result.all_completed());
        assert_eq!(result.total_steps(), 3);
        assert_eq!(state.stage, Stage::Done);
    }

    #[test]
    fn finished_step_stops_the_run() {
        let harness = Harness::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut listing = CountingStep::new("Resolve", Stage::Resolving, &count);
        listing.outcome = StepOutcome::Finished("listing only".to_string());
        let pipeline = Pipeline::new()
            .with_step(listing)
            .with_step(CountingStep::new("Select", Stage::Selecting, &count));

        let mut state = JobState::new("job");
        let result = harness.with_context(|ctx| pipeline.run(ctx, &mut state)).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(result.finished_early.as_deref(), Some("listing only"));
        assert_eq!(state.stage, Stage::Done);
    }

    #[test]
    fn failing_step_aborts_with_context() {
        let harness = Harness::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut failing = CountingStep::new("Finalize", Stage::Finalizing, &count);
        failing.fail = true;
        let pipeline = Pipeline::new()
            .with_step(failing)
            .with_step(CountingStep::new("Cleanup", Stage::CleaningUp, &count));

        let mut state = JobState::new("job");
        let err = harness
            .with_context(|ctx| pipeline.run(ctx, &mut state))
            .unwrap_err();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(state.stage, Stage::Aborted);
        assert!(matches!(
            err,
            PipelineError::StepFailed { ref step_name, .. } if step_name == "Finalize"
        ));
        assert_eq!(err.exit_code(), 4);
    }
}
