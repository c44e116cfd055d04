//! Pipeline step trait definition.
//!
//! All pipeline steps implement this trait, providing a consistent
//! interface for validation and execution.

use super::errors::StepResult;
use super::types::{Context, JobState, Stage, StepOutcome};

/// Trait for pipeline steps.
///
/// Each step in the pipeline implements this trait. The pipeline runner
/// calls these methods in order:
///
/// 1. `validate_input` - Check preconditions before execution
/// 2. `execute` - Perform the step's work
/// 3. `validate_output` - Verify the step produced valid output
///
/// # Example
///
/// ```ignore
/// struct SelectStep;
///
/// impl PipelineStep for SelectStep {
///     fn name(&self) -> &str { "Select" }
///     fn stage(&self) -> Stage { Stage::Selecting }
///
///     fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
///         if state.streams.is_empty() {
///             return Err(StepError::invalid_input("No streams resolved"));
///         }
///         Ok(())
///     }
///
///     fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
///         state.selection = Some(select(&state.streams, "22")?);
///         Ok(StepOutcome::Success)
///     }
///
///     fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
///         if !state.has_selection() {
///             return Err(StepError::invalid_output("Selection not recorded"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait PipelineStep: Send + Sync {
    /// Get the step name (for logging and error context).
    fn name(&self) -> &str;

    /// Stage the job is in while this step runs.
    fn stage(&self) -> Stage;

    /// Validate inputs before execution.
    ///
    /// Called before `execute`. Should check that everything earlier
    /// steps were meant to record is present.
    fn validate_input(&self, ctx: &Context, state: &JobState) -> StepResult<()>;

    /// Execute the step's main work.
    ///
    /// Should perform the step's processing and record results in `state`.
    ///
    /// Returns `StepOutcome::Skipped` if the step had nothing to do (not
    /// an error), or `StepOutcome::Finished` when the job ends here.
    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome>;

    /// Validate outputs after execution.
    ///
    /// Called after `execute` returns `Success` or `Finished`.
    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()>;

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}
