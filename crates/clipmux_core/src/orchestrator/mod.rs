//! Pipeline orchestrator for coordinating URL runs.
//!
//! This module provides the infrastructure for running one URL through
//! a sequence of steps that validate, execute, and record their results,
//! and the driver that runs a batch of URLs.
//!
//! # Architecture
//!
//! ```text
//! Driver (requirement check, then one job per URL)
//!     └── Pipeline
//!             ├── Step: Resolve   (Resolving)
//!             ├── Step: Select    (Selecting)
//!             ├── Step: Fetch     (Fetching)
//!             ├── Step: Captions  (Captioning)
//!             ├── Step: Finalize  (Finalizing)
//!             └── Step: Cleanup   (CleaningUp)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use clipmux_core::catalog::YtDlpCatalog;
//! use clipmux_core::config::{RunOptions, Settings};
//! use clipmux_core::orchestrator::{Driver, NoInput};
//! use clipmux_core::tools::SystemRunner;
//!
//! let settings = Settings::default();
//! let options = RunOptions::from_settings(&settings).with_stream_id(Some("22".into()));
//! let catalog = YtDlpCatalog::new();
//!
//! let summary = Driver::new(&settings, &options, &catalog, &SystemRunner, &NoInput)
//!     .run(&["https://www.youtube.com/watch?v=example".to_string()])
//!     .unwrap();
//! std::process::exit(summary.exit_code());
//! ```

mod driver;
mod errors;
mod input;
mod pipeline;
mod step;
pub mod steps;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::{ConsoleSink, Driver, JobReport, RunSummary};
pub use errors::{ErrorCategory, PipelineError, PipelineResult, StepError, StepResult};
pub use input::{InputSource, NoInput, ValueKind};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{CaptionsStep, CleanupStep, FetchStep, FinalizeStep, ResolveStep, SelectStep};
pub use types::{Context, JobState, ListingCallback, Services, Stage, StepOutcome};

/// Create a standard pipeline with all steps in the correct order.
///
/// The standard pipeline executes these steps:
/// 1. Resolve - list streams and captions (stops here for listings)
/// 2. Select - pick the stream and its audio companion
/// 3. Fetch - download or slice video, then audio
/// 4. Captions - write the retimed caption track (optional)
/// 5. Finalize - mux or re-encode into the output file
/// 6. Cleanup - delete intermediate files
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ResolveStep::new())
        .with_step(SelectStep::new())
        .with_step(FetchStep::new())
        .with_step(CaptionsStep::new())
        .with_step(FinalizeStep::new())
        .with_step(CleanupStep::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_runs_stages_in_order() {
        let pipeline = create_standard_pipeline();
        assert_eq!(
            pipeline.step_names(),
            vec!["Resolve", "Select", "Fetch", "Captions", "Finalize", "Cleanup"]
        );
    }
}
