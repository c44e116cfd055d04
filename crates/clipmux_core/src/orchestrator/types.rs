//! Core types for the orchestrator pipeline.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::StreamCatalog;
use crate::cleanup::CleanupReport;
use crate::config::{RunOptions, Settings};
use crate::logging::JobLogger;
use crate::models::{CaptionDescriptor, FetchedArtifact, StreamDescriptor};
use crate::mux::FinalOutput;
use crate::selection::Selection;
use crate::tools::{ToolEnv, ToolPaths, ToolRunner};

use super::input::InputSource;

/// Callback receiving the streams offered for a URL.
///
/// Arguments: (url, streams)
pub type ListingCallback = Box<dyn Fn(&str, &[StreamDescriptor]) + Send + Sync>;

/// The collaborators a job talks to, shared by every URL of a run.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    /// Where streams and captions come from.
    pub catalog: &'a dyn StreamCatalog,
    /// Executes external tool invocations.
    pub runner: &'a dyn ToolRunner,
    /// Resolved external tool programs.
    pub tool_paths: &'a ToolPaths,
    /// Supplies values the options leave open.
    pub input: &'a dyn InputSource,
}

/// Read-only context passed to pipeline steps.
///
/// Contains the URL being processed and the shared collaborators steps
/// can use but not modify. Mutable state goes in `JobState`.
pub struct Context<'a> {
    /// Job name/identifier.
    pub job_name: String,
    /// Source URL of this job.
    pub url: String,
    /// Options shared by every URL of the invocation.
    pub options: &'a RunOptions,
    /// Application settings.
    pub settings: &'a Settings,
    pub services: Services<'a>,
    /// Per-job logger.
    pub logger: Arc<JobLogger>,
    listing_callback: Option<&'a ListingCallback>,
}

impl<'a> Context<'a> {
    /// Create a new context for a job.
    pub fn new(
        job_name: impl Into<String>,
        url: impl Into<String>,
        options: &'a RunOptions,
        settings: &'a Settings,
        services: Services<'a>,
        logger: Arc<JobLogger>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            url: url.into(),
            options,
            settings,
            services,
            logger,
            listing_callback: None,
        }
    }

    /// Set the stream listing callback.
    pub fn with_listing_callback(mut self, callback: Option<&'a ListingCallback>) -> Self {
        self.listing_callback = callback;
        self
    }

    /// The catalog this job resolves against.
    pub fn catalog(&self) -> &'a dyn StreamCatalog {
        self.services.catalog
    }

    /// The input source for values the options leave open.
    pub fn input(&self) -> &'a dyn InputSource {
        self.services.input
    }

    /// Report the offered streams to the callback (if set).
    pub fn report_streams(&self, streams: &[StreamDescriptor]) {
        if let Some(callback) = self.listing_callback {
            callback(self.url.as_str(), streams);
        }
    }

    /// Tool environment for building and running invocations.
    pub fn tools(&self) -> ToolEnv<'_> {
        ToolEnv {
            runner: self.services.runner,
            paths: self.services.tool_paths,
            settings: &self.settings.tools,
            logger: &self.logger,
        }
    }
}

/// Where a job is in its traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Stage {
    #[default]
    Resolving,
    Selecting,
    Fetching,
    Captioning,
    Finalizing,
    CleaningUp,
    Done,
    /// Terminal state after an unrecoverable error.
    Aborted,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Resolving => "resolving",
            Stage::Selecting => "selecting",
            Stage::Fetching => "fetching",
            Stage::Captioning => "captioning",
            Stage::Finalizing => "finalizing",
            Stage::CleaningUp => "cleaning up",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        };
        write!(f, "{}", name)
    }
}

/// Mutable job state that accumulates results from pipeline steps.
///
/// Steps add their own section and leave earlier sections alone.
#[derive(Debug, Clone, Default)]
pub struct JobState {
    /// Unique job identifier.
    pub job_id: String,
    /// When the job started.
    pub started_at: Option<String>,
    /// Current stage.
    pub stage: Stage,
    /// Streams offered by the catalog (from Resolve).
    pub streams: Vec<StreamDescriptor>,
    /// Caption tracks offered by the catalog (from Resolve).
    pub captions: Vec<CaptionDescriptor>,
    /// Chosen streams (from Select).
    pub selection: Option<Selection>,
    /// Fetched video file (from Fetch).
    pub video: Option<FetchedArtifact>,
    /// Fetched audio file (from Fetch).
    pub audio: Option<FetchedArtifact>,
    /// Written caption file (from Captions).
    pub caption_file: Option<FetchedArtifact>,
    /// Produced output (from Finalize).
    pub output: Option<FinalOutput>,
    /// What cleanup removed (from Cleanup).
    pub cleanup: Option<CleanupReport>,
}

impl JobState {
    /// Create a new job state with the given ID.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Check if streams have been selected.
    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// Fetched media artifacts, video first.
    pub fn media(&self) -> Vec<&FetchedArtifact> {
        self.video.iter().chain(self.audio.iter()).collect()
    }
}

/// Outcome of a step execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (with reason).
    Skipped(String),
    /// Step completed and the job needs no further steps (with reason).
    Finished(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArtifactKind, StreamKind};
    use std::path::PathBuf;

    #[test]
    fn new_state_starts_resolving() {
        let state = JobState::new("01_clip");
        assert_eq!(state.stage, Stage::Resolving);
        assert!(state.started_at.is_some());
        assert!(!state.has_selection());
    }

    #[test]
    fn media_lists_video_before_audio() {
        let stream = StreamDescriptor::new("22", StreamKind::Combined, "mp4", "clip.mp4", "u");
        let mut state = JobState::new("01_clip");
        state.audio = Some(FetchedArtifact::from_stream(
            ArtifactKind::Audio,
            PathBuf::from("clip-audio.webm"),
            &stream,
        ));
        state.video = Some(FetchedArtifact::from_stream(
            ArtifactKind::Video,
            PathBuf::from("clip-video.mp4"),
            &stream,
        ));

        let kinds: Vec<_> = state.media().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![ArtifactKind::Video, ArtifactKind::Audio]);
    }
}
