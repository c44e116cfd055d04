//! Run driver: checks requirements once, then runs each URL in turn.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::StreamCatalog;
use crate::config::{RunOptions, Settings};
use crate::logging::{sanitize_filename, JobLogger, JobLoggerBuilder, LogLevel};
use crate::mux::FinalOutput;
use crate::tools::{resolve_requirements, Tool, ToolError, ToolPaths, ToolRunner};

use super::errors::{PipelineError, PipelineResult};
use super::input::{InputSource, ValueKind};
use super::pipeline::Pipeline;
use super::types::{Context, JobState, ListingCallback, Services, Stage};
use super::create_standard_pipeline;

/// Shared console sink; each job logger forwards to it.
pub type ConsoleSink = Arc<dyn Fn(LogLevel, &str) + Send + Sync>;

/// Longest URL-derived part of a job name.
const MAX_JOB_SLUG: usize = 48;

/// How one URL's run ended.
#[derive(Debug)]
pub struct JobReport {
    pub url: String,
    pub job_name: String,
    /// Final stage (`Done` or `Aborted`).
    pub stage: Stage,
    /// Produced output, when the URL ran to completion.
    pub output: Option<FinalOutput>,
    /// The run stopped after listing streams.
    pub listed_only: bool,
    pub elapsed: Duration,
    pub error: Option<PipelineError>,
}

impl JobReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Reports for every URL of a run, in order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub jobs: Vec<JobReport>,
}

impl RunSummary {
    /// Exit code of the last failing URL, or 0.
    pub fn exit_code(&self) -> i32 {
        self.jobs
            .iter()
            .rev()
            .find_map(|job| job.error.as_ref())
            .map_or(0, PipelineError::exit_code)
    }

    /// Output files of the URLs that completed.
    pub fn outputs(&self) -> Vec<&FinalOutput> {
        self.jobs.iter().filter_map(|job| job.output.as_ref()).collect()
    }

    pub fn failures(&self) -> usize {
        self.jobs.iter().filter(|job| !job.succeeded()).count()
    }
}

/// Drives the pipeline over a batch of URLs.
///
/// URLs are processed sequentially. A failure aborts that URL only;
/// a missing tool aborts the whole run before any URL starts.
pub struct Driver<'a> {
    settings: &'a Settings,
    options: &'a RunOptions,
    catalog: &'a dyn StreamCatalog,
    runner: &'a dyn ToolRunner,
    input: &'a dyn InputSource,
    level: LogLevel,
    console: Option<ConsoleSink>,
    listing_callback: Option<ListingCallback>,
    pipeline: Pipeline,
}

impl<'a> Driver<'a> {
    /// Create a driver running the standard pipeline.
    pub fn new(
        settings: &'a Settings,
        options: &'a RunOptions,
        catalog: &'a dyn StreamCatalog,
        runner: &'a dyn ToolRunner,
        input: &'a dyn InputSource,
    ) -> Self {
        Self {
            settings,
            options,
            catalog,
            runner,
            input,
            level: LogLevel::Info,
            console: None,
            listing_callback: None,
            pipeline: create_standard_pipeline(),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Forward every job's log lines to `sink`.
    pub fn with_console(mut self, sink: ConsoleSink) -> Self {
        self.console = Some(sink);
        self
    }

    /// Receive the stream list of every resolved URL.
    pub fn with_listing_callback(mut self, callback: ListingCallback) -> Self {
        self.listing_callback = Some(callback);
        self
    }

    /// Tools every run needs, in check order.
    pub fn required_tools(&self) -> Vec<Tool> {
        let mut tools = vec![Tool::Fetcher, Tool::Transcoder];
        for tool in self.catalog.required_tools() {
            if !tools.contains(&tool) {
                tools.push(tool);
            }
        }
        tools
    }

    /// Resolve the required tools, failing on the first one missing.
    pub fn check_requirements(&self) -> PipelineResult<ToolPaths> {
        let logger = self.logger("requirements", false)?;
        match resolve_requirements(&self.required_tools(), &self.settings.tools, &logger) {
            Ok(paths) => Ok(paths),
            Err(ToolError::NotFound { tool, name }) => {
                logger.error(&format!("Missing requirement: {} '{}'", tool, name));
                Err(PipelineError::MissingRequirement { tool, name })
            }
            Err(other) => Err(PipelineError::setup_failed("requirements", other.to_string())),
        }
    }

    /// The URLs to process: `given`, or one obtained from the input source.
    pub fn resolve_urls(&self, given: &[String]) -> PipelineResult<Vec<String>> {
        let urls: Vec<String> = given
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if !urls.is_empty() {
            return Ok(urls);
        }
        self.input
            .obtain(ValueKind::Url, None)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .map(|u| vec![u])
            .ok_or_else(|| PipelineError::usage("No URL was provided"))
    }

    /// Check requirements, then run every URL.
    ///
    /// Returns `Err` only for run-wide failures; per-URL failures are in
    /// the summary.
    pub fn run(&self, urls: &[String]) -> PipelineResult<RunSummary> {
        let tool_paths = self.check_requirements()?;
        let urls = self.resolve_urls(urls)?;

        let mut summary = RunSummary::default();
        for (index, url) in urls.iter().enumerate() {
            summary.jobs.push(self.run_job(index, url, &tool_paths));
        }
        Ok(summary)
    }

    fn run_job(&self, index: usize, url: &str, tool_paths: &ToolPaths) -> JobReport {
        let job_name = job_name(index, url);
        let started = Instant::now();
        let mut report = JobReport {
            url: url.to_string(),
            job_name: job_name.clone(),
            stage: Stage::Aborted,
            output: None,
            listed_only: false,
            elapsed: Duration::ZERO,
            error: None,
        };

        let logger = match self.logger(&job_name, true) {
            Ok(logger) => Arc::new(logger),
            Err(e) => {
                report.error = Some(e);
                return report;
            }
        };

        let services = Services {
            catalog: self.catalog,
            runner: self.runner,
            tool_paths,
            input: self.input,
        };
        let ctx = Context::new(
            &job_name,
            url,
            self.options,
            self.settings,
            services,
            Arc::clone(&logger),
        )
        .with_listing_callback(self.listing_callback.as_ref());

        let mut state = JobState::new(&job_name);
        let result = self.pipeline.run(&ctx, &mut state);
        report.elapsed = started.elapsed();
        report.stage = state.stage;

        match result {
            Ok(run) => {
                report.listed_only = run.finished_early.is_some();
                report.output = state.output;
                logger.info(&format!(
                    "Finished {} in {:.2}s",
                    url,
                    report.elapsed.as_secs_f64()
                ));
            }
            Err(e) => {
                logger.error(&format!(
                    "Gave up on {} after {:.2}s",
                    url,
                    report.elapsed.as_secs_f64()
                ));
                report.error = Some(e);
            }
        }
        logger.close();
        report
    }

    fn logger(&self, job_name: &str, with_file: bool) -> PipelineResult<JobLogger> {
        let mut builder =
            JobLoggerBuilder::new(job_name).config(self.settings.log_config(self.level));
        if with_file {
            if let Some(dir) = &self.settings.logging.log_dir {
                builder = builder.log_dir(dir);
            }
        }
        if let Some(sink) = &self.console {
            let sink = Arc::clone(sink);
            builder = builder.callback(Box::new(move |level, line| sink(level, line)));
        }
        builder
            .build()
            .map_err(|e| PipelineError::setup_failed(job_name, format!("log file: {}", e)))
    }
}

/// `<NN>_<sanitized url>`, capped in length.
fn job_name(index: usize, url: &str) -> String {
    let stripped = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let slug: String = sanitize_filename(stripped)
        .chars()
        .take(MAX_JOB_SLUG)
        .collect();
    format!("{:02}_{}", index + 1, slug)
}
