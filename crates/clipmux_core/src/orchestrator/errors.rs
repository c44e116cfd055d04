//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → URL job → Step → Component → Detail

use std::io;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::fetch::FetchError;
use crate::mux::MuxError;
use crate::selection::SelectionError;
use crate::subtitles::SubtitleError;
use crate::timecode::TimeError;
use crate::tools::{Tool, ToolError};

/// Coarse classification used for reporting and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input or a required value that was never supplied.
    Usage,
    /// The catalog could not satisfy the request.
    Catalog,
    /// An external tool exited unsuccessfully or could not be started.
    ExternalTool,
    /// Local filesystem failure.
    Io,
    /// Anything else.
    Internal,
}

impl ErrorCategory {
    /// Process exit code for this category.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::Usage => 2,
            ErrorCategory::Catalog => 3,
            ErrorCategory::ExternalTool => 4,
            ErrorCategory::Io | ErrorCategory::Internal => 1,
        }
    }
}

/// Top-level pipeline error with job context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("Job '{job_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        job_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// A required external tool is absent. Fatal for the whole run.
    #[error("Required {tool} '{name}' was not found on PATH")]
    MissingRequirement { tool: Tool, name: String },

    /// Invalid invocation (no URL, bad flag combination).
    #[error("{0}")]
    Usage(String),

    /// Failed to set up a job (log file, etc.).
    #[error("Job '{job_name}' setup failed: {message}")]
    SetupFailed { job_name: String, message: String },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(
        job_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            job_name: job_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create a setup failed error.
    pub fn setup_failed(job_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            job_name: job_name.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::StepFailed { source, .. } => source.category().exit_code(),
            PipelineError::MissingRequirement { .. } => 5,
            PipelineError::Usage(_) => ErrorCategory::Usage.exit_code(),
            PipelineError::SetupFailed { .. } => ErrorCategory::Io.exit_code(),
        }
    }
}

/// Error from a pipeline step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// A value the step needs was neither configured nor supplied.
    #[error("No {0} was provided")]
    MissingValue(String),

    /// An external command failed.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// An external command could not be located or started.
    #[error(transparent)]
    Tool(ToolError),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Fetch(FetchError),

    #[error(transparent)]
    Mux(MuxError),

    #[error(transparent)]
    Subtitle(#[from] SubtitleError),
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create a missing value error.
    pub fn missing_value(what: impl Into<String>) -> Self {
        Self::MissingValue(what.into())
    }

    /// Create a command failed error.
    pub fn command_failed(
        tool: impl Into<String>,
        exit_code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StepError::InvalidInput(_) | StepError::MissingValue(_) | StepError::Time(_) => {
                ErrorCategory::Usage
            }
            StepError::Selection(_) | StepError::Catalog(_) => ErrorCategory::Catalog,
            StepError::CommandFailed { .. } | StepError::Tool(_) => ErrorCategory::ExternalTool,
            StepError::IoError { .. } => ErrorCategory::Io,
            StepError::Fetch(err) => match err {
                FetchError::Io { .. } => ErrorCategory::Io,
                FetchError::UnsupportedKind { .. } => ErrorCategory::Catalog,
                FetchError::MissingOutput(_) => ErrorCategory::ExternalTool,
                _ => ErrorCategory::Internal,
            },
            StepError::Mux(MuxError::MissingOutput(_)) => ErrorCategory::ExternalTool,
            _ => ErrorCategory::Internal,
        }
    }
}

impl From<ToolError> for StepError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Failed {
                name,
                exit_code,
                message,
            } => Self::CommandFailed {
                tool: name,
                exit_code,
                message,
            },
            other => Self::Tool(other),
        }
    }
}

impl From<FetchError> for StepError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Tool(tool) => tool.into(),
            FetchError::Catalog(catalog) => Self::Catalog(catalog),
            FetchError::Subtitle(subtitle) => Self::Subtitle(subtitle),
            other => Self::Fetch(other),
        }
    }
}

impl From<MuxError> for StepError {
    fn from(err: MuxError) -> Self {
        match err {
            MuxError::Tool(tool) => tool.into(),
            other => Self::Mux(other),
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
