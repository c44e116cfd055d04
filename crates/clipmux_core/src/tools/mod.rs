//! External tools: naming, lookup and execution.
//!
//! Orchestrators only build [`Invocation`]s and interpret their outcome;
//! a [`ToolRunner`] executes them.

mod invocation;
mod requirements;
mod runner;

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ToolSettings;

pub use invocation::Invocation;
pub use requirements::{resolve_requirements, ToolPaths};
pub use runner::{SystemRunner, ToolEnv, ToolOutput, ToolRunner};

/// The external programs the pipeline drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    /// Resumable multi-connection downloader.
    Fetcher,
    /// Media tool for slicing, muxing and re-encoding.
    Transcoder,
    /// Stream catalog resolver.
    Catalog,
}

impl Tool {
    /// Executable name configured for this tool.
    pub fn configured_name<'a>(&self, settings: &'a ToolSettings) -> &'a str {
        match self {
            Tool::Fetcher => &settings.fetcher,
            Tool::Transcoder => &settings.transcoder,
            Tool::Catalog => &settings.catalog,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tool::Fetcher => write!(f, "fetcher"),
            Tool::Transcoder => write!(f, "transcoder"),
            Tool::Catalog => write!(f, "catalog"),
        }
    }
}

/// Errors produced while locating or running external tools.
#[derive(Error, Debug)]
pub enum ToolError {
    /// A required executable is not on the search path.
    #[error("Required {tool} '{name}' was not found on PATH")]
    NotFound { tool: Tool, name: String },

    /// The process could not be started.
    #[error("Failed to start '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully.
    #[error("{name} failed with exit code {exit_code}: {message}")]
    Failed {
        name: String,
        exit_code: i32,
        message: String,
    },
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
