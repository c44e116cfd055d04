//! Logging for pipeline runs.
//!
//! The core never writes to a process-wide logger. Every URL run receives
//! a [`JobLogger`] through its pipeline context; the binary decides where
//! its lines go.
//!
//! # Example
//!
//! ```
//! use clipmux_core::logging::{JobLogger, LogConfig, LogLevel};
//!
//! let logger = JobLogger::console(
//!     "clip",
//!     LogConfig::with_level(LogLevel::Debug),
//!     Box::new(|_, line| println!("{line}")),
//! );
//!
//! logger.phase("DOWNLOADING");
//! logger.command("aria2c --continue=true ...");
//! logger.success("clip-output.mkv");
//! ```

mod job_logger;
mod types;

pub use job_logger::{sanitize_filename, JobLogger, JobLoggerBuilder};
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};
