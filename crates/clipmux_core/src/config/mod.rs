//! Configuration for clipmux.
//!
//! This module provides:
//! - TOML-based settings with logical sections, every key optional
//! - Atomic file writes (write to temp, then rename)
//! - [`RunOptions`], the immutable per-invocation view handed to the pipeline
//!
//! # Example
//!
//! ```no_run
//! use clipmux_core::config::{ConfigManager, RunOptions};
//!
//! let mut config = ConfigManager::new("clipmux.toml");
//! config.load_or_create().unwrap();
//!
//! let options = RunOptions::from_settings(config.settings())
//!     .with_language(Some("Spanish".to_string()));
//! println!("Downloader: {}", config.settings().tools.fetcher);
//! ```

mod manager;
mod options;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use options::RunOptions;
pub use settings::{
    CaptionSettings, ConfigSection, FetchSettings, LoggingSettings, OutputSettings, Settings,
    ToolSettings, TranscodeSettings,
};
