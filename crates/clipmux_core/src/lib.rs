//! clipmux core - backend logic for the clipmux downloader
//!
//! This crate contains the download-orchestration and media-assembly
//! pipeline with zero terminal dependencies. Prompts, argument parsing
//! and the global tracing subscriber belong to the binary.

pub mod catalog;
pub mod cleanup;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod mux;
pub mod orchestrator;
pub mod selection;
pub mod subtitles;
pub mod timecode;
pub mod tools;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
