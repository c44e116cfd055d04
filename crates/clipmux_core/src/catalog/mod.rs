//! Stream catalog: turning a video URL into selectable streams and captions.

mod ytdlp;

use thiserror::Error;

use crate::models::{CaptionDescriptor, StreamDescriptor};
use crate::subtitles::SubtitleError;
use crate::tools::{Tool, ToolEnv, ToolError};

pub use ytdlp::YtDlpCatalog;

/// Errors produced by a stream catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The resolver tool failed.
    #[error("Could not resolve '{url}': {source}")]
    Lookup {
        url: String,
        #[source]
        source: ToolError,
    },

    /// The resolver answered with something unusable.
    #[error("Unexpected catalog response for '{url}': {message}")]
    InvalidResponse { url: String, message: String },

    /// A caption handle that this catalog never handed out.
    #[error("Unknown caption track #{0}")]
    UnknownCaption(usize),

    /// Downloading caption text failed.
    #[error("Failed to download captions '{label}': {message}")]
    Download { label: String, message: String },

    /// Caption text could not be converted.
    #[error("Caption conversion failed: {0}")]
    Subtitle(#[from] SubtitleError),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Source of stream and caption descriptors for a URL.
///
/// Descriptor order is meaningful: stream selection pairs video with
/// the first audio-only stream, and caption matching takes the first
/// label that matches.
pub trait StreamCatalog: Send + Sync {
    /// Tools that must be present before this catalog can be used.
    fn required_tools(&self) -> Vec<Tool> {
        Vec::new()
    }

    /// Streams offered for `url`.
    fn list_streams(&self, url: &str, env: &ToolEnv<'_>) -> CatalogResult<Vec<StreamDescriptor>>;

    /// Caption tracks offered for `url`.
    fn list_captions(&self, url: &str, env: &ToolEnv<'_>) -> CatalogResult<Vec<CaptionDescriptor>>;

    /// Fetch the text of a caption track as SRT.
    fn materialize_caption(
        &self,
        caption: &CaptionDescriptor,
        env: &ToolEnv<'_>,
    ) -> CatalogResult<String>;
}
