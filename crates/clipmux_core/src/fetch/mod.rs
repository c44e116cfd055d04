//! Fetching stream files and caption tracks into the work directory.

mod captions;
mod file;

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::subtitles::SubtitleError;
use crate::tools::ToolError;

pub use captions::{caption_path, fetch_captions};
pub use file::{build_fetch_invocation, destination_path, fetch_file};

/// Errors produced while fetching artifacts.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Subtitle(#[from] SubtitleError),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream '{id}' of kind '{kind}' cannot be fetched")]
    UnsupportedKind { id: String, kind: String },

    #[error("Fetch reported success but '{}' is missing", .0.display())]
    MissingOutput(PathBuf),
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
