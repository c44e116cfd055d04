//! Stream selection.
//!
//! Picks the requested stream and, for video-only streams, pairs it with
//! the first audio-only stream the catalog lists.

use thiserror::Error;

use crate::models::{StreamDescriptor, StreamKind};

/// Errors produced while selecting streams.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Stream id '{0}' is not offered for this video")]
    UnknownStreamId(String),

    #[error("Stream '{0}' has no audio track and no audio-only stream is available")]
    NoAudioStreamAvailable(String),

    #[error("Stream '{id}' has unsupported kind '{kind}'")]
    UnsupportedStreamKind { id: String, kind: String },
}

/// Result type for stream selection.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// The streams a run will fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The stream the user asked for.
    pub primary: StreamDescriptor,
    /// Audio paired with a video-only primary.
    pub companion: Option<StreamDescriptor>,
}

impl Selection {
    /// The stream fetched as the video input, if any.
    pub fn video(&self) -> Option<&StreamDescriptor> {
        match self.primary.kind {
            StreamKind::Video | StreamKind::Combined => Some(&self.primary),
            _ => None,
        }
    }

    /// The stream fetched as a separate audio input, if any.
    pub fn audio(&self) -> Option<&StreamDescriptor> {
        match self.primary.kind {
            StreamKind::Audio => Some(&self.primary),
            _ => self.companion.as_ref(),
        }
    }

    /// True when the run produces audio only.
    pub fn is_audio_only(&self) -> bool {
        self.video().is_none()
    }
}

/// Select `requested_id` from `streams`.
pub fn select(streams: &[StreamDescriptor], requested_id: &str) -> SelectionResult<Selection> {
    let primary = streams
        .iter()
        .find(|s| s.id == requested_id)
        .ok_or_else(|| SelectionError::UnknownStreamId(requested_id.to_string()))?;

    let companion = match &primary.kind {
        StreamKind::Other(kind) => {
            return Err(SelectionError::UnsupportedStreamKind {
                id: primary.id.clone(),
                kind: kind.clone(),
            })
        }
        StreamKind::Combined | StreamKind::Audio => None,
        StreamKind::Video => Some(
            streams
                .iter()
                .find(|s| s.kind == StreamKind::Audio)
                .cloned()
                .ok_or_else(|| SelectionError::NoAudioStreamAvailable(primary.id.clone()))?,
        ),
    };

    Ok(Selection {
        primary: primary.clone(),
        companion,
    })
}
