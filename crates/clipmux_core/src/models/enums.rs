//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Media kind of a catalog stream.
///
/// `Combined` streams carry both video and audio. Anything the catalog
/// reports that is none of the three (storyboards, data tracks) lands in
/// `Other` and is rejected by stream selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Video,
    Audio,
    Combined,
    Other(String),
}

impl StreamKind {
    /// Artifact kind a fetched file of this stream becomes.
    ///
    /// Combined streams are handled as the video input of the mux.
    pub fn artifact_kind(&self) -> Option<ArtifactKind> {
        match self {
            StreamKind::Video | StreamKind::Combined => Some(ArtifactKind::Video),
            StreamKind::Audio => Some(ArtifactKind::Audio),
            StreamKind::Other(_) => None,
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Video => write!(f, "video"),
            StreamKind::Audio => write!(f, "audio"),
            StreamKind::Combined => write!(f, "video+audio"),
            StreamKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// Kind of an intermediate file produced by a fetch step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Video,
    Audio,
    Subtitle,
}

impl ArtifactKind {
    /// Tag appended to the file stem (`clip-video.mp4`, `clip-captions.srt`).
    pub fn file_tag(&self) -> &'static str {
        match self {
            ArtifactKind::Video => "video",
            ArtifactKind::Audio => "audio",
            ArtifactKind::Subtitle => "captions",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Video => write!(f, "video"),
            ArtifactKind::Audio => write!(f, "audio"),
            ArtifactKind::Subtitle => write!(f, "subtitles"),
        }
    }
}
