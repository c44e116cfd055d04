//! Catalog descriptors and fetched artifacts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::enums::{ArtifactKind, StreamKind};

/// One selectable stream as reported by the catalog.
///
/// Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Opaque stream identifier ("itag").
    pub id: String,
    /// Media kind.
    pub kind: StreamKind,
    /// Container extension without the dot (e.g., "mp4", "webm").
    pub extension: String,
    /// Audio codec name, if the stream carries audio.
    #[serde(default)]
    pub audio_codec: Option<String>,
    /// Video codec name, if the stream carries video.
    #[serde(default)]
    pub video_codec: Option<String>,
    /// Frame rate (video only).
    #[serde(default)]
    pub fps: Option<f64>,
    /// Catalog-suggested filename (e.g., "My Clip.mp4").
    pub default_filename: String,
    /// Remote address the bytes are fetched from.
    pub url: String,
    /// Free-form note for listings (resolution, bitrate).
    #[serde(default)]
    pub note: Option<String>,
}

impl StreamDescriptor {
    /// Create a descriptor with the required fields.
    pub fn new(
        id: impl Into<String>,
        kind: StreamKind,
        extension: impl Into<String>,
        default_filename: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            extension: extension.into(),
            audio_codec: None,
            video_codec: None,
            fps: None,
            default_filename: default_filename.into(),
            url: url.into(),
            note: None,
        }
    }

    /// Set the audio codec.
    pub fn with_audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.audio_codec = Some(codec.into());
        self
    }

    /// Set the video codec.
    pub fn with_video_codec(mut self, codec: impl Into<String>) -> Self {
        self.video_codec = Some(codec.into());
        self
    }

    /// Set the frame rate.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set the listing note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether the stream already carries its own audio track.
    pub fn includes_audio_track(&self) -> bool {
        self.kind == StreamKind::Combined
    }

    /// Whether the stream is audio only.
    pub fn is_audio_only(&self) -> bool {
        self.kind == StreamKind::Audio
    }

    /// Stem of the suggested filename ("My Clip.mp4" -> "My Clip").
    pub fn stem(&self) -> String {
        Path::new(&self.default_filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.id.clone())
    }

    /// Extension of the suggested filename, falling back to `extension`.
    pub fn file_extension(&self) -> String {
        Path::new(&self.default_filename)
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| self.extension.clone())
    }
}

/// One caption track offered by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionDescriptor {
    /// Human label used for language matching (e.g., "English (en)").
    pub label: String,
    /// Catalog handle used to materialize the track text.
    pub index: usize,
}

impl CaptionDescriptor {
    /// Create a caption descriptor.
    pub fn new(label: impl Into<String>, index: usize) -> Self {
        Self {
            label: label.into(),
            index,
        }
    }

    /// Substring match against the label (no normalization).
    pub fn matches_language(&self, language: &str) -> bool {
        self.label.contains(language)
    }
}

/// What a fetched artifact was produced from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArtifactSource {
    Stream(StreamDescriptor),
    Caption(CaptionDescriptor),
}

/// An intermediate file on disk, owned by the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedArtifact {
    /// What the file holds.
    pub kind: ArtifactKind,
    /// Location on disk.
    pub path: PathBuf,
    /// Base stem shared by every file of the run, without any kind tag.
    pub stem: String,
    /// Descriptor the file was produced from.
    pub source: ArtifactSource,
}

impl FetchedArtifact {
    /// Artifact fetched from a stream.
    pub fn from_stream(kind: ArtifactKind, path: PathBuf, stream: &StreamDescriptor) -> Self {
        Self {
            kind,
            path,
            stem: stream.stem(),
            source: ArtifactSource::Stream(stream.clone()),
        }
    }

    /// Artifact materialized from a caption track.
    pub fn from_caption(path: PathBuf, stem: impl Into<String>, caption: &CaptionDescriptor) -> Self {
        Self {
            kind: ArtifactKind::Subtitle,
            path,
            stem: stem.into(),
            source: ArtifactSource::Caption(caption.clone()),
        }
    }

    /// The stream this artifact came from, if any.
    pub fn stream(&self) -> Option<&StreamDescriptor> {
        match &self.source {
            ArtifactSource::Stream(stream) => Some(stream),
            ArtifactSource::Caption(_) => None,
        }
    }
}
