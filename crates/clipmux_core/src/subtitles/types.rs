//! Core subtitle data types.

use serde::{Deserialize, Serialize};

/// Source format of a caption track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    #[default]
    Srt,
    WebVtt,
}

impl SubtitleFormat {
    /// Detect the format from the text itself.
    pub fn detect(content: &str) -> Self {
        if content.trim_start_matches('\u{feff}').trim_start().starts_with("WEBVTT") {
            SubtitleFormat::WebVtt
        } else {
            SubtitleFormat::Srt
        }
    }
}

/// One timed cue. Times are whole milliseconds; they may go negative
/// while a retime is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEvent {
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
}

impl SubtitleEvent {
    pub fn new(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// Shift both ends by `offset_ms`.
    pub fn shift(&mut self, offset_ms: i64) {
        self.start_ms = self.start_ms.saturating_add(offset_ms);
        self.end_ms = self.end_ms.saturating_add(offset_ms);
    }
}

/// A parsed caption track.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubtitleData {
    pub format: SubtitleFormat,
    pub events: Vec<SubtitleEvent>,
}

impl SubtitleData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: SubtitleFormat) -> Self {
        Self {
            format,
            events: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
