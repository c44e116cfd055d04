//! Subtitle parsers.

mod srt;

pub use srt::{parse_srt, parse_srt_time};

use crate::subtitles::error::ParseError;
use crate::subtitles::types::{SubtitleData, SubtitleFormat};

/// Parse caption text, detecting SRT or WebVTT from the content.
///
/// WebVTT cues share the SRT block layout closely enough that one parser
/// handles both; the header block and cue settings are skipped.
pub fn parse_content(content: &str) -> Result<SubtitleData, ParseError> {
    let format = SubtitleFormat::detect(content);
    let mut data = parse_srt(content)?;
    data.format = format;
    Ok(data)
}
