//! Caption processing: parsing, writing and retiming.
//!
//! Caption tracks arrive as SRT or WebVTT text and always leave as SRT.

mod error;
pub mod parsers;
pub mod retime;
mod types;
pub mod writers;

use std::fs;
use std::path::Path;

pub use error::{ParseError, SubtitleError, SubtitleResult};
pub use parsers::{parse_content, parse_srt, parse_srt_time};
pub use retime::{retime, retime_text, KEEP_AFTER_MS};
pub use types::{SubtitleData, SubtitleEvent, SubtitleFormat};
pub use writers::{format_srt_time, write_srt};

/// Convert caption text of either format to SRT.
pub fn to_srt(content: &str) -> SubtitleResult<String> {
    match SubtitleFormat::detect(content) {
        SubtitleFormat::Srt => Ok(content.to_string()),
        SubtitleFormat::WebVtt => Ok(write_srt(&parse_content(content)?)),
    }
}

/// Parse a caption file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> SubtitleResult<SubtitleData> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).map_err(|e| SubtitleError::read(path.to_path_buf(), e))?;
    Ok(parse_content(&content)?)
}

/// Write caption text to a file.
pub fn write_file(content: &str, path: impl AsRef<Path>) -> SubtitleResult<()> {
    let path = path.as_ref();
    fs::write(path, content).map_err(|e| SubtitleError::write(path.to_path_buf(), e))
}
