//! Retiming a caption track to a clipped window.
//!
//! Cues are shifted back by the window start, then cut to the window.
//! A cue survives the start cut when its shifted end is after
//! [`KEEP_AFTER_MS`]; that keeps cues ending exactly on the new zero,
//! which existing cue counts depend on.

use crate::models::TimeWindow;

use super::error::SubtitleResult;
use super::parsers::parse_content;
use super::types::{SubtitleData, SubtitleFormat};
use super::writers::write_srt;

/// Shifted end times must be strictly greater than this to be kept.
pub const KEEP_AFTER_MS: i64 = -1;

/// Shift and trim `data` in place. Returns the number of cues kept.
pub fn retime(data: &mut SubtitleData, window: &TimeWindow) -> usize {
    let start_ms = window.start_ms();
    let duration_ms = window.duration_ms();

    data.events.retain_mut(|event| {
        event.shift(-start_ms);
        if event.end_ms <= KEEP_AFTER_MS {
            return false;
        }
        event.start_ms = event.start_ms.max(0);

        if let Some(limit) = duration_ms {
            if event.start_ms >= limit {
                return false;
            }
            event.end_ms = event.end_ms.min(limit);
        }
        true
    });

    data.events.len()
}

/// Retime caption text, returning SRT, or `None` when no cue falls inside
/// the window.
pub fn retime_text(content: &str, window: &TimeWindow) -> SubtitleResult<Option<String>> {
    let mut data = parse_content(content)?;
    if retime(&mut data, window) == 0 {
        return Ok(None);
    }
    data.format = SubtitleFormat::Srt;
    Ok(Some(write_srt(&data)))
}
