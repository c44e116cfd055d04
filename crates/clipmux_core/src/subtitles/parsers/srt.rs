//! SRT subtitle parser.
//!
//! Parses SubRip (.srt) caption text:
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! Hello, world!
//!
//! 2
//! 00:00:05,000 --> 00:00:08,000
//! This is a test.
//! ```
//!
//! Index lines are ignored and regenerated on write. Blocks without a
//! timing line (a WebVTT header, NOTE blocks) are skipped.

use crate::subtitles::error::ParseError;
use crate::subtitles::types::{SubtitleData, SubtitleEvent, SubtitleFormat};

/// Parse SRT content into SubtitleData.
pub fn parse_srt(content: &str) -> Result<SubtitleData, ParseError> {
    let mut data = SubtitleData::with_format(SubtitleFormat::Srt);

    // Normalize line endings and split into blocks
    let content = content
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut line_offset = 0;

    for raw_block in content.split("\n\n") {
        let block_lines = raw_block.lines().count().max(1);
        let leading_blank = raw_block.len() - raw_block.trim_start_matches('\n').len();
        let block = raw_block.trim();
        if block.is_empty() {
            line_offset += block_lines + 1;
            continue;
        }

        let lines: Vec<&str> = block.lines().collect();
        let Some((timing_idx, timing_line)) = find_timing_line(&lines) else {
            line_offset += block_lines + 1;
            continue;
        };
        let timing_line_num = line_offset + leading_blank + timing_idx + 1;

        let (start_ms, end_ms) = parse_srt_timing(timing_line)
            .ok_or_else(|| ParseError::invalid_time(timing_line_num, timing_line))?;

        // Text is everything after the timing line
        let text = lines[timing_idx + 1..].join("\n");
        if !text.is_empty() {
            data.events.push(SubtitleEvent::new(start_ms, end_ms, text));
        }

        line_offset += block_lines + 1;
    }

    Ok(data)
}

fn find_timing_line<'a>(lines: &[&'a str]) -> Option<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .find(|(_, line)| line.contains("-->"))
        .map(|(i, line)| (i, *line))
}

/// Parse a timing line: `HH:MM:SS,mmm --> HH:MM:SS,mmm [settings]`.
fn parse_srt_timing(line: &str) -> Option<(i64, i64)> {
    let (start, rest) = line.split_once("-->")?;
    // WebVTT cue settings follow the end time
    let end = rest.split_whitespace().next()?;

    Some((parse_srt_time(start)?, parse_srt_time(end)?))
}

/// Parse a timestamp (`HH:MM:SS,mmm`, `HH:MM:SS.mmm` or `MM:SS.mmm`)
/// into milliseconds.
pub fn parse_srt_time(s: &str) -> Option<i64> {
    let s = s.trim().replace(',', ".");

    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (h.parse::<i64>().ok()?, m.parse::<i64>().ok()?, *s),
        [m, s] => (0, m.parse::<i64>().ok()?, *s),
        _ => return None,
    };

    let (whole, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (seconds, ""),
    };
    let whole: i64 = whole.parse().ok()?;

    let millis = if fraction.is_empty() {
        0
    } else {
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Normalize based on number of digits
        let digits: String = fraction.chars().chain("00".chars()).take(3).collect();
        digits.parse::<i64>().ok()?
    };

    // Remote caption text can carry absurd fields; overflow is a bad timestamp
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes.checked_mul(60_000)?)?
        .checked_add(whole.checked_mul(1000)?)?
        .checked_add(millis)
}
