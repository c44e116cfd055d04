//! SRT subtitle writer.

use crate::subtitles::types::SubtitleData;

/// Write SubtitleData to SRT format string, renumbering cues from 1.
pub fn write_srt(data: &SubtitleData) -> String {
    let mut output = String::new();

    for (i, event) in data.events.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt_time(event.start_ms),
            format_srt_time(event.end_ms)
        ));
        output.push_str(&event.text);
        output.push('\n');
    }

    output
}

/// Format milliseconds as SRT timestamp (HH:MM:SS,mmm). Negative values clamp to zero.
pub fn format_srt_time(ms: i64) -> String {
    let ms = ms.max(0);

    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}
