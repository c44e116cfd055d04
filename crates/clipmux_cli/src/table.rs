//! Plain-text table of the streams a URL offers.

use clipmux_core::models::StreamDescriptor;

const HEADERS: [&str; 7] = ["itag", "kind", "ext", "vcodec", "acodec", "fps", "note"];

fn row(stream: &StreamDescriptor) -> [String; 7] {
    let dash = || "-".to_string();
    [
        stream.id.clone(),
        stream.kind.to_string(),
        stream.extension.clone(),
        stream.video_codec.clone().unwrap_or_else(dash),
        stream.audio_codec.clone().unwrap_or_else(dash),
        stream.fps.map(|f| format!("{}", f)).unwrap_or_else(dash),
        stream.note.clone().unwrap_or_default(),
    ]
}

/// Render `streams` with left-aligned, space-padded columns.
pub fn render_streams(streams: &[StreamDescriptor]) -> String {
    let rows: Vec<[String; 7]> = streams.iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![format_line(&header), format_line(&rule)];
    lines.extend(rows.iter().map(|cells| format_line(cells)));
    lines.join("\n")
}
