//! Catalog backed by the `yt-dlp` resolver.
//!
//! One `--dump-json` lookup per URL; the parsed result is cached for the
//! rest of the run.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::logging::sanitize_filename;
use crate::models::{CaptionDescriptor, StreamDescriptor, StreamKind};
use crate::subtitles::to_srt;
use crate::tools::{Tool, ToolEnv};

use super::{CatalogError, CatalogResult, StreamCatalog};

const CAPTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloadable renditions of one caption track.
#[derive(Debug, Clone)]
struct CaptionSource {
    label: String,
    renditions: Vec<Rendition>,
}

#[derive(Debug, Clone)]
struct Rendition {
    ext: String,
    url: String,
}

impl CaptionSource {
    /// SRT if offered, then WebVTT, then whatever comes first.
    fn preferred(&self) -> Option<&Rendition> {
        ["srt", "vtt"]
            .iter()
            .find_map(|ext| self.renditions.iter().find(|r| r.ext == *ext))
            .or_else(|| self.renditions.first())
    }
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    streams: Vec<StreamDescriptor>,
    captions: Vec<CaptionDescriptor>,
}

/// yt-dlp backed catalog.
#[derive(Default)]
pub struct YtDlpCatalog {
    entries: Mutex<HashMap<String, CatalogEntry>>,
    caption_sources: Mutex<Vec<CaptionSource>>,
}

impl YtDlpCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, url: &str, env: &ToolEnv<'_>) -> CatalogResult<CatalogEntry> {
        if let Some(entry) = self.entries.lock().get(url) {
            tracing::trace!("Catalog cache hit for {}", url);
            return Ok(entry.clone());
        }

        let invocation = env
            .invocation(Tool::Catalog)
            .args(["--dump-json", "--no-playlist", "--no-warnings", url])
            .capturing();
        let output = env.run(&invocation).map_err(|source| CatalogError::Lookup {
            url: url.to_string(),
            source,
        })?;

        let json: Value =
            serde_json::from_str(&output.stdout).map_err(|e| CatalogError::InvalidResponse {
                url: url.to_string(),
                message: format!("invalid JSON: {}", e),
            })?;

        let streams = parse_formats(url, &json)?;
        let sources = parse_captions(&json);

        let captions = {
            let mut registry = self.caption_sources.lock();
            let base = registry.len();
            let captions = sources
                .iter()
                .enumerate()
                .map(|(i, s)| CaptionDescriptor::new(s.label.clone(), base + i))
                .collect();
            registry.extend(sources);
            captions
        };

        let entry = CatalogEntry { streams, captions };
        self.entries.lock().insert(url.to_string(), entry.clone());
        Ok(entry)
    }
}

impl StreamCatalog for YtDlpCatalog {
    fn required_tools(&self) -> Vec<Tool> {
        vec![Tool::Catalog]
    }

    fn list_streams(&self, url: &str, env: &ToolEnv<'_>) -> CatalogResult<Vec<StreamDescriptor>> {
        Ok(self.entry(url, env)?.streams)
    }

    fn list_captions(&self, url: &str, env: &ToolEnv<'_>) -> CatalogResult<Vec<CaptionDescriptor>> {
        Ok(self.entry(url, env)?.captions)
    }

    fn materialize_caption(
        &self,
        caption: &CaptionDescriptor,
        env: &ToolEnv<'_>,
    ) -> CatalogResult<String> {
        let source = self
            .caption_sources
            .lock()
            .get(caption.index)
            .cloned()
            .ok_or(CatalogError::UnknownCaption(caption.index))?;
        let rendition = source.preferred().ok_or_else(|| CatalogError::Download {
            label: source.label.clone(),
            message: "no downloadable rendition".to_string(),
        })?;

        env.logger.debug(&format!(
            "Downloading {} captions '{}'",
            rendition.ext, source.label
        ));
        let text = download_text(&rendition.url).map_err(|message| CatalogError::Download {
            label: source.label.clone(),
            message,
        })?;

        Ok(to_srt(&text)?)
    }
}

fn download_text(url: &str) -> Result<String, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(CAPTION_TIMEOUT)
        .build()
        .map_err(|e| e.to_string())?;

    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|e| e.to_string())
}

fn codec(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|c| !c.is_empty() && *c != "none")
        .map(str::to_string)
}

/// Map the `formats` array to stream descriptors, in resolver order.
fn parse_formats(url: &str, json: &Value) -> CatalogResult<Vec<StreamDescriptor>> {
    let formats = json["formats"]
        .as_array()
        .ok_or_else(|| CatalogError::InvalidResponse {
            url: url.to_string(),
            message: "no formats array".to_string(),
        })?;

    let title = json["title"].as_str().unwrap_or("video");
    let stem = match sanitize_filename(title) {
        s if s.is_empty() => "video".to_string(),
        s => s,
    };

    let mut streams = Vec::new();
    for format in formats {
        let Some(id) = format["format_id"].as_str() else {
            continue;
        };
        let Some(media_url) = format["url"].as_str() else {
            continue;
        };

        let vcodec = codec(&format["vcodec"]);
        let acodec = codec(&format["acodec"]);
        let kind = match (&vcodec, &acodec) {
            (Some(_), Some(_)) => StreamKind::Combined,
            (Some(_), None) => StreamKind::Video,
            (None, Some(_)) => StreamKind::Audio,
            (None, None) => StreamKind::Other(
                format["format_note"]
                    .as_str()
                    .unwrap_or("unknown")
                    .to_string(),
            ),
        };

        let ext = format["ext"].as_str().unwrap_or("bin");
        let mut stream =
            StreamDescriptor::new(id, kind, ext, format!("{}.{}", stem, ext), media_url);
        if let Some(v) = vcodec {
            stream = stream.with_video_codec(v);
        }
        if let Some(a) = acodec {
            stream = stream.with_audio_codec(a);
        }
        if let Some(fps) = format["fps"].as_f64().filter(|f| *f > 0.0) {
            stream = stream.with_fps(fps);
        }
        if let Some(note) = format_note(format) {
            stream = stream.with_note(note);
        }
        streams.push(stream);
    }

    Ok(streams)
}

fn format_note(format: &Value) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(resolution) = format["resolution"].as_str() {
        parts.push(resolution.to_string());
    }
    if let Some(abr) = format["abr"].as_f64().filter(|a| *a > 0.0) {
        parts.push(format!("{:.0}k", abr));
    }
    if let Some(note) = format["format_note"].as_str() {
        parts.push(note.to_string());
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Manual subtitles first, then automatic captions.
fn parse_captions(json: &Value) -> Vec<CaptionSource> {
    let mut sources = Vec::new();

    for key in ["subtitles", "automatic_captions"] {
        let Some(tracks) = json[key].as_object() else {
            continue;
        };
        for (code, renditions) in tracks {
            let Some(list) = renditions.as_array() else {
                continue;
            };
            let renditions: Vec<Rendition> = list
                .iter()
                .filter_map(|r| {
                    Some(Rendition {
                        ext: r["ext"].as_str()?.to_string(),
                        url: r["url"].as_str()?.to_string(),
                    })
                })
                .collect();
            if renditions.is_empty() {
                continue;
            }

            let name = list
                .iter()
                .find_map(|r| r["name"].as_str())
                .unwrap_or(code.as_str());
            sources.push(CaptionSource {
                label: format!("{} ({})", name, code),
                renditions,
            });
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "title": "Short wildlife clip: HD",
            "formats": [
                {"format_id": "sb0", "ext": "mhtml", "vcodec": "none", "acodec": "none",
                 "format_note": "storyboard", "url": "https://media.example/sb0"},
                {"format_id": "251", "ext": "webm", "vcodec": "none", "acodec": "opus",
                 "abr": 128.0, "url": "https://media.example/251"},
                {"format_id": "137", "ext": "mp4", "vcodec": "avc1.640028", "acodec": "none",
                 "fps": 30, "resolution": "1920x1080", "url": "https://media.example/137"},
                {"format_id": "18", "ext": "mp4", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2",
                 "fps": 30, "url": "https://media.example/18"},
                {"ext": "mp4", "url": "https://media.example/noid"}
            ],
            "subtitles": {
                "en": [
                    {"ext": "vtt", "url": "https://subs.example/en.vtt", "name": "English"},
                    {"ext": "srt", "url": "https://subs.example/en.srt", "name": "English"}
                ]
            },
            "automatic_captions": {
                "de": [{"ext": "vtt", "url": "https://subs.example/de.vtt", "name": "German"}]
            }
        })
    }

    #[test]
    fn formats_map_to_kinds() {
        let streams = parse_formats("u", &sample()).unwrap();
        let kinds: Vec<(&str, &StreamKind)> =
            streams.iter().map(|s| (s.id.as_str(), &s.kind)).collect();

        assert_eq!(
            kinds,
            vec![
                ("sb0", &StreamKind::Other("storyboard".to_string())),
                ("251", &StreamKind::Audio),
                ("137", &StreamKind::Video),
                ("18", &StreamKind::Combined),
            ]
        );
    }

    #[test]
    fn descriptors_carry_codecs_and_filename() {
        let streams = parse_formats("u", &sample()).unwrap();

        let audio = &streams[1];
        assert_eq!(audio.audio_codec.as_deref(), Some("opus"));
        assert_eq!(audio.video_codec, None);
        assert_eq!(audio.default_filename, "Short wildlife clip_ HD.webm");
        assert_eq!(audio.note.as_deref(), Some("128k"));

        let video = &streams[2];
        assert_eq!(video.fps, Some(30.0));
        assert_eq!(video.url, "https://media.example/137");
        assert!(streams[3].includes_audio_track());
    }

    #[test]
    fn missing_formats_is_invalid_response() {
        let result = parse_formats("u", &json!({"title": "x"}));
        assert!(matches!(result, Err(CatalogError::InvalidResponse { .. })));
    }

    #[test]
    fn captions_list_manual_before_automatic() {
        let sources = parse_captions(&sample());
        let labels: Vec<&str> = sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["English (en)", "German (de)"]);
    }

    #[test]
    fn srt_rendition_is_preferred() {
        let sources = parse_captions(&sample());
        assert_eq!(sources[0].preferred().map(|r| r.ext.as_str()), Some("srt"));
        assert_eq!(sources[1].preferred().map(|r| r.ext.as_str()), Some("vtt"));
    }
}
