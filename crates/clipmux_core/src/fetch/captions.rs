//! Caption track fetching.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::StreamCatalog;
use crate::models::{ArtifactKind, CaptionDescriptor, FetchedArtifact, StreamDescriptor, TimeWindow};
use crate::subtitles::retime_text;
use crate::tools::ToolEnv;

use super::{FetchError, FetchResult};

/// `<work_dir>/<primary stem>-captions.srt`.
pub fn caption_path(work_dir: &Path, primary: &StreamDescriptor) -> PathBuf {
    work_dir.join(format!(
        "{}-{}.srt",
        primary.stem(),
        ArtifactKind::Subtitle.file_tag()
    ))
}

/// Write the first caption track whose label contains `language`.
///
/// Returns `None` when no label matches or when retiming to `window`
/// leaves no cue. The file is only written once the final text is known,
/// so a track that fails to retime leaves nothing behind.
pub fn fetch_captions(
    env: &ToolEnv<'_>,
    catalog: &dyn StreamCatalog,
    captions: &[CaptionDescriptor],
    language: &str,
    primary: &StreamDescriptor,
    window: &TimeWindow,
    work_dir: &Path,
) -> FetchResult<Option<FetchedArtifact>> {
    let Some(caption) = captions.iter().find(|c| c.matches_language(language)) else {
        env.logger
            .info(&format!("No captions matching '{}'", language));
        return Ok(None);
    };

    let path = caption_path(work_dir, primary);
    if path.exists() {
        env.logger
            .debug(&format!("Replacing existing {}", path.display()));
        fs::remove_file(&path).map_err(|e| FetchError::io(&path, e))?;
    }

    env.logger
        .info(&format!("Downloading captions '{}'", caption.label));
    let text = catalog.materialize_caption(caption, env)?;

    let text = if window.is_trivial() {
        text
    } else {
        match retime_text(&text, window)? {
            Some(retimed) => retimed,
            None => {
                env.logger
                    .info("No caption cues fall inside the requested window");
                return Ok(None);
            }
        }
    };

    fs::create_dir_all(work_dir).map_err(|e| FetchError::io(work_dir, e))?;
    fs::write(&path, text).map_err(|e| FetchError::io(&path, e))?;

    Ok(Some(FetchedArtifact::from_caption(
        path,
        primary.stem(),
        caption,
    )))
}
