//! Choosing how the fetched pieces become one output file.
//!
//! Decision table, evaluated in order:
//!
//! | video | audio | transcode hint | strategy         |
//! |-------|-------|----------------|------------------|
//! | no    | no    | -              | `NothingToMux`   |
//! | no    | yes   | yes            | `AudioTranscode` |
//! | no    | yes   | no             | `AudioRemux`     |
//! | yes   | any   | -              | `StreamCopy`     |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{OutputSettings, TranscodeSettings};
use crate::models::FetchedArtifact;

use super::MuxError;

/// How the output is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MuxStrategy {
    /// Copy every input stream into the container.
    StreamCopy,
    /// Copy a lone audio stream into the container.
    AudioRemux,
    /// Re-encode a lone audio stream into a widely supported codec.
    AudioTranscode,
}

impl std::fmt::Display for MuxStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MuxStrategy::StreamCopy => write!(f, "stream-copy mux"),
            MuxStrategy::AudioRemux => write!(f, "audio remux"),
            MuxStrategy::AudioTranscode => write!(f, "audio re-encode"),
        }
    }
}

/// The artifacts available to the mux stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuxInput<'a> {
    pub audio: Option<&'a FetchedArtifact>,
    pub video: Option<&'a FetchedArtifact>,
    pub captions: Option<&'a FetchedArtifact>,
    /// Output frame rate to force, when known.
    pub video_fps: Option<f64>,
    /// The lone audio stream uses a codec that should be re-encoded.
    pub transcode_hint: bool,
}

/// A fully decided mux.
#[derive(Debug, Clone, PartialEq)]
pub struct MuxPlan {
    pub strategy: MuxStrategy,
    pub audio: Option<PathBuf>,
    pub video: Option<PathBuf>,
    /// Captions to embed (never set for `AudioTranscode`).
    pub captions: Option<PathBuf>,
    pub video_fps: Option<f64>,
    pub output: PathBuf,
}

impl MuxPlan {
    /// Whether the caption file ends up inside the output.
    pub fn embeds_captions(&self) -> bool {
        self.captions.is_some()
    }

    /// Input files in the order they are passed to the transcoder.
    pub fn inputs(&self) -> Vec<&Path> {
        [&self.audio, &self.video, &self.captions]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect()
    }
}

/// Decide the strategy and output path for `input`.
///
/// The output stem comes from the video artifact when present, otherwise
/// from the audio artifact.
pub fn build_mux_plan(
    input: &MuxInput<'_>,
    output: &OutputSettings,
    transcode: &TranscodeSettings,
    out_dir: &Path,
) -> Result<MuxPlan, MuxError> {
    let base = input.video.or(input.audio).ok_or(MuxError::NothingToMux)?;

    let strategy = match (input.video, input.audio) {
        (Some(_), _) => MuxStrategy::StreamCopy,
        (None, Some(_)) if input.transcode_hint => MuxStrategy::AudioTranscode,
        (None, _) => MuxStrategy::AudioRemux,
    };

    let (extension, captions) = match strategy {
        MuxStrategy::AudioTranscode => (transcode.extension.as_str(), None),
        _ => (
            output.container.as_str(),
            input.captions.map(|c| c.path.clone()),
        ),
    };

    Ok(MuxPlan {
        strategy,
        audio: input.audio.map(|a| a.path.clone()),
        video: input.video.map(|v| v.path.clone()),
        captions,
        video_fps: input.video.and(input.video_fps),
        output: out_dir.join(format!("{}-output.{}", base.stem, extension)),
    })
}
