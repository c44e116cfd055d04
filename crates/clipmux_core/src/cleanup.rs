//! Removing intermediate artifacts once the output exists.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::logging::JobLogger;
use crate::models::ArtifactKind;

/// What happened to each path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Best-effort removal; a failure is logged and the rest still run.
pub fn cleanup(
    logger: &JobLogger,
    audio: Option<&Path>,
    video: Option<&Path>,
    captions: Option<&Path>,
) -> CleanupReport {
    let mut report = CleanupReport::default();

    for (kind, path) in [
        (ArtifactKind::Audio, audio),
        (ArtifactKind::Video, video),
        (ArtifactKind::Subtitle, captions),
    ] {
        let Some(path) = path else {
            logger.debug(&format!("No {} file to clean up", kind));
            continue;
        };

        match fs::remove_file(path) {
            Ok(()) => {
                logger.info(&format!("Deleted {} file: {}", kind, path.display()));
                report.removed.push(path.to_path_buf());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                logger.debug(&format!("{} file already gone: {}", kind, path.display()));
                report.missing.push(path.to_path_buf());
            }
            Err(e) => {
                logger.error(&format!(
                    "Could not delete {} file {}: {}",
                    kind,
                    path.display(),
                    e
                ));
                report.failed.push(path.to_path_buf());
            }
        }
    }

    report
}
