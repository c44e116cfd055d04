//! Stream file fetching.
//!
//! A trivial window downloads the whole file with the resumable fetcher.
//! Any start offset or duration switches to a stream-copy time slice read
//! by the transcoder straight from the remote address. A start-only window
//! is sliced as well (without `-t`): retimed captions assume the media
//! begins at the start offset, which a full download would not.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::FetchSettings;
use crate::models::{ArtifactKind, FetchedArtifact, StreamDescriptor, TimeWindow};
use crate::timecode::format_seconds;
use crate::tools::{Invocation, Tool, ToolEnv};

use super::{FetchError, FetchResult};

/// `<work_dir>/<stem>-<kind>.<ext>`; the kind tag is always applied.
pub fn destination_path(work_dir: &Path, stream: &StreamDescriptor, kind: ArtifactKind) -> PathBuf {
    work_dir.join(format!(
        "{}-{}.{}",
        stream.stem(),
        kind.file_tag(),
        stream.file_extension()
    ))
}

/// Build the command that fetches `stream` into `dest`.
pub fn build_fetch_invocation(
    env: &ToolEnv<'_>,
    fetch: &FetchSettings,
    stream: &StreamDescriptor,
    window: &TimeWindow,
    dest: &Path,
) -> Invocation {
    if window.is_trivial() {
        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let connections = fetch.connections.max(1);

        env.invocation(Tool::Fetcher)
            .arg(format!("--continue={}", fetch.resume))
            .arg(format!("-j{}", connections))
            .arg(format!("-x{}", connections))
            .arg(format!("--split={}", connections))
            .args(["-k", fetch.min_split_size.as_str()])
            .arg("--optimize-concurrent-downloads=true")
            .arg("-d")
            .path_arg(dir)
            .args(["-o", name.as_str()])
            .arg(stream.url.as_str())
            .produces(dest)
    } else {
        let mut invocation = env
            .invocation(Tool::Transcoder)
            .args(["-y", "-ss"])
            .arg(format_seconds(window.start))
            .args(["-i", stream.url.as_str()]);
        if let Some(duration) = window.duration {
            invocation = invocation.arg("-t").arg(format_seconds(duration));
        }
        invocation
            .args(["-map", "0", "-c", "copy", "-avoid_negative_ts", "make_zero"])
            .path_arg(dest)
            .produces(dest)
    }
}

/// Fetch `stream` into `work_dir`, honouring `window`.
pub fn fetch_file(
    env: &ToolEnv<'_>,
    fetch: &FetchSettings,
    stream: &StreamDescriptor,
    window: &TimeWindow,
    work_dir: &Path,
) -> FetchResult<FetchedArtifact> {
    let kind = stream
        .kind
        .artifact_kind()
        .ok_or_else(|| FetchError::UnsupportedKind {
            id: stream.id.clone(),
            kind: stream.kind.to_string(),
        })?;

    fs::create_dir_all(work_dir).map_err(|e| FetchError::io(work_dir, e))?;
    let dest = destination_path(work_dir, stream, kind);

    if window.is_trivial() {
        env.logger
            .info(&format!("Downloading {} stream {}", kind, stream.id));
    } else {
        env.logger.info(&format!(
            "Extracting {} stream {} from {}s{}",
            kind,
            stream.id,
            format_seconds(window.start),
            window
                .duration
                .map(|d| format!(" for {}s", format_seconds(d)))
                .unwrap_or_default()
        ));
    }

    let invocation = build_fetch_invocation(env, fetch, stream, window, &dest);
    env.run(&invocation)?;

    if !dest.exists() {
        return Err(FetchError::MissingOutput(dest));
    }

    Ok(FetchedArtifact::from_stream(kind, dest, stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolSettings;
    use crate::logging::JobLogger;
    use crate::models::StreamKind;
    use crate::tools::{ToolOutput, ToolPaths, ToolResult, ToolRunner};
    use parking_lot::Mutex;
    use tempfile::tempdir;

    /// Records invocations and creates their output files.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Invocation>>,
    }

    impl ToolRunner for Recorder {
        fn run(&self, invocation: &Invocation, _logger: &JobLogger) -> ToolResult<ToolOutput> {
            if let Some(path) = &invocation.output {
                fs::write(path, b"media").unwrap();
            }
            self.calls.lock().push(invocation.clone());
            Ok(ToolOutput::default())
        }
    }

    fn stream(kind: StreamKind) -> StreamDescriptor {
        StreamDescriptor::new("137", kind, "mp4", "clip.mp4", "https://media.example/137")
    }

    fn with_env<R>(runner: &dyn ToolRunner, f: impl FnOnce(&ToolEnv<'_>) -> R) -> R {
        let paths = ToolPaths::default();
        let settings = ToolSettings::default();
        let logger = JobLogger::silent("fetch");
        let env = ToolEnv {
            runner,
            paths: &paths,
            settings: &settings,
            logger: &logger,
        };
        f(&env)
    }

    #[test]
    fn destination_is_tagged_by_kind() {
        let path = destination_path(Path::new("out"), &stream(StreamKind::Video), ArtifactKind::Video);
        assert_eq!(path, PathBuf::from("out/clip-video.mp4"));
    }

    #[test]
    fn full_window_uses_resumable_fetcher() {
        let dir = tempdir().unwrap();
        let recorder = Recorder::default();

        let artifact = with_env(&recorder, |env| {
            fetch_file(
                env,
                &FetchSettings::default(),
                &stream(StreamKind::Combined),
                &TimeWindow::full(),
                dir.path(),
            )
        })
        .unwrap();

        assert_eq!(artifact.kind, ArtifactKind::Video);
        assert_eq!(artifact.path, dir.path().join("clip-video.mp4"));
        assert!(artifact.path.exists());

        let calls = recorder.calls.lock();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.tool, Tool::Fetcher);
        assert_eq!(call.program, PathBuf::from("aria2c"));
        assert_eq!(
            call.args[..6],
            [
                "--continue=true",
                "-j5",
                "-x5",
                "--split=5",
                "-k",
                "1M"
            ]
        );
        assert_eq!(call.value_of("-o"), Some("clip-video.mp4"));
        assert_eq!(call.args.last().map(String::as_str), Some("https://media.example/137"));
    }

    #[test]
    fn bounded_window_slices_remote_source() {
        let dir = tempdir().unwrap();
        let recorder = Recorder::default();
        let window = TimeWindow::new(Some(5.0), Some(10.0)).unwrap();

        with_env(&recorder, |env| {
            fetch_file(
                env,
                &FetchSettings::default(),
                &stream(StreamKind::Audio),
                &window,
                dir.path(),
            )
        })
        .unwrap();

        let calls = recorder.calls.lock();
        let call = &calls[0];
        assert_eq!(call.tool, Tool::Transcoder);
        assert_eq!(call.value_of("-ss"), Some("5"));
        assert_eq!(call.value_of("-i"), Some("https://media.example/137"));
        assert_eq!(call.value_of("-t"), Some("10"));
        assert_eq!(call.value_of("-c"), Some("copy"));
        assert_eq!(call.value_of("-avoid_negative_ts"), Some("make_zero"));
        assert_eq!(
            call.output.as_deref(),
            Some(dir.path().join("clip-audio.mp4").as_path())
        );
    }

    #[test]
    fn start_only_window_slices_without_duration() {
        let dir = tempdir().unwrap();
        let recorder = Recorder::default();
        let window = TimeWindow::new(Some(90.5), None).unwrap();

        with_env(&recorder, |env| {
            fetch_file(
                env,
                &FetchSettings::default(),
                &stream(StreamKind::Video),
                &window,
                dir.path(),
            )
        })
        .unwrap();

        let calls = recorder.calls.lock();
        assert_eq!(calls[0].tool, Tool::Transcoder);
        assert_eq!(calls[0].value_of("-ss"), Some("90.5"));
        assert!(!calls[0].has_arg("-t"));
    }

    #[test]
    fn other_kinds_are_refused() {
        let dir = tempdir().unwrap();
        let recorder = Recorder::default();

        let result = with_env(&recorder, |env| {
            fetch_file(
                env,
                &FetchSettings::default(),
                &stream(StreamKind::Other("storyboard".to_string())),
                &TimeWindow::full(),
                dir.path(),
            )
        });

        assert!(matches!(result, Err(FetchError::UnsupportedKind { .. })));
        assert!(recorder.calls.lock().is_empty());
    }
}
