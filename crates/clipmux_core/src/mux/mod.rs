//! Combining fetched artifacts into the final output file.
//!
//! - **plan_builder**: decides the strategy and output path
//! - **options_builder**: turns a plan into transcoder arguments

mod options_builder;
mod plan_builder;

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{OutputSettings, TranscodeSettings};
use crate::tools::{Tool, ToolEnv, ToolError};

pub use options_builder::MuxOptionsBuilder;
pub use plan_builder::{build_mux_plan, MuxInput, MuxPlan, MuxStrategy};

/// Errors produced while producing the output.
#[derive(Error, Debug)]
pub enum MuxError {
    /// Neither audio nor video was fetched.
    #[error("Nothing to mux: no audio or video input")]
    NothingToMux,

    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The transcoder exited cleanly without writing the output.
    #[error("Transcoder reported success but '{}' is missing", .0.display())]
    MissingOutput(PathBuf),
}

/// Result type for mux operations.
pub type MuxResult<T> = Result<T, MuxError>;

/// The file a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalOutput {
    pub path: PathBuf,
    pub strategy: MuxStrategy,
    /// Whether captions were embedded; if not, a caption file is kept.
    pub captions_embedded: bool,
}

/// Produce the output file for `input` in `out_dir`.
///
/// An existing file at the output path is overwritten.
pub fn finalize(
    env: &ToolEnv<'_>,
    input: &MuxInput<'_>,
    output: &OutputSettings,
    transcode: &TranscodeSettings,
    out_dir: &std::path::Path,
) -> MuxResult<FinalOutput> {
    let plan = build_mux_plan(input, output, transcode, out_dir)?;
    env.logger.info(&format!(
        "Combining {} input(s) by {}",
        plan.inputs().len(),
        plan.strategy
    ));

    if plan.output.exists() {
        env.logger
            .warn(&format!("Overwriting existing {}", plan.output.display()));
    }

    let invocation = MuxOptionsBuilder::new(&plan, output, transcode)
        .build(env.invocation(Tool::Transcoder));
    env.run(&invocation)?;

    if !plan.output.exists() {
        return Err(MuxError::MissingOutput(plan.output));
    }

    Ok(FinalOutput {
        captions_embedded: plan.embeds_captions(),
        strategy: plan.strategy,
        path: plan.output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolSettings;
    use crate::logging::{JobLogger, LogConfig, LogLevel};
    use crate::models::{ArtifactKind, FetchedArtifact, StreamDescriptor, StreamKind};
    use crate::tools::{Invocation, ToolOutput, ToolPaths, ToolResult, ToolRunner};
    use parking_lot::Mutex;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Invocation>>,
    }

    impl ToolRunner for Recorder {
        fn run(&self, invocation: &Invocation, _logger: &JobLogger) -> ToolResult<ToolOutput> {
            if let Some(path) = &invocation.output {
                fs::write(path, b"muxed").unwrap();
            }
            self.calls.lock().push(invocation.clone());
            Ok(ToolOutput::default())
        }
    }

    struct Failing;

    impl ToolRunner for Failing {
        fn run(&self, invocation: &Invocation, _logger: &JobLogger) -> ToolResult<ToolOutput> {
            Err(ToolError::Failed {
                name: invocation.program_name(),
                exit_code: 1,
                message: "Conversion failed!".to_string(),
            })
        }
    }

    fn audio(dir: &std::path::Path) -> FetchedArtifact {
        let stream = StreamDescriptor::new("251", StreamKind::Audio, "webm", "clip.webm", "u")
            .with_audio_codec("opus");
        FetchedArtifact::from_stream(ArtifactKind::Audio, dir.join("clip-audio.webm"), &stream)
    }

    fn run_finalize(
        runner: &dyn ToolRunner,
        logger: &JobLogger,
        input: &MuxInput<'_>,
        dir: &std::path::Path,
    ) -> MuxResult<FinalOutput> {
        let paths = ToolPaths::default();
        let settings = ToolSettings::default();
        let env = ToolEnv {
            runner,
            paths: &paths,
            settings: &settings,
            logger,
        };
        finalize(
            &env,
            input,
            &OutputSettings::default(),
            &TranscodeSettings::default(),
            dir,
        )
    }

    #[test]
    fn audio_only_with_hint_produces_mp3() {
        let dir = tempdir().unwrap();
        let recorder = Recorder::default();
        let audio = audio(dir.path());

        let output = run_finalize(
            &recorder,
            &JobLogger::silent("mux"),
            &MuxInput {
                audio: Some(&audio),
                transcode_hint: true,
                ..MuxInput::default()
            },
            dir.path(),
        )
        .unwrap();

        assert_eq!(output.path, dir.path().join("clip-output.mp3"));
        assert_eq!(output.strategy, MuxStrategy::AudioTranscode);
        let calls = recorder.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].value_of("-c:a"), Some("libmp3lame"));
    }

    #[test]
    fn audio_only_without_hint_never_reencodes() {
        let dir = tempdir().unwrap();
        let recorder = Recorder::default();
        let audio = audio(dir.path());

        run_finalize(
            &recorder,
            &JobLogger::silent("mux"),
            &MuxInput {
                audio: Some(&audio),
                ..MuxInput::default()
            },
            dir.path(),
        )
        .unwrap();

        let calls = recorder.calls.lock();
        assert_eq!(calls[0].value_of("-c:a"), Some("copy"));
        assert!(!calls[0].has_arg("libmp3lame"));
    }

    #[test]
    fn existing_output_is_overwritten_with_warning() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("clip-output.mkv"), b"old").unwrap();
        let recorder = Recorder::default();
        let audio = audio(dir.path());

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let logger = JobLogger::console(
            "mux",
            LogConfig::with_level(LogLevel::Warn),
            Box::new(move |_, line| sink.lock().push(line.to_string())),
        );

        let output = run_finalize(
            &recorder,
            &logger,
            &MuxInput {
                audio: Some(&audio),
                ..MuxInput::default()
            },
            dir.path(),
        )
        .unwrap();

        assert_eq!(fs::read(&output.path).unwrap(), b"muxed");
        assert!(lines.lock()[0].starts_with("[WARNING] Overwriting existing"));
    }

    #[test]
    fn tool_failure_surfaces_exit_code() {
        let dir = tempdir().unwrap();
        let audio = audio(dir.path());

        let err = run_finalize(
            &Failing,
            &JobLogger::silent("mux"),
            &MuxInput {
                audio: Some(&audio),
                ..MuxInput::default()
            },
            dir.path(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            MuxError::Tool(ToolError::Failed { exit_code: 1, .. })
        ));
    }
}
