//! Fakes shared by the orchestrator tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::catalog::{CatalogError, CatalogResult, StreamCatalog};
use crate::config::{RunOptions, Settings};
use crate::logging::{JobLogger, LogConfig, LogLevel};
use crate::models::{CaptionDescriptor, StreamDescriptor};
use crate::tools::{Invocation, Tool, ToolEnv, ToolError, ToolOutput, ToolPaths, ToolResult, ToolRunner};

use super::input::testing::ScriptedInput;
use super::types::{Context, Services};

/// Catalog answering from fixed lists.
#[derive(Default)]
pub struct FakeCatalog {
    pub streams: Vec<StreamDescriptor>,
    /// Caption tracks with the SRT text each one materializes to.
    pub captions: Vec<(CaptionDescriptor, String)>,
    pub fail_caption_download: bool,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_streams(streams: Vec<StreamDescriptor>) -> Self {
        Self {
            streams,
            ..Default::default()
        }
    }

    pub fn with_caption(mut self, label: &str, text: String) -> Self {
        let index = self.captions.len();
        self.captions.push((CaptionDescriptor::new(label, index), text));
        self
    }
}

impl StreamCatalog for FakeCatalog {
    fn list_streams(&self, url: &str, _env: &ToolEnv<'_>) -> CatalogResult<Vec<StreamDescriptor>> {
        self.lookups.lock().push(url.to_string());
        Ok(self.streams.clone())
    }

    fn list_captions(&self, _url: &str, _env: &ToolEnv<'_>) -> CatalogResult<Vec<CaptionDescriptor>> {
        Ok(self.captions.iter().map(|(c, _)| c.clone()).collect())
    }

    fn materialize_caption(
        &self,
        caption: &CaptionDescriptor,
        _env: &ToolEnv<'_>,
    ) -> CatalogResult<String> {
        if self.fail_caption_download {
            return Err(CatalogError::Download {
                label: caption.label.clone(),
                message: "connection reset".to_string(),
            });
        }
        self.captions
            .iter()
            .find(|(c, _)| c.index == caption.index)
            .map(|(_, text)| text.clone())
            .ok_or(CatalogError::UnknownCaption(caption.index))
    }
}

/// Records every invocation and writes the file it is expected to produce.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<Invocation>>,
    /// Contents of every `.srt` argument at the time it was passed.
    pub subtitle_inputs: Mutex<Vec<String>>,
    /// Tool whose invocations exit with status 1.
    pub fail_tool: Option<Tool>,
}

impl RecordingRunner {
    pub fn failing(tool: Tool) -> Self {
        Self {
            fail_tool: Some(tool),
            ..Default::default()
        }
    }

    pub fn calls_to(&self, tool: Tool) -> Vec<Invocation> {
        self.calls
            .lock()
            .iter()
            .filter(|i| i.tool == tool)
            .cloned()
            .collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation, _logger: &JobLogger) -> ToolResult<ToolOutput> {
        self.calls.lock().push(invocation.clone());
        for arg in invocation.args.iter().filter(|a| a.ends_with(".srt")) {
            if let Ok(text) = fs::read_to_string(arg) {
                self.subtitle_inputs.lock().push(text);
            }
        }
        if self.fail_tool == Some(invocation.tool) {
            return Err(ToolError::Failed {
                name: invocation.program_name(),
                exit_code: 1,
                message: "simulated failure".to_string(),
            });
        }
        if let Some(path) = &invocation.output {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, b"media").unwrap();
        }
        Ok(ToolOutput::default())
    }
}

/// Everything a context borrows, owned in one place.
pub struct Harness {
    pub dir: TempDir,
    pub settings: Settings,
    pub options: RunOptions,
    pub catalog: FakeCatalog,
    pub runner: RecordingRunner,
    pub paths: ToolPaths,
    pub input: ScriptedInput,
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let options = RunOptions::from_settings(&settings).with_output_dir(dir.path());
        Self {
            dir,
            settings,
            options,
            catalog: FakeCatalog::default(),
            runner: RecordingRunner::default(),
            paths: ToolPaths::default(),
            input: ScriptedInput::default(),
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn logger(&self) -> JobLogger {
        let lines = Arc::clone(&self.lines);
        JobLogger::console(
            "test",
            LogConfig::with_level(LogLevel::Debug),
            Box::new(move |_, line| lines.lock().push(line.to_string())),
        )
    }

    pub fn services(&self) -> Services<'_> {
        Services {
            catalog: &self.catalog,
            runner: &self.runner,
            tool_paths: &self.paths,
            input: &self.input,
        }
    }

    pub fn with_context<R>(&self, f: impl FnOnce(&Context<'_>) -> R) -> R {
        let ctx = Context::new(
            "test",
            "https://video.example/watch?v=clip",
            &self.options,
            &self.settings,
            self.services(),
            Arc::new(self.logger()),
        );
        f(&ctx)
    }

    pub fn logged(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.contains(needle))
    }
}

/// An SRT track of `count` cues lasting 900ms, one every second from 0s.
pub fn numbered_cues(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                "{}\n00:00:{:02},000 --> 00:00:{:02},900\nLine {}\n",
                i + 1,
                i,
                i,
                i + 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Executable stubs named like the default tools, for requirement checks.
#[cfg(unix)]
pub fn stub_tools(dir: &Path, names: &[&str]) {
    use std::os::unix::fs::PermissionsExt;

    for name in names {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
