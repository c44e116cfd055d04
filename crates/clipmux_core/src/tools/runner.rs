//! Executing invocations.
//!
//! Tool output is forwarded to the job logger line by line while the tool
//! runs. Carriage returns end a line too, so progress meters that redraw
//! in place show up as they update.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::thread;

use crate::config::ToolSettings;
use crate::logging::JobLogger;

use super::{Invocation, Tool, ToolError, ToolPaths, ToolResult};

/// Outcome of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub exit_code: i32,
    /// Captured stdout (only filled for capturing invocations).
    pub stdout: String,
}

/// Runs external commands to completion.
pub trait ToolRunner: Send + Sync {
    /// Run `invocation`, blocking until it exits.
    ///
    /// A non-zero exit is returned as [`ToolError::Failed`].
    fn run(&self, invocation: &Invocation, logger: &JobLogger) -> ToolResult<ToolOutput>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, logger: &JobLogger) -> ToolResult<ToolOutput> {
        let name = invocation.program_name();
        logger.command(&invocation.command_line());
        logger.clear_tail();

        let spawn_error = |source| ToolError::Spawn {
            program: invocation.program.clone(),
            source,
        };

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let capture = invocation.capture_stdout;
        let tool_name = name.as_str();

        let (stdout, last_error) = thread::scope(|scope| {
            let errors = scope.spawn(move || {
                let mut last = String::new();
                if let Some(pipe) = stderr_pipe {
                    let read = for_each_line(pipe, |line| {
                        logger.output_line(line, true);
                        last = line.trim().to_string();
                    });
                    if let Err(e) = read {
                        logger.debug(&format!("Reading {} stderr failed: {}", tool_name, e));
                    }
                }
                last
            });

            let mut captured = String::new();
            if let Some(mut pipe) = stdout_pipe {
                let read = if capture {
                    let mut bytes = Vec::new();
                    pipe.read_to_end(&mut bytes).map(|_| {
                        captured = String::from_utf8_lossy(&bytes).to_string();
                    })
                } else {
                    for_each_line(pipe, |line| logger.output_line(line, false))
                };
                if let Err(e) = read {
                    logger.debug(&format!("Reading {} stdout failed: {}", tool_name, e));
                }
            }

            (captured, errors.join().unwrap_or_default())
        });

        let status = child.wait().map_err(spawn_error)?;
        let exit_code = status.code().unwrap_or(-1);

        if !status.success() {
            logger.show_tail(&format!("{} output", name));
            let message = if last_error.is_empty() {
                "no diagnostic output".to_string()
            } else {
                last_error
            };
            return Err(ToolError::Failed {
                name,
                exit_code,
                message,
            });
        }

        Ok(ToolOutput { exit_code, stdout })
    }
}

/// Call `on_line` for every non-blank line of `reader` as it arrives.
///
/// Lines end at `\n` or `\r`; trailing whitespace is dropped.
fn for_each_line<R: Read>(reader: R, mut on_line: impl FnMut(&str)) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        let len = chunk.len();
        for &byte in chunk {
            if byte == b'\n' || byte == b'\r' {
                emit_line(&mut line, &mut on_line);
            } else {
                line.push(byte);
            }
        }
        reader.consume(len);
    }
    emit_line(&mut line, &mut on_line);
    Ok(())
}

fn emit_line(line: &mut Vec<u8>, on_line: &mut impl FnMut(&str)) {
    if line.is_empty() {
        return;
    }
    let text = String::from_utf8_lossy(line);
    let text = text.trim_end();
    if !text.trim().is_empty() {
        on_line(text);
    }
    line.clear();
}

/// Everything needed to build and run invocations during one URL run.
#[derive(Clone, Copy)]
pub struct ToolEnv<'a> {
    pub runner: &'a dyn ToolRunner,
    pub paths: &'a ToolPaths,
    pub settings: &'a ToolSettings,
    pub logger: &'a JobLogger,
}

impl<'a> ToolEnv<'a> {
    /// Start an invocation of `tool` with its resolved program.
    pub fn invocation(&self, tool: Tool) -> Invocation {
        Invocation::new(tool, self.paths.program(tool, self.settings))
    }

    /// Run `invocation` with this env's runner and logger.
    pub fn run(&self, invocation: &Invocation) -> ToolResult<ToolOutput> {
        self.runner.run(invocation, self.logger)
    }
}
