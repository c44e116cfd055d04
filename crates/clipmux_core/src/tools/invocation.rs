//! Fully built external command.

use std::path::{Path, PathBuf};

use super::Tool;

/// One external command, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Which tool this invokes.
    pub tool: Tool,
    /// Resolved executable.
    pub program: PathBuf,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// File the command is expected to produce, if any.
    pub output: Option<PathBuf>,
    /// Return stdout to the caller instead of logging it line by line.
    pub capture_stdout: bool,
}

impl Invocation {
    pub fn new(tool: Tool, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            output: None,
            capture_stdout: false,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        let rendered = path.to_string_lossy().to_string();
        self.arg(rendered)
    }

    /// Record the file this command produces.
    pub fn produces(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn capturing(mut self) -> Self {
        self.capture_stdout = true;
        self
    }

    /// Short program name for messages (`ffmpeg`, not `/usr/bin/ffmpeg`).
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.tool.to_string())
    }

    /// Argument following the first occurrence of `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Whether `flag` appears anywhere in the arguments.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// Shell-like rendering for the command log.
    pub fn command_line(&self) -> String {
        let mut parts = vec![quote(&self.program.to_string_lossy())];
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_quotes_spaces() {
        let invocation = Invocation::new(Tool::Transcoder, "/usr/bin/ffmpeg")
            .args(["-y", "-i"])
            .path_arg(Path::new("My Clip-audio.webm"));

        assert_eq!(
            invocation.command_line(),
            "/usr/bin/ffmpeg -y -i 'My Clip-audio.webm'"
        );
        assert_eq!(invocation.program_name(), "ffmpeg");
    }

    #[test]
    fn value_of_finds_flag_argument() {
        let invocation = Invocation::new(Tool::Transcoder, "ffmpeg").args(["-ss", "5", "-t", "10"]);
        assert_eq!(invocation.value_of("-t"), Some("10"));
        assert_eq!(invocation.value_of("-r"), None);
        assert!(invocation.has_arg("-ss"));
    }
}
