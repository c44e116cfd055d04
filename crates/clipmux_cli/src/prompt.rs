//! Interactive prompts for values missing from the command line.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use clipmux_core::orchestrator::{InputSource, ValueKind};

/// Asks on `output` and reads answers line by line from `input`.
///
/// Blank answers are asked again; end of input yields no value.
pub struct Prompt<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }
}

impl Prompt<io::BufReader<io::Stdin>, io::Stdout> {
    /// Prompt on the terminal.
    pub fn terminal() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

fn question(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Url => "Provide a video link to download: ",
        ValueKind::StreamId => "Which stream do you want? (specify itag): ",
    }
}

impl<R, W> InputSource for Prompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn obtain(&self, kind: ValueKind, default: Option<&str>) -> Option<String> {
        let mut guard = self.io.lock().ok()?;
        let (input, output) = &mut *guard;

        loop {
            let asked = match default {
                Some(default) => write!(output, "{} [{}] ", question(kind).trim_end(), default),
                None => write!(output, "{}", question(kind)),
            };
            asked.ok()?;
            output.flush().ok()?;

            let mut line = String::new();
            if input.read_line(&mut line).ok()? == 0 {
                return default.map(str::to_string);
            }

            let answer = line.trim();
            if !answer.is_empty() {
                return Some(answer.to_string());
            }
            if let Some(default) = default {
                return Some(default.to_string());
            }
            writeln!(output, "You need to provide a {}!", kind).ok()?;
        }
    }
}
