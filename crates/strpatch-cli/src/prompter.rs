//! Terminal implementation of the session's Prompter

use std::io::{self, BufRead, Write};

use owo_colors::OwoColorize;
use strpatch::Prompter;

/// Line prompter over a reader/writer pair, normally stdin/stdout
pub struct CliPrompter<R, W> {
    input: R,
    output: W,
}

impl CliPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> CliPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for CliPrompter<R, W> {
    fn prompt_line(&mut self, message: &str) -> io::Result<Option<Vec<u8>>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        // Raw bytes: search strings need not be UTF-8.
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            writeln!(self.output).ok();
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn display_message(&mut self, message: &str) {
        writeln!(self.output, "{}", message).ok();
    }

    fn display_warning(&mut self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn display_success(&mut self, message: &str) {
        writeln!(self.output, "{}", message.green()).ok();
    }
}
