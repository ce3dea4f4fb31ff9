use std::io::{self, BufRead, Write};

use crate::core::errors::Result;

/// Yes/no confirmation source. Handlers receive it instead of touching stdin.
pub trait Prompt {
    /// Asks `question`; an empty answer or end of input takes `default`.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;
}

/// Line-oriented prompt over any reader/writer pair.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

/// Reads answers from stdin and writes questions to stderr.
pub fn stdio() -> LinePrompt<io::StdinLock<'static>, io::Stderr> {
    LinePrompt::new(io::stdin().lock(), io::stderr())
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.output, "{question} {hint} ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 || answer.trim().is_empty() {
                return Ok(default);
            }
            if let Some(value) = parse_answer(&answer) {
                return Ok(value);
            }
            writeln!(self.output, "please answer yes or no")?;
        }
    }
}

pub fn parse_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
