// ABOUTME: Interactive confirmation and selection used by the destructive commands
// Answers are read a line at a time so the prompter can be scripted in tests

use crossterm::style::Stylize;
use std::io::{self, BufRead, IsTerminal, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled")]
    Cancelled,

    #[error("prompt IO error: {0}")]
    Io(#[from] io::Error),
}

pub trait Prompter {
    /// Ask a yes/no question; anything but `y`/`yes` is a no.
    fn confirm(&mut self, title: &str, description: &str) -> Result<bool, PromptError>;

    /// Ask the user to pick one of `options` and return it.
    fn select(&mut self, title: &str, options: &[String]) -> Result<String, PromptError>;
}

pub struct StdinPrompter<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl StdinPrompter<io::BufReader<io::Stdin>, io::Stderr> {
    /// Prompt on stderr so stdout stays clean for generated YAML.
    pub fn stdio() -> Self {
        let output = io::stderr();
        let color = output.is_terminal();
        Self {
            input: io::BufReader::new(io::stdin()),
            output,
            color,
        }
    }
}

impl<R: BufRead, W: Write> StdinPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
        }
    }

    fn title(&mut self, title: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.output, "{}", title.bold())
        } else {
            writeln!(self.output, "{}", title)
        }
    }

    fn dim(&mut self, text: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.output, "{}", text.dark_grey())
        } else {
            writeln!(self.output, "{}", text)
        }
    }

    fn answer(&mut self) -> Result<String, PromptError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for StdinPrompter<R, W> {
    fn confirm(&mut self, title: &str, description: &str) -> Result<bool, PromptError> {
        self.title(title)?;
        if !description.is_empty() {
            self.dim(description)?;
        }
        write!(self.output, "[y/N] ")?;
        let answer = self.answer()?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn select(&mut self, title: &str, options: &[String]) -> Result<String, PromptError> {
        if options.is_empty() {
            return Err(PromptError::Cancelled);
        }
        self.title(title)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }

        loop {
            write!(self.output, "> ")?;
            let answer = self.answer()?;
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(options[n - 1].clone());
                }
            }
            if let Some(option) = options.iter().find(|o| **o == answer) {
                return Ok(option.clone());
            }
            writeln!(self.output, "Choose 1-{} or type a name", options.len())?;
        }
    }
}
