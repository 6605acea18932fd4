// ABOUTME: Runs programs that take over the terminal, such as tmux attach and the editor
// The child inherits stdin, stdout, and stderr and hive waits for it to exit

use anyhow::{bail, Context, Result};
use std::process::Command;
use tracing::debug;

pub trait ForegroundRunner {
    /// Run `program` with `args` in the foreground; a non-zero exit is an error.
    fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

pub struct ProcessRunner;

impl ForegroundRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        debug!("Running {} {}", program, args.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to start {}", program))?;
        if !status.success() {
            bail!("{} exited with {}", program, status);
        }
        Ok(())
    }
}

/// Split an editor setting such as `code --wait` into program and arguments.
pub fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let mut words = command.split_whitespace().map(String::from);
    let program = words.next()?;
    Some((program, words.collect()))
}
