// ABOUTME: Error types for tmux session management
// Defines error conditions that can occur when driving the tmux server

use thiserror::Error;

use crate::models::ValidationErrors;

#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("Tmux not installed on host")]
    TmuxNotInstalled,

    #[error("Tmux server is not running: {0}")]
    ServerUnavailable(String),

    #[error("Not attached to a tmux session")]
    NotAttached,

    #[error("Session already exists: {0}")]
    SessionExists(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid session config:\n{0}")]
    InvalidConfig(#[from] ValidationErrors),

    #[error("Expected {0} but tmux reported none")]
    Missing(String),

    #[error("`tmux {command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("`tmux {command}` returned unexpected output: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("{step}: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<TmuxError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TmuxError {
    /// Description of the reconciler step that failed, if this error carries one.
    pub fn step(&self) -> Option<&str> {
        match self {
            TmuxError::Step { step, .. } => Some(step),
            _ => None,
        }
    }

    /// The innermost error, with step context peeled off.
    pub fn root(&self) -> &TmuxError {
        match self {
            TmuxError::Step { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Attach a step description to a manager call's error.
pub(crate) trait StepContext<T> {
    fn step(self, describe: impl FnOnce() -> String) -> Result<T, TmuxError>;
}

impl<T> StepContext<T> for Result<T, TmuxError> {
    fn step(self, describe: impl FnOnce() -> String) -> Result<T, TmuxError> {
        self.map_err(|source| TmuxError::Step {
            step: describe(),
            source: Box::new(source),
        })
    }
}
