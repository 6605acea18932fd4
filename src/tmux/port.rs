// ABOUTME: The narrow interface the reconcilers use to drive a terminal multiplexer
// Production uses the tmux subprocess adapter; tests substitute fakes and mocks

use std::collections::BTreeMap;
use std::path::Path;

use super::error::TmuxError;
use crate::models::{Layout, Split};

/// A live window as reported by `list-windows`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Manager-assigned id (`@N`), used as the target for later calls.
    pub id: String,
    pub index: u32,
    pub name: String,
    /// Opaque geometry string; not a named layout.
    pub layout: String,
}

/// A live pane as reported by `list-panes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneInfo {
    /// Manager-assigned id (`%N`).
    pub id: String,
    pub current_path: String,
    pub current_command: String,
}

/// Every call blocks until the manager has answered. Windows and panes are
/// addressed by the ids the manager hands back, never by assumed indices.
#[cfg_attr(test, mockall::automock)]
pub trait Multiplexer {
    fn session_exists(&self, session: &str) -> Result<bool, TmuxError>;

    /// Create a detached session; the manager also creates its first window and pane.
    fn create_session(&self, session: &str, dir: &Path) -> Result<(), TmuxError>;

    fn set_option(&self, session: &str, key: &str, value: &str) -> Result<(), TmuxError>;

    fn set_environment(&self, session: &str, key: &str, value: &str) -> Result<(), TmuxError>;

    /// Current value of a session option, `None` when it is not set.
    fn show_option(&self, session: &str, key: &str) -> Result<Option<String>, TmuxError>;

    /// Session environment with unset markers already removed.
    fn show_environment(&self, session: &str) -> Result<BTreeMap<String, String>, TmuxError>;

    /// Create a window and return its id.
    fn new_window(&self, session: &str, name: &str, dir: &Path) -> Result<String, TmuxError>;

    fn rename_window(&self, window_id: &str, name: &str) -> Result<(), TmuxError>;

    fn select_window(&self, window_id: &str) -> Result<(), TmuxError>;

    fn list_windows(&self, session: &str) -> Result<Vec<WindowInfo>, TmuxError>;

    /// Split a window, creating exactly one pane, and return the new pane's id.
    fn split_window(&self, window_id: &str, split: Split, dir: &Path) -> Result<String, TmuxError>;

    /// Type `text` into a pane followed by Enter. Does not wait for the shell.
    fn send_keys(&self, pane_id: &str, text: &str) -> Result<(), TmuxError>;

    fn list_panes(&self, window_id: &str) -> Result<Vec<PaneInfo>, TmuxError>;

    fn select_layout(&self, window_id: &str, layout: Layout) -> Result<(), TmuxError>;

    fn kill_session(&self, session: &str) -> Result<(), TmuxError>;

    /// Name of the session the caller is attached to.
    fn current_session(&self) -> Result<String, TmuxError>;
}
