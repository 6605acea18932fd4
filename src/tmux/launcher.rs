// ABOUTME: Turns a session tree into an ordered sequence of tmux calls
// Also provides teardown; neither rolls back a partially created session

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::{StepContext, TmuxError};
use super::port::{Multiplexer, PaneInfo, WindowInfo};
use crate::models::{PaneSpec, SessionSpec, WindowSpec};

/// What a successful launch created, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub session: String,
    pub windows: Vec<LaunchedWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedWindow {
    pub id: String,
    pub name: String,
    pub pane_ids: Vec<String>,
}

impl LaunchReport {
    pub fn pane_count(&self) -> usize {
        self.windows.iter().map(|w| w.pane_ids.len()).sum()
    }
}

/// Materialize `spec` as a new tmux session.
///
/// Relative directories resolve against `cwd`. Fails with
/// [`TmuxError::SessionExists`] before touching anything if the session is
/// already running; any later failure is wrapped in [`TmuxError::Step`] and
/// leaves whatever was created so far in place.
pub fn launch(
    mux: &dyn Multiplexer,
    spec: &SessionSpec,
    cwd: &Path,
) -> Result<LaunchReport, TmuxError> {
    spec.validate()?;
    let session = spec.name();

    let exists = mux
        .session_exists(session)
        .step(|| format!("check whether session '{}' exists", session))?;
    if exists {
        return Err(TmuxError::SessionExists(session.to_string()));
    }

    let base_dir = spec.base_path(cwd);
    info!("Creating session '{}' in {}", session, base_dir.display());
    mux.create_session(session, &base_dir)
        .step(|| format!("create session '{}'", session))?;

    // new-session made one window and one pane; their ids and even their
    // index depend on the user's tmux config, so ask rather than assume.
    let auto_window = first_window(mux, session)?;
    let auto_pane = first_pane(mux, &auto_window.id)?;
    debug!(
        "Session '{}' started with window {} (index {}) and pane {}",
        session, auto_window.id, auto_window.index, auto_pane.id
    );

    for (key, value) in &spec.options {
        let value = value.to_string();
        debug!("Setting option {}={}", key, value);
        mux.set_option(session, key, &value)
            .step(|| format!("set option '{}'", key))?;
    }
    for (key, value) in &spec.env {
        debug!("Setting environment {}", key);
        mux.set_environment(session, key, value)
            .step(|| format!("set environment variable '{}'", key))?;
    }

    let mut report = LaunchReport {
        session: session.to_string(),
        windows: Vec::with_capacity(spec.windows.len()),
    };

    for (i, window) in spec.windows.iter().enumerate() {
        let window_dir = window.resolved_dir(&base_dir);

        let (window_id, pane_id, started_in) = if i == 0 {
            mux.rename_window(&auto_window.id, &window.name)
                .step(|| format!("rename first window to '{}'", window.name))?;
            (auto_window.id.clone(), auto_pane.id.clone(), base_dir.clone())
        } else {
            let window_id = mux
                .new_window(session, &window.name, &window_dir)
                .step(|| format!("create window '{}'", window.name))?;
            let pane = first_pane(mux, &window_id)?;
            (window_id, pane.id, window_dir.clone())
        };
        info!("Window '{}' ({}) in {}", window.name, window_id, window_dir.display());

        let pane_ids = populate_window(mux, window, &window_id, pane_id, &window_dir, &started_in)?;

        if let Some(layout) = window.layout() {
            mux.select_layout(&window_id, layout)
                .step(|| format!("apply layout '{}' to window '{}'", layout, window.name))?;
        }

        report.windows.push(LaunchedWindow {
            id: window_id,
            name: window.name.clone(),
            pane_ids,
        });
    }

    if let Some(first) = report.windows.first() {
        mux.select_window(&first.id)
            .step(|| format!("select window '{}'", first.name))?;
    }

    info!(
        "Session '{}' launched with {} windows and {} panes",
        session,
        report.windows.len(),
        report.pane_count()
    );
    Ok(report)
}

/// Create the window's remaining panes and type each pane's directory change
/// and command into it. `started_in` is where the existing first pane's shell
/// was started.
fn populate_window(
    mux: &dyn Multiplexer,
    window: &WindowSpec,
    window_id: &str,
    first_pane_id: String,
    window_dir: &Path,
    started_in: &Path,
) -> Result<Vec<String>, TmuxError> {
    let mut pane_ids = Vec::with_capacity(window.panes.len());

    for (j, pane) in window.panes.iter().enumerate() {
        let (pane_id, pane_start): (String, &Path) = if j == 0 {
            (first_pane_id.clone(), started_in)
        } else {
            let split = pane.split();
            let id = mux
                .split_window(window_id, split, window_dir)
                .step(|| {
                    format!("split pane {} ({}) in window '{}'", j, split, window.name)
                })?;
            (id, window_dir)
        };
        debug!("Pane {} of window '{}' is {}", j, window.name, pane_id);

        send_pane_input(mux, window, j, pane, &pane_id, window_dir, pane_start)?;
        pane_ids.push(pane_id);
    }

    Ok(pane_ids)
}

fn send_pane_input(
    mux: &dyn Multiplexer,
    window: &WindowSpec,
    index: usize,
    pane: &PaneSpec,
    pane_id: &str,
    window_dir: &Path,
    pane_start: &Path,
) -> Result<(), TmuxError> {
    let pane_dir: PathBuf = pane.resolved_dir(window_dir);
    if pane_dir != pane_start {
        let cd = format!("cd {}", shell_quote(&pane_dir.to_string_lossy()));
        mux.send_keys(pane_id, &cd).step(|| {
            format!("change directory in pane {} of window '{}'", index, window.name)
        })?;
    }

    if !pane.cmd.is_empty() {
        mux.send_keys(pane_id, &pane.cmd).step(|| {
            format!("send command to pane {} of window '{}'", index, window.name)
        })?;
    }
    Ok(())
}

fn first_window(mux: &dyn Multiplexer, session: &str) -> Result<WindowInfo, TmuxError> {
    let describe = || format!("discover first window of session '{}'", session);
    mux.list_windows(session)
        .step(describe)?
        .into_iter()
        .min_by_key(|w| w.index)
        .ok_or_else(|| TmuxError::Missing(format!("a window in session '{}'", session)))
        .step(describe)
}

fn first_pane(mux: &dyn Multiplexer, window_id: &str) -> Result<PaneInfo, TmuxError> {
    let describe = || format!("discover first pane of window {}", window_id);
    mux.list_panes(window_id)
        .step(describe)?
        .into_iter()
        .next()
        .ok_or_else(|| TmuxError::Missing(format!("a pane in window {}", window_id)))
        .step(describe)
}

/// Kill a running session.
pub fn teardown(mux: &dyn Multiplexer, session: &str) -> Result<(), TmuxError> {
    let exists = mux
        .session_exists(session)
        .step(|| format!("check whether session '{}' exists", session))?;
    if !exists {
        return Err(TmuxError::SessionNotFound(session.to_string()));
    }
    info!("Killing session '{}'", session);
    mux.kill_session(session)
        .step(|| format!("kill session '{}'", session))
}

/// Quote for POSIX shells: wrap in single quotes, escaping embedded ones.
fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".into()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}
