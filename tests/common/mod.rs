// ABOUTME: In-memory tmux stand-in shared by the integration tests
// Models sessions, windows, and panes with tmux-style ids and records every call
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hive::app::ForegroundRunner;
use hive::models::{Layout, Split};
use hive::tmux::{Multiplexer, PaneInfo, TmuxError, WindowInfo};

#[derive(Debug, Clone)]
pub struct FakePane {
    pub id: String,
    pub start_dir: PathBuf,
    pub current_path: String,
    pub current_command: String,
    /// Orientation of the split that created the pane; `None` for a window's first pane.
    pub split: Option<Split>,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub id: String,
    pub index: u32,
    pub name: String,
    pub layout: Option<Layout>,
    pub panes: Vec<FakePane>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    pub dir: PathBuf,
    pub options: BTreeMap<String, String>,
    pub env: BTreeMap<String, String>,
    pub windows: Vec<FakeWindow>,
    pub active_window: Option<String>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub sessions: BTreeMap<String, FakeSession>,
    /// Every call in order, rendered like a tmux command line.
    pub calls: Vec<String>,
    /// Index tmux gives the first window (the user's `base-index`).
    pub base_index: u32,
    /// Session the caller is attached to, for `current_session`.
    pub attached: Option<String>,
    /// Fail the first call whose rendering starts with this text.
    pub fail_on: Option<String>,
    next_window: u32,
    next_pane: u32,
}

/// Cloning shares state, so a test keeps one handle while the app owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeMux {
    state: Rc<RefCell<FakeState>>,
}

impl FakeMux {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_index(base_index: u32) -> Self {
        let mux = Self::new();
        mux.state.borrow_mut().base_index = base_index;
        mux
    }

    pub fn state(&self) -> std::cell::Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> std::cell::RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    pub fn session(&self, name: &str) -> FakeSession {
        self.state().sessions[name].clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Calls that change tmux state, i.e. everything but queries.
    pub fn mutations(&self) -> Vec<String> {
        const QUERIES: [&str; 6] = [
            "has-session",
            "list-windows",
            "list-panes",
            "show-options",
            "show-environment",
            "display-message",
        ];
        self.calls()
            .into_iter()
            .filter(|c| !QUERIES.iter().any(|q| c.starts_with(q)))
            .collect()
    }

    /// Seed a running session with windows of `(name, [(path, command)])`.
    pub fn seed_session(&self, name: &str, windows: Vec<(&str, Vec<(&str, &str)>)>) {
        let mut state = self.state.borrow_mut();
        let base_index = state.base_index;
        let mut session = FakeSession {
            dir: PathBuf::from("/"),
            ..FakeSession::default()
        };
        for (i, (window_name, panes)) in windows.iter().enumerate() {
            let window_id = state.window_id();
            let panes = panes
                .iter()
                .enumerate()
                .map(|(j, (path, command))| FakePane {
                    id: state.pane_id(),
                    start_dir: PathBuf::from(path),
                    current_path: path.to_string(),
                    current_command: command.to_string(),
                    split: (j > 0).then_some(Split::Horizontal),
                    keys: Vec::new(),
                })
                .collect();
            session.windows.push(FakeWindow {
                id: window_id,
                index: base_index + i as u32,
                name: window_name.to_string(),
                layout: None,
                panes,
            });
        }
        state.sessions.insert(name.to_string(), session);
    }

    fn record(&self, call: String) -> Result<(), TmuxError> {
        let mut state = self.state.borrow_mut();
        let fail = matches!(&state.fail_on, Some(prefix) if call.starts_with(prefix.as_str()));
        state.calls.push(call.clone());
        if fail {
            state.fail_on = None;
            return Err(TmuxError::CommandFailed {
                command: call,
                stderr: "injected failure".into(),
            });
        }
        Ok(())
    }
}

impl FakeState {
    fn window_id(&mut self) -> String {
        let id = format!("@{}", self.next_window);
        self.next_window += 1;
        id
    }

    fn pane_id(&mut self) -> String {
        let id = format!("%{}", self.next_pane);
        self.next_pane += 1;
        id
    }

    fn session_mut(&mut self, name: &str) -> Result<&mut FakeSession, TmuxError> {
        self.sessions.get_mut(name).ok_or_else(|| TmuxError::CommandFailed {
            command: format!("-t ={}", name),
            stderr: format!("can't find session: {}", name),
        })
    }

    fn window_mut(&mut self, window_id: &str) -> Result<&mut FakeWindow, TmuxError> {
        self.sessions
            .values_mut()
            .flat_map(|s| s.windows.iter_mut())
            .find(|w| w.id == window_id)
            .ok_or_else(|| TmuxError::CommandFailed {
                command: format!("-t {}", window_id),
                stderr: format!("can't find window: {}", window_id),
            })
    }

    fn new_pane(&mut self, dir: &Path, split: Option<Split>) -> FakePane {
        FakePane {
            id: self.pane_id(),
            start_dir: dir.to_path_buf(),
            current_path: dir.to_string_lossy().into_owned(),
            current_command: "bash".into(),
            split,
            keys: Vec::new(),
        }
    }
}

impl Multiplexer for FakeMux {
    fn session_exists(&self, session: &str) -> Result<bool, TmuxError> {
        self.record(format!("has-session {}", session))?;
        Ok(self.state().sessions.contains_key(session))
    }

    fn create_session(&self, session: &str, dir: &Path) -> Result<(), TmuxError> {
        self.record(format!("new-session {} {}", session, dir.display()))?;
        let mut state = self.state.borrow_mut();
        if state.sessions.contains_key(session) {
            return Err(TmuxError::CommandFailed {
                command: "new-session".into(),
                stderr: format!("duplicate session: {}", session),
            });
        }
        let window = FakeWindow {
            id: state.window_id(),
            index: state.base_index,
            name: "bash".into(),
            layout: None,
            panes: vec![state.new_pane(dir, None)],
        };
        state.sessions.insert(
            session.to_string(),
            FakeSession {
                dir: dir.to_path_buf(),
                windows: vec![window],
                ..FakeSession::default()
            },
        );
        Ok(())
    }

    fn set_option(&self, session: &str, key: &str, value: &str) -> Result<(), TmuxError> {
        self.record(format!("set-option {} {} {}", session, key, value))?;
        let mut state = self.state.borrow_mut();
        state
            .session_mut(session)?
            .options
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_environment(&self, session: &str, key: &str, value: &str) -> Result<(), TmuxError> {
        self.record(format!("set-environment {} {} {}", session, key, value))?;
        let mut state = self.state.borrow_mut();
        state
            .session_mut(session)?
            .env
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn show_option(&self, session: &str, key: &str) -> Result<Option<String>, TmuxError> {
        self.record(format!("show-options {} {}", session, key))?;
        let mut state = self.state.borrow_mut();
        Ok(state.session_mut(session)?.options.get(key).cloned())
    }

    fn show_environment(&self, session: &str) -> Result<BTreeMap<String, String>, TmuxError> {
        self.record(format!("show-environment {}", session))?;
        let mut state = self.state.borrow_mut();
        Ok(state.session_mut(session)?.env.clone())
    }

    fn new_window(&self, session: &str, name: &str, dir: &Path) -> Result<String, TmuxError> {
        self.record(format!("new-window {} {} {}", session, name, dir.display()))?;
        let mut state = self.state.borrow_mut();
        let id = state.window_id();
        let pane = state.new_pane(dir, None);
        let base_index = state.base_index;
        let session = state.session_mut(session)?;
        let index = session
            .windows
            .iter()
            .map(|w| w.index + 1)
            .max()
            .unwrap_or(base_index);
        session.windows.push(FakeWindow {
            id: id.clone(),
            index,
            name: name.to_string(),
            layout: None,
            panes: vec![pane],
        });
        Ok(id)
    }

    fn rename_window(&self, window_id: &str, name: &str) -> Result<(), TmuxError> {
        self.record(format!("rename-window {} {}", window_id, name))?;
        self.state.borrow_mut().window_mut(window_id)?.name = name.to_string();
        Ok(())
    }

    fn select_window(&self, window_id: &str) -> Result<(), TmuxError> {
        self.record(format!("select-window {}", window_id))?;
        let mut state = self.state.borrow_mut();
        let session = state
            .sessions
            .values_mut()
            .find(|s| s.windows.iter().any(|w| w.id == window_id))
            .ok_or_else(|| TmuxError::CommandFailed {
                command: "select-window".into(),
                stderr: format!("can't find window: {}", window_id),
            })?;
        session.active_window = Some(window_id.to_string());
        Ok(())
    }

    fn list_windows(&self, session: &str) -> Result<Vec<WindowInfo>, TmuxError> {
        self.record(format!("list-windows {}", session))?;
        let mut state = self.state.borrow_mut();
        let mut windows: Vec<WindowInfo> = state
            .session_mut(session)?
            .windows
            .iter()
            .map(|w| WindowInfo {
                id: w.id.clone(),
                index: w.index,
                name: w.name.clone(),
                layout: "c5e0,204x50,0,0,1".into(),
            })
            .collect();
        windows.sort_by_key(|w| w.index);
        Ok(windows)
    }

    fn split_window(&self, window_id: &str, split: Split, dir: &Path) -> Result<String, TmuxError> {
        self.record(format!(
            "split-window {} {} {}",
            window_id,
            split.tmux_flag(),
            dir.display()
        ))?;
        let mut state = self.state.borrow_mut();
        let pane = state.new_pane(dir, Some(split));
        let id = pane.id.clone();
        state.window_mut(window_id)?.panes.push(pane);
        Ok(id)
    }

    fn send_keys(&self, pane_id: &str, text: &str) -> Result<(), TmuxError> {
        self.record(format!("send-keys {} {}", pane_id, text))?;
        let mut state = self.state.borrow_mut();
        let pane = state
            .sessions
            .values_mut()
            .flat_map(|s| s.windows.iter_mut())
            .flat_map(|w| w.panes.iter_mut())
            .find(|p| p.id == pane_id)
            .ok_or_else(|| TmuxError::CommandFailed {
                command: "send-keys".into(),
                stderr: format!("can't find pane: {}", pane_id),
            })?;
        pane.keys.push(text.to_string());
        Ok(())
    }

    fn list_panes(&self, window_id: &str) -> Result<Vec<PaneInfo>, TmuxError> {
        self.record(format!("list-panes {}", window_id))?;
        let mut state = self.state.borrow_mut();
        Ok(state
            .window_mut(window_id)?
            .panes
            .iter()
            .map(|p| PaneInfo {
                id: p.id.clone(),
                current_path: p.current_path.clone(),
                current_command: p.current_command.clone(),
            })
            .collect())
    }

    fn select_layout(&self, window_id: &str, layout: Layout) -> Result<(), TmuxError> {
        self.record(format!("select-layout {} {}", window_id, layout))?;
        self.state.borrow_mut().window_mut(window_id)?.layout = Some(layout);
        Ok(())
    }

    fn kill_session(&self, session: &str) -> Result<(), TmuxError> {
        self.record(format!("kill-session {}", session))?;
        let mut state = self.state.borrow_mut();
        state.session_mut(session)?;
        state.sessions.remove(session);
        Ok(())
    }

    fn current_session(&self) -> Result<String, TmuxError> {
        self.record("display-message session_name".to_string())?;
        self.state().attached.clone().ok_or(TmuxError::NotAttached)
    }
}

/// Records foreground program runs instead of executing them.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    pub runs: Rc<RefCell<Vec<(String, Vec<String>)>>>,
    pub fail: bool,
}

impl FakeRunner {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn runs(&self) -> Vec<(String, Vec<String>)> {
        self.runs.borrow().clone()
    }
}

impl ForegroundRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<()> {
        self.runs
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));
        if self.fail {
            anyhow::bail!("{} exited with status 1", program);
        }
        Ok(())
    }
}
