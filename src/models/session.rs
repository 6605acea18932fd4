// ABOUTME: Declarative session tree (session -> windows -> panes) parsed from and written to YAML
// Holds directory resolution rules and the tagged scalar used for manager options

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::layout::{Layout, Split};

/// Root of the declarative tree: one tmux session and everything inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSpec {
    #[serde(default)]
    pub session: SessionMeta,
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dir: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub layout: String,
    #[serde(default)]
    pub panes: Vec<PaneSpec>,
}

/// A single pane. On input it may also be written as a bare command string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PaneRepr")]
pub struct PaneSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cmd: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub split: String,
}

// Untagged tries variants in order: the string shorthand wins when it fits.
#[derive(Deserialize)]
#[serde(untagged)]
enum PaneRepr {
    Shorthand(String),
    Empty,
    Full {
        #[serde(default)]
        cmd: String,
        #[serde(default)]
        dir: String,
        #[serde(default)]
        split: String,
    },
}

impl From<PaneRepr> for PaneSpec {
    fn from(repr: PaneRepr) -> Self {
        match repr {
            PaneRepr::Shorthand(cmd) => PaneSpec {
                cmd,
                ..PaneSpec::default()
            },
            PaneRepr::Empty => PaneSpec::default(),
            PaneRepr::Full { cmd, dir, split } => PaneSpec { cmd, dir, split },
        }
    }
}

/// Scalar value of a session option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl OptionValue {
    /// Interpret option text reported by tmux.
    pub fn from_manager_text(text: &str) -> Self {
        match text.parse::<i64>() {
            Ok(n) => OptionValue::Int(n),
            Err(_) => OptionValue::Str(text.to_string()),
        }
    }
}

/// Renders the value the way tmux expects it on the command line.
impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(true) => write!(f, "on"),
            OptionValue::Bool(false) => write!(f, "off"),
            OptionValue::Int(n) => write!(f, "{}", n),
            OptionValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl SessionSpec {
    pub fn name(&self) -> &str {
        &self.session.name
    }

    /// Session root directory, resolved against the process working directory.
    pub fn base_path(&self, cwd: &Path) -> PathBuf {
        resolve_dir(cwd, &self.session.base_dir)
    }
}

impl WindowSpec {
    /// Window directory, resolved against the session root.
    pub fn resolved_dir(&self, session_dir: &Path) -> PathBuf {
        resolve_dir(session_dir, &self.dir)
    }

    /// Parsed layout; `None` when unset or not a known layout.
    pub fn layout(&self) -> Option<Layout> {
        self.layout.parse().ok()
    }
}

impl PaneSpec {
    pub fn command(cmd: impl Into<String>) -> Self {
        PaneSpec {
            cmd: cmd.into(),
            ..PaneSpec::default()
        }
    }

    /// Pane directory, resolved against the owning window's directory.
    pub fn resolved_dir(&self, window_dir: &Path) -> PathBuf {
        resolve_dir(window_dir, &self.dir)
    }

    /// Split orientation used when creating this pane. Defaults to vertical.
    pub fn split(&self) -> Split {
        self.split.parse().unwrap_or_default()
    }
}

/// Resolve `dir` against `base`: empty inherits, absolute overrides, relative joins.
pub fn resolve_dir(base: &Path, dir: &str) -> PathBuf {
    if dir.is_empty() {
        return normalize(base);
    }
    let path = Path::new(dir);
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

// Lexical only; symlinks and `..` are left for the shell to interpret.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        if component != Component::CurDir {
            out.push(component.as_os_str());
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
