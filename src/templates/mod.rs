// ABOUTME: Named session templates: the built-in set plus user templates on disk
// User templates live as <name>.yaml (or .yml) files in one directory

pub mod builtin;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{self, ConfigError, SessionSpec};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("cannot modify built-in template: {0}")]
    BuiltinReadOnly(String),

    #[error("cannot determine the template directory (no home directory)")]
    NoTemplateDir,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("template directory error: {0}")]
    Io(#[from] std::io::Error),
}

const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// `$XDG_DATA_HOME/hive/templates`, falling back to `~/.local/share/hive/templates`.
pub fn default_dir() -> Option<PathBuf> {
    let data_home = match std::env::var_os("XDG_DATA_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()?.join(".local").join("share"),
    };
    Some(data_home.join("hive").join("templates"))
}

pub struct TemplateStore {
    dir: Option<PathBuf>,
}

impl TemplateStore {
    /// Store rooted at `dir`, or at [`default_dir`] when `None`.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir: dir.or_else(default_dir),
        }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn require_dir(&self) -> Result<&Path, TemplateError> {
        self.dir().ok_or(TemplateError::NoTemplateDir)
    }

    /// Built-in names followed by user template names, each group sorted.
    pub fn list(&self) -> Result<Vec<String>, TemplateError> {
        let mut names: Vec<String> = builtin::names().map(String::from).collect();

        let Some(dir) = self.dir() else {
            return Ok(names);
        };
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };

        let mut user = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_template = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext));
            if let (true, Some(stem)) = (is_template, path.file_stem().and_then(|s| s.to_str())) {
                user.push(stem.to_string());
            }
        }
        user.sort();
        user.dedup();
        debug!("Found {} user templates in {}", user.len(), dir.display());

        names.extend(user);
        Ok(names)
    }

    /// Built-ins take precedence over user templates with the same name.
    pub fn read(&self, name: &str) -> Result<SessionSpec, TemplateError> {
        if let Some(text) = builtin::get(name) {
            return Ok(models::parse_str(text)?);
        }
        match self.user_path(name) {
            Some(path) => Ok(models::parse_file(&path)?),
            None => Err(TemplateError::NotFound(name.to_string())),
        }
    }

    pub fn save(&self, name: &str, spec: &SessionSpec) -> Result<PathBuf, TemplateError> {
        if builtin::is_builtin(name) {
            return Err(TemplateError::BuiltinReadOnly(name.to_string()));
        }
        let dir = self.require_dir()?;
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.yaml", name));
        models::write_file(spec, &path)?;
        info!("Saved template '{}' to {}", name, path.display());
        Ok(path)
    }

    pub fn delete(&self, name: &str) -> Result<(), TemplateError> {
        if builtin::is_builtin(name) {
            return Err(TemplateError::BuiltinReadOnly(name.to_string()));
        }
        let path = self
            .user_path(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        fs::remove_file(&path)?;
        info!("Deleted template '{}' ({})", name, path.display());
        Ok(())
    }

    fn user_path(&self, name: &str) -> Option<PathBuf> {
        let dir = self.dir()?;
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())
    }
}
