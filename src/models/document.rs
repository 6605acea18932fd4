// ABOUTME: Reading and writing session configs as YAML documents
// Structured pane form is what gets written; the string shorthand is input-only

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::session::SessionSpec;
use super::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error("failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Invalid(errors)
    }
}

pub fn parse_str(text: &str) -> Result<SessionSpec, ConfigError> {
    Ok(serde_yaml::from_str(text)?)
}

pub fn parse_file(path: &Path) -> Result<SessionSpec, ConfigError> {
    debug!("Reading session config from {}", path.display());
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&text)
}

pub fn to_yaml(spec: &SessionSpec) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(spec)?)
}

pub fn write_file(spec: &SessionSpec, path: &Path) -> Result<(), ConfigError> {
    let text = to_yaml(spec)?;
    fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote session config to {}", path.display());
    Ok(())
}
