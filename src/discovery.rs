// ABOUTME: Locates the session config file for commands that need one
// An explicit path wins; otherwise the working directory is searched by name

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::ConfigError;

/// File names searched in the working directory, in priority order.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".hive.yaml", "hive.yaml"];

/// Find the config file and return it as an absolute path.
///
/// A relative `explicit` path is taken relative to `cwd`.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        let path = absolute(path, cwd);
        if !path.exists() {
            return Err(ConfigError::NotFound(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        debug!("Using config file {}", path.display());
        return Ok(path);
    }

    for name in CONFIG_FILE_NAMES {
        let candidate = cwd.join(name);
        if candidate.is_file() {
            debug!("Discovered config file {}", candidate.display());
            return Ok(absolute(&candidate, cwd));
        }
    }

    Err(ConfigError::NotFound(format!(
        "no hive config file found ({} or {}) in {}",
        CONFIG_FILE_NAMES[0],
        CONFIG_FILE_NAMES[1],
        cwd.display()
    )))
}

fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
