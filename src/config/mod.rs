// ABOUTME: Application settings read from settings.toml in the hive config directory
// Every field is optional; a missing file means all defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::ConfigError;

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tmux: TmuxSettings,
    pub templates: TemplateSettings,
    /// Editor for `hive config` when `$EDITOR` is unset.
    pub editor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TmuxSettings {
    pub binary: String,
}

impl Default for TmuxSettings {
    fn default() -> Self {
        Self {
            binary: "tmux".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Overrides the user template directory.
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load settings from disk and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(
            |path| std::fs::read_to_string(path),
            |name| std::env::var(name).ok(),
            dirs::config_dir,
        )
    }

    pub(crate) fn load_with<FRead, FEnv, FRoot>(
        read_file: FRead,
        env_lookup: FEnv,
        config_root: FRoot,
    ) -> Result<Self, ConfigError>
    where
        FRead: Fn(&Path) -> Result<String, std::io::Error>,
        FEnv: Fn(&str) -> Option<String>,
        FRoot: Fn() -> Option<PathBuf>,
    {
        let mut config = match settings_path(&env_lookup, &config_root) {
            Some(path) => match read_file(&path) {
                Ok(text) => {
                    debug!("Loaded settings from {}", path.display());
                    toml::from_str(&text)?
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("No settings file at {}, using defaults", path.display());
                    AppConfig::default()
                }
                Err(source) => return Err(ConfigError::Read { path, source }),
            },
            None => AppConfig::default(),
        };

        if let Some(binary) = env_lookup("HIVE_TMUX").filter(|b| !b.is_empty()) {
            debug!("Using tmux binary {} from HIVE_TMUX", binary);
            config.tmux.binary = binary;
        }
        Ok(config)
    }

    /// Editor command for `hive config`: `$EDITOR`, then the setting, then `vi`.
    pub fn editor_command(&self, env_editor: Option<String>) -> String {
        env_editor
            .filter(|e| !e.trim().is_empty())
            .or_else(|| self.editor.clone())
            .unwrap_or_else(|| "vi".to_string())
    }
}

fn settings_path<FEnv, FRoot>(env_lookup: &FEnv, config_root: &FRoot) -> Option<PathBuf>
where
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let dir = match env_lookup("HIVE_CONFIG_DIR").filter(|d| !d.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => config_root()?.join("hive"),
    };
    Some(dir.join(SETTINGS_FILE))
}
