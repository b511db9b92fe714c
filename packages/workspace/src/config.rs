use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_NAME: &str = "apiforge.config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Workspace configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Undo levels kept before the oldest is dropped (0 = unlimited)
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,

    /// Back/forward entries kept by the selection store
    #[serde(default = "default_max_selection_history")]
    pub max_selection_history: usize,

    /// How long `load` waits for the host to deliver file content
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Re-run structural validation after every edit
    #[serde(default = "default_validate_on_change")]
    pub validate_on_change: bool,
}

fn default_max_history_size() -> usize {
    apiforge_editor::DEFAULT_MAX_HISTORY
}

fn default_max_selection_history() -> usize {
    crate::DEFAULT_MAX_SELECTION_HISTORY
}

fn default_read_timeout_ms() -> u64 {
    10_000
}

fn default_validate_on_change() -> bool {
    true
}

impl WorkspaceConfig {
    /// Load config from a directory, falling back to defaults when the file
    /// does not exist.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: WorkspaceConfig = serde_json::from_str(&content)?;
            tracing::debug!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            Ok(WorkspaceConfig::default())
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            max_history_size: default_max_history_size(),
            max_selection_history: default_max_selection_history(),
            read_timeout_ms: default_read_timeout_ms(),
            validate_on_change: default_validate_on_change(),
        }
    }
}
