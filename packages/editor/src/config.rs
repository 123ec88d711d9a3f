use crate::errors::EditorResult;
use crate::undo_stack::DEFAULT_MAX_HISTORY;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo snapshots kept before the oldest is evicted
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,

    /// Quiet period before autosave writes the latest project
    #[serde(default = "default_autosave_debounce_ms")]
    pub autosave_debounce_ms: u64,

    /// Name of the first page of a new project
    #[serde(default = "default_page_name")]
    pub default_page_name: String,
}

fn default_max_history_size() -> usize {
    DEFAULT_MAX_HISTORY
}

fn default_autosave_debounce_ms() -> u64 {
    1000
}

fn default_page_name() -> String {
    "Home".to_string()
}

impl EditorConfig {
    /// Load config from a directory
    pub fn load(cwd: impl AsRef<Path>) -> EditorResult<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_size: default_max_history_size(),
            autosave_debounce_ms: default_autosave_debounce_ms(),
            default_page_name: default_page_name(),
        }
    }
}
