//! Editor configuration
//!
//! Stored as JSON in ~/.config/lineweave/config.json. Every field is
//! optional; missing fields take their defaults.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Overrides the config file location
pub const CONFIG_ENV: &str = "LINEWEAVE_CONFIG";
/// Milliseconds to wait after ESC for the rest of an Alt sequence
pub const ESCAPE_TIME_ENV: &str = "LINEWEAVE_ESCAPE_TIME";
const DEFAULT_ESCAPE_TIME_MS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Prompt on the first line
    pub prompt: String,
    /// Prompt on continuation lines
    pub next_prompt: String,
    /// Shown while the input is empty
    pub placeholder: String,
    pub search_prompt: String,
    pub search_prompt_not_found: String,
    pub search_placeholder: String,
    /// 0 for unlimited
    pub max_history_size: usize,
    pub dedup_history: bool,
    /// EndOfInput away from column 0 deletes the char under the cursor
    pub delete_char_if_not_eof: bool,
    /// 0 for unlimited
    pub char_limit: usize,
    /// Maximum editor height in rows, 0 for the screen height
    pub max_height: usize,
    pub history_file: Option<PathBuf>,
    /// Save history after every added entry
    pub auto_save_history: bool,
    /// Action name to key list, replacing the default keys of that action
    pub keys: HashMap<String, Vec<String>>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            next_prompt: String::new(),
            placeholder: String::new(),
            search_prompt: "bck:".to_string(),
            search_prompt_not_found: "bck?".to_string(),
            search_placeholder: "enter search term, or ^G to cancel search".to_string(),
            max_history_size: 0,
            dedup_history: true,
            delete_char_if_not_eof: true,
            char_limit: 0,
            max_height: 0,
            history_file: None,
            auto_save_history: false,
            keys: HashMap::new(),
        }
    }
}

impl EditorConfig {
    /// Config file location, honoring the override variable
    pub fn path() -> PathBuf {
        if let Some(p) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(p);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lineweave")
            .join("config.json")
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from a file; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Escape timeout from the environment
    pub fn escape_time() -> Duration {
        let ms = std::env::var(ESCAPE_TIME_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_ESCAPE_TIME_MS);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "prompt": "sql> ", "max_history_size": 100, "keys": { "start_search": ["ctrl+s"] } }"#,
        )
        .unwrap();
        let cfg = EditorConfig::load_from(&path).unwrap();
        assert_eq!(cfg.prompt, "sql> ");
        assert_eq!(cfg.max_history_size, 100);
        assert_eq!(cfg.search_prompt, "bck:");
        assert!(cfg.dedup_history);
        assert_eq!(cfg.keys["start_search"], vec!["ctrl+s".to_string()]);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = EditorConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg, EditorConfig::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = EditorConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");
        let cfg = EditorConfig {
            next_prompt: ".. ".to_string(),
            history_file: Some(PathBuf::from("/tmp/h")),
            ..Default::default()
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(EditorConfig::load_from(&path).unwrap(), cfg);
    }
}
