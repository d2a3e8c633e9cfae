use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::view::ViewMode;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_csv_path")]
    pub data_csv_path: String,
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub default_view: ViewMode,
    #[serde(default)]
    pub expand_all: bool,
    #[serde(default = "default_leader_timeout_ms")]
    pub leader_timeout_ms: u64,
    #[serde(default = "default_delete_timeout_ms")]
    pub delete_timeout_ms: u64,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join("tcal")
}

fn default_data_csv_path() -> String {
    app_dir(dirs::data_dir())
        .join("events.csv")
        .to_string_lossy()
        .to_string()
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_leader_timeout_ms() -> u64 {
    1000
}
fn default_delete_timeout_ms() -> u64 {
    600
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_log_file() -> String {
    app_dir(dirs::state_dir().or_else(dirs::cache_dir))
        .join("tcal.log")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_csv_path: default_data_csv_path(),
            editor: None,
            theme: default_theme(),
            default_view: ViewMode::default(),
            expand_all: false,
            leader_timeout_ms: default_leader_timeout_ms(),
            delete_timeout_ms: default_delete_timeout_ms(),
            tick_rate_ms: default_tick_rate_ms(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_dir() -> PathBuf {
        app_dir(dirs::config_dir())
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Clamp timing values into usable ranges. Call after deserialization.
    pub fn validate(&mut self) {
        self.leader_timeout_ms = self.leader_timeout_ms.clamp(200, 5000);
        self.delete_timeout_ms = self.delete_timeout_ms.clamp(100, 3000);
        self.tick_rate_ms = self.tick_rate_ms.clamp(10, 1000);
        if self.data_csv_path.trim().is_empty() {
            self.data_csv_path = default_data_csv_path();
        }
        if self.editor.as_deref().is_some_and(|e| e.trim().is_empty()) {
            self.editor = None;
        }
    }

    pub fn leader_timeout(&self) -> Duration {
        Duration::from_millis(self.leader_timeout_ms)
    }

    pub fn delete_timeout(&self) -> Duration {
        Duration::from_millis(self.delete_timeout_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}
