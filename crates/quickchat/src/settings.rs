//! Application settings.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use quickchat_core::User;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the message archive location.
pub const STORE_ENV: &str = "QUICKCHAT_STORE";

/// Application settings read from `settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Message archive location. Defaults to the user data directory.
    pub store_path: Option<PathBuf>,
    /// Show a desktop notification on start.
    pub welcome_notification: bool,
    /// Pre-registered user; registration prompts are skipped when set.
    pub user: Option<User>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            store_path: None,
            welcome_notification: true,
            user: None,
        }
    }
}

impl AppSettings {
    /// Archive location: `QUICKCHAT_STORE`, then `store_path`, then the
    /// default under the data directory.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.resolve_store_path(std::env::var_os(STORE_ENV))
    }

    fn resolve_store_path(&self, env: Option<OsString>) -> PathBuf {
        env.filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.store_path.clone())
            .unwrap_or_else(default_store_path)
    }
}

/// Directory holding `settings.json`.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quickchat")
}

/// Default message archive location.
#[must_use]
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quickchat")
        .join("messages.json")
}

/// Load application settings from the config directory.
///
/// # Errors
///
/// Returns an error if the settings file exists but cannot be read or parsed.
pub fn load_settings() -> anyhow::Result<AppSettings> {
    load_settings_from(&config_dir().join("settings.json"))
}

/// Load application settings from `path`, using defaults if it is missing.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings_from(path: &Path) -> anyhow::Result<AppSettings> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("parsing settings from {}", path.display()))
}
