use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{endpoints, paths};
use crate::error::{Result, VaranexError};
use crate::theme::ThemeName;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: endpoints::DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Where conversations and the theme are kept. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Keep everything in memory; nothing is written to disk.
    #[serde(default)]
    pub ephemeral: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UiSettings {
    /// Used only when no theme has been saved yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeName>,
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    /// Load from the default location, falling back to defaults, then apply
    /// `VARANEX_API_URL`.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path()).with_env_overrides()
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Ignoring invalid config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VaranexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_api_url_override(std::env::var(endpoints::API_URL_ENV).ok())
    }

    fn with_api_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        self
    }
}
