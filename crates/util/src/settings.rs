//! Settings resolution for the Qissa front ends.
//!
//! Settings live in a small JSON file in the standard configuration directory
//! (`~/.config/qissa/settings.json` on most platforms). `QISSA_SETTINGS_PATH` points at a
//! different file and `QISSA_CATALOG_PATH` overrides only the catalog location. Command line
//! flags take precedence over both.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable allowing callers to override the settings file path.
pub const SETTINGS_PATH_ENV: &str = "QISSA_SETTINGS_PATH";

/// Environment variable allowing callers to override the catalog document path.
pub const CATALOG_PATH_ENV: &str = "QISSA_CATALOG_PATH";

/// Default filename for the JSON payload.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Catalog document used when nothing else is configured.
pub const DEFAULT_CATALOG_FILE: &str = "catalog.yaml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted settings values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WizardSettings {
    /// Catalog document (YAML or JSON) with products and shipping prices.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Currency code shown next to prices.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Account holder name used when the buyer personalizes for themselves.
    #[serde(default)]
    pub account_name: Option<String>,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            currency: default_currency(),
            account_name: None,
        }
    }
}

fn default_currency() -> String {
    "EGP".to_string()
}

impl WizardSettings {
    /// Load settings from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&default_settings_path())
    }

    /// Load settings from an explicit path. Unparseable content is logged and ignored.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(settings) => Ok(settings),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse settings file; using defaults"
                    );
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(SettingsError::Io(error)),
        }
    }

    /// Picks the catalog path: explicit flag, then environment, then settings, then the default.
    pub fn resolve_catalog_path(&self, flag_override: Option<&Path>) -> PathBuf {
        if let Some(path) = flag_override {
            return path.to_path_buf();
        }
        if let Ok(path) = env::var(CATALOG_PATH_ENV)
            && !path.trim().is_empty()
        {
            return expand_tilde(&path);
        }
        match &self.catalog_path {
            Some(path) => expand_tilde(&path.to_string_lossy()),
            None => PathBuf::from(DEFAULT_CATALOG_FILE),
        }
    }
}

/// Get the default path for the settings file.
pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = env::var(SETTINGS_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("qissa")
        .join(SETTINGS_FILE_NAME)
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}
