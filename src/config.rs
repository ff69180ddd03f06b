//! Settings stored at `<config dir>/ectopo/config.json`.
//!
//! Resolution chain (highest priority first):
//! 1. CLI flag
//! 2. Environment variable (`EC_ENDPOINT`, `EC_API_KEY`, `EC_REGION`)
//! 3. Settings file
//! 4. Built-in default
//!
//! Flags and environment are folded together by clap before they get here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_ENDPOINT;
use crate::error::Error;

const CONFIG_DIR_NAME: &str = "ectopo";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Settings {
    /// Fills every field left unset here from `fallback`.
    pub fn or(self, fallback: Settings) -> Settings {
        Settings {
            endpoint: self.endpoint.or(fallback.endpoint),
            api_key: self.api_key.or(fallback.api_key),
            region: self.region.or(fallback.region),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .finish()
    }
}

/// `None` when the platform has no config directory.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads the settings file, returning defaults if it is missing.
pub fn load() -> Result<Settings, Error> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(Settings::default()),
    }
}

pub fn load_from(path: &Path) -> Result<Settings, Error> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file");
        return Ok(Settings::default());
    }

    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}
