//! Account configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoreError;
use crate::Result;

pub const CONFIG_FILE_NAME: &str = "config.json";
const DATA_DIR_ENV: &str = "ACCOUNT_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the credential database
    pub database_path: PathBuf,
    /// Simulated round trip of the mock login API
    pub mock_latency_ms: u64,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

/// Fields a `config.json` may override
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    mock_latency_ms: Option<u64>,
    log_filter: Option<String>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("account.db"),
            mock_latency_ms: 1000,
            log_filter: "info".to_string(),
        }
    }

    /// Defaults for `data_dir`, overlaid with its `config.json` if present
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config = Self::new(data_dir.to_path_buf());
        let path = data_dir.join(CONFIG_FILE_NAME);

        if !path.exists() {
            return Ok(config);
        }

        let raw = std::fs::read_to_string(&path)?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;

        if let Some(database_path) = file.database_path {
            // Relative paths are resolved against the data directory
            config.database_path = if database_path.is_absolute() {
                database_path
            } else {
                data_dir.join(database_path)
            };
        }
        if let Some(latency) = file.mock_latency_ms {
            config.mock_latency_ms = latency;
        }
        if let Some(filter) = file.log_filter {
            config.log_filter = filter;
        }

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }

    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }

        dirs::data_local_dir()
            .map(|d| d.join("account"))
            .unwrap_or_else(|| PathBuf::from(".account"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Platform data directory lookup
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
