use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "weather_cli=info,weather_core=info";

/// Environment variable overriding the configured backend URL.
pub const BASE_URL_ENV: &str = "WEATHER_API_URL";

/// Settings stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "http://localhost:8000"
/// log_filter = "weather_core=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend the client talks to. Fixed for the whole session.
    pub base_url: String,

    /// `tracing` filter used when neither `--log` nor `RUST_LOG` is set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Resolve the effective configuration. Precedence, lowest first: built-in
    /// defaults, the config file, `WEATHER_API_URL`, `--base-url`.
    ///
    /// An explicitly given file must exist; the default file may be absent.
    pub fn resolve(
        explicit_path: Option<&Path>,
        env_url: Option<String>,
        flag_url: Option<String>,
    ) -> Result<Self> {
        let mut cfg = match explicit_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load_default()?,
        };

        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            cfg.base_url = url;
        }
        if let Some(url) = flag_url {
            cfg.base_url = url;
        }
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the platform config file, or defaults if it doesn't exist yet.
    pub fn load_default() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-records", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
