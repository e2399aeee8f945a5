use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::interpret::{GaugeScale, DEFAULT_GAUGE_CEILING};

pub const CONFIG_FILE_NAME: &str = "rul_client.toml";
const CONFIG_DIR_NAME: &str = "rul_client";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub gauge_ceiling: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".into(),
            request_timeout_secs: 30,
            gauge_ceiling: DEFAULT_GAUGE_CEILING,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("server_url '{0}' must be an http:// or https:// url")]
    InvalidServerUrl(String),
    #[error("request_timeout_secs must be greater than zero")]
    InvalidTimeout,
    #[error("gauge_ceiling must be a positive number, got {0}")]
    InvalidGaugeCeiling(f64),
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    gauge_ceiling: Option<f64>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn gauge_scale(&self) -> GaugeScale {
        GaugeScale::new(self.gauge_ceiling).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server_url(&self.server_url)?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if GaugeScale::new(self.gauge_ceiling).is_none() {
            return Err(ConfigError::InvalidGaugeCeiling(self.gauge_ceiling));
        }
        Ok(())
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file_cfg: FileSettings = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(v) = file_cfg.server_url {
            self.server_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.gauge_ceiling {
            self.gauge_ceiling = v;
        }
        debug!(path = %path.display(), "applied config file");
        Ok(())
    }

    /// Applies overrides from `lookup`, normally `std::env::var`. Later keys
    /// in each group win; unparsable numbers are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ["RUL_SERVER_URL", "APP__SERVER_URL"] {
            if let Some(v) = lookup(key).filter(|v| !v.trim().is_empty()) {
                self.server_url = v.trim().to_string();
            }
        }

        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(_) => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(v) = lookup("APP__GAUGE_CEILING") {
            match v.trim().parse::<f64>() {
                Ok(parsed) => self.gauge_ceiling = parsed,
                Err(_) => warn!(value = %v, "ignoring invalid APP__GAUGE_CEILING"),
            }
        }
    }
}

/// Defaults, then the first config file found, then environment overrides.
/// A broken config file is logged and skipped.
pub fn load_settings(explicit_path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    if let Some(path) = resolve_config_path(explicit_path) {
        if let Err(err) = settings.apply_file(&path) {
            warn!("{err}");
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
        .filter(|path| path.is_file())
}

pub(crate) fn validate_server_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidServerUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::InvalidServerUrl(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
