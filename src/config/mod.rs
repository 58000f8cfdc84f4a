//! Configuration management for Wardgate

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{CachePolicy, CacheTtl};
use crate::error::{ConfigError, Result};
use crate::session::Session;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL that relative fetch paths are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Session snapshot location (defaults to ~/.wardgate/session.json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_path: Option<PathBuf>,

    /// Request cache windows
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Request cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: u64,

    #[serde(default = "default_freshness_secs")]
    pub freshness_secs: u64,

    /// `null` disables the timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: Option<u64>,
}

fn default_dedup_window_ms() -> u64 {
    CacheTtl::DEDUP_WINDOW.as_millis() as u64
}

fn default_freshness_secs() -> u64 {
    CacheTtl::FRESHNESS_WINDOW.as_secs()
}

fn default_request_timeout_secs() -> Option<u64> {
    Some(CacheTtl::REQUEST_TIMEOUT.as_secs())
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dedup_window_ms: default_dedup_window_ms(),
            freshness_secs: default_freshness_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CacheSettings {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            dedup_window: Duration::from_millis(self.dedup_window_ms),
            freshness_window: Duration::from_secs(self.freshness_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".wardgate").join("config.yaml"))
    }

    /// Resolve an optional override against the default path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        match Self::load_from(&path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Reject settings the cache cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.cache.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "cache.request_timeout_secs must be positive (use null to disable)".to_string(),
            )
            .into());
        }
        if let Some(ref base) = self.api_base_url
            && !(base.starts_with("http://") || base.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                base
            ))
            .into());
        }
        Ok(())
    }

    /// Session path from config, or the default location
    pub fn session_path(&self) -> Result<PathBuf> {
        match self.session_path {
            Some(ref path) => Ok(path.clone()),
            None => Session::default_path(),
        }
    }

    /// Turn a fetch target into an absolute URL.
    ///
    /// Absolute URLs pass through; relative paths need `api_base_url`.
    pub fn resolve_url(&self, target: &str) -> Result<String> {
        if target.starts_with("http://") || target.starts_with("https://") {
            return Ok(target.to_string());
        }

        let base = self
            .api_base_url
            .as_deref()
            .ok_or(ConfigError::MissingApiBaseUrl)?;

        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            target.trim_start_matches('/')
        ))
    }
}
