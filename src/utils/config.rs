use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default API server the suite points at
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Path prefix every endpoint is rooted at
pub const DEFAULT_API_PREFIX: &str = "api";

/// Per-request timeout (ms)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Success rate a run must exceed to exit with status 0
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid {name} '{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Scheme, host and port of the API server
    pub base_url: String,

    /// Path segment between the base URL and each endpoint
    pub api_prefix: String,

    /// Timeout applied to every request (ms)
    pub timeout_ms: u64,

    /// Exit status is 0 only when the success rate is strictly above this
    pub pass_threshold: f64,

    /// Directory for JSON and JUnit reports. No reports are written when unset.
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            output_dir: None,
        }
    }
}

/// Partial config as it appears in a YAML file; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    api_prefix: Option<String>,
    timeout_ms: Option<u64>,
    pass_threshold: Option<f64>,
    output_dir: Option<PathBuf>,
}

impl Config {
    /// Load a YAML config file on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not to a map
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(content)?
        };

        let mut config = Self::default();
        if let Some(base_url) = file.base_url {
            config.base_url = base_url;
        }
        if let Some(api_prefix) = file.api_prefix {
            config.api_prefix = api_prefix;
        }
        if let Some(timeout_ms) = file.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(pass_threshold) = file.pass_threshold {
            config.pass_threshold = pass_threshold;
        }
        if file.output_dir.is_some() {
            config.output_dir = file.output_dir;
        }
        Ok(config)
    }

    /// Apply `BLOG_API_URL` and `BLOG_API_TIMEOUT_MS` from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::with_env_overrides`] with an injectable variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BLOG_API_URL").filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup("BLOG_API_TIMEOUT_MS") {
            self.timeout_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "BLOG_API_TIMEOUT_MS",
                value: raw.clone(),
                reason: "expected a whole number of milliseconds",
            })?;
        }
        Ok(self)
    }

    /// Check the values before any request is made
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout",
                value: self.timeout_ms.to_string(),
                reason: "must be greater than zero",
            });
        }
        if !(0.0..=1.0).contains(&self.pass_threshold) {
            return Err(ConfigError::InvalidValue {
                name: "pass threshold",
                value: self.pass_threshold.to_string(),
                reason: "must be between 0 and 1",
            });
        }
        Ok(())
    }
}
