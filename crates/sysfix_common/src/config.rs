//! sysfix configuration
//!
//! Configuration lives in `$XDG_CONFIG_HOME/sysfix/config.toml`
//! (override with `$SYSFIX_CONFIG`). Every field has a default, so a
//! missing file or a partial file is fine.

use crate::advisor::{DEFAULT_MODEL, GENERATE_TIMEOUT_SECS, HEALTH_CHECK_TIMEOUT_MS, OLLAMA_DEFAULT_URL};
use crate::classifier::DEFAULT_TERMINATE_ALLOWLIST;
use crate::router::AdvisorPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "SYSFIX_CONFIG";
const CONFIG_DIR: &str = "sysfix";
const CONFIG_FILE: &str = "config.toml";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// AI advisor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_advisor_enabled")]
    pub enabled: bool,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Generation timeout (seconds, valid: 1-300)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Liveness probe timeout (ms)
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,

    #[serde(default)]
    pub policy: AdvisorPolicy,
}

fn default_advisor_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    OLLAMA_DEFAULT_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    GENERATE_TIMEOUT_SECS
}

fn default_health_timeout_ms() -> u64 {
    HEALTH_CHECK_TIMEOUT_MS
}

impl AdvisorConfig {
    /// Generation timeout clamped to 1-300 seconds
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, 300))
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms.max(100))
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: default_advisor_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            health_timeout_ms: default_health_timeout_ms(),
            policy: AdvisorPolicy::default(),
        }
    }
}

/// Probe thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Resident memory per process that counts as a hog (MB)
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u64,

    /// Used capacity per mount that counts as high (%)
    #[serde(default = "default_storage_percent")]
    pub storage_percent: f64,

    /// Sensor reading that counts as high (°C)
    #[serde(default = "default_temperature_c")]
    pub temperature_c: f32,
}

fn default_memory_mb() -> u64 {
    500
}

fn default_storage_percent() -> f64 {
    90.0
}

fn default_temperature_c() -> f32 {
    85.0
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            memory_mb: default_memory_mb(),
            storage_percent: default_storage_percent(),
            temperature_c: default_temperature_c(),
        }
    }
}

/// Safety settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Applications the advisor may ask to terminate
    #[serde(default = "default_allowlist")]
    pub terminate_allowlist: Vec<String>,
}

fn default_allowlist() -> Vec<String> {
    DEFAULT_TERMINATE_ALLOWLIST
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            terminate_allowlist: default_allowlist(),
        }
    }
}

/// Disk cleanup settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CleanupConfig {
    /// Directories cleaned in addition to the user cache directory
    #[serde(default)]
    pub extra_dirs: Vec<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SysfixConfig {
    #[serde(default)]
    pub advisor: AdvisorConfig,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub safety: SafetyConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl SysfixConfig {
    /// Load from the default location, falling back to defaults on any error
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save as pretty TOML, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}
