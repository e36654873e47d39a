//! Centralized application configuration
//!
//! Single source of truth for storage selection, event defaults, and draw
//! tuning. Supports TOML files and environment variables with defaults and
//! validation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EVENT_SUMMARY, DEFAULT_MAX_CLAIM_ATTEMPTS, DEFAULT_TARGET_COUNT};
use crate::domain::EventConfig;

/// Default values for configuration
mod defaults {
    use std::path::PathBuf;

    use super::StorageBackend;

    // Storage defaults
    pub fn backend() -> StorageBackend { StorageBackend::JsonFile }
    pub fn state_file() -> PathBuf { "./data/gacha-state.json".into() }
    pub fn http_timeout_secs() -> u64 { 10 }

    // Event defaults
    pub fn target_count() -> u32 { crate::constants::DEFAULT_TARGET_COUNT }
    pub fn event_summary() -> String { crate::constants::DEFAULT_EVENT_SUMMARY.to_string() }

    // Draw defaults
    pub fn max_claim_attempts() -> u32 { crate::constants::DEFAULT_MAX_CLAIM_ATTEMPTS }
}

/// Where participants are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process memory; lost on exit
    Memory,
    /// Local JSON state file
    JsonFile,
    /// Remote REST collection
    Http,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "json_file" | "json-file" | "file" => Ok(StorageBackend::JsonFile),
            "http" => Ok(StorageBackend::Http),
            other => Err(format!("unknown storage backend '{}' (memory, json_file, http)", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageBackend::Memory => "memory",
            StorageBackend::JsonFile => "json_file",
            StorageBackend::Http => "http",
        })
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::backend")]
    pub backend: StorageBackend,
    /// State file used by the `json_file` backend; the `http` backend keeps
    /// event settings here
    #[serde(default = "defaults::state_file")]
    pub state_file: PathBuf,
    /// Collection URL used by the `http` backend
    #[serde(default)]
    pub api_url: Option<String>,
    /// Per-request timeout for the `http` backend
    #[serde(default = "defaults::http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl StorageConfig {
    /// Load storage configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            backend: env_parse("GACHA_STORAGE_BACKEND", defaults::backend())?,
            state_file: std::env::var("GACHA_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| defaults::state_file()),
            api_url: std::env::var("GACHA_API_URL").ok().filter(|url| !url.trim().is_empty()),
            http_timeout_secs: env_parse("GACHA_HTTP_TIMEOUT_SECS", defaults::http_timeout_secs())?,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: defaults::backend(),
            state_file: defaults::state_file(),
            api_url: None,
            http_timeout_secs: defaults::http_timeout_secs(),
        }
    }
}

/// Event settings used until a host saves their own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDefaults {
    #[serde(default = "defaults::target_count")]
    pub target_count: u32,
    #[serde(default = "defaults::event_summary")]
    pub event_summary: String,
}

impl EventDefaults {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            target_count: env_parse("GACHA_TARGET_COUNT", defaults::target_count())?,
            event_summary: std::env::var("GACHA_EVENT_SUMMARY")
                .unwrap_or_else(|_| defaults::event_summary()),
        })
    }

    pub fn to_event_config(&self) -> EventConfig {
        EventConfig {
            target_count: self.target_count,
            event_summary: self.event_summary.clone(),
        }
    }
}

impl Default for EventDefaults {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            event_summary: DEFAULT_EVENT_SUMMARY.to_string(),
        }
    }
}

/// Draw protocol tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Conditional claim attempts per commit
    #[serde(default = "defaults::max_claim_attempts")]
    pub max_claim_attempts: u32,
    /// Fixed RNG seed; unset means OS-seeded randomness
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl DrawConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let rng_seed = match std::env::var("GACHA_RNG_SEED") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "GACHA_RNG_SEED".to_string(),
                value: raw.clone(),
                reason: format!("must be an unsigned 64-bit integer: {}", e),
            })?),
            Err(_) => None,
        };

        Ok(Self {
            max_claim_attempts: env_parse("GACHA_MAX_CLAIM_ATTEMPTS", defaults::max_claim_attempts())?,
            rng_seed,
        })
    }
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_claim_attempts: DEFAULT_MAX_CLAIM_ATTEMPTS,
            rng_seed: None,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub event: EventDefaults,
    #[serde(default)]
    pub draw: DrawConfig,
}

impl AppConfig {
    /// Load complete application configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self {
            storage: StorageConfig::load()?,
            event: EventDefaults::load()?,
            draw: DrawConfig::load()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidValue {
            key: "config_file".to_string(),
            value: path.display().to_string(),
            reason: format!("Failed to read file: {}", e),
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::InvalidValue {
            key: "config_file".to_string(),
            value: path.display().to_string(),
            reason: format!("Failed to parse TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file if it exists, otherwise from the environment
    pub fn load_with_optional_file(path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if path.as_ref().exists() {
                tracing::info!("Loading configuration from file: {}", path.as_ref().display());
                return Self::from_toml_file(path);
            }
        }

        tracing::debug!("Loading configuration from environment variables");
        Self::load()
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: String::new(),
            reason: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, contents).map_err(|e| ConfigError::InvalidValue {
            key: "config_file".to_string(),
            value: path.display().to_string(),
            reason: format!("Failed to write file: {}", e),
        })
    }

    /// Cross-field checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.draw.max_claim_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "draw.max_claim_attempts".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.event.target_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "event.target_count".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.storage.backend == StorageBackend::Http && self.storage.api_url.is_none() {
            return Err(ConfigError::MissingRequired {
                key: "storage.api_url".to_string(),
                hint: "set GACHA_API_URL or storage.api_url when using the http backend".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse an environment variable, falling back to `default` when unset
fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration value is invalid
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    /// A required configuration value is missing
    MissingRequired {
        key: String,
        hint: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value, reason } => {
                write!(f, "Invalid configuration value for {}: '{}' ({})", key, value, reason)
            }
            ConfigError::MissingRequired { key, hint } => {
                write!(f, "Missing required configuration {}: {}", key, hint)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
