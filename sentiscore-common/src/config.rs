//! Configuration loading and resolution
//!
//! Configuration sources, highest priority first:
//! 1. Environment variable overrides (`SENTISCORE_WORKERS`, `SENTISCORE_LOG_LEVEL`)
//! 2. TOML config file (explicit path, `SENTISCORE_CONFIG`, or the platform config dir)
//! 3. Compiled defaults
//!
//! A missing config file is not an error: a warning is logged and defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SENTISCORE_CONFIG";

/// Environment variable overriding `scoring.worker_count`
pub const WORKERS_ENV: &str = "SENTISCORE_WORKERS";

/// Environment variable overriding `logging.level`
pub const LOG_LEVEL_ENV: &str = "SENTISCORE_LOG_LEVEL";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Batch scoring configuration (optional)
    #[serde(default)]
    pub scoring: ScoringSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Batch scoring settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringSettings {
    /// Number of concurrent execution units (and chunks) per batch
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// How many times a failed chunk is re-dispatched before the batch fails
    #[serde(default = "default_chunk_retry_attempts")]
    pub chunk_retry_attempts: u32,

    /// Rows between per-chunk progress events
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            chunk_retry_attempts: default_chunk_retry_attempts(),
            progress_interval: default_progress_interval(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_worker_count() -> usize {
    4
}

fn default_chunk_retry_attempts() -> u32 {
    1
}

fn default_progress_interval() -> usize {
    100
}

impl TomlConfig {
    /// Resolve, load, apply environment overrides and validate
    ///
    /// `explicit_path` takes priority over `SENTISCORE_CONFIG` and the
    /// platform default location.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(explicit_path) {
            Some(path) => load_toml_config(&path)?,
            None => {
                warn!("No config file found, using compiled defaults");
                TomlConfig::default()
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SENTISCORE_WORKERS` and `SENTISCORE_LOG_LEVEL` on top of file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(WORKERS_ENV) {
            let workers = raw.trim().parse::<usize>().map_err(|e| {
                Error::Config(format!("{} must be a positive integer, got {:?}: {}", WORKERS_ENV, raw, e))
            })?;
            info!(worker_count = workers, "Worker count overridden from environment");
            self.scoring.worker_count = workers;
        }

        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                self.logging.level = level.trim().to_string();
            }
        }

        Ok(())
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.scoring.worker_count == 0 {
            return Err(Error::Config("scoring.worker_count must be >= 1".to_string()));
        }
        if self.scoring.progress_interval == 0 {
            return Err(Error::Config("scoring.progress_interval must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// Locate the config file to load, if any
///
/// Priority: explicit path → `SENTISCORE_CONFIG` → `<config_dir>/sentiscore/config.toml`.
/// An explicit or env-provided path is returned even if it does not exist so
/// the loader can report it; the platform default is only returned when present.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// Platform config location (`~/.config/sentiscore/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sentiscore").join("config.toml"))
}

/// Load a TOML config file
///
/// A missing file logs a warning and yields defaults. A file that exists but
/// fails to parse is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file {} not found, using compiled defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Write a TOML config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = target.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, target)?;

    Ok(())
}
