//! Integration tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Missing config files fall back to compiled defaults
//! - Resolution priority (explicit path → SENTISCORE_CONFIG → platform default)
//! - Environment overrides for worker count and log level
//! - Atomic TOML writes
//!
//! Note: Uses serial_test to prevent environment variable races.
//! Tests that touch SENTISCORE_* variables are marked with #[serial].

use sentiscore_common::config::{
    load_toml_config, resolve_config_path, write_toml_config, LoggingConfig, ScoringSettings,
    TomlConfig, CONFIG_PATH_ENV, LOG_LEVEL_ENV, WORKERS_ENV,
};
use sentiscore_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(CONFIG_PATH_ENV);
    env::remove_var(WORKERS_ENV);
    env::remove_var(LOG_LEVEL_ENV);
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.toml");

    let config = load_toml_config(&missing).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[scoring\nworker_count = ").unwrap();

    let result = load_toml_config(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_write_then_load_preserves_fields() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("config.toml");

    let config = TomlConfig {
        logging: LoggingConfig {
            level: "debug".to_string(),
            file: Some(PathBuf::from("/tmp/sentiscore.log")),
        },
        scoring: ScoringSettings {
            worker_count: 6,
            chunk_retry_attempts: 0,
            progress_interval: 25,
        },
    };

    write_toml_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!target.with_extension("toml.tmp").exists(), "temp file should be renamed away");
    assert_eq!(load_toml_config(&target).unwrap(), config);
}

#[test]
#[serial]
fn test_explicit_path_wins_over_env() {
    clear_env();
    env::set_var(CONFIG_PATH_ENV, "/tmp/from-env.toml");

    let explicit = PathBuf::from("/tmp/explicit.toml");
    assert_eq!(resolve_config_path(Some(&explicit)), Some(explicit.clone()));
    assert_eq!(resolve_config_path(None), Some(PathBuf::from("/tmp/from-env.toml")));

    clear_env();
}

#[test]
#[serial]
fn test_load_applies_env_overrides() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[scoring]\nworker_count = 2\n\n[logging]\nlevel = \"warn\"\n").unwrap();

    env::set_var(WORKERS_ENV, "12");
    env::set_var(LOG_LEVEL_ENV, "trace");

    let config = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(config.scoring.worker_count, 12);
    assert_eq!(config.logging.level, "trace");

    clear_env();
}

#[test]
#[serial]
fn test_env_path_is_used_when_no_explicit_path() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("env.toml");
    std::fs::write(&path, "[scoring]\nworker_count = 3\nchunk_retry_attempts = 4\n").unwrap();
    env::set_var(CONFIG_PATH_ENV, &path);

    let config = TomlConfig::load(None).unwrap();
    assert_eq!(config.scoring.worker_count, 3);
    assert_eq!(config.scoring.chunk_retry_attempts, 4);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_worker_env_rejected() {
    clear_env();
    env::set_var(WORKERS_ENV, "many");

    let mut config = TomlConfig::default();
    assert!(matches!(config.apply_env_overrides(), Err(Error::Config(_))));

    clear_env();
}

#[test]
#[serial]
fn test_zero_workers_from_env_fails_validation() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();
    env::set_var(WORKERS_ENV, "0");

    let result = TomlConfig::load(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));

    clear_env();
}
