//! Configuration Loader Tests

use std::fs;

use beanwire_application::ports::{ConfigSource, FaultTolerancePolicyConfig};
use beanwire_infrastructure::config::ServiceConfig;
use beanwire_infrastructure::{ConfigLoader, RuntimeConfig};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("beanwire.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env_prefix("BEANWIRE_TEST_ABSENT")
        .load()
        .unwrap();
    assert_eq!(loaded.runtime, RuntimeConfig::default());
}

#[test]
fn test_file_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[logging]
level = "debug"

[services]
lease_renewal_interval_ms = 500

[fault_tolerance]
policy = "circuit-breaker"
failure_threshold = 3
"#,
    );

    let loaded = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("BEANWIRE_TEST_FILE")
        .load()
        .unwrap();

    assert_eq!(loaded.runtime.logging.level, "debug");
    assert_eq!(
        loaded.runtime.services,
        ServiceConfig {
            lease_renewal_interval_ms: 500
        }
    );
    assert_eq!(loaded.runtime.fault_tolerance.policy, "circuit-breaker");
    assert_eq!(loaded.runtime.fault_tolerance.failure_threshold, 3);
    assert_eq!(
        loaded.runtime.fault_tolerance.open_duration_ms,
        FaultTolerancePolicyConfig::default().open_duration_ms
    );
}

#[test]
fn test_loaded_source_exposes_raw_values() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[custom]
greeting = "hi"
retries = 3
enabled = true
"#,
    );

    let loaded = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("BEANWIRE_TEST_RAW")
        .load()
        .unwrap();

    assert_eq!(loaded.source.get("custom.greeting").as_deref(), Some("hi"));
    assert_eq!(loaded.source.get("custom.retries").as_deref(), Some("3"));
    assert_eq!(loaded.source.get("custom.enabled").as_deref(), Some("true"));
    assert_eq!(loaded.source.get("custom.missing"), None);
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[logging]\nlevel = \"loud\"\n");
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("BEANWIRE_TEST_LEVEL")
        .load()
        .unwrap_err();
    assert!(err.is_configuration(), "got {err}");
}

#[test]
fn test_zero_renewal_interval_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[services]\nlease_renewal_interval_ms = 0\n");
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("BEANWIRE_TEST_INTERVAL")
        .load()
        .unwrap_err();
    assert!(err.is_configuration(), "got {err}");
}

#[test]
fn test_saved_config_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");
    let mut config = RuntimeConfig::default();
    config.logging.json_format = true;
    config.services.lease_renewal_interval_ms = 1234;

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("BEANWIRE_TEST_SAVED");
    loader.save_to_file(&config, &path).unwrap();

    assert_eq!(loader.config_path(), Some(path.as_path()));
    assert_eq!(loader.load().unwrap().runtime, config);
}
