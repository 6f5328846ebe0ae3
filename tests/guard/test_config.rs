//! Tests for guard configuration.

use anr_guard::{ConfigError, GuardConfig, OperationKind};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = GuardConfig::default();
    assert_eq!(config.default_chunk_size, 50);
    assert_eq!(config.stall_threshold, Duration::from_secs(5));
    assert_eq!(config.isolate_threshold, 1000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = GuardConfig::from_toml_str(
        r#"
        default_chunk_size = 25
        network_timeout_ms = 2000
        "#,
    )
    .unwrap();

    assert_eq!(config.default_chunk_size, 25);
    assert_eq!(config.network_timeout, Duration::from_millis(2000));
    assert_eq!(config.database_timeout, GuardConfig::default().database_timeout);
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(GuardConfig::from_toml_str("").unwrap(), GuardConfig::default());
}

#[test]
fn test_zero_chunk_size_rejected() {
    let err = GuardConfig::from_toml_str("default_chunk_size = 0").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "default_chunk_size",
            ..
        }
    ));
}

#[test]
fn test_zero_duration_rejected() {
    let err = GuardConfig::from_toml_str("heartbeat_interval_ms = 0").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "heartbeat_interval_ms",
            ..
        }
    ));
}

#[test]
fn test_malformed_toml_rejected() {
    let err = GuardConfig::from_toml_str("default_chunk_size = \"many\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_serializes_durations_as_millis() {
    let rendered = toml::to_string(&GuardConfig::default()).unwrap();
    assert!(rendered.contains("network_timeout_ms = 30000"));
    assert!(rendered.contains("stall_threshold_ms = 5000"));
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "ui_timeout_ms = 750").unwrap();
    writeln!(file, "isolate_threshold = 200").unwrap();

    let config = GuardConfig::load(file.path()).await.unwrap();
    assert_eq!(config.ui_timeout, Duration::from_millis(750));
    assert_eq!(config.isolate_threshold, 200);
}

#[tokio::test]
async fn test_load_missing_file() {
    let err = GuardConfig::load("/nonexistent/anr_guard.toml").await.unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_timeout_for_each_kind() {
    let config = GuardConfig::default();
    assert_eq!(config.timeout_for(OperationKind::Network), Duration::from_secs(30));
    assert_eq!(config.timeout_for(OperationKind::Database), Duration::from_secs(15));
    assert_eq!(config.timeout_for(OperationKind::Computation), Duration::from_secs(10));
    assert_eq!(config.timeout_for(OperationKind::Ui), Duration::from_secs(5));
}

#[test]
fn test_optimal_chunk_size() {
    let config = GuardConfig::default();
    assert_eq!(config.optimal_chunk_size(0), 1);
    assert_eq!(config.optimal_chunk_size(10), 10);
    assert_eq!(config.optimal_chunk_size(50), 50);
    assert_eq!(config.optimal_chunk_size(51), 50);
    assert_eq!(config.optimal_chunk_size(5000), 50);
    assert_eq!(config.optimal_chunk_size(10_000), 100);
    assert_eq!(config.optimal_chunk_size(12_345), 124);
}

#[test]
fn test_should_use_isolate() {
    let config = GuardConfig::default();
    assert!(!config.should_use_isolate(999));
    assert!(config.should_use_isolate(1000));
}

#[test]
fn test_operation_kind_names() {
    assert_eq!(OperationKind::Network.as_str(), "network");
    assert_eq!(OperationKind::Ui.as_str(), "ui");
}
