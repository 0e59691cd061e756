use std::fs;

use tempfile::TempDir;
use x11_session::{ConfigError, LogLevel, SessionConfig};

#[test]
fn test_config_defaults() {
    let config = SessionConfig::default();
    assert_eq!(config.scroll_step, 10.0);
    assert_eq!(config.wakeup_buffer_size, 100);
    assert_eq!(config.px_per_dp, None);
    assert_eq!(config.px_per_sp, None);
    assert_eq!(config.log_level, LogLevel::Off);
    assert_eq!(config.thread_name, "x11-session");
}

#[test]
fn test_save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("config.yaml");

    let config = SessionConfig::new()
        .with_scroll_step(6.5)
        .with_scale(2.0)
        .with_log_level(LogLevel::Trace);
    config.save_to(&path).expect("save failed");

    assert!(path.exists());
    assert!(!path.with_extension("yaml.tmp").exists());

    let loaded = SessionConfig::load_from(&path).expect("load failed");
    assert_eq!(loaded, config);
}

#[test]
fn test_load_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "log_level: debug\nthread_name: main-window\n").unwrap();

    let loaded = SessionConfig::load_from(&path).unwrap();
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.thread_name, "main-window");
    assert_eq!(loaded.scroll_step, 10.0);
}

#[test]
fn test_load_rejects_invalid_values() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "wakeup_buffer_size: 0\n").unwrap();

    let err = SessionConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("wakeup_buffer_size"));
}

#[test]
fn test_load_rejects_malformed_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "scroll_step: [not, a, number\n").unwrap();

    assert!(matches!(
        SessionConfig::load_from(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("absent.yaml");

    assert!(matches!(
        SessionConfig::load_from(&path),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_log_level_maps_to_filter() {
    assert_eq!(LogLevel::Off.to_level_filter(), log::LevelFilter::Off);
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
