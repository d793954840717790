/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::path::PathBuf;
use subtrans::app_config::{Config, LogLevel, OutputConfig};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();
    assert_eq!(config.target_languages, vec!["en"]);
    assert_eq!(config.line_width, 42);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.output, OutputConfig::default());
    assert!(config.validate().is_ok());
}

/// Test saving and loading a configuration file
#[test]
fn test_config_save_and_load_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config {
        target_languages: vec!["fr".to_string(), "zh-TW".to_string()],
        line_width: 32,
        log_level: LogLevel::Debug,
        output: OutputConfig {
            directory: Some(PathBuf::from("translated")),
            overwrite: true,
        },
    };
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

/// Test partial JSON files fall back to defaults
#[test]
fn test_config_fromPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{ "log_level": "warn" }"#)?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.line_width, 42);
    assert_eq!(config.target_languages, vec!["en"]);
    Ok(())
}

/// Test validation failures
#[test]
fn test_config_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.line_width = 19;
    assert!(config.validate().is_err());
    config.line_width = 80;
    assert!(config.validate().is_ok());
    config.line_width = 81;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.target_languages.clear();
    assert!(config.validate().is_err());

    config.target_languages.push("xx-Nope!".to_string());
    assert!(config.validate().is_err());
}

/// Test that a broken file reports a parse error
#[test]
fn test_config_fromInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}
