/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;
use anyhow::Result;
use nbfill::app_config::{Config, LogLevel};
use nbfill::exporter::ExportFormat;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.execution.jupyter_command, "jupyter");
    assert_eq!(config.execution.timeout_secs, None);
    assert!(config.execution.allow_errors);
    assert_eq!(config.execution.kernel_name, None);
    assert_eq!(config.execution.working_dir, ".");
    assert_eq!(config.export.format, ExportFormat::Html);
    assert!(!config.autofill_marker);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.execution.jupyter_command = " ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.execution.timeout_secs = Some(0);
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.execution.working_dir = String::new();
    assert!(config.validate().is_err());
}

/// Test execution options derived from the config
#[test]
fn test_execution_options_withCustomConfig_shouldMapFields() {
    let mut config = Config::default();
    config.execution.timeout_secs = Some(600);
    config.execution.allow_errors = false;
    config.execution.kernel_name = Some("mykernel".to_string());
    config.execution.extra_options.insert("startup_timeout".to_string(), "90".to_string());

    let options = config.execution_options();

    assert_eq!(options.timeout, Some(Duration::from_secs(600)));
    assert!(!options.allow_errors);
    assert_eq!(options.kernel_name.as_deref(), Some("mykernel"));
    assert_eq!(options.extra["startup_timeout"], "90");
}

/// Test partial config files fall back to defaults
#[test]
fn test_config_deserialization_withPartialJson_shouldUseDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(
        r#"{"execution": {"timeout_secs": 30}, "export": {"format": "markdown"}, "log_level": "debug"}"#,
    )?;

    assert_eq!(config.execution.timeout_secs, Some(30));
    assert!(config.execution.allow_errors);
    assert_eq!(config.execution.jupyter_command, "jupyter");
    assert_eq!(config.export.format, ExportFormat::Markdown);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test a missing config file is created with defaults, then read back
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nbfill.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created, Config::default());

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded, created);
    Ok(())
}

/// Test a missing config file yields defaults without creating the file
#[test]
fn test_load_or_default_withMissingFile_shouldNotWriteFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nbfill.json");

    let config = Config::load_or_default(&path)?;

    assert_eq!(config, Config::default());
    assert!(!path.exists());
    Ok(())
}

/// Test an existing config file is read as-is
#[test]
fn test_load_or_default_withExistingFile_shouldReadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "nbfill.json",
        r#"{"autofill_marker": true, "log_level": "debug"}"#,
    )?;

    let config = Config::load_or_default(&path)?;

    assert!(config.autofill_marker);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test an unparsable config file is an error
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "nbfill.json", "{not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}
