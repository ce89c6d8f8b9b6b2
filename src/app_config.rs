use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::ExecutionOptions;
use crate::exporter::ExportFormat;
use crate::file_utils::FileManager;

/// Application configuration, stored as JSON next to where nbfill runs.
/// Missing sections fall back to their defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Notebook execution settings
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Prefix filled cells with an autofill marker
    #[serde(default)]
    pub autofill_marker: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Execution engine configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExecutionConfig {
    // @field: Jupyter executable
    #[serde(default = "default_jupyter_command")]
    pub jupyter_command: String,

    // @field: Per-cell timeout in seconds, unlimited when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    // @field: Keep running after a failing cell
    #[serde(default = "default_true")]
    pub allow_errors: bool,

    // @field: Kernel override
    #[serde(default)]
    pub kernel_name: Option<String>,

    // @field: Kernel working directory
    #[serde(default = "default_working_dir")]
    pub working_dir: String,

    // @field: Pass-through ExecutePreprocessor options
    #[serde(default)]
    pub extra_options: BTreeMap<String, String>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            jupyter_command: default_jupyter_command(),
            timeout_secs: None,
            allow_errors: default_true(),
            kernel_name: None,
            working_dir: default_working_dir(),
            extra_options: BTreeMap::new(),
        }
    }
}

/// Export configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ExportConfig {
    /// Format for `export` and `export-last-cell`
    #[serde(default)]
    pub format: ExportFormat,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_jupyter_command() -> String {
    "jupyter".to_string()
}

fn default_working_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.execution.jupyter_command.trim().is_empty() {
            return Err(anyhow!("Jupyter command must not be empty"));
        }

        if self.execution.timeout_secs == Some(0) {
            return Err(anyhow!("Execution timeout must be positive; omit it for no limit"));
        }

        if self.execution.working_dir.trim().is_empty() {
            return Err(anyhow!("Working directory must not be empty"));
        }

        Ok(())
    }

    /// Execution options for the engine
    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            timeout: self.execution.timeout_secs.map(Duration::from_secs),
            allow_errors: self.execution.allow_errors,
            kernel_name: self.execution.kernel_name.clone(),
            working_dir: PathBuf::from(&self.execution.working_dir),
            extra: self.execution.extra_options.clone(),
        }
    }

    /// Load the configuration file, using defaults without writing anything if it is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path));
        }

        debug!("Config file not found at {:?}, using defaults.", path);
        Ok(Config::default())
    }

    /// Load the configuration file, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path));
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(path, &config_json)?;

        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            execution: ExecutionConfig::default(),
            export: ExportConfig::default(),
            autofill_marker: false,
            log_level: LogLevel::default(),
        }
    }
}
