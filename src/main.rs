// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nbfill::app_config::{self, Config};
use nbfill::exporter::{ExportFormat, NbconvertExporter};
use nbfill::file_utils::FileManager;
use nbfill::fill::{self, FillMap};
use nbfill::notebook::Notebook;
use nbfill::pipeline::{self, ExportOutcome, Pipeline};
use nbfill::{values, ExecutionOptions, JupyterEngine};

/// CLI Wrapper for ExportFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliExportFormat {
    Html,
    Markdown,
    Latex,
    Rst,
    Asciidoc,
    Script,
    Notebook,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli_format: CliExportFormat) -> Self {
        match cli_format {
            CliExportFormat::Html => ExportFormat::Html,
            CliExportFormat::Markdown => ExportFormat::Markdown,
            CliExportFormat::Latex => ExportFormat::Latex,
            CliExportFormat::Rst => ExportFormat::Rst,
            CliExportFormat::Asciidoc => ExportFormat::Asciidoc,
            CliExportFormat::Script => ExportFormat::Script,
            CliExportFormat::Notebook => ExportFormat::Notebook,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Where placeholder content comes from
#[derive(Args, Debug)]
struct FillArgs {
    /// Fill a placeholder with literal text
    #[arg(long = "fill", value_name = "KEY=TEXT")]
    fill: Vec<String>,

    /// Fill a placeholder with the contents of a file
    #[arg(long = "fill-file", value_name = "KEY=PATH")]
    fill_file: Vec<String>,

    /// JSON object of fills; object values are rendered as variable assignments
    #[arg(long = "fills", value_name = "JSON_FILE")]
    fills_json: Option<PathBuf>,

    /// Prefix filled cells with an autofill marker
    #[arg(long)]
    autofill: bool,
}

/// Overrides for the execution settings in the config file
#[derive(Args, Debug)]
struct ExecArgs {
    /// Per-cell timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Kernel to run the notebook with
    #[arg(long)]
    kernel: Option<String>,

    /// Abort on the first failing cell
    #[arg(long)]
    no_allow_errors: bool,

    /// Directory the kernel starts in
    #[arg(long)]
    working_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill a template, run it and save the executed notebook
    Run {
        /// Template notebook
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Where to write the executed notebook
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        fills: FillArgs,

        #[command(flatten)]
        exec: ExecArgs,
    },

    /// Fill a template, run it and export the result
    Export {
        /// Template notebook
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Where to write the rendered document
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (defaults to the config's)
        #[arg(short, long, value_enum)]
        format: Option<CliExportFormat>,

        #[command(flatten)]
        fills: FillArgs,

        #[command(flatten)]
        exec: ExecArgs,
    },

    /// Check that a notebook has no unfilled placeholders
    Check {
        /// Notebook to check
        #[arg(value_name = "NOTEBOOK")]
        notebook: PathBuf,
    },

    /// Export the last non-empty cell of executed notebooks
    ExportLastCell {
        /// Notebook file, or directory searched for notebooks
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Export format (defaults to the config's)
        #[arg(short, long, value_enum)]
        format: Option<CliExportFormat>,
    },

    /// Generate shell completions for nbfill
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// nbfill - fill, run and export notebook templates
#[derive(Parser, Debug)]
#[command(name = "nbfill")]
#[command(version)]
#[command(about = "Fill notebook templates, execute them and export the results")]
#[command(long_about = "nbfill replaces `# @ PLACEHOLDER<key>` cells of a template notebook with
supplied content, executes the notebook through Jupyter, and saves or exports it.

EXAMPLES:
    nbfill run report.ipynb -o out.ipynb --fill md='**Some markdown**'
    nbfill run report.ipynb -o out.ipynb --fills fills.json --timeout 600
    nbfill export report.ipynb -o report.html --fill-file values=values.py
    nbfill check out.ipynb
    nbfill export-last-cell results/            # one HTML per executed notebook
    nbfill completions bash > nbfill.bash

FILLS FILE:
    {\"md\": \"**Some markdown**\", \"values\": {\"value\": \"another value\", \"intvalue\": 300}}
    String values are used verbatim; object values become one assignment per line.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "nbfill.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger passes everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();
    let config_path = cli.config_path;
    let log_level = cli.log_level;

    match cli.command {
        Commands::Run { template, output, fills, exec } => {
            let config = load_config(&config_path, log_level, true)?;
            let fill_map = build_fill_map(&fills)?;
            let options = execution_options(&config, &exec);
            let pipeline = Pipeline::new(JupyterEngine::new(&config.execution.jupyter_command));

            let spinner = start_spinner(format!("Running {}", template.display()));
            let result = pipeline
                .fill_run_save(&template, &output, &fill_map, fills.autofill || config.autofill_marker, &options)
                .await;
            spinner.finish_and_clear();

            result.with_context(|| format!("Failed to fill and run {:?}", template))?;
            info!("Success: {:?}", output);
        }
        Commands::Export { template, output, format, fills, exec } => {
            let config = load_config(&config_path, log_level, true)?;
            let fill_map = build_fill_map(&fills)?;
            let options = execution_options(&config, &exec);
            let format = format.map(ExportFormat::from).unwrap_or(config.export.format);
            let exporter = NbconvertExporter::with_command(&config.execution.jupyter_command, format);
            let pipeline = Pipeline::new(JupyterEngine::new(&config.execution.jupyter_command));

            let spinner = start_spinner(format!("Running {}", template.display()));
            let result = pipeline
                .fill_run_export(&template, &exporter, &fill_map, fills.autofill || config.autofill_marker, &options)
                .await;
            spinner.finish_and_clear();

            let rendered = result.with_context(|| format!("Failed to fill, run and export {:?}", template))?;
            FileManager::write_to_file(&output, &rendered)?;
            info!("Success: {:?}", output);
        }
        Commands::Check { notebook } => {
            load_config(&config_path, log_level, false)?;
            let nb = Notebook::load(&notebook)
                .with_context(|| format!("Failed to load notebook: {:?}", notebook))?;
            fill::check_placeholders(&nb)?;
            info!("No unfilled placeholders in {:?}", notebook);
        }
        Commands::ExportLastCell { path, format } => {
            let config = load_config(&config_path, log_level, true)?;
            let format = format.map(ExportFormat::from).unwrap_or(config.export.format);
            let exporter = NbconvertExporter::with_command(&config.execution.jupyter_command, format);
            export_last_cells(&path, &exporter).await?;
        }
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "nbfill", &mut std::io::stdout());
        }
    }

    Ok(())
}

// Load the config, apply the CLI log level, and validate.
// Read-only commands fall back to defaults instead of writing a config file.
fn load_config(config_path: &str, log_level: Option<CliLogLevel>, create_missing: bool) -> Result<Config> {
    // Apply the CLI level first so config loading is logged at the requested verbosity
    if let Some(level) = &log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = if create_missing {
        Config::load_or_create(config_path)?
    } else {
        Config::load_or_default(config_path)?
    };

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

// Merge the fills file, file fills and literal fills, later sources winning
fn build_fill_map(args: &FillArgs) -> Result<FillMap> {
    let mut fills = FillMap::new();

    if let Some(json_path) = &args.fills_json {
        let content = FileManager::read_to_string(json_path)?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fills file: {:?}", json_path))?;
        fills.extend(values::fills_from_json(&value)?);
    }

    for entry in &args.fill_file {
        let (key, path) = parse_key_value(entry)?;
        fills.insert(key, FileManager::read_to_string(path)?);
    }

    for entry in &args.fill {
        let (key, text) = parse_key_value(entry)?;
        fills.insert(key, text);
    }

    Ok(fills)
}

fn parse_key_value(entry: &str) -> Result<(String, String)> {
    entry
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", entry))
}

fn execution_options(config: &Config, exec: &ExecArgs) -> ExecutionOptions {
    let mut options = config.execution_options();

    if let Some(timeout) = exec.timeout {
        options.timeout = Some(Duration::from_secs(timeout));
    }
    if let Some(kernel) = &exec.kernel {
        options.kernel_name = Some(kernel.clone());
    }
    if exec.no_allow_errors {
        options.allow_errors = false;
    }
    if let Some(dir) = &exec.working_dir {
        options.working_dir = PathBuf::from(dir);
    }

    options
}

fn start_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

// Export one notebook, or every notebook under a directory
async fn export_last_cells(path: &Path, exporter: &NbconvertExporter) -> Result<()> {
    let notebooks = if path.is_dir() {
        FileManager::find_files(path, "ipynb")?
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", path));
    };

    let mut exported = 0;
    for notebook in &notebooks {
        match pipeline::export_last_cell(notebook, exporter).await {
            Ok(ExportOutcome::Exported(output)) => {
                info!("Success: {:?}", output);
                exported += 1;
            }
            Ok(ExportOutcome::Skipped(_)) => {}
            Err(e) if notebooks.len() > 1 => error!("Error processing {:?}: {}", notebook, e),
            Err(e) => return Err(e.into()),
        }
    }

    info!("Finished: {} of {} notebooks exported", exported, notebooks.len());
    Ok(())
}
