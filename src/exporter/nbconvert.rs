use async_trait::async_trait;
use log::{debug, error};
use serde_json::json;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{ExportFormat, ExportOutput, Exporter};
use crate::errors::ExportError;
use crate::notebook::Notebook;

// @module: Rendering through the Jupyter command line

/// Renders notebooks with `jupyter nbconvert --to <format> --stdin --stdout`
#[derive(Debug, Clone)]
pub struct NbconvertExporter {
    // @field: Jupyter executable
    command: String,
    // @field: Target format
    format: ExportFormat,
}

impl NbconvertExporter {
    /// Create an exporter for `format` using the `jupyter` on PATH
    pub fn new(format: ExportFormat) -> Self {
        Self::with_command("jupyter", format)
    }

    /// Create an exporter for `format` using a specific executable
    pub fn with_command(command: impl Into<String>, format: ExportFormat) -> Self {
        Self {
            command: command.into(),
            format,
        }
    }

    /// Shorthand for HTML output
    pub fn html() -> Self {
        Self::new(ExportFormat::Html)
    }

    /// Format this exporter renders to
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Command line arguments for one render
    pub fn build_args(&self) -> Vec<String> {
        vec![
            "nbconvert".to_string(),
            "--to".to_string(),
            self.format.as_str().to_string(),
            "--stdin".to_string(),
            "--stdout".to_string(),
        ]
    }
}

#[async_trait]
impl Exporter for NbconvertExporter {
    fn file_extension(&self) -> &str {
        self.format.extension()
    }

    async fn export(&self, notebook: &Notebook) -> Result<ExportOutput, ExportError> {
        let input = notebook
            .to_json_string()
            .map_err(|e| ExportError::Failed(e.to_string()))?;
        debug!("Exporting notebook to {}", self.format);

        let mut child = Command::new(&self.command)
            .args(self.build_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExportError::Spawn(format!("{}: {}", self.command, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|e| ExportError::Failed(format!("Failed to send notebook: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExportError::Failed(format!("Failed to wait for {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("Export to {} failed: {}", self.format, stderr);
            return Err(ExportError::Failed(stderr));
        }

        Ok(ExportOutput {
            body: String::from_utf8_lossy(&output.stdout).into_owned(),
            resources: json!({"output_extension": format!(".{}", self.format.extension())}),
        })
    }
}
