use async_trait::async_trait;
use log::{debug, error};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{ExecutionEngine, ExecutionOptions};
use crate::errors::ExecutionError;
use crate::notebook::Notebook;

// @module: Execution through the Jupyter command line

/// Executes notebooks with `jupyter nbconvert --execute`, streaming the
/// document through stdin/stdout so nothing touches the disk.
#[derive(Debug, Clone)]
pub struct JupyterEngine {
    // @field: Jupyter executable
    command: String,
}

impl Default for JupyterEngine {
    fn default() -> Self {
        Self::new("jupyter")
    }
}

impl JupyterEngine {
    /// Create an engine that runs the given `jupyter` executable
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Command line arguments for one run
    pub fn build_args(options: &ExecutionOptions) -> Vec<String> {
        let mut args: Vec<String> = [
            "nbconvert", "--to", "notebook", "--execute", "--stdin", "--stdout",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        if options.allow_errors {
            args.push("--allow-errors".to_string());
        }

        // nbconvert only takes whole seconds; round sub-second timeouts up
        if let Some(timeout) = options.timeout {
            let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
            args.push(format!("--ExecutePreprocessor.timeout={}", secs.max(1)));
        }

        if let Some(kernel) = &options.kernel_name {
            args.push(format!("--ExecutePreprocessor.kernel_name={}", kernel));
        }

        for (key, value) in &options.extra {
            args.push(format!("--ExecutePreprocessor.{}={}", key, value));
        }

        args
    }

    /// Keep only the lines of nbconvert's stderr that describe the failure,
    /// dropping its informational log lines.
    fn filter_stderr(stderr: &str) -> String {
        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with("[NbConvertApp]")
            })
            .collect();

        if meaningful.is_empty() {
            "unknown nbconvert error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

#[async_trait]
impl ExecutionEngine for JupyterEngine {
    async fn execute(
        &self,
        notebook: &mut Notebook,
        options: &ExecutionOptions,
    ) -> Result<(), ExecutionError> {
        let input = notebook
            .to_json_string()
            .map_err(|e| ExecutionError::Failed(e.to_string()))?;
        let args = Self::build_args(options);
        debug!("Running {} {}", self.command, args.join(" "));

        let mut child = Command::new(&self.command)
            .args(&args)
            .current_dir(&options.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutionError::Spawn(format!("{}: {}", self.command, e)))?;

        // nbconvert reads the whole document before it starts the kernel
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|e| ExecutionError::Failed(format!("Failed to send notebook: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecutionError::Failed(format!("Failed to wait for {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = Self::filter_stderr(&stderr);
            error!("Notebook execution failed: {}", filtered);
            return Err(ExecutionError::Failed(filtered));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        *notebook = Notebook::from_json_str(&stdout)
            .map_err(|e| ExecutionError::InvalidOutput(e.to_string()))?;

        Ok(())
    }
}
