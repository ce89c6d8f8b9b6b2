/*!
 * Error types for the nbfill library.
 *
 * This module contains custom error types for the different stages of the
 * fill/run/export pipeline, using the thiserror crate for ergonomic error
 * definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while substituting or verifying placeholder cells
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A cell starts with the sentinel prefix but carries no parsable key
    #[error("Invalid or missing template key in cell {index}")]
    MalformedPlaceholder {
        /// Index of the offending cell
        index: usize,
    },

    /// A well-formed placeholder key has no entry in the fill map
    #[error("Missing key '{key}' for cell {index} in provided map")]
    MissingFillKey {
        /// Index of the offending cell
        index: usize,
        /// Key extracted from the placeholder
        key: String,
    },

    /// A placeholder is still present after filling
    #[error("Unfilled placeholder in cell {index}{}", key_clause(.key))]
    UnfilledPlaceholder {
        /// Index of the offending cell
        index: usize,
        /// Key, when it could be extracted
        key: Option<String>,
    },
}

fn key_clause(key: &Option<String>) -> String {
    match key {
        Some(key) => format!(", key: '{}'", key),
        None => String::new(),
    }
}

/// Errors that can occur while reading or writing notebook documents
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The file could not be read or written
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid notebook JSON
    #[error("Failed to parse notebook: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors reported by an execution engine
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The engine process could not be started
    #[error("Failed to start execution engine: {0}")]
    Spawn(String),

    /// The engine ran but reported a failure
    #[error("Notebook execution failed: {0}")]
    Failed(String),

    /// The engine produced output that is not a notebook
    #[error("Execution engine returned an invalid notebook: {0}")]
    InvalidOutput(String),
}

/// Errors reported by an exporter
#[derive(Error, Debug)]
pub enum ExportError {
    /// The exporter process could not be started
    #[error("Failed to start exporter: {0}")]
    Spawn(String),

    /// The exporter ran but reported a failure
    #[error("Export failed: {0}")]
    Failed(String),
}

/// Main pipeline error type that wraps all other errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from placeholder substitution
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Error loading or saving a notebook
    #[error("Notebook error: {0}")]
    Notebook(#[from] NotebookError),

    /// Error from the execution engine
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Error from the exporter
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Writing an exported payload failed
    #[error("Failed to write {path:?}: {source}")]
    Write {
        /// Target file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Every cell of the notebook has an empty source
    #[error("Notebook {0:?} has no cell with content")]
    NoContentCells(PathBuf),

    /// The export target would overwrite the notebook being exported
    #[error("Export of {0:?} would overwrite the notebook itself")]
    OutputIsInput(PathBuf),
}
