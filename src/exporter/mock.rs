/*!
 * Mock exporter for testing.
 *
 * Renders each cell as `[cell_type] source` on its own block and counts calls.
 */

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{ExportOutput, Exporter};
use crate::errors::ExportError;
use crate::notebook::Notebook;

/// Mock exporter producing a plain text rendering
#[derive(Debug, Clone)]
pub struct MockExporter {
    /// Extension reported for produced files
    extension: String,
    /// Fail every export
    failing: bool,
    /// Number of exports
    export_count: Arc<AtomicUsize>,
}

impl MockExporter {
    /// Create a working mock exporter producing `extension` files
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            failing: false,
            export_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock exporter that always errors
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new("txt")
        }
    }

    /// How many times `export` was called
    pub fn export_count(&self) -> usize {
        self.export_count.load(Ordering::SeqCst)
    }

    /// The rendering this exporter produces for `notebook`
    pub fn render(notebook: &Notebook) -> String {
        notebook
            .cells
            .iter()
            .map(|cell| format!("[{}] {}", cell.cell_type, cell.source))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl Exporter for MockExporter {
    fn file_extension(&self) -> &str {
        &self.extension
    }

    async fn export(&self, notebook: &Notebook) -> Result<ExportOutput, ExportError> {
        self.export_count.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(ExportError::Failed("mock exporter failure".to_string()));
        }

        Ok(ExportOutput {
            body: Self::render(notebook),
            resources: json!({"cells": notebook.cells.len()}),
        })
    }
}
