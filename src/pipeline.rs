/*!
 * Fill, run, save and export pipeline.
 *
 * The pipeline loads a template notebook, fills its placeholders, runs it
 * through an execution engine, and then hands the executed notebook back,
 * writes it to disk, or renders it through an exporter. Every step runs to
 * completion before the next starts and the first failure aborts the run.
 */

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{ExecutionEngine, ExecutionOptions};
use crate::errors::PipelineError;
use crate::exporter::Exporter;
use crate::file_utils::FileManager;
use crate::fill::{self, FillMap};
use crate::notebook::Notebook;

/// Result of a last-cell export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The rendering was written to this path
    Exported(PathBuf),
    /// A rendering already existed at this path and was left alone
    Skipped(PathBuf),
}

impl ExportOutcome {
    /// Path of the rendered file
    pub fn path(&self) -> &Path {
        match self {
            Self::Exported(path) | Self::Skipped(path) => path,
        }
    }
}

/// Pipeline bound to an execution engine
#[derive(Debug, Clone)]
pub struct Pipeline<E: ExecutionEngine> {
    // @field: Engine running the filled notebooks
    engine: E,
}

impl<E: ExecutionEngine> Pipeline<E> {
    /// Create a pipeline that runs notebooks with `engine`
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// The engine in use
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Load `template_path`, fill its placeholders and execute it.
    ///
    /// Returns the executed notebook.
    pub async fn fill_and_run<P: AsRef<Path>>(
        &self,
        template_path: P,
        fills: &FillMap,
        add_autofill_marker: bool,
        options: &ExecutionOptions,
    ) -> Result<Notebook, PipelineError> {
        let template_path = template_path.as_ref();
        debug!("Loading template {:?}", template_path);
        let mut notebook = Notebook::load(template_path)?;

        let keys = fill::placeholder_keys(&notebook);
        for unused in fills.keys().filter(|key| !keys.contains(key)) {
            debug!("Fill '{}' has no placeholder in {:?}", unused, template_path);
        }

        fill::fill_placeholders(&mut notebook, fills, add_autofill_marker)?;

        info!("Executing {:?} ({} cells)", template_path, notebook.cells.len());
        self.engine.execute(&mut notebook, options).await?;

        Ok(notebook)
    }

    /// Fill, run and save the executed notebook to `out_path`
    pub async fn fill_run_save<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        template_path: P1,
        out_path: P2,
        fills: &FillMap,
        add_autofill_marker: bool,
        options: &ExecutionOptions,
    ) -> Result<(), PipelineError> {
        let notebook = self
            .fill_and_run(template_path, fills, add_autofill_marker, options)
            .await?;

        notebook.save(out_path.as_ref())?;
        info!("Saved executed notebook to {:?}", out_path.as_ref());
        Ok(())
    }

    /// Fill, run and render the executed notebook with `exporter`.
    ///
    /// Returns the rendered document; exporter resources are dropped.
    pub async fn fill_run_export<P: AsRef<Path>>(
        &self,
        template_path: P,
        exporter: &dyn Exporter,
        fills: &FillMap,
        add_autofill_marker: bool,
        options: &ExecutionOptions,
    ) -> Result<String, PipelineError> {
        let notebook = self
            .fill_and_run(template_path, fills, add_autofill_marker, options)
            .await?;

        let output = exporter.export(&notebook).await?;
        Ok(output.body)
    }
}

/// Render only the last non-empty cell of an executed notebook.
///
/// The rendering goes next to the notebook, with the extension swapped for
/// the exporter's. If that file already exists nothing is done.
pub async fn export_last_cell<P: AsRef<Path>>(
    notebook_path: P,
    exporter: &dyn Exporter,
) -> Result<ExportOutcome, PipelineError> {
    let notebook_path = notebook_path.as_ref();
    let output_path = FileManager::swap_extension(notebook_path, exporter.file_extension());

    if output_path == notebook_path {
        return Err(PipelineError::OutputIsInput(output_path));
    }

    if output_path.exists() {
        warn!("Output already exists at {:?}, skipping.", output_path);
        return Ok(ExportOutcome::Skipped(output_path));
    }

    info!("Exporting {:?} last cell to {:?}", notebook_path, output_path);
    let mut notebook = Notebook::load(notebook_path)?;

    let last = notebook
        .last_non_empty_cell()
        .ok_or_else(|| PipelineError::NoContentCells(notebook_path.to_path_buf()))?;
    let cell = notebook.cells.swap_remove(last);
    notebook.cells = vec![cell];

    let output = exporter.export(&notebook).await?;
    fs::write(&output_path, output.body).map_err(|source| PipelineError::Write {
        path: output_path.clone(),
        source,
    })?;

    Ok(ExportOutcome::Exported(output_path))
}
