/*!
 * Integration tests for exporting the last cell of executed notebooks
 */

use std::fs;
use anyhow::Result;
use nbfill::errors::PipelineError;
use nbfill::exporter::MockExporter;
use nbfill::notebook::{Cell, Notebook};
use nbfill::pipeline::{export_last_cell, ExportOutcome};
use crate::common;

/// First call exports, second call skips and leaves the file alone
#[test]
fn test_export_last_cell_calledTwice_shouldSkipSecondTime() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook_path = temp_dir.path().join("report.ipynb");
    Notebook::new(vec![Cell::markdown("intro"), Cell::code("result")]).save(&notebook_path)?;
    let exporter = MockExporter::new("html");
    let expected = temp_dir.path().join("report.html");

    let first = tokio_test::block_on(export_last_cell(&notebook_path, &exporter))?;
    assert_eq!(first, ExportOutcome::Exported(expected.clone()));
    assert_eq!(fs::read_to_string(&expected)?, "[code] result");

    fs::write(&expected, "edited by hand")?;
    let second = tokio_test::block_on(export_last_cell(&notebook_path, &exporter))?;
    assert_eq!(second, ExportOutcome::Skipped(expected.clone()));
    assert_eq!(fs::read_to_string(&expected)?, "edited by hand");
    assert_eq!(exporter.export_count(), 1);
    Ok(())
}

/// Trailing empty cells are ignored
#[tokio::test]
async fn test_export_last_cell_withTrailingEmptyCells_shouldExportLastContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook_path = temp_dir.path().join("run.ipynb");
    Notebook::new(vec![
        Cell::code("first"),
        Cell::markdown("the summary"),
        Cell::code(""),
        Cell::code(""),
    ])
    .save(&notebook_path)?;

    let outcome = export_last_cell(&notebook_path, &MockExporter::new("md")).await?;

    assert_eq!(outcome.path(), temp_dir.path().join("run.md"));
    assert_eq!(fs::read_to_string(outcome.path())?, "[markdown] the summary");
    Ok(())
}

/// A notebook with only empty cells is an error and writes nothing
#[tokio::test]
async fn test_export_last_cell_withOnlyEmptyCells_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook_path = temp_dir.path().join("empty.ipynb");
    Notebook::new(vec![Cell::code(""), Cell::markdown("")]).save(&notebook_path)?;

    let err = export_last_cell(&notebook_path, &MockExporter::new("html")).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoContentCells(_)));
    assert!(!temp_dir.path().join("empty.html").exists());
    Ok(())
}

/// An exporter producing notebooks would overwrite its own input, which is refused
#[tokio::test]
async fn test_export_last_cell_withNotebookExtension_shouldRefuseToOverwriteInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook_path = temp_dir.path().join("report.ipynb");
    Notebook::new(vec![Cell::code("result")]).save(&notebook_path)?;
    let before = fs::read_to_string(&notebook_path)?;
    let exporter = MockExporter::new("ipynb");

    let err = export_last_cell(&notebook_path, &exporter).await.unwrap_err();

    assert!(matches!(err, PipelineError::OutputIsInput(ref path) if *path == notebook_path));
    assert_eq!(exporter.export_count(), 0);
    assert_eq!(fs::read_to_string(&notebook_path)?, before);
    Ok(())
}
