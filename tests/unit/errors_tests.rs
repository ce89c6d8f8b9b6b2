/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use nbfill::errors::{ExecutionError, ExportError, NotebookError, PipelineError, TemplateError};

#[test]
fn test_templateError_unfilledWithKey_shouldIncludeKeyClause() {
    let error = TemplateError::UnfilledPlaceholder { index: 3, key: Some("values".to_string()) };
    assert_eq!(error.to_string(), "Unfilled placeholder in cell 3, key: 'values'");
}

#[test]
fn test_templateError_unfilledWithoutKey_shouldOmitKeyClause() {
    let error = TemplateError::UnfilledPlaceholder { index: 3, key: None };
    assert_eq!(error.to_string(), "Unfilled placeholder in cell 3");
}

#[test]
fn test_pipelineError_fromTemplateError_shouldWrapCorrectly() {
    let error: PipelineError = TemplateError::MalformedPlaceholder { index: 0 }.into();
    assert!(matches!(error, PipelineError::Template(TemplateError::MalformedPlaceholder { index: 0 })));
    assert!(error.to_string().contains("Invalid or missing template key in cell 0"));
}

#[test]
fn test_pipelineError_fromExecutionError_shouldWrapCorrectly() {
    let error: PipelineError = ExecutionError::Failed("kernel died".to_string()).into();
    assert!(error.to_string().contains("kernel died"));
}

#[test]
fn test_pipelineError_fromExportError_shouldWrapCorrectly() {
    let error: PipelineError = ExportError::Spawn("jupyter: not found".to_string()).into();
    assert!(error.to_string().contains("Failed to start exporter"));
}

#[test]
fn test_notebookError_fromJsonError_shouldDisplayParseFailure() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: NotebookError = json_error.into();
    assert!(error.to_string().starts_with("Failed to parse notebook"));
}

#[test]
fn test_pipelineError_noContentCells_shouldNamePath() {
    let error = PipelineError::NoContentCells(PathBuf::from("empty.ipynb"));
    assert!(error.to_string().contains("empty.ipynb"));
}
