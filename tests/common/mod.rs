/*!
 * Common test utilities for the nbfill test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use nbfill::notebook::{Cell, Notebook};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// The example template: a markdown placeholder, a code placeholder and code using it
pub fn sample_template() -> Notebook {
    Notebook::new(vec![
        Cell::markdown("# Report"),
        Cell::markdown("# @ PLACEHOLDER<md>"),
        Cell::code("# @ PLACEHOLDER<values>\nvalue = 'default'"),
        Cell::code("print(value, intvalue)"),
    ])
}

/// Writes the sample template to `dir` and returns its path
pub fn create_sample_template(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("template.ipynb");
    sample_template().save(&path)?;
    Ok(path)
}

/// Route library logs to the test output; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
