/*!
 * # nbfill - notebook templates filled, executed and exported
 *
 * A Rust library for turning template notebooks into executed reports.
 *
 * ## Features
 *
 * - Mark cells as placeholders with `# @ PLACEHOLDER<key>`
 * - Replace placeholders with caller-supplied source, optionally tagged
 *   with `# @ AUTOFILLED<key>`
 * - Render variable assignments to inject as cell source
 * - Execute the filled notebook through Jupyter
 * - Save the executed notebook or export it (HTML, Markdown, LaTeX, ...)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `notebook`: Notebook document model and `.ipynb` (de)serialization
 * - `placeholder`: Placeholder marker detection and key extraction
 * - `fill`: Placeholder substitution and completeness checks
 * - `values`: Assignment rendering for injected variables
 * - `engine`: Execution engines:
 *   - `engine::jupyter`: `jupyter nbconvert --execute`
 *   - `engine::mock`: In-process engine for tests
 * - `exporter`: Notebook renderers:
 *   - `exporter::nbconvert`: `jupyter nbconvert --to <format>`
 *   - `exporter::mock`: In-process renderer for tests
 * - `pipeline`: Fill/run/save/export orchestration
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod engine;
pub mod errors;
pub mod exporter;
pub mod file_utils;
pub mod fill;
pub mod notebook;
pub mod pipeline;
pub mod placeholder;
pub mod values;

// Re-export main types for easier usage
pub use app_config::Config;
pub use engine::{ExecutionEngine, ExecutionOptions, JupyterEngine};
pub use errors::{ExecutionError, ExportError, NotebookError, PipelineError, TemplateError};
pub use exporter::{ExportFormat, ExportOutput, Exporter, NbconvertExporter};
pub use fill::{check_placeholders, fill_placeholders, FillMap};
pub use notebook::{Cell, Notebook};
pub use pipeline::{export_last_cell, ExportOutcome, Pipeline};
pub use values::format_assignments;
