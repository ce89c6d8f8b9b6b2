/*!
 * Notebook execution engines.
 *
 * This module contains the interface the pipeline uses to run a filled
 * notebook, and its implementations:
 * - Jupyter: runs the notebook through `jupyter nbconvert --execute`
 * - Mock: in-process engine for tests
 */

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ExecutionError;
use crate::notebook::Notebook;

/// Options handed to an engine for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOptions {
    /// Per-cell timeout; `None` means no limit
    pub timeout: Option<Duration>,

    /// Record failing cells as error outputs instead of aborting
    pub allow_errors: bool,

    /// Kernel to start; the notebook's kernelspec is used when unset
    pub kernel_name: Option<String>,

    /// Directory the kernel starts in
    pub working_dir: PathBuf,

    /// Engine-specific options passed through untouched
    pub extra: BTreeMap<String, String>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            allow_errors: true,
            kernel_name: None,
            working_dir: PathBuf::from("."),
            extra: BTreeMap::new(),
        }
    }
}

/// Something that can execute a notebook in place
///
/// Implementations attach outputs to the cells of `notebook`. With
/// `allow_errors` set, a failing cell is expected to be recorded in its
/// outputs rather than reported as an error.
#[async_trait]
pub trait ExecutionEngine: Send + Sync + Debug {
    /// Execute every cell of `notebook`
    async fn execute(
        &self,
        notebook: &mut Notebook,
        options: &ExecutionOptions,
    ) -> Result<(), ExecutionError>;
}

pub mod jupyter;
pub mod mock;

pub use jupyter::JupyterEngine;
pub use mock::{MockBehavior, MockEngine};
