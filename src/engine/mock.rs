/*!
 * Mock execution engine for testing.
 *
 * This module provides an in-process engine that simulates different behaviors:
 * - `MockEngine::working()` - Echoes every code cell into a stream output
 * - `MockEngine::failing()` - Always fails with an error
 * - `MockEngine::cell_error(n)` - Code cell `n` raises; honors `allow_errors`
 */

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{ExecutionEngine, ExecutionOptions};
use crate::errors::ExecutionError;
use crate::notebook::Notebook;

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Every code cell succeeds
    Working,
    /// The run fails before touching any cell
    Failing,
    /// The cell at this index raises
    CellError { index: usize },
}

/// Mock engine recording how it was called
#[derive(Debug, Clone)]
pub struct MockEngine {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of runs
    run_count: Arc<AtomicUsize>,
    /// Options of the most recent run
    last_options: Arc<Mutex<Option<ExecutionOptions>>>,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            run_count: Arc::new(AtomicUsize::new(0)),
            last_options: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock engine that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock engine that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock engine whose cell `index` raises
    pub fn cell_error(index: usize) -> Self {
        Self::new(MockBehavior::CellError { index })
    }

    /// How many times `execute` was called
    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }

    /// Options passed to the most recent run
    pub fn last_options(&self) -> Option<ExecutionOptions> {
        self.last_options.lock().ok().and_then(|options| options.clone())
    }

    fn stream_output(text: &str) -> Value {
        json!({"output_type": "stream", "name": "stdout", "text": text})
    }

    fn error_output(index: usize) -> Value {
        json!({
            "output_type": "error",
            "ename": "RuntimeError",
            "evalue": format!("mock failure in cell {}", index),
            "traceback": [],
        })
    }
}

#[async_trait]
impl ExecutionEngine for MockEngine {
    async fn execute(
        &self,
        notebook: &mut Notebook,
        options: &ExecutionOptions,
    ) -> Result<(), ExecutionError> {
        self.run_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_options.lock() {
            *last = Some(options.clone());
        }

        if self.behavior == MockBehavior::Failing {
            return Err(ExecutionError::Failed("mock engine failure".to_string()));
        }

        let mut execution_count = 0;
        for (index, cell) in notebook.cells.iter_mut().enumerate() {
            if !cell.is_code() {
                continue;
            }
            execution_count += 1;

            let output = match self.behavior {
                MockBehavior::CellError { index: failing } if failing == index => {
                    if !options.allow_errors {
                        return Err(ExecutionError::Failed(format!(
                            "mock failure in cell {}",
                            index
                        )));
                    }
                    Self::error_output(index)
                }
                _ => Self::stream_output(&cell.source),
            };

            cell.extra.insert("execution_count".to_string(), json!(execution_count));
            cell.extra.insert("outputs".to_string(), Value::Array(vec![output]));
        }

        Ok(())
    }
}
