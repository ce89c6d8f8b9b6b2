/*!
 * Notebook exporters.
 *
 * An exporter turns a notebook into a rendered document. Implementations:
 * - Nbconvert: renders through `jupyter nbconvert --to <format>`
 * - Mock: in-process renderer for tests
 */

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use crate::errors::ExportError;
use crate::notebook::Notebook;

/// Rendered notebook
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    /// The rendered document
    pub body: String,
    /// Auxiliary data reported by the exporter
    pub resources: Value,
}

/// Something that can render a notebook
#[async_trait]
pub trait Exporter: Send + Sync + Debug {
    /// Extension of the files this exporter produces, without the dot
    fn file_extension(&self) -> &str;

    /// Render `notebook`
    async fn export(&self, notebook: &Notebook) -> Result<ExportOutput, ExportError>;
}

/// Text formats nbconvert can render to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Html,
    Markdown,
    Latex,
    Rst,
    Asciidoc,
    Script,
    Notebook,
}

impl ExportFormat {
    // @returns: nbconvert `--to` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Latex => "latex",
            Self::Rst => "rst",
            Self::Asciidoc => "asciidoc",
            Self::Script => "script",
            Self::Notebook => "notebook",
        }
    }

    // @returns: Extension of the rendered file
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
            Self::Latex => "tex",
            Self::Rst => "rst",
            Self::Asciidoc => "asciidoc",
            Self::Script => "py",
            Self::Notebook => "ipynb",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            "latex" | "tex" => Ok(Self::Latex),
            "rst" => Ok(Self::Rst),
            "asciidoc" => Ok(Self::Asciidoc),
            "script" => Ok(Self::Script),
            "notebook" | "ipynb" => Ok(Self::Notebook),
            _ => Err(anyhow!("Invalid export format: {}", s)),
        }
    }
}

pub mod nbconvert;
pub mod mock;

pub use nbconvert::NbconvertExporter;
pub use mock::MockExporter;
