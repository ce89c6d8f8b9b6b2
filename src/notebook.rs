use std::fs;
use std::path::Path;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use crate::errors::NotebookError;

// @module: Notebook document model and (de)serialization

// @const: Major notebook format version written for new documents
const NBFORMAT: u32 = 4;

// @const: Minor notebook format version written for new documents
const NBFORMAT_MINOR: u32 = 5;

/// A notebook document: an ordered list of cells plus document metadata.
///
/// Only `cells[].source` is interpreted. Every other field, known or not,
/// is carried through load and save unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Cells in document order
    pub cells: Vec<Cell>,

    /// Notebook-level metadata (kernelspec, language_info, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Major format version
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,

    /// Minor format version
    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,

    /// Any other top-level field
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single notebook cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    // @field: "code", "markdown" or "raw"
    pub cell_type: String,

    // @field: Cell text, joined into one string in memory
    #[serde(deserialize_with = "deserialize_source", serialize_with = "serialize_source")]
    pub source: String,

    // @field: Everything else (metadata, outputs, execution_count, id, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_nbformat() -> u32 {
    NBFORMAT
}

fn default_nbformat_minor() -> u32 {
    NBFORMAT_MINOR
}

/// On disk a source is either one string or a list of lines
#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineText {
    Single(String),
    Lines(Vec<String>),
}

fn deserialize_source<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MultilineText::deserialize(deserializer)? {
        MultilineText::Single(text) => text,
        MultilineText::Lines(lines) => lines.concat(),
    })
}

// Lines keep their trailing newline so concatenation restores the exact text
fn serialize_source<S>(source: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(source.split_inclusive('\n'))
}

impl Cell {
    /// Create a code cell with empty outputs
    pub fn code(source: &str) -> Self {
        let mut extra = Map::new();
        extra.insert("metadata".to_string(), Value::Object(Map::new()));
        extra.insert("execution_count".to_string(), Value::Null);
        extra.insert("outputs".to_string(), Value::Array(Vec::new()));
        Self {
            cell_type: "code".to_string(),
            source: source.to_string(),
            extra,
        }
    }

    /// Create a markdown cell
    pub fn markdown(source: &str) -> Self {
        let mut extra = Map::new();
        extra.insert("metadata".to_string(), Value::Object(Map::new()));
        Self {
            cell_type: "markdown".to_string(),
            source: source.to_string(),
            extra,
        }
    }

    /// Whether this is a code cell
    pub fn is_code(&self) -> bool {
        self.cell_type == "code"
    }

    /// Outputs attached by execution, if any
    pub fn outputs(&self) -> &[Value] {
        self.extra
            .get("outputs")
            .and_then(|outputs| outputs.as_array())
            .map(|outputs| outputs.as_slice())
            .unwrap_or(&[])
    }
}

impl Notebook {
    /// Create a notebook from cells with empty metadata
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
            extra: Map::new(),
        }
    }

    /// Parse a notebook from its JSON text
    pub fn from_json_str(content: &str) -> Result<Self, NotebookError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize the notebook the way Jupyter writes it:
    /// sorted keys, one-space indent, trailing newline.
    pub fn to_json_string(&self) -> Result<String, NotebookError> {
        let value = sort_keys(serde_json::to_value(self)?);

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer)?;
        buffer.push(b'\n');

        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Load a notebook from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NotebookError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Write the notebook to a file, creating missing parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), NotebookError> {
        let path = path.as_ref();
        let content = self.to_json_string()?;
        let io_error = |source: std::io::Error| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, content).map_err(io_error)
    }

    /// Index of the last cell whose source is not empty
    pub fn last_non_empty_cell(&self) -> Option<usize> {
        self.cells.iter().rposition(|cell| !cell.source.is_empty())
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
