/*!
 * Placeholder substitution.
 *
 * Walks the cells of a notebook in order and replaces every placeholder cell
 * with the content registered for its key in a fill map. The walk stops at
 * the first problem; cells before the failing one keep their new source.
 */

use std::collections::HashMap;
use log::debug;

use crate::errors::TemplateError;
use crate::notebook::Notebook;
use crate::placeholder::{self, CellKind};

/// Placeholder key to replacement source
pub type FillMap = HashMap<String, String>;

/// Build the autofill marker line for a key, newline included
pub fn autofill_marker(key: &str) -> String {
    format!("# @ AUTOFILLED<{}>\n", key)
}

/// Replace every placeholder cell of `notebook` with its fill.
///
/// With `add_autofill_marker`, each filled source is prefixed with
/// `# @ AUTOFILLED<key>` on its own line.
pub fn fill_placeholders(
    notebook: &mut Notebook,
    fills: &FillMap,
    add_autofill_marker: bool,
) -> Result<(), TemplateError> {
    for (index, cell) in notebook.cells.iter_mut().enumerate() {
        let key = match placeholder::classify(&cell.source) {
            CellKind::Ordinary => continue,
            CellKind::Malformed => return Err(TemplateError::MalformedPlaceholder { index }),
            CellKind::Placeholder { key } => key,
        };

        let fill = fills
            .get(&key)
            .ok_or_else(|| TemplateError::MissingFillKey { index, key: key.clone() })?;

        cell.source = if add_autofill_marker {
            autofill_marker(&key) + fill
        } else {
            fill.clone()
        };

        debug!("Filled cell {} with key '{}'", index, key);
    }

    check_placeholders(notebook)
}

/// Fail on the first cell that still starts with the placeholder prefix
pub fn check_placeholders(notebook: &Notebook) -> Result<(), TemplateError> {
    for (index, cell) in notebook.cells.iter().enumerate() {
        if placeholder::is_placeholder(&cell.source) {
            return Err(TemplateError::UnfilledPlaceholder {
                index,
                key: placeholder::extract_key(&cell.source),
            });
        }
    }

    Ok(())
}

/// Keys referenced by well-formed placeholders, in document order
pub fn placeholder_keys(notebook: &Notebook) -> Vec<String> {
    notebook
        .cells
        .iter()
        .filter_map(|cell| match placeholder::classify(&cell.source) {
            CellKind::Placeholder { key } => Some(key),
            _ => None,
        })
        .collect()
}
