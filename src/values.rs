/*!
 * Rendering of variable assignments for injection into placeholder cells.
 */

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::fill::FillMap;

/// Render named values as assignment lines, one per entry, in the given order.
///
/// Strings are wrapped in single quotes without any escaping, so a value
/// containing `'` or a newline produces broken source.
pub fn format_assignments<I, K>(entries: I) -> String
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    entries
        .into_iter()
        .map(|(name, value)| format!("{} = {}", name.as_ref(), render_literal(&value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Literal representation of a single value
pub fn render_literal(value: &Value) -> String {
    match value {
        // TODO: escape quotes and newlines once callers stop relying on raw text
        Value::String(s) => format!("'{}'", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// Build a fill map from a JSON object.
///
/// A string value is used verbatim as the cell source; an object value is
/// rendered through [`format_assignments`] in declaration order.
pub fn fills_from_json(value: &Value) -> Result<FillMap> {
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("Fills must be a JSON object mapping keys to content"))?;

    let mut fills = FillMap::new();
    for (key, fill) in object {
        let source = match fill {
            Value::String(text) => text.clone(),
            Value::Object(vars) => format_assignments(vars.iter().map(|(k, v)| (k, v.clone()))),
            other => {
                return Err(anyhow!(
                    "Fill '{}' must be a string or an object of variables, got {}",
                    key, other
                ))
            }
        };
        fills.insert(key.clone(), source);
    }

    Ok(fills)
}
