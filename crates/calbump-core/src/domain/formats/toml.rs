//! TOML documents.
//!
//! The document is parsed with `toml_edit`, which keeps the source span of
//! every value. The variable is a dotted path resolved through tables,
//! inline tables, dotted keys and arrays of tables (every entry is visited).
//! Only single-line strings and bare scalars are located; the located range
//! is the string body, so the quotes stay as written.

use std::ops::Range;

use toml_edit::{Document, Item, Value};

use super::FormatHandler;
use crate::domain::error::DomainError;

#[derive(Debug, Default, Clone, Copy)]
pub struct TomlHandler;

/// Walk `path` below `item`, pushing the span of every scalar it ends on.
fn collect(item: &Item, path: &[&str], content: &str, found: &mut Vec<Range<usize>>) {
    let Some((head, rest)) = path.split_first() else {
        if let Item::Value(value) = item {
            found.extend(scalar_body(value, content));
        }
        return;
    };

    match item {
        Item::ArrayOfTables(tables) => {
            for table in tables.iter() {
                if let Some(child) = table.get(head) {
                    collect(child, rest, content, found);
                }
            }
        }
        _ => {
            if let Some(child) = item.get(*head) {
                collect(child, rest, content, found);
            }
        }
    }
}

/// Span of a scalar's text, without the quotes of a single-line string.
fn scalar_body(value: &Value, content: &str) -> Option<Range<usize>> {
    let span = value.span()?;
    match value {
        Value::String(_) => {
            let raw = content.get(span.clone())?;
            if raw.starts_with("\"\"\"") || raw.starts_with("'''") || raw.len() < 2 {
                return None;
            }
            Some(span.start + 1..span.end - 1)
        }
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => Some(span),
        Value::Array(_) | Value::InlineTable(_) => None,
    }
}

impl FormatHandler for TomlHandler {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn locate(
        &self,
        content: &str,
        variable: &str,
        _directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError> {
        let document = Document::parse(content)
            .map_err(|e| DomainError::malformed(e.message().to_string()))?;
        let path: Vec<&str> = variable.split('.').collect();

        let mut found = Vec::new();
        collect(document.as_item(), &path, content, &mut found);
        found.sort_by_key(|range| range.start);
        Ok(found)
    }

    fn escape(&self, value: &str) -> String {
        value.replace('\\', "\\\\").replace('"', "\\\"")
    }
}
