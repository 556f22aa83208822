//! YAML block mappings, resolved through an indentation stack.

use std::ops::Range;

use super::{FormatHandler, absolute, indent_of, lines, quoted_body, skip_ws, value_span};
use crate::domain::error::DomainError;

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlHandler;

struct Frame {
    indent: usize,
    key: String,
}

/// Split `rest` (a line without its indentation) into key and the offset just
/// past the mapping colon.
fn split_key(rest: &str) -> Option<(String, usize)> {
    let (key, after) = match rest.as_bytes().first()? {
        b'"' | b'\'' => {
            let body = quoted_body(rest, 0)?;
            (rest[body.clone()].to_string(), body.end + 1)
        }
        _ => {
            let colon = rest
                .char_indices()
                .find(|&(i, c)| {
                    c == ':' && matches!(rest.as_bytes().get(i + 1), None | Some(b' ' | b'\t'))
                })
                .map(|(i, _)| i)?;
            (rest[..colon].trim_end().to_string(), colon)
        }
    };
    let colon = skip_ws(rest, after);
    (rest.as_bytes().get(colon) == Some(&b':')).then(|| (key, colon + 1))
}

/// Skip an anchor (`&name`) or tag (`!tag`) in front of a scalar.
fn skip_properties(line: &str, mut at: usize) -> usize {
    loop {
        at = skip_ws(line, at);
        match line.as_bytes().get(at) {
            Some(b'&' | b'!') => {
                at += line[at..].find([' ', '\t']).unwrap_or(line.len() - at);
            }
            _ => return at,
        }
    }
}

impl FormatHandler for YamlHandler {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn locate(
        &self,
        content: &str,
        variable: &str,
        _directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError> {
        let wanted: Vec<&str> = variable.split('.').collect();
        let mut stack: Vec<Frame> = Vec::new();
        // Lines indented deeper than this belong to a block scalar or a
        // sequence item and are skipped.
        let mut opaque_above: Option<usize> = None;
        let mut found = Vec::new();

        for (offset, line) in lines(content) {
            let indent = indent_of(line);
            let rest = &line[indent..];
            if rest.is_empty() || rest.starts_with('#') {
                continue;
            }
            if let Some(limit) = opaque_above {
                if indent > limit {
                    continue;
                }
                opaque_above = None;
            }
            if indent == 0 && (rest.starts_with("---") || rest.starts_with("...")) {
                stack.clear();
                continue;
            }

            while stack.last().is_some_and(|f| f.indent >= indent) {
                stack.pop();
            }

            if rest == "-" || rest.starts_with("- ") {
                opaque_above = Some(indent);
                continue;
            }

            let Some((key, after_colon)) = split_key(rest) else {
                continue;
            };
            let value_at = skip_properties(line, indent + after_colon);
            let value = &line[value_at..];

            if value.is_empty() || value.starts_with('#') {
                stack.push(Frame { indent, key });
                continue;
            }
            if value.starts_with(['|', '>']) {
                opaque_above = Some(indent);
                continue;
            }
            if value.starts_with(['[', '{']) {
                continue;
            }

            let matches = stack.len() + 1 == wanted.len()
                && stack
                    .iter()
                    .map(|f| f.key.as_str())
                    .chain(std::iter::once(key.as_str()))
                    .zip(&wanted)
                    .all(|(have, want)| have == *want);
            if matches {
                if let Some(range) = value_span(line, value_at, Some('#')) {
                    found.push(absolute(offset, range));
                }
            }
        }

        Ok(found)
    }
}
