//! Container build files: `ARG VERSION=1.0`, `ENV APP_VERSION 1.0`,
//! `LABEL version="1.0" vendor=x`.
//!
//! Values are addressed by the `(directive, variable)` pair, so the same
//! variable under `ARG` and `ENV` is located independently.

use std::ops::Range;

use super::{FormatHandler, absolute, indent_of, lines, quoted_body, skip_ws, value_span};
use crate::domain::error::DomainError;

#[derive(Debug, Default, Clone, Copy)]
pub struct DirectiveHandler;

fn token_end(line: &str, at: usize) -> usize {
    line[at..]
        .find([' ', '\t'])
        .map_or(line.len(), |i| at + i)
}

/// Scan `KEY=value` pairs from `at` to the end of `line`.
fn pairs(line: &str, mut at: usize, variable: &str, found: &mut Vec<Range<usize>>) {
    let bytes = line.as_bytes();
    loop {
        at = skip_ws(line, at);
        if at >= bytes.len() {
            return;
        }
        let Some(eq) = line[at..].find(['=', ' ', '\t']).map(|i| at + i) else {
            return;
        };
        if bytes[eq] != b'=' {
            // a token without '=' such as a line continuation
            at = eq;
            continue;
        }
        let key = &line[at..eq];
        let value_at = eq + 1;
        let (value, next) = match bytes.get(value_at) {
            Some(b'"' | b'\'') => match quoted_body(line, value_at) {
                Some(body) => {
                    let next = body.end + 1;
                    (body, next)
                }
                None => return,
            },
            _ => {
                let end = token_end(line, value_at);
                (value_at..end, end)
            }
        };
        if key == variable {
            found.push(value);
        }
        at = next;
    }
}

impl FormatHandler for DirectiveHandler {
    fn name(&self) -> &'static str {
        "dockerfile"
    }

    fn locate(
        &self,
        content: &str,
        variable: &str,
        directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError> {
        let directive = directive.ok_or_else(|| {
            DomainError::InvalidTarget(format!(
                "dockerfile target '{variable}' needs a directive such as ARG or ENV"
            ))
        })?;

        let mut found = Vec::new();
        // Some(matched) while inside a `\`-continued instruction
        let mut carry: Option<bool> = None;

        for (offset, line) in lines(content) {
            let start = indent_of(line);
            let comment = line[start..].starts_with('#');
            let continued = line.trim_end().ends_with('\\');

            let matched = match carry {
                Some(matched) => {
                    if matched && !comment {
                        let mut local = Vec::new();
                        pairs(line, start, variable, &mut local);
                        found.extend(local.into_iter().map(|r| absolute(offset, r)));
                    }
                    matched
                }
                None => {
                    let word_end = token_end(line, start);
                    if comment || !line[start..word_end].eq_ignore_ascii_case(directive)
                    {
                        false
                    } else {
                        let args = skip_ws(line, word_end);
                        let first_end = token_end(line, args);
                        let mut local = Vec::new();
                        if line[args..first_end].contains('=') {
                            pairs(line, args, variable, &mut local);
                        } else if &line[args..first_end] == variable {
                            if let Some(value) = value_span(line, first_end, None) {
                                if !value.is_empty() {
                                    local.push(value);
                                }
                            }
                        }
                        found.extend(local.into_iter().map(|r| absolute(offset, r)));
                        true
                    }
                }
            };

            if !comment {
                carry = continued.then_some(matched);
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCKERFILE: &str = "\
FROM python:3.12-slim
# ARG VERSION=commented
ARG VERSION=2025.08.31.1
env VERSION 2025.08.31.1
LABEL org.opencontainers.image.title=demo version=\"2025.08.31.1\" \\
      vendor=acme build=\"x\"
RUN echo VERSION=nope
";

    #[test]
    fn same_variable_under_two_directives() {
        let h = DirectiveHandler;
        assert_eq!(h.locate(DOCKERFILE, "VERSION", Some("ARG")).unwrap().len(), 1);
        assert_eq!(h.locate(DOCKERFILE, "VERSION", Some("ENV")).unwrap().len(), 1);

        let out = h
            .write(DOCKERFILE, "VERSION", "2025.09.01.1", Some("ARG"))
            .unwrap();
        assert!(out.content.contains("ARG VERSION=2025.09.01.1\n"));
        assert!(out.content.contains("env VERSION 2025.08.31.1\n"));
        assert!(out.content.contains("echo VERSION=nope"));
    }

    #[test]
    fn label_pairs_and_continuations() {
        let h = DirectiveHandler;
        assert_eq!(h.read(DOCKERFILE, "version", Some("label")).unwrap(), "2025.08.31.1");
        assert_eq!(h.read(DOCKERFILE, "build", Some("LABEL")).unwrap(), "x");
        assert_eq!(h.read(DOCKERFILE, "vendor", Some("LABEL")).unwrap(), "acme");
    }

    #[test]
    fn directive_is_required() {
        let h = DirectiveHandler;
        assert!(matches!(
            h.locate(DOCKERFILE, "VERSION", None),
            Err(DomainError::InvalidTarget(_))
        ));
    }

    #[test]
    fn arg_without_default_is_not_a_value() {
        let h = DirectiveHandler;
        assert!(h.read("ARG VERSION\n", "VERSION", Some("ARG")).is_err());
    }
}
