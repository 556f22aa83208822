//! Top-level assignments in Python sources.

use std::ops::Range;

use super::{FormatHandler, absolute, ident_len, lines, skip_ws, value_span};
use crate::domain::error::DomainError;

/// Handles `NAME = "x"`, `NAME = 'x'`, `NAME: str = "x"` and `NAME = x` at
/// column zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssignmentHandler;

impl AssignmentHandler {
    fn match_line(line: &str, variable: &str) -> Option<Range<usize>> {
        let name_len = ident_len(line, &[]);
        if name_len == 0 || &line[..name_len] != variable {
            return None;
        }

        let mut at = skip_ws(line, name_len);
        let bytes = line.as_bytes();
        if bytes.get(at) == Some(&b':') {
            // annotation: skip to the assignment operator
            at += line[at..].find('=')?;
        }
        if bytes.get(at) != Some(&b'=') || bytes.get(at + 1) == Some(&b'=') {
            return None;
        }

        value_span(line, at + 1, Some('#'))
    }
}

impl FormatHandler for AssignmentHandler {
    fn name(&self) -> &'static str {
        "python"
    }

    fn locate(
        &self,
        content: &str,
        variable: &str,
        _directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError> {
        Ok(lines(content)
            .filter_map(|(offset, line)| {
                Self::match_line(line, variable).map(|r| absolute(offset, r))
            })
            .collect())
    }

    fn escape(&self, value: &str) -> String {
        value.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\"\"\"Package metadata.\"\"\"\n\
        __version__ = \"2025.08.31.1\"  # bumped by ci\n\
        __author__ = 'someone'\n\
        \n\
        def version():\n    __version__ = \"nested\"\n    return __version__\n";

    #[test]
    fn reads_top_level_assignment_only() {
        let h = AssignmentHandler;
        assert_eq!(h.read(SOURCE, "__version__", None).unwrap(), "2025.08.31.1");
        assert_eq!(h.locate(SOURCE, "__version__", None).unwrap().len(), 1);
    }

    #[test]
    fn write_changes_only_the_literal() {
        let h = AssignmentHandler;
        let out = h.write(SOURCE, "__version__", "2025.09.01.1", None).unwrap();
        assert_eq!(out.replaced, 1);
        assert_eq!(
            out.content,
            SOURCE.replacen("2025.08.31.1", "2025.09.01.1", 1)
        );
        assert_eq!(h.read(&out.content, "__version__", None).unwrap(), "2025.09.01.1");
    }

    #[test]
    fn supports_single_quotes_annotations_and_bare_values() {
        let h = AssignmentHandler;
        assert_eq!(h.read("VERSION = '1.2'\n", "VERSION", None).unwrap(), "1.2");
        assert_eq!(
            h.read("VERSION: str = \"1.2\"\n", "VERSION", None).unwrap(),
            "1.2"
        );
        assert_eq!(h.read("VERSION = 12  # n\n", "VERSION", None).unwrap(), "12");
    }

    #[test]
    fn ignores_comparisons_and_prefixes() {
        let h = AssignmentHandler;
        assert!(h.read("VERSION == 1\n", "VERSION", None).is_err());
        assert!(h.read("MY_VERSION = '1'\n", "VERSION", None).is_err());
        assert!(h.read("VERSION_2 = '1'\n", "VERSION", None).is_err());
    }

    #[test]
    fn preserves_crlf_and_missing_trailing_newline() {
        let h = AssignmentHandler;
        let src = "a = 1\r\n__version__ = \"1\"";
        let out = h.write(src, "__version__", "2", None).unwrap();
        assert_eq!(out.content, "a = 1\r\n__version__ = \"2\"");
    }
}
