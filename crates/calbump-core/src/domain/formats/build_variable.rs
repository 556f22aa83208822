//! Build-variable declarations: Makefiles, Java properties and dotenv files.

use std::ops::Range;

use super::{FormatHandler, absolute, ident_len, indent_of, lines, skip_ws, value_span};
use crate::domain::error::DomainError;

/// The declaration syntax a [`BuildVariableHandler`] understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `VAR = value`, `VAR := value`, `VAR ::= value`, `VAR ?= value`, with
    /// optional `export` / `override`.
    Make,
    /// `key=value`, `key: value` or `key value`.
    Properties,
    /// `[export ]KEY=value`, value optionally quoted.
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct BuildVariableHandler {
    dialect: Dialect,
}

impl BuildVariableHandler {
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn strip_keyword<'l>(line: &'l str, keywords: &[&str]) -> (usize, &'l str) {
        for keyword in keywords {
            if let Some(rest) = line.strip_prefix(keyword) {
                if rest.starts_with([' ', '\t']) {
                    let at = skip_ws(line, keyword.len());
                    return (at, &line[at..]);
                }
            }
        }
        (0, line)
    }

    fn match_make(line: &str, variable: &str) -> Option<Range<usize>> {
        // recipe lines
        if line.starts_with('\t') {
            return None;
        }
        let lead = indent_of(line);
        let (skipped, rest) = Self::strip_keyword(&line[lead..], &["export", "override"]);
        let name_at = lead + skipped;
        let name_len = ident_len(rest, &['.', '-']);
        if &rest[..name_len] != variable {
            return None;
        }
        let op_at = skip_ws(line, name_at + name_len);
        let op = ["::=", ":=", "?=", "="]
            .into_iter()
            .find(|op| line[op_at..].starts_with(op))?;
        value_span(line, op_at + op.len(), Some('#'))
    }

    fn match_properties(line: &str, variable: &str) -> Option<Range<usize>> {
        let lead = indent_of(line);
        let rest = &line[lead..];
        if rest.starts_with(['#', '!']) {
            return None;
        }
        let key_len = rest
            .find(['=', ':', ' ', '\t'])
            .unwrap_or(rest.len());
        if &rest[..key_len] != variable {
            return None;
        }
        let mut at = skip_ws(line, lead + key_len);
        if matches!(line.as_bytes().get(at), Some(b'=' | b':')) {
            at += 1;
        }
        value_span(line, at, None)
    }

    fn match_env(line: &str, variable: &str) -> Option<Range<usize>> {
        let lead = indent_of(line);
        let (skipped, rest) = Self::strip_keyword(&line[lead..], &["export"]);
        let name_at = lead + skipped;
        let name_len = ident_len(rest, &['.']);
        if &rest[..name_len] != variable {
            return None;
        }
        let eq = skip_ws(line, name_at + name_len);
        if line.as_bytes().get(eq) != Some(&b'=') {
            return None;
        }
        value_span(line, eq + 1, Some('#'))
    }
}

impl FormatHandler for BuildVariableHandler {
    fn name(&self) -> &'static str {
        match self.dialect {
            Dialect::Make => "makefile",
            Dialect::Properties => "properties",
            Dialect::Env => "env",
        }
    }

    fn locate(
        &self,
        content: &str,
        variable: &str,
        _directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError> {
        let matcher: fn(&str, &str) -> Option<Range<usize>> = match self.dialect {
            Dialect::Make => Self::match_make,
            Dialect::Properties => Self::match_properties,
            Dialect::Env => Self::match_env,
        };
        Ok(lines(content)
            .filter_map(|(offset, line)| matcher(line, variable).map(|r| absolute(offset, r)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn makefile_operators() {
        let h = BuildVariableHandler::new(Dialect::Make);
        let src = "VERSION := 2025.08.31.1 # release\nexport TAG ?= v1\nAPP=demo\n\
                   build:\n\techo VERSION = nope\n";
        assert_eq!(h.read(src, "VERSION", None).unwrap(), "2025.08.31.1");
        assert_eq!(h.read(src, "TAG", None).unwrap(), "v1");
        assert_eq!(h.read(src, "APP", None).unwrap(), "demo");
        assert_eq!(h.locate(src, "VERSION", None).unwrap().len(), 1);

        let out = h.write(src, "VERSION", "2025.09.01.1", None).unwrap();
        assert!(out.content.starts_with("VERSION := 2025.09.01.1 # release\n"));
    }

    #[test]
    fn makefile_ignores_appends_and_prefixes() {
        let h = BuildVariableHandler::new(Dialect::Make);
        assert!(h.read("VERSION += x\n", "VERSION", None).is_err());
        assert!(h.read("APP_VERSION = x\n", "VERSION", None).is_err());
    }

    #[test]
    fn properties_delimiters() {
        let h = BuildVariableHandler::new(Dialect::Properties);
        let src = "# comment\nversion=1.0\napp.version: 2.0\nother value\n! version=no\n";
        assert_eq!(h.read(src, "version", None).unwrap(), "1.0");
        assert_eq!(h.read(src, "app.version", None).unwrap(), "2.0");
        assert_eq!(h.read(src, "other", None).unwrap(), "value");
        assert_eq!(h.locate(src, "version", None).unwrap().len(), 1);
    }

    #[test]
    fn env_quotes_and_export() {
        let h = BuildVariableHandler::new(Dialect::Env);
        let src = "export APP_VERSION=\"2025.08.31.1\"\nOTHER='x' # note\r\n";
        assert_eq!(h.read(src, "APP_VERSION", None).unwrap(), "2025.08.31.1");
        let out = h.write(src, "OTHER", "y", None).unwrap();
        assert_eq!(out.content, "export APP_VERSION=\"2025.08.31.1\"\nOTHER='y' # note\r\n");
    }
}
