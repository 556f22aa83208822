//! Format-preserving readers and writers for version values.
//!
//! Every handler parses only the skeleton it needs to find the byte ranges of
//! a value token, then [`FormatHandler::write`] splices the new value into
//! those ranges. Nothing outside the ranges is touched, so line endings,
//! quoting, comments and trailing newlines survive unchanged.
//!
//! Handlers work on in-memory text. Several targets pointing at the same file
//! are applied one after another to the latest content and compose.

pub mod assignment;
pub mod build_variable;
pub mod directive;
pub mod ini;
pub mod json;
pub mod markup;
pub mod toml;
pub mod yaml;

use std::ops::Range;

pub use assignment::AssignmentHandler;
pub use build_variable::{BuildVariableHandler, Dialect};
pub use directive::DirectiveHandler;
pub use ini::IniHandler;
pub use json::JsonHandler;
pub use markup::MarkupHandler;
pub use self::toml::TomlHandler;
pub use yaml::YamlHandler;

use crate::domain::{error::DomainError, value_objects::FileType};

/// Outcome of a successful [`FormatHandler::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// The full new file content.
    pub content: String,
    /// Number of value tokens replaced, always at least one.
    pub replaced: usize,
}

/// Reads and rewrites one named value inside one syntax.
pub trait FormatHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Byte ranges of every value token for `variable`, in document order.
    ///
    /// An empty vector means the variable is absent.
    fn locate(
        &self,
        content: &str,
        variable: &str,
        directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError>;

    /// Encode `value` for insertion into a value token.
    fn escape(&self, value: &str) -> String {
        value.to_string()
    }

    /// The first value of `variable`.
    fn read(
        &self,
        content: &str,
        variable: &str,
        directive: Option<&str>,
    ) -> Result<String, DomainError> {
        let ranges = self.locate(content, variable, directive)?;
        ranges
            .first()
            .map(|r| content[r.clone()].to_string())
            .ok_or_else(|| DomainError::not_found(variable, directive))
    }

    /// Replace every value of `variable` with `new_value`.
    fn write(
        &self,
        content: &str,
        variable: &str,
        new_value: &str,
        directive: Option<&str>,
    ) -> Result<WriteResult, DomainError> {
        let ranges = self.locate(content, variable, directive)?;
        if ranges.is_empty() {
            return Err(DomainError::not_found(variable, directive));
        }

        let escaped = self.escape(new_value);
        let mut out = String::with_capacity(content.len() + ranges.len() * escaped.len());
        let mut last = 0;
        for range in &ranges {
            out.push_str(&content[last..range.start]);
            out.push_str(&escaped);
            last = range.end;
        }
        out.push_str(&content[last..]);

        Ok(WriteResult {
            content: out,
            replaced: ranges.len(),
        })
    }
}

static ASSIGNMENT: AssignmentHandler = AssignmentHandler;
static TOML: TomlHandler = TomlHandler;
static YAML: YamlHandler = YamlHandler;
static JSON: JsonHandler = JsonHandler;
static INI: IniHandler = IniHandler;
static MARKUP: MarkupHandler = MarkupHandler;
static MAKEFILE: BuildVariableHandler = BuildVariableHandler::new(Dialect::Make);
static PROPERTIES: BuildVariableHandler = BuildVariableHandler::new(Dialect::Properties);
static ENV: BuildVariableHandler = BuildVariableHandler::new(Dialect::Env);
static DIRECTIVE: DirectiveHandler = DirectiveHandler;

/// The handler responsible for `file_type`.
pub fn handler_for(file_type: FileType) -> &'static dyn FormatHandler {
    match file_type {
        FileType::Python => &ASSIGNMENT,
        FileType::Toml => &TOML,
        FileType::Yaml => &YAML,
        FileType::Json => &JSON,
        FileType::SetupCfg => &INI,
        FileType::Xml => &MARKUP,
        FileType::Makefile => &MAKEFILE,
        FileType::Properties => &PROPERTIES,
        FileType::Env => &ENV,
        FileType::Dockerfile => &DIRECTIVE,
    }
}

// ── shared scanning helpers ───────────────────────────────────────────────────

/// Lines of `content` with their byte offset, terminators stripped.
pub(crate) fn lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    content.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        (start, line)
    })
}

/// Number of leading spaces and tabs.
pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

pub(crate) fn skip_ws(line: &str, mut at: usize) -> usize {
    let bytes = line.as_bytes();
    while at < bytes.len() && matches!(bytes[at], b' ' | b'\t') {
        at += 1;
    }
    at
}

/// Range of a quoted string's body starting at the opening quote `at`.
///
/// Backslash escapes are honoured inside double quotes. `None` when the
/// closing quote is missing on this line.
pub(crate) fn quoted_body(line: &str, at: usize) -> Option<Range<usize>> {
    let bytes = line.as_bytes();
    let quote = *bytes.get(at)?;
    let mut i = at + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote == b'"' => i += 2,
            b if b == quote => return Some(at + 1..i),
            _ => i += 1,
        }
    }
    None
}

/// Range of the value starting at or after `at` on `line`.
///
/// Quoted values yield the text between the quotes. Bare values run to the
/// end of the line, or to a comment marker preceded by whitespace, with
/// trailing whitespace excluded.
pub(crate) fn value_span(line: &str, at: usize, comment: Option<char>) -> Option<Range<usize>> {
    let start = skip_ws(line, at);
    match line.as_bytes().get(start) {
        Some(b'"' | b'\'') => quoted_body(line, start),
        _ => {
            let rest = &line[start..];
            let end = comment
                .and_then(|marker| bare_comment_start(rest, marker))
                .unwrap_or(rest.len());
            let value = rest[..end].trim_end_matches([' ', '\t']);
            Some(start..start + value.len())
        }
    }
}

fn bare_comment_start(rest: &str, marker: char) -> Option<usize> {
    rest.char_indices()
        .find(|&(i, c)| {
            c == marker && (i == 0 || rest[..i].ends_with([' ', '\t']))
        })
        .map(|(i, _)| i)
}

/// Shift a line-relative range to a document-relative one.
pub(crate) fn absolute(offset: usize, range: Range<usize>) -> Range<usize> {
    offset + range.start..offset + range.end
}

/// Length of a leading identifier made of ASCII alphanumerics, `_` and the
/// characters in `extra`.
pub(crate) fn ident_len(s: &str, extra: &[char]) -> usize {
    s.char_indices()
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_' || extra.contains(&c)))
        .map_or(s.len(), |(i, _)| i)
}
