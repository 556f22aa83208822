//! INI-style files such as `setup.cfg`.
//!
//! `variable` is either `section.key` (split at the last dot, since section
//! names may contain dots) or a bare `key`, which resolves to the first
//! section holding it. Keys compare case-insensitively.

use std::ops::Range;

use super::{FormatHandler, absolute, indent_of, lines, value_span};
use crate::domain::error::DomainError;

#[derive(Debug, Default, Clone, Copy)]
pub struct IniHandler;

struct Entry {
    section: String,
    key: String,
    value: Range<usize>,
}

fn entries(content: &str) -> Vec<Entry> {
    let mut section = String::new();
    let mut out = Vec::new();

    for (offset, line) in lines(content) {
        // continuation lines of multi-line values
        if indent_of(line) > 0 {
            continue;
        }
        if line.is_empty() || line.starts_with(['#', ';']) {
            continue;
        }
        if let Some(name) = line.strip_prefix('[') {
            if let Some(end) = name.find(']') {
                section = name[..end].trim().to_string();
            }
            continue;
        }
        let Some(delim) = line.find(['=', ':']) else {
            continue;
        };
        let key = line[..delim].trim();
        if key.is_empty() {
            continue;
        }
        if let Some(value) = value_span(line, delim + 1, None) {
            out.push(Entry {
                section: section.clone(),
                key: key.to_ascii_lowercase(),
                value: absolute(offset, value),
            });
        }
    }
    out
}

impl FormatHandler for IniHandler {
    fn name(&self) -> &'static str {
        "setup.cfg"
    }

    fn locate(
        &self,
        content: &str,
        variable: &str,
        _directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError> {
        let entries = entries(content);
        let lowered = variable.to_ascii_lowercase();

        if let Some((section, key)) = variable.rsplit_once('.') {
            let key = key.to_ascii_lowercase();
            let qualified: Vec<_> = entries
                .iter()
                .filter(|e| e.section == section && e.key == key)
                .map(|e| e.value.clone())
                .collect();
            if !qualified.is_empty() {
                return Ok(qualified);
            }
        }

        let Some(first) = entries.iter().find(|e| e.key == lowered) else {
            return Ok(Vec::new());
        };
        Ok(entries
            .iter()
            .filter(|e| e.section == first.section && e.key == lowered)
            .map(|e| e.value.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETUP_CFG: &str = "\
[metadata]
name = demo
version = 2025.08.31.1
; comment: version = no

[options]
install_requires =
    version = 1.0

[tool.calbump]
Version: 2025.08.31.1
";

    #[test]
    fn bare_key_uses_first_section() {
        let h = IniHandler;
        let ranges = h.locate(SETUP_CFG, "version", None).unwrap();
        assert_eq!(ranges.len(), 1);
        assert_eq!(h.read(SETUP_CFG, "version", None).unwrap(), "2025.08.31.1");
    }

    #[test]
    fn qualified_key_selects_section() {
        let h = IniHandler;
        let out = h
            .write(SETUP_CFG, "tool.calbump.version", "2025.09.01.1", None)
            .unwrap();
        assert!(out.content.contains("Version: 2025.09.01.1\n"));
        assert!(out.content.contains("version = 2025.08.31.1\n"));
        assert_eq!(h.read(SETUP_CFG, "metadata.version", None).unwrap(), "2025.08.31.1");
    }

    #[test]
    fn continuation_lines_are_ignored() {
        let h = IniHandler;
        assert_eq!(h.read(SETUP_CFG, "options.install_requires", None).unwrap(), "");
        assert!(h.read(SETUP_CFG, "options.version", None).is_err());
    }
}
