//! Version templates: literal text plus `{current_date}` and `{build_count}`.

use std::fmt;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    CurrentDate,
    BuildCount { width: usize },
}

/// A compiled `version_format` such as `{current_date}-{build_count:03}`.
///
/// Holds `{current_date}` exactly once and `{build_count}` at most once.
/// `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl VersionTemplate {
    pub fn parse(source: &str) -> Result<Self, DomainError> {
        let invalid = |reason: String| DomainError::InvalidVersionFormat {
            format: source.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(invalid("unmatched '}'".into())),
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(invalid("unmatched '{'".into()));
                    }
                    let segment = parse_placeholder(&name).map_err(&invalid)?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let dates = segments
            .iter()
            .filter(|s| matches!(s, Segment::CurrentDate))
            .count();
        let counts = segments
            .iter()
            .filter(|s| matches!(s, Segment::BuildCount { .. }))
            .count();
        if dates != 1 {
            return Err(invalid(format!(
                "{{current_date}} must appear exactly once, found {dates}"
            )));
        }
        if counts > 1 {
            return Err(invalid(format!(
                "{{build_count}} may appear at most once, found {counts}"
            )));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn has_build_count(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::BuildCount { .. }))
    }

    pub fn render(&self, date: &str, build_count: u32) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::CurrentDate => out.push_str(date),
                Segment::BuildCount { width } => {
                    out.push_str(&format!("{build_count:0width$}"));
                }
            }
        }
        out
    }

    /// Regex body with named groups `date` and `count`, unanchored.
    pub(crate) fn pattern(&self, date_pattern: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(&regex::escape(s)),
                Segment::CurrentDate => {
                    out.push_str("(?P<date>");
                    out.push_str(date_pattern);
                    out.push(')');
                }
                Segment::BuildCount { .. } => out.push_str(r"(?P<count>\d+)"),
            }
        }
        out
    }

    /// [`Self::pattern`] for normalized renderings: separators are dots and
    /// padding is gone.
    pub(crate) fn normalized_pattern(&self, date_pattern: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(&super::dotted_literal(s)),
                Segment::CurrentDate => {
                    out.push_str("(?P<date>");
                    out.push_str(date_pattern);
                    out.push(')');
                }
                Segment::BuildCount { .. } => out.push_str(r"(?P<count>\d+)"),
            }
        }
        out
    }
}

fn parse_placeholder(name: &str) -> Result<Segment, String> {
    match name {
        "current_date" => Ok(Segment::CurrentDate),
        "build_count" => Ok(Segment::BuildCount { width: 0 }),
        _ => {
            let Some(spec) = name.strip_prefix("build_count:") else {
                return Err(format!("unknown placeholder '{{{name}}}'"));
            };
            let digits = spec.strip_prefix('0').unwrap_or(spec);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("malformed width in '{{{name}}}'"));
            }
            let width: usize = digits
                .parse()
                .map_err(|_| format!("malformed width in '{{{name}}}'"))?;
            if width == 0 || width > 9 {
                return Err(format!("width in '{{{name}}}' must be between 1 and 9"));
            }
            Ok(Segment::BuildCount { width })
        }
    }
}

impl fmt::Display for VersionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_padding() {
        let t = VersionTemplate::parse("{current_date}-{build_count:03}").unwrap();
        assert_eq!(t.render("2025-08-31", 4), "2025-08-31-004");
        assert_eq!(t.render("2025-08-31", 1234), "2025-08-31-1234");
        assert!(t.has_build_count());
    }

    #[test]
    fn renders_unpadded_and_dateonly() {
        let t = VersionTemplate::parse("v{current_date}.{build_count}").unwrap();
        assert_eq!(t.render("25.08", 7), "v25.08.7");

        let t = VersionTemplate::parse("{current_date}").unwrap();
        assert_eq!(t.render("2025.08.31", 9), "2025.08.31");
        assert!(!t.has_build_count());
    }

    #[test]
    fn escaped_braces_are_literal() {
        let t = VersionTemplate::parse("{{{current_date}}}").unwrap();
        assert_eq!(t.render("2025", 1), "{2025}");
    }

    #[test]
    fn width_outside_one_to_nine_says_so() {
        for bad in ["{current_date}.{build_count:010}", "{current_date}.{build_count:00}"] {
            match VersionTemplate::parse(bad) {
                Err(DomainError::InvalidVersionFormat { reason, .. }) => {
                    assert!(reason.contains("between 1 and 9"), "{bad}: {reason}");
                }
                other => panic!("{bad}: {other:?}"),
            }
        }
        let t = VersionTemplate::parse("{current_date}.{build_count:09}").unwrap();
        assert_eq!(t.render("25", 7), "25.000000007");
    }

    #[test]
    fn rejects_malformed_templates() {
        for bad in [
            "{current_date",
            "current_date}",
            "{build_count}",
            "{current_date}{current_date}",
            "{current_date}{build_count}{build_count}",
            "{current_date}{version}",
            "{current_date}{build_count:0x}",
            "{current_date}{build_count:}",
        ] {
            let err = VersionTemplate::parse(bad).unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidVersionFormat { .. }),
                "{bad} should be rejected"
            );
        }
    }
}
