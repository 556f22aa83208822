//! XML documents such as `pom.xml` or `.csproj`.
//!
//! `variable` is an element path separated by `/`, relative to the root
//! element or including it, optionally ending in `@attribute` (`a/b@id` or
//! `a/b/@id`). Namespace prefixes are ignored when comparing names. Only
//! leaf text (trimmed) or an attribute value is ever located.

use std::ops::Range;

use super::FormatHandler;
use crate::domain::error::DomainError;

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupHandler;

struct Query<'a> {
    elements: Vec<&'a str>,
    attribute: Option<&'a str>,
}

impl<'a> Query<'a> {
    fn parse(variable: &'a str) -> Self {
        let (path, attribute) = match variable.rsplit_once('@') {
            Some((path, attr)) => (path.trim_end_matches('/'), Some(attr)),
            None => (variable, None),
        };
        Self {
            elements: path.split('/').filter(|s| !s.is_empty()).collect(),
            attribute,
        }
    }

    fn matches(&self, stack: &[String]) -> bool {
        let eq = |path: &[String]| {
            path.len() == self.elements.len()
                && path.iter().zip(&self.elements).all(|(a, b)| a == local_name(b))
        };
        eq(stack) || (!stack.is_empty() && eq(&stack[1..]))
    }
}

struct Open {
    name: String,
    text_start: usize,
    simple: bool,
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn is_name_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'=' | b'"' | b'\''))
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn error(&self, what: &str) -> DomainError {
        DomainError::malformed(format!("{what} at byte {}", self.pos))
    }

    /// Advance past the next occurrence of `end`.
    fn skip_past(&mut self, end: &str) -> Result<(), DomainError> {
        match self.text[self.pos..].find(end) {
            Some(i) => {
                self.pos += i + end.len();
                Ok(())
            }
            None => Err(self.error(&format!("missing '{end}'"))),
        }
    }

    fn skip_doctype(&mut self) -> Result<(), DomainError> {
        let mut depth = 0usize;
        while let Some(&b) = self.bytes.get(self.pos) {
            self.pos += 1;
            match b {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error("unterminated doctype"))
    }

    fn name(&mut self) -> &str {
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(|&b| is_name_byte(b)) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    fn skip_ws(&mut self) {
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }
}

impl FormatHandler for MarkupHandler {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn locate(
        &self,
        content: &str,
        variable: &str,
        _directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError> {
        let query = Query::parse(variable);
        let mut sc = Scanner {
            text: content,
            bytes: content.as_bytes(),
            pos: 0,
        };
        let mut stack: Vec<Open> = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut found = Vec::new();

        while let Some(lt) = content[sc.pos..].find('<') {
            sc.pos += lt;
            let rest = &content[sc.pos..];

            if rest.starts_with("<!--") {
                sc.skip_past("-->")?;
                if let Some(open) = stack.last_mut() {
                    open.simple = false;
                }
            } else if rest.starts_with("<![CDATA[") {
                sc.skip_past("]]>")?;
                if let Some(open) = stack.last_mut() {
                    open.simple = false;
                }
            } else if rest.starts_with("<?") {
                sc.skip_past("?>")?;
            } else if rest.starts_with("<!") {
                sc.skip_doctype()?;
            } else if rest.starts_with("</") {
                let end_start = sc.pos;
                sc.pos += 2;
                let name = local_name(sc.name()).to_string();
                sc.skip_past(">")?;
                let open = stack
                    .pop()
                    .ok_or_else(|| sc.error(&format!("unexpected '</{name}>'")))?;
                if open.name != name {
                    return Err(sc.error(&format!(
                        "'</{name}>' does not close '<{}>'",
                        open.name
                    )));
                }
                if open.simple && query.attribute.is_none() && query.matches(&names) {
                    let raw = &content[open.text_start..end_start];
                    let lead = raw.len() - raw.trim_start().len();
                    let trimmed = raw.trim();
                    let start = open.text_start + lead;
                    found.push(start..start + trimmed.len());
                }
                names.pop();
            } else {
                sc.pos += 1;
                let name = local_name(sc.name()).to_string();
                if name.is_empty() {
                    return Err(sc.error("empty element name"));
                }
                if let Some(parent) = stack.last_mut() {
                    parent.simple = false;
                }
                names.push(name.clone());
                let wanted_here = query.matches(&names);

                let self_closing = loop {
                    sc.skip_ws();
                    match sc.bytes.get(sc.pos) {
                        Some(b'>') => {
                            sc.pos += 1;
                            break false;
                        }
                        Some(b'/') => {
                            sc.skip_past(">")?;
                            break true;
                        }
                        Some(_) => {
                            let attr = local_name(sc.name()).to_string();
                            sc.skip_ws();
                            if sc.bytes.get(sc.pos) != Some(&b'=') {
                                return Err(sc.error("expected '=' after attribute name"));
                            }
                            sc.pos += 1;
                            sc.skip_ws();
                            let quote = match sc.bytes.get(sc.pos) {
                                Some(&q @ (b'"' | b'\'')) => q,
                                _ => return Err(sc.error("unquoted attribute value")),
                            };
                            let start = sc.pos + 1;
                            let len = content[start..]
                                .find(quote as char)
                                .ok_or_else(|| sc.error("unterminated attribute value"))?;
                            sc.pos = start + len + 1;
                            if wanted_here && query.attribute == Some(attr.as_str()) {
                                found.push(start..start + len);
                            }
                        }
                        None => return Err(sc.error("unterminated tag")),
                    }
                };

                if self_closing {
                    names.pop();
                } else {
                    stack.push(Open {
                        name,
                        text_start: sc.pos,
                        simple: true,
                    });
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(DomainError::malformed(format!(
                "element '<{}>' is never closed",
                open.name
            )));
        }
        Ok(found)
    }

    fn escape(&self, value: &str) -> String {
        value
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE project [ <!ENTITY x "y"> ]>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:m="urn:m">
  <!-- <version>comment</version> -->
  <modelVersion>4.0.0</modelVersion>
  <m:version>  2025.08.31.1  </m:version>
  <parent>
    <version>parent</version>
  </parent>
  <build release='2025.08.31.1'/>
  <notes><![CDATA[raw]]></notes>
</project>
"#;

    #[test]
    fn reads_leaf_text_relative_or_absolute() {
        let h = MarkupHandler;
        assert_eq!(h.read(POM, "version", None).unwrap(), "2025.08.31.1");
        assert_eq!(h.read(POM, "project/version", None).unwrap(), "2025.08.31.1");
        assert_eq!(h.read(POM, "parent/version", None).unwrap(), "parent");
    }

    #[test]
    fn reads_attributes() {
        let h = MarkupHandler;
        assert_eq!(h.read(POM, "build@release", None).unwrap(), "2025.08.31.1");
        assert_eq!(h.read(POM, "build/@release", None).unwrap(), "2025.08.31.1");
    }

    #[test]
    fn write_keeps_surrounding_whitespace() {
        let h = MarkupHandler;
        let out = h.write(POM, "version", "2025.09.01.1", None).unwrap();
        assert_eq!(out.replaced, 1);
        assert!(out.content.contains("<m:version>  2025.09.01.1  </m:version>"));
        assert!(out.content.contains("<!-- <version>comment</version> -->"));
    }

    #[test]
    fn non_leaf_and_cdata_are_skipped() {
        let h = MarkupHandler;
        assert!(h.read(POM, "parent", None).is_err());
        assert!(h.read(POM, "notes", None).is_err());
    }

    #[test]
    fn escapes_markup_characters() {
        let h = MarkupHandler;
        let out = h.write("<a><v>1</v></a>", "v", "1<2", None).unwrap();
        assert_eq!(out.content, "<a><v>1&lt;2</v></a>");
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        let h = MarkupHandler;
        assert!(matches!(
            h.locate("<a><b></a>", "b", None),
            Err(DomainError::MalformedDocument { .. })
        ));
        assert!(h.locate("<a>", "a", None).is_err());
    }
}
