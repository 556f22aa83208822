//! JSON documents, via a span-tracking recursive scanner.
//!
//! Only object-key paths match; members of arrays never do. Only string
//! values are located so the replacement keeps the document valid.

use std::ops::Range;

use super::FormatHandler;
use crate::domain::error::DomainError;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonHandler;

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    wanted: Vec<&'a str>,
    found: Vec<Range<usize>>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, variable: &'a str) -> Self {
        let pos = if text.starts_with('\u{feff}') { 3 } else { 0 };
        Self {
            text,
            bytes: text.as_bytes(),
            pos,
            wanted: variable.split('.').collect(),
            found: Vec::new(),
        }
    }

    fn error(&self, what: &str) -> DomainError {
        DomainError::malformed(format!("{what} at byte {}", self.pos))
    }

    fn skip_ws(&mut self) {
        while matches!(self.bytes.get(self.pos), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), DomainError> {
        if self.bytes.get(self.pos) == Some(&byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn document(mut self) -> Result<Vec<Range<usize>>, DomainError> {
        let mut path = Vec::new();
        self.skip_ws();
        self.value(&mut path, true)?;
        self.skip_ws();
        if self.pos != self.bytes.len() {
            return Err(self.error("trailing content"));
        }
        Ok(self.found)
    }

    /// Scan one value. `path` is the key path leading to it; `keyed` is false
    /// inside arrays.
    fn value(&mut self, path: &mut Vec<String>, keyed: bool) -> Result<(), DomainError> {
        match self.bytes.get(self.pos) {
            Some(b'{') => self.object(path, keyed),
            Some(b'[') => self.array(path),
            Some(b'"') => {
                let body = self.string()?;
                if keyed && self.is_wanted(path) {
                    self.found.push(body);
                }
                Ok(())
            }
            Some(b'-' | b'0'..=b'9') => {
                while matches!(
                    self.bytes.get(self.pos),
                    Some(b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9')
                ) {
                    self.pos += 1;
                }
                Ok(())
            }
            Some(_) => {
                for literal in ["true", "false", "null"] {
                    if self.text[self.pos..].starts_with(literal) {
                        self.pos += literal.len();
                        return Ok(());
                    }
                }
                Err(self.error("unexpected token"))
            }
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn object(&mut self, path: &mut Vec<String>, keyed: bool) -> Result<(), DomainError> {
        self.expect(b'{')?;
        self.skip_ws();
        if self.bytes.get(self.pos) == Some(&b'}') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.skip_ws();
            let key = self.string()?;
            let key = unescape(&self.text[key]);
            self.skip_ws();
            self.expect(b':')?;
            self.skip_ws();

            path.push(key);
            let result = self.value(path, keyed);
            path.pop();
            result?;

            self.skip_ws();
            match self.bytes.get(self.pos) {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn array(&mut self, path: &mut Vec<String>) -> Result<(), DomainError> {
        self.expect(b'[')?;
        self.skip_ws();
        if self.bytes.get(self.pos) == Some(&b']') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.skip_ws();
            self.value(path, false)?;
            self.skip_ws();
            match self.bytes.get(self.pos) {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }
    }

    /// Consume a string and return the range of its body.
    fn string(&mut self) -> Result<Range<usize>, DomainError> {
        self.expect(b'"')?;
        let start = self.pos;
        loop {
            match self.bytes.get(self.pos) {
                Some(b'"') => {
                    let body = start..self.pos;
                    self.pos += 1;
                    return Ok(body);
                }
                Some(b'\\') => self.pos += 2,
                Some(_) => self.pos += 1,
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn is_wanted(&self, path: &[String]) -> bool {
        path.len() == self.wanted.len() && path.iter().zip(&self.wanted).all(|(a, b)| a == b)
    }
}

fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&format!("\\u{hex}")),
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl FormatHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
    }

    fn locate(
        &self,
        content: &str,
        variable: &str,
        _directive: Option<&str>,
    ) -> Result<Vec<Range<usize>>, DomainError> {
        Scanner::new(content, variable).document()
    }

    fn escape(&self, value: &str) -> String {
        value.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = "{\r\n  \"name\": \"demo\",\r\n  \"version\": \"2025.08.31.1\",\r\n  \"meta\": {\"version\" : \"inner\", \"n\": -1.5e3, \"ok\": true},\r\n  \"list\": [{\"version\": \"array\"}],\r\n  \"esc\\\"key\": null\r\n}";

    #[test]
    fn reads_object_paths() {
        let h = JsonHandler;
        assert_eq!(h.read(PACKAGE, "version", None).unwrap(), "2025.08.31.1");
        assert_eq!(h.read(PACKAGE, "meta.version", None).unwrap(), "inner");
    }

    #[test]
    fn array_members_never_match() {
        let h = JsonHandler;
        assert!(h.read(PACKAGE, "list.version", None).is_err());
    }

    #[test]
    fn write_preserves_layout() {
        let h = JsonHandler;
        let out = h.write(PACKAGE, "version", "2025.09.01.1", None).unwrap();
        assert_eq!(out.content, PACKAGE.replace("2025.08.31.1", "2025.09.01.1"));
        assert!(out.content.contains("\r\n"));
        assert!(!out.content.ends_with('\n'));
    }

    #[test]
    fn malformed_documents_are_reported() {
        let h = JsonHandler;
        for bad in ["{\"version\": \"1\"", "{\"version\" \"1\"}", "{} x", "[1,]"] {
            assert!(
                matches!(
                    h.locate(bad, "version", None),
                    Err(DomainError::MalformedDocument { .. })
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn non_string_values_are_not_located() {
        let h = JsonHandler;
        assert!(h.read("{\"version\": 3}", "version", None).is_err());
    }
}
