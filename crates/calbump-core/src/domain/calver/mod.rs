//! Calendar version resolution.
//!
//! A [`VersionSpec`] combines a [`VersionTemplate`], a [`DatePattern`] and an
//! IANA timezone. All three are validated when the spec is built, so
//! [`VersionSpec::resolve`] cannot fail.
//!
//! Resolution is pure: the caller injects `now`, and the date component is
//! computed by converting it into the spec's timezone.

pub mod date_pattern;
pub mod template;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;

pub use date_pattern::DatePattern;
pub use template::VersionTemplate;

use crate::domain::{error::DomainError, value_objects::VersionStandard};

const SUFFIX_PATTERN: &str = r"(?P<suffix>\.[A-Za-z][A-Za-z0-9.\-]*)?";

/// First build number of a new date unless configured otherwise.
pub const DEFAULT_BUILD_COUNT_START: u32 = 1;

/// The components recovered from an existing version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub date: String,
    /// Zero when the template has no `{build_count}`.
    pub build_count: u32,
    /// Release marker such as `.beta`, including the leading dot.
    pub suffix: Option<String>,
}

/// Immutable description of a calendar version scheme.
#[derive(Debug, Clone)]
pub struct VersionSpec {
    template: VersionTemplate,
    date_pattern: DatePattern,
    timezone: Tz,
    build_count_start: u32,
    matcher: Regex,
    /// Matches the same versions after `VersionStandard::Normalized`.
    normalized_matcher: Regex,
}

impl VersionSpec {
    pub fn new(version_format: &str, date_format: &str, timezone: &str) -> Result<Self, DomainError> {
        let template = VersionTemplate::parse(version_format)?;
        let date_pattern = DatePattern::parse(date_format)?;
        let timezone: Tz = timezone.parse().map_err(|_| DomainError::UnknownTimezone {
            name: timezone.to_string(),
        })?;

        let compile = |body: String| {
            Regex::new(&format!("^{body}{SUFFIX_PATTERN}$")).map_err(|e| {
                DomainError::InvalidVersionFormat {
                    format: version_format.to_string(),
                    reason: e.to_string(),
                }
            })
        };
        let matcher = compile(template.pattern(&date_pattern.pattern()))?;
        let normalized_matcher =
            compile(template.normalized_pattern(&date_pattern.normalized_pattern()))?;

        Ok(Self {
            template,
            date_pattern,
            timezone,
            build_count_start: DEFAULT_BUILD_COUNT_START,
            matcher,
            normalized_matcher,
        })
    }

    pub fn with_build_count_start(mut self, start: u32) -> Self {
        self.build_count_start = start;
        self
    }

    pub fn template(&self) -> &VersionTemplate {
        &self.template
    }

    pub fn date_pattern(&self) -> &DatePattern {
        &self.date_pattern
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn build_count_start(&self) -> u32 {
        self.build_count_start
    }

    /// Split `version` into its date component and build count.
    ///
    /// Matching is anchored and positional; anything that does not fully match
    /// the template fails with reason `no match`.
    pub fn parse(&self, version: &str) -> Result<ParsedVersion, DomainError> {
        self.parse_as(version, VersionStandard::Literal)
    }

    /// [`Self::parse`] for a version read back from a file written with
    /// `standard`. A normalized version yields its normalized date.
    pub fn parse_as(
        &self,
        version: &str,
        standard: VersionStandard,
    ) -> Result<ParsedVersion, DomainError> {
        let matcher = match standard {
            VersionStandard::Literal => &self.matcher,
            VersionStandard::Normalized => &self.normalized_matcher,
        };
        let caps = matcher
            .captures(version)
            .ok_or_else(|| self.parse_error(version, "no match"))?;

        let date = caps
            .name("date")
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| self.parse_error(version, "no match"))?;
        let build_count = match caps.name("count") {
            Some(m) => m
                .as_str()
                .parse::<u32>()
                .map_err(|_| self.parse_error(version, "build count out of range"))?,
            None => 0,
        };

        Ok(ParsedVersion {
            date,
            build_count,
            suffix: caps.name("suffix").map(|m| m.as_str().to_string()),
        })
    }

    /// Today's date component for `now` in this spec's timezone.
    pub fn date_component(&self, now: DateTime<Utc>) -> String {
        self.date_pattern
            .render(now.with_timezone(&self.timezone).date_naive())
    }

    /// The build count that follows `previous` on the date of `now`.
    ///
    /// Dates are compared in the form `standard` writes them, so a
    /// normalized `2025.9.1` is the same day as `2025.09.01`.
    pub fn next_build_count(
        &self,
        previous: Option<&str>,
        standard: VersionStandard,
        now: DateTime<Utc>,
    ) -> u32 {
        let today = standard.normalize(&self.date_component(now));
        previous
            .and_then(|v| self.parse_as(v, standard).ok())
            .filter(|p| standard.normalize(&p.date) == today)
            .map_or(self.build_count_start, |p| p.build_count.saturating_add(1))
    }

    /// Compute the next version.
    ///
    /// Same date as `previous` increments the build count by one; a different
    /// date, or a `previous` that is absent or unparseable, starts again at
    /// `build_count_start`.
    pub fn resolve(&self, previous: Option<&str>, now: DateTime<Utc>) -> String {
        self.resolve_as(previous, VersionStandard::Literal, now)
    }

    /// [`Self::resolve`] from a `previous` written with `standard`. The
    /// result is always the literal rendering.
    pub fn resolve_as(
        &self,
        previous: Option<&str>,
        standard: VersionStandard,
        now: DateTime<Utc>,
    ) -> String {
        let count = self.next_build_count(previous, standard, now);
        self.template.render(&self.date_component(now), count)
    }

    fn parse_error(&self, version: &str, reason: &str) -> DomainError {
        DomainError::Parse {
            version: version.to_string(),
            format: self.template.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Regex for a literal after normalization: every run of `-`, `_` and `.`
/// is one dot.
pub(crate) fn dotted_literal(literal: &str) -> String {
    let mut out = String::new();
    let mut in_run = false;
    for c in literal.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_run {
                out.push_str(r"\.");
            }
            in_run = true;
        } else {
            out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            in_run = false;
        }
    }
    out
}
