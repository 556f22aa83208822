//! strftime-style date patterns with the quarter, ISO week and day-of-year
//! extensions.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DateToken {
    Literal(String),
    Year4,
    Year2,
    Month,
    Day,
    Quarter,
    IsoWeek,
    DayOfYear,
}

impl DateToken {
    fn render(&self, date: NaiveDate) -> String {
        match self {
            Self::Literal(s) => s.clone(),
            Self::Year4 => format!("{:04}", date.year()),
            Self::Year2 => format!("{:02}", date.year().rem_euclid(100)),
            Self::Month => format!("{:02}", date.month()),
            Self::Day => format!("{:02}", date.day()),
            Self::Quarter => ((date.month() - 1) / 3 + 1).to_string(),
            Self::IsoWeek => format!("{:02}", date.iso_week().week()),
            Self::DayOfYear => format!("{:03}", date.ordinal()),
        }
    }

    fn pattern(&self) -> String {
        match self {
            Self::Literal(s) => regex::escape(s),
            Self::Year4 => r"\d{4}".into(),
            Self::Year2 => r"\d{2}".into(),
            Self::Month | Self::Day | Self::IsoWeek => r"\d{1,2}".into(),
            Self::Quarter => "[1-4]".into(),
            Self::DayOfYear => r"\d{1,3}".into(),
        }
    }

    /// Like [`Self::pattern`] for a rendering that went through
    /// [`VersionStandard::Normalized`](crate::domain::VersionStandard).
    fn normalized_pattern(&self) -> String {
        match self {
            Self::Literal(s) => super::dotted_literal(s),
            Self::Year4 => r"\d{1,4}".into(),
            Self::Year2 | Self::Month | Self::Day | Self::IsoWeek => r"\d{1,2}".into(),
            Self::Quarter => "[1-4]".into(),
            Self::DayOfYear => r"\d{1,3}".into(),
        }
    }
}

/// A compiled date pattern such as `%Y.%m.%d` or `%y.Q%q`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<DateToken>,
}

impl DatePattern {
    pub fn parse(source: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidDateFormat {
            format: source.to_string(),
            reason: reason.to_string(),
        };

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let token = match chars.next() {
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some('Y') => DateToken::Year4,
                Some('y') => DateToken::Year2,
                Some('m') => DateToken::Month,
                Some('d') => DateToken::Day,
                Some('q') => DateToken::Quarter,
                Some('V') => DateToken::IsoWeek,
                Some('j') => DateToken::DayOfYear,
                Some(other) => return Err(invalid(&format!("unknown token '%{other}'"))),
                None => return Err(invalid("trailing '%'")),
            };
            if !literal.is_empty() {
                tokens.push(DateToken::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
        }
        if !literal.is_empty() {
            tokens.push(DateToken::Literal(literal));
        }

        if !tokens.iter().any(|t| !matches!(t, DateToken::Literal(_))) {
            return Err(invalid("contains no date token"));
        }

        Ok(Self {
            source: source.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Format a calendar date with this pattern.
    pub fn render(&self, date: NaiveDate) -> String {
        self.tokens.iter().map(|t| t.render(date)).collect()
    }

    /// Regex fragment matching any rendering of this pattern. Contains no
    /// capture groups.
    pub fn pattern(&self) -> String {
        self.tokens.iter().map(DateToken::pattern).collect()
    }

    /// Regex fragment for the normalized form of any rendering.
    pub(crate) fn normalized_pattern(&self) -> String {
        self.tokens.iter().map(DateToken::normalized_pattern).collect()
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
