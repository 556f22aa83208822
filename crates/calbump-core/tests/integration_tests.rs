//! Integration tests for calbump-core's public domain API.

use calbump_core::domain::{
    DomainError, FileTarget, FileType, ReleaseSuffix, VersionSpec, VersionStandard, handler_for,
};
use chrono::{TimeZone, Utc};

#[test]
fn same_day_increments_across_a_timezone_boundary() {
    // 03:30 UTC on Sep 1 is still Aug 31 in New York
    let spec = VersionSpec::new("{current_date}-{build_count:03}", "%Y-%m-%d", "America/New_York")
        .unwrap();
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 3, 30, 0).unwrap();

    assert_eq!(spec.resolve(Some("2025-08-31-003"), now), "2025-08-31-004");
    assert_eq!(spec.resolve(Some("2025-08-30-009"), now), "2025-08-31-001");
    assert_eq!(spec.resolve(None, now), "2025-08-31-001");
}

#[test]
fn garbage_previous_resets_but_fails_strict_parse() {
    let spec = VersionSpec::new("{current_date}.{build_count}", "%Y.%m.%d", "UTC").unwrap();
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();

    assert_eq!(spec.resolve(Some("not-a-version"), now), "2025.09.01.1");
    assert!(matches!(
        spec.parse("not-a-version"),
        Err(DomainError::Parse { .. })
    ));
}

#[test]
fn quarterly_scheme_with_suffix() {
    let spec = VersionSpec::new("{current_date}.{build_count}", "%y.%q", "UTC").unwrap();
    let now = Utc.with_ymd_and_hms(2025, 8, 15, 0, 0, 0).unwrap();

    let next = spec.resolve(Some("25.3.7.beta"), now);
    assert_eq!(next, "25.3.8");
    assert_eq!(ReleaseSuffix::Beta.apply(&next), "25.3.8.beta");
    assert_eq!(spec.parse("25.3.8.beta").unwrap().suffix.as_deref(), Some(".beta"));
}

#[test]
fn several_targets_in_one_file_compose() {
    let content = "[project]\nversion = \"2025.08.31.3\"\n\n[tool.bump]\ncurrent = \"2025.08.31.3\"\n";
    let targets = [
        FileTarget::new("pyproject.toml", FileType::Toml, "project.version", None, VersionStandard::Literal)
            .unwrap(),
        FileTarget::new("pyproject.toml", FileType::Toml, "tool.bump.current", None, VersionStandard::Normalized)
            .unwrap(),
    ];

    let mut text = content.to_string();
    for target in &targets {
        let value = target.version_standard().normalize("2025.08.31.4");
        text = target
            .handler()
            .write(&text, target.variable(), &value, target.directive())
            .unwrap()
            .content;
    }

    assert_eq!(
        text,
        "[project]\nversion = \"2025.08.31.4\"\n\n[tool.bump]\ncurrent = \"2025.8.31.4\"\n"
    );
}

#[test]
fn dockerfile_directives_are_independent() {
    let content = "FROM python:3.12\nARG VERSION=2025.08.31.3\nENV VERSION=2025.08.31.3\n";
    let handler = handler_for(FileType::Dockerfile);

    let out = handler
        .write(content, "VERSION", "2025.08.31.4", Some("ENV"))
        .unwrap();

    assert_eq!(
        out.content,
        "FROM python:3.12\nARG VERSION=2025.08.31.3\nENV VERSION=2025.08.31.4\n"
    );
    assert!(FileTarget::new("Dockerfile", FileType::Dockerfile, "VERSION", None, VersionStandard::Literal).is_err());
}
