// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::error::ErrorCategory;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep copies)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Configuration Errors (detected when a VersionSpec/FileTarget is built)
    // ========================================================================
    #[error("invalid version format '{format}': {reason}")]
    InvalidVersionFormat { format: String, reason: String },

    #[error("invalid date format '{format}': {reason}")]
    InvalidDateFormat { format: String, reason: String },

    #[error("unknown timezone '{name}'")]
    UnknownTimezone { name: String },

    #[error("invalid file target: {0}")]
    InvalidTarget(String),

    #[error("unsupported file type '{0}'")]
    UnsupportedFileType(String),

    #[error("unknown version standard '{0}'")]
    UnknownVersionStandard(String),

    // ========================================================================
    // Parse Errors
    // ========================================================================
    #[error("version '{version}' does not match '{format}': {reason}")]
    Parse {
        version: String,
        format: String,
        reason: String,
    },

    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("'{0}' is not an operation id (expected YYYYMMDDTHHMMSSffffff_NNNN)")]
    InvalidOperationId(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("{}", not_found_message(variable, directive.as_deref()))]
    VariableNotFound {
        variable: String,
        directive: Option<String>,
    },
}

fn not_found_message(variable: &str, directive: Option<&str>) -> String {
    match directive {
        Some(d) => format!("variable '{variable}' not found under directive '{d}'"),
        None => format!("variable '{variable}' not found"),
    }
}

impl DomainError {
    /// Shorthand used by the format handlers.
    pub(crate) fn not_found(variable: &str, directive: Option<&str>) -> Self {
        Self::VariableNotFound {
            variable: variable.to_string(),
            directive: directive.map(str::to_string),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidVersionFormat { .. } => vec![
                "Use {current_date} exactly once and {build_count} at most once".into(),
                "Zero-pad the build count with {build_count:03}".into(),
                "Write literal braces as {{ and }}".into(),
            ],
            Self::InvalidDateFormat { .. } => vec![
                "Supported tokens: %Y %y %m %d %q %V %j %%".into(),
                "Example: date_format = \"%Y.%m.%d\"".into(),
            ],
            Self::UnknownTimezone { name } => vec![
                format!("'{}' is not an IANA timezone name", name),
                "Examples: UTC, America/New_York, Europe/London".into(),
            ],
            Self::UnsupportedFileType(_) => vec![
                "Supported file types:".into(),
                "  python, toml, yaml, json, setup.cfg, xml,".into(),
                "  makefile, properties, env, dockerfile".into(),
            ],
            Self::Parse { version, .. } => vec![
                format!("The current version '{}' does not follow the configured format", version),
                "Fix the version in the first configured file, or adjust [version] format".into(),
            ],
            Self::VariableNotFound { variable, .. } => vec![
                format!("Add '{}' to the file or correct the 'variable' setting", variable),
                "Nested keys use dots, e.g. project.version".into(),
            ],
            Self::MalformedDocument { .. } => {
                vec!["The file could not be scanned; check its syntax".into()]
            }
            Self::InvalidOperationId(_) => vec![
                "List recorded operations with: calbump history".into(),
                "Omit the id to undo the most recent operation".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidVersionFormat { .. }
            | Self::InvalidDateFormat { .. }
            | Self::UnknownTimezone { .. }
            | Self::InvalidTarget(_)
            | Self::UnsupportedFileType(_)
            | Self::UnknownVersionStandard(_) => ErrorCategory::Configuration,
            Self::Parse { .. }
            | Self::MalformedDocument { .. }
            | Self::InvalidOperationId(_) => ErrorCategory::Validation,
            Self::VariableNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}
