//! Unified error handling for Calbump Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Calbump Core operations.
///
/// This enum wraps all possible errors that can occur when using calbump-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum CalbumpError {
    /// Errors from the domain layer (configuration, parsing, missing keys).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (I/O, rollback, history, undo).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CalbumpError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check calbump.toml and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in calbump".into(),
                "Please report this issue at: https://github.com/cosecruz/calbump/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// True when the failure happened before any file was touched.
    pub fn is_side_effect_free(&self) -> bool {
        !matches!(
            self,
            Self::Application(
                ApplicationError::RolledBack { .. }
                    | ApplicationError::RollbackFailed { .. }
                    | ApplicationError::RestoreFailed { .. }
                    | ApplicationError::HistoryWriteFailed { .. }
            )
        )
    }
}

/// Error categories for UI display and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input did not satisfy a precondition (bad baseline version, bad target).
    Validation,
    /// A file, key, or history record does not exist.
    NotFound,
    /// The version scheme or target list is malformed.
    Configuration,
    /// A write failed and the transaction was rolled back.
    RolledBack,
    /// I/O failures and bugs.
    Internal,
}

/// Convenient result type alias.
pub type CalbumpResult<T> = Result<T, CalbumpError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn domain_categories_pass_through() {
        let err: CalbumpError = DomainError::VariableNotFound {
            variable: "__version__".into(),
            directive: None,
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.is_side_effect_free());
    }

    #[test]
    fn rolled_back_is_not_side_effect_free() {
        let err: CalbumpError = ApplicationError::RolledBack {
            path: PathBuf::from("a.toml"),
            reason: "disk full".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::RolledBack);
        assert!(!err.is_side_effect_free());
    }
}
