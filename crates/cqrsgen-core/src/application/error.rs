//! Application layer errors.
//!
//! These errors represent failures while scanning or emitting, not planning.
//! Planning errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A no-clobber write found a file at the target. Raised by filesystem
    /// adapters; the emitter turns it into `WriteConflict`.
    #[error("file already exists: {path}")]
    FileExists { path: PathBuf },

    /// Another writer created a planned file between scan and write.
    #[error("{kind}: {path} appeared after the directory was scanned")]
    WriteConflict { kind: String, path: PathBuf },

    /// The write race repeated after the single re-plan.
    #[error("{kind}: {path} was modified concurrently twice; giving up")]
    ConcurrentModification { kind: String, path: PathBuf },

    /// An aggregation file exists but lacks the list to merge into.
    #[error("{kind}: anchor '{anchor}' not found in {path}")]
    MergeAnchorNotFound {
        kind: String,
        path: PathBuf,
        anchor: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// In-memory store access failed (lock poisoned).
    #[error("Filesystem store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::WriteConflict { path, .. } | Self::FileExists { path } => vec![
                format!("{} was created by another process", path.display()),
                "Re-run the command; existing files are skipped".into(),
            ],
            Self::ConcurrentModification { .. } => vec![
                "Another process is writing to the same domain".into(),
                "Wait for it to finish, then re-run the command".into(),
            ],
            Self::MergeAnchorNotFound { path, anchor, .. } => vec![
                format!("{} must contain '{}'", path.display(), anchor),
                "Restore the list declaration, or delete the file to regenerate it".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check the --root directory".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileExists { .. }
            | Self::WriteConflict { .. }
            | Self::ConcurrentModification { .. } => ErrorCategory::Conflict,
            Self::MergeAnchorNotFound { .. } => ErrorCategory::Structural,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }

    /// Shorthand used by adapters to wrap `std::io::Error`.
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
