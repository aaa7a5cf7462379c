// ============================================================================
// domain/error.rs - DOMAIN ERROR TAXONOMY
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the scaffold service re-plans after a write race)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Every variant is raised before the emitter touches the filesystem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Input Errors (400-level equivalent)
    // ========================================================================
    #[error("invalid domain name '{name}': {reason}")]
    InvalidDomainName { name: String, reason: String },

    #[error("unknown artifact kind '{kind}'")]
    UnknownArtifactKind { kind: String },

    #[error("artifact '{kind}' requires parameter '{param}'")]
    MissingRequiredParam { kind: String, param: &'static str },

    #[error("invalid saga step '{step}': {reason}")]
    InvalidSagaStep { step: String, reason: String },

    #[error("artifact '{kind}' does not accept variant '{variant}'")]
    InvalidArtifactVariant { kind: String, variant: String },

    #[error("invalid {field} '{value}': must start with a letter and contain only letters and digits")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("unknown generation type '{value}'")]
    UnknownGenerationMode { value: String },

    // ========================================================================
    // Structural Errors (409-level equivalent)
    // ========================================================================
    #[error("{dependent} at {path} references event '{event}' which is neither present nor planned")]
    DanglingEventReference {
        dependent: String,
        path: String,
        event: String,
    },

    #[error("{dependent} at {path} references '{referenced}' which is neither present nor planned")]
    DanglingReference {
        dependent: String,
        path: String,
        referenced: String,
    },

    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("template for '{kind}' has no content")]
    EmptyTemplate { kind: String },

    #[error("absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidDomainName { name, .. } => vec![
                format!("'{}' cannot be used as a domain name", name),
                "Domain names start with a letter and contain only letters and digits".into(),
                "Examples: invoice, purchaseOrder, customer2".into(),
            ],
            Self::UnknownArtifactKind { kind } => vec![
                format!("No template is registered for '{}'", kind),
                "Try: cqrsgen list".into(),
            ],
            Self::MissingRequiredParam { kind, param } => match *param {
                "sagaSteps" => vec![
                    format!("{} needs at least one saga step", kind),
                    "Pass steps with --saga-step NAME or --saga-step NAME:compensate".into(),
                ],
                "mode" => vec![
                    "Interactive requests must be resolved to a generation type first".into(),
                    "Pass a type: crud, create, update, delete, query, event, saga".into(),
                ],
                _ => vec![format!("Provide '{}' for {}", param, kind)],
            },
            Self::InvalidSagaStep { .. } => vec![
                "Saga step names start with a letter and contain only letters and digits".into(),
                "Step names must be unique within a saga".into(),
            ],
            Self::UnknownGenerationMode { .. } => vec![
                "Supported types: crud, create, update, delete, query, event, saga".into(),
            ],
            Self::DanglingEventReference { event, .. } => vec![
                format!("The event class '{}' does not exist yet", event),
                "Generate the events first: cqrsgen scaffold <domain> event".into(),
                "Or scaffold the whole domain: cqrsgen scaffold <domain> crud".into(),
            ],
            Self::DanglingReference { referenced, .. } => vec![
                format!("'{}' must exist before this artifact can be generated", referenced),
                "Scaffold the whole domain: cqrsgen scaffold <domain> crud".into(),
            ],
            Self::EmptyTemplate { kind } => vec![
                format!("The override template for '{}' is empty", kind),
                "Remove the file or give it content".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDomainName { .. }
            | Self::MissingRequiredParam { .. }
            | Self::InvalidSagaStep { .. }
            | Self::InvalidArtifactVariant { .. }
            | Self::UnknownGenerationMode { .. }
            | Self::InvalidIdentifier { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::DanglingEventReference { .. } | Self::DanglingReference { .. } => {
                ErrorCategory::Structural
            }
            Self::UnknownArtifactKind { .. } => ErrorCategory::NotFound,
            Self::EmptyTemplate { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Structural,
    NotFound,
    Internal,
}
