//! Workflow error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::WorkflowStatus;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, InvalidTransition, ValidationError};

/// Machine-readable reason a workflow action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotAuthorized,
    InvalidState,
    InsufficientApprovals,
    MissingComment,
    RevisionExists,
    NotFound,
    StoreWriteFailed,
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotAuthorized => "not_authorized",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::InsufficientApprovals => "insufficient_approvals",
            ErrorKind::MissingComment => "missing_comment",
            ErrorKind::RevisionExists => "revision_exists",
            ErrorKind::NotFound => "not_found",
            ErrorKind::StoreWriteFailed => "store_write_failed",
            ErrorKind::Validation => "validation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by workflow and revision operations.
///
/// Every variant is a refusal reported to the caller; none are retried
/// automatically except the bounded compare-and-set loop in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Publishing requires at least 2 approvals from distinct reviewers, found {found}")]
    InsufficientApprovals { found: usize },

    #[error("A non-empty comment is required to reject a document")]
    MissingComment,

    #[error("Document {parent_id} already has an open revision ({revision_id})")]
    RevisionExists {
        parent_id: DocumentId,
        revision_id: DocumentId,
    },

    #[error("Store write failed: {0}")]
    StoreWriteFailed(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl WorkflowError {
    pub fn not_found(id: DocumentId) -> Self {
        WorkflowError::NotFound(id.to_string())
    }

    pub fn not_authorized(message: impl Into<String>) -> Self {
        WorkflowError::NotAuthorized(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        WorkflowError::InvalidState(message.into())
    }

    pub fn store_write_failed(message: impl Into<String>) -> Self {
        WorkflowError::StoreWriteFailed(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::NotFound(_) => ErrorKind::NotFound,
            WorkflowError::NotAuthorized(_) => ErrorKind::NotAuthorized,
            WorkflowError::InvalidState(_) => ErrorKind::InvalidState,
            WorkflowError::InsufficientApprovals { .. } => ErrorKind::InsufficientApprovals,
            WorkflowError::MissingComment => ErrorKind::MissingComment,
            WorkflowError::RevisionExists { .. } => ErrorKind::RevisionExists,
            WorkflowError::StoreWriteFailed(_) => ErrorKind::StoreWriteFailed,
            WorkflowError::Validation(_) => ErrorKind::Validation,
        }
    }
}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::NotFound | ErrorCode::DocumentNotFound => WorkflowError::NotFound(err.message),
            ErrorCode::Unauthorized | ErrorCode::Forbidden => WorkflowError::NotAuthorized(err.message),
            ErrorCode::InvalidStateTransition => WorkflowError::InvalidState(err.message),
            ErrorCode::ValidationFailed => {
                let field = err.details.get("field").cloned().unwrap_or_else(|| "input".to_string());
                WorkflowError::Validation(ValidationError::invalid_format(field, err.message))
            }
            ErrorCode::ConcurrencyConflict | ErrorCode::DatabaseError | ErrorCode::InternalError => {
                WorkflowError::StoreWriteFailed(err.to_string())
            }
        }
    }
}

impl From<InvalidTransition<WorkflowStatus>> for WorkflowError {
    fn from(err: InvalidTransition<WorkflowStatus>) -> Self {
        WorkflowError::InvalidState(format!("cannot move from {} to {}", err.from, err.to))
    }
}
