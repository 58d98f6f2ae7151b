//! Authentication types for the request boundary.
//!
//! An `AuthenticatedActor` is what the boundary hands to request handlers
//! after validating credentials through the `SessionValidator` port. It says
//! who is calling; what they may do is decided by the authorization checker.

use super::ActorId;
use thiserror::Error;

/// Actor identity established by the authentication boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The actor identifier used throughout the workflow.
    pub id: ActorId,

    /// Display name if the identity provider supplied one.
    pub display_name: Option<String>,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    pub fn new(id: ActorId, display_name: Option<String>) -> Self {
        Self { id, display_name }
    }

    /// Returns the display name, or the actor id as fallback.
    pub fn display_name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Authentication errors that can occur during credential validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The credential is missing, malformed, or unknown.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The authentication service is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
