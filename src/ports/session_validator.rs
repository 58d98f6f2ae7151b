//! Session validation port - authentication at the request boundary.
//!
//! Request handlers trust the actor they are given; establishing that actor
//! from a bearer credential is this port's job. Implementations are
//! provider-agnostic: a static token table for local deployments, or an
//! identity-provider introspection client.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedActor};

/// Validates bearer credentials and extracts the calling actor.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for unknown or malformed credentials
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a bearer token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedActor, AuthError>;
}
