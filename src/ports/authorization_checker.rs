//! Authorization checker port - capability lookups supplied by the host.
//!
//! The workflow never sees role names. The checker answers two questions:
//! which capabilities an actor holds, and whether an actor may perform an
//! action on a particular document. The engine re-checks the lock gate on
//! top of the answer.

use async_trait::async_trait;

use crate::domain::document::Document;
use crate::domain::foundation::{ActorId, CapabilitySet, DomainError};
use crate::domain::workflow::WorkflowAction;

/// Port for capability checks.
///
/// Implementations should fail secure: on any lookup error, return an error
/// or deny, never allow.
#[async_trait]
pub trait AuthorizationChecker: Send + Sync {
    /// Capabilities held by `actor`. Unknown actors hold none.
    async fn capabilities(&self, actor: &ActorId) -> Result<CapabilitySet, DomainError>;

    /// Whether `actor` may perform `action` on `document`.
    async fn can(
        &self,
        actor: &ActorId,
        action: WorkflowAction,
        document: &Document,
    ) -> Result<bool, DomainError>;
}
