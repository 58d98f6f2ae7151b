//! Proof that a write to host-level `published` comes from a publish action.

use crate::domain::foundation::{ActorId, DocumentId};

/// Which publish procedure produced the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOrigin {
    /// An approved document published directly.
    Approval,
    /// An approved revision merged into its parent.
    RevisionMerge { revision_id: DocumentId },
}

/// Capability token threaded into the host-status write.
///
/// Only the workflow engine and the revision manager can build one, after
/// their publish guards have passed. A content edit never carries one, so an
/// edit that tries to set the host status to published is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishContext {
    actor_id: ActorId,
    origin: PublishOrigin,
}

impl PublishContext {
    pub(crate) fn for_approval(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            origin: PublishOrigin::Approval,
        }
    }

    pub(crate) fn for_revision_merge(actor_id: ActorId, revision_id: DocumentId) -> Self {
        Self {
            actor_id,
            origin: PublishOrigin::RevisionMerge { revision_id },
        }
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    pub fn origin(&self) -> PublishOrigin {
        self.origin
    }
}
