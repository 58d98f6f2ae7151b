//! Document workflow events.
//!
//! Published through the notifier port after a transition has been written:
//! - `DocumentSubmittedForReview`
//! - `DocumentApproved`
//! - `DocumentRejected`
//! - `FinalApprovalRequested`
//! - `DocumentPublished`
//! - `RevisionCreated`
//! - `RevisionPublished`

use serde::{Deserialize, Serialize};

use super::{ChangeClass, VersionNumber, WorkflowStatus};
use crate::domain::foundation::{domain_event, ActorId, DocumentId, EventId, Timestamp};

// ════════════════════════════════════════════════════════════════════════════
// DocumentSubmittedForReview
// ════════════════════════════════════════════════════════════════════════════

/// Published when a draft or rejected document enters review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSubmittedForReview {
    pub event_id: EventId,
    pub document_id: DocumentId,
    pub actor_id: ActorId,
    /// Version the document carries for this review cycle.
    pub version: VersionNumber,
    pub submitted_at: Timestamp,
}

domain_event!(
    DocumentSubmittedForReview,
    event_type = "document.submitted_for_review",
    aggregate_id = document_id,
    aggregate_type = "Document",
    occurred_at = submitted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// DocumentApproved
// ════════════════════════════════════════════════════════════════════════════

/// Published for every recorded approval, not only the one that completes
/// the dual-approval gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentApproved {
    pub event_id: EventId,
    pub document_id: DocumentId,
    pub actor_id: ActorId,
    pub approval_count: usize,
    /// Status after the approval was recorded.
    pub status: WorkflowStatus,
    pub approved_at: Timestamp,
}

domain_event!(
    DocumentApproved,
    event_type = "document.approved",
    aggregate_id = document_id,
    aggregate_type = "Document",
    occurred_at = approved_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// DocumentRejected
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRejected {
    pub event_id: EventId,
    pub document_id: DocumentId,
    pub actor_id: ActorId,
    pub comment: String,
    pub rejected_at: Timestamp,
}

domain_event!(
    DocumentRejected,
    event_type = "document.rejected",
    aggregate_id = document_id,
    aggregate_type = "Document",
    occurred_at = rejected_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// FinalApprovalRequested
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalApprovalRequested {
    pub event_id: EventId,
    pub document_id: DocumentId,
    pub actor_id: ActorId,
    pub requested_at: Timestamp,
}

domain_event!(
    FinalApprovalRequested,
    event_type = "document.final_approval_requested",
    aggregate_id = document_id,
    aggregate_type = "Document",
    occurred_at = requested_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// DocumentPublished
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPublished {
    pub event_id: EventId,
    pub document_id: DocumentId,
    pub actor_id: ActorId,
    pub version: VersionNumber,
    pub published_at: Timestamp,
}

domain_event!(
    DocumentPublished,
    event_type = "document.published",
    aggregate_id = document_id,
    aggregate_type = "Document",
    occurred_at = published_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// RevisionCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published on the parent when a revision is opened against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionCreated {
    pub event_id: EventId,
    pub parent_id: DocumentId,
    pub revision_id: DocumentId,
    pub actor_id: ActorId,
    pub change_class: ChangeClass,
    pub current_version: VersionNumber,
    pub next_version: VersionNumber,
    pub created_at: Timestamp,
}

domain_event!(
    RevisionCreated,
    event_type = "document.revision_created",
    aggregate_id = parent_id,
    aggregate_type = "Document",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// RevisionPublished
// ════════════════════════════════════════════════════════════════════════════

/// Published once a revision has been merged and archived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionPublished {
    pub event_id: EventId,
    pub parent_id: DocumentId,
    pub revision_id: DocumentId,
    pub actor_id: ActorId,
    pub version: VersionNumber,
    pub published_at: Timestamp,
}

domain_event!(
    RevisionPublished,
    event_type = "document.revision_published",
    aggregate_id = parent_id,
    aggregate_type = "Document",
    occurred_at = published_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainEvent, SerializableDomainEvent};

    #[test]
    fn revision_events_are_keyed_by_parent() {
        let parent_id = DocumentId::new();
        let event = RevisionCreated {
            event_id: EventId::new(),
            parent_id,
            revision_id: DocumentId::new(),
            actor_id: ActorId::new("author-1").unwrap(),
            change_class: ChangeClass::Minor,
            current_version: VersionNumber::new(1, 0),
            next_version: VersionNumber::new(1, 1),
            created_at: Timestamp::now(),
        };

        assert_eq!(event.event_type(), "document.revision_created");
        assert_eq!(event.aggregate_id(), parent_id.to_string());

        let envelope = event.to_envelope().unwrap();
        assert_eq!(envelope.aggregate_type, "Document");
        assert_eq!(envelope.payload["next_version"], "1.1");
    }

    #[test]
    fn approval_event_carries_resulting_status() {
        let event = DocumentApproved {
            event_id: EventId::new(),
            document_id: DocumentId::new(),
            actor_id: ActorId::new("reviewer-a").unwrap(),
            approval_count: 2,
            status: WorkflowStatus::Approved,
            approved_at: Timestamp::now(),
        };
        let envelope = event.to_envelope().unwrap();
        assert_eq!(envelope.event_type, "document.approved");
        assert_eq!(envelope.payload["status"], "approved");
    }
}
