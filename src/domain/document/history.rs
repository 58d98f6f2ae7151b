//! Append-only revision history.

use serde::{Deserialize, Serialize};

use super::{ChangeClass, VersionNumber};
use crate::domain::foundation::{ActorId, DocumentId, Timestamp};

/// What happened, with the data specific to each kind of entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HistoryEvent {
    SubmittedForReview,
    Approved,
    Rejected,
    FinalApprovalRequested,
    Published,
    /// Recorded on the parent when a revision is opened against it.
    RevisionCreated {
        change_class: ChangeClass,
        current_version: VersionNumber,
        next_version: VersionNumber,
    },
    /// Delimits entries migrated from a merged revision.
    RevisionSeparator { note: String },
    RevisionPublished,
}

impl HistoryEvent {
    /// Human-facing label stored alongside the entry.
    pub fn label(&self) -> String {
        match self {
            HistoryEvent::SubmittedForReview => "Submitted for review".to_string(),
            HistoryEvent::Approved => "Approved".to_string(),
            HistoryEvent::Rejected => "Rejected".to_string(),
            HistoryEvent::FinalApprovalRequested => "Submitted for final approval".to_string(),
            HistoryEvent::Published => "Published".to_string(),
            HistoryEvent::RevisionCreated { change_class, .. } => {
                format!("Revision created for {} version change", change_class)
            }
            HistoryEvent::RevisionSeparator { note } => note.clone(),
            HistoryEvent::RevisionPublished => "Revision published".to_string(),
        }
    }
}

/// One line of a document's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sequence_number: u32,
    pub actor_id: ActorId,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub event: HistoryEvent,
    pub status_label: String,
    pub version_number: VersionNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<DocumentId>,
    /// Set on entries migrated from a revision during merge.
    #[serde(default)]
    pub from_revision: bool,
}

impl HistoryEntry {
    pub fn new(
        sequence_number: u32,
        actor_id: ActorId,
        event: HistoryEvent,
        version_number: VersionNumber,
    ) -> Self {
        Self {
            sequence_number,
            actor_id,
            timestamp: Timestamp::now(),
            status_label: event.label(),
            event,
            version_number,
            revision_id: None,
            from_revision: false,
        }
    }

    pub fn with_revision(mut self, revision_id: DocumentId) -> Self {
        self.revision_id = Some(revision_id);
        self
    }

    pub fn is_separator_for(&self, revision_id: DocumentId) -> bool {
        matches!(self.event, HistoryEvent::RevisionSeparator { .. })
            && self.revision_id == Some(revision_id)
    }
}

/// Sequence number the next appended entry receives.
pub fn next_sequence(history: &[HistoryEntry]) -> u32 {
    u32::try_from(history.len()).unwrap_or(u32::MAX).saturating_add(1)
}

/// Appends `event` with the next sequence number.
pub fn append(
    history: &mut Vec<HistoryEntry>,
    actor_id: ActorId,
    event: HistoryEvent,
    version_number: VersionNumber,
    revision_id: Option<DocumentId>,
) {
    let mut entry = HistoryEntry::new(next_sequence(history), actor_id, event, version_number);
    entry.revision_id = revision_id;
    history.push(entry);
}
