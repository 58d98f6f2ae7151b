//! Approval decisions and the approval log.
//!
//! The log is cycle-scoped for a document under review: submitting resets
//! it. After a revision merge the parent's log also holds separator entries
//! that delimit which revision cycle the following decisions came from. Only
//! the entries after the last separator belong to the open cycle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::VersionNumber;
use crate::domain::foundation::{ActorId, DocumentId, Timestamp};

/// Outcome of a reviewer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

/// One actor's decision within one review cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub actor_id: ActorId,
    pub timestamp: Timestamp,
    pub decision: Decision,
    #[serde(default)]
    pub comment: String,
    pub version_at_decision: VersionNumber,
}

impl Approval {
    pub fn new(
        actor_id: ActorId,
        decision: Decision,
        comment: impl Into<String>,
        version_at_decision: VersionNumber,
    ) -> Self {
        Self {
            actor_id,
            timestamp: Timestamp::now(),
            decision,
            comment: comment.into(),
            version_at_decision,
        }
    }
}

/// Synthetic marker inserted when a revision's approvals are merged into its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSeparator {
    pub revision_id: DocumentId,
    pub version: VersionNumber,
    pub note: String,
    pub timestamp: Timestamp,
}

/// An entry of a document's approval log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ApprovalEntry {
    #[serde(rename = "decision")]
    Decision(Approval),
    #[serde(rename = "revision_separator")]
    RevisionSeparator(RevisionSeparator),
}

impl ApprovalEntry {
    pub fn as_decision(&self) -> Option<&Approval> {
        match self {
            ApprovalEntry::Decision(approval) => Some(approval),
            ApprovalEntry::RevisionSeparator(_) => None,
        }
    }

    pub fn is_separator_for(&self, revision_id: DocumentId) -> bool {
        matches!(self, ApprovalEntry::RevisionSeparator(sep) if sep.revision_id == revision_id)
    }
}

/// Entries belonging to the open review cycle.
pub fn current_cycle(entries: &[ApprovalEntry]) -> &[ApprovalEntry] {
    let start = entries
        .iter()
        .rposition(|e| matches!(e, ApprovalEntry::RevisionSeparator(_)))
        .map(|i| i + 1)
        .unwrap_or(0);
    &entries[start..]
}

/// Number of distinct actors whose current decision is `approved`.
pub fn approval_count(entries: &[ApprovalEntry]) -> usize {
    current_cycle(entries)
        .iter()
        .filter_map(ApprovalEntry::as_decision)
        .filter(|a| a.decision == Decision::Approved)
        .map(|a| &a.actor_id)
        .collect::<BTreeSet<_>>()
        .len()
}

/// True when someone rejected the document in the open cycle.
pub fn has_rejection(entries: &[ApprovalEntry]) -> bool {
    current_cycle(entries)
        .iter()
        .filter_map(ApprovalEntry::as_decision)
        .any(|a| a.decision == Decision::Rejected)
}

/// Records `approval`, replacing the same actor's decision in the open cycle.
///
/// Returns true when an existing decision was replaced.
pub fn upsert_decision(entries: &mut Vec<ApprovalEntry>, approval: Approval) -> bool {
    let offset = entries.len() - current_cycle(entries).len();
    let existing = entries[offset..].iter().position(|e| {
        e.as_decision()
            .map(|a| a.actor_id == approval.actor_id)
            .unwrap_or(false)
    });

    match existing {
        Some(i) => {
            entries[offset + i] = ApprovalEntry::Decision(approval);
            true
        }
        None => {
            entries.push(ApprovalEntry::Decision(approval));
            false
        }
    }
}
