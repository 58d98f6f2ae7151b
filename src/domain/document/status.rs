//! Workflow and host-level status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Domain-level lifecycle state of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    PendingReview,
    PendingFinalApproval,
    Approved,
    Rejected,
    Published,
    /// Published and frozen; kept for records that carry the legacy value.
    Locked,
    /// Terminal state of a revision that has been merged into its parent.
    Archived,
}

impl WorkflowStatus {
    /// Statuses from which submit-for-review is allowed.
    pub fn accepts_submission(&self) -> bool {
        matches!(self, WorkflowStatus::Draft | WorkflowStatus::Rejected)
    }

    /// Statuses in which approve/reject decisions are recorded.
    pub fn is_under_review(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::PendingReview | WorkflowStatus::PendingFinalApproval
        )
    }

    /// Statuses that count as "has been published" for revision purposes.
    pub fn is_published(&self) -> bool {
        matches!(self, WorkflowStatus::Published | WorkflowStatus::Locked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Draft => "draft",
            WorkflowStatus::PendingReview => "pending_review",
            WorkflowStatus::PendingFinalApproval => "pending_final_approval",
            WorkflowStatus::Approved => "approved",
            WorkflowStatus::Rejected => "rejected",
            WorkflowStatus::Published => "published",
            WorkflowStatus::Locked => "locked",
            WorkflowStatus::Archived => "archived",
        }
    }
}

impl StateMachine for WorkflowStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use WorkflowStatus::*;
        match self {
            Draft => vec![PendingReview],
            Rejected => vec![PendingReview],
            PendingReview => vec![PendingFinalApproval, Approved, Rejected],
            PendingFinalApproval => vec![Approved, Rejected],
            Approved => vec![Published, Archived],
            Published | Locked => vec![Published],
            Archived => vec![],
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publish state as the host platform sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HostStatus {
    #[default]
    Draft,
    Pending,
    Published,
    Trashed,
}

impl HostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostStatus::Draft => "draft",
            HostStatus::Pending => "pending",
            HostStatus::Published => "published",
            HostStatus::Trashed => "trashed",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
