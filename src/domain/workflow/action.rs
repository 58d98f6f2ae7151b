//! Actions an actor can request on a document.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Capability;

/// Workflow actions, as presented to the authorization checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Edit,
    SubmitForReview,
    Approve,
    Reject,
    RequestFinalApproval,
    Publish,
    CreateRevision,
    PublishRevision,
}

impl WorkflowAction {
    /// Capability an actor needs for this action.
    ///
    /// Editing-type actions depend on whether the actor authored the document.
    pub fn required_capability(&self, is_author: bool) -> Capability {
        match self {
            WorkflowAction::Edit
            | WorkflowAction::SubmitForReview
            | WorkflowAction::RequestFinalApproval => {
                if is_author {
                    Capability::EditOwnDocuments
                } else {
                    Capability::EditOthersDocuments
                }
            }
            WorkflowAction::Approve | WorkflowAction::Reject => Capability::ApproveDocuments,
            WorkflowAction::Publish | WorkflowAction::PublishRevision => Capability::PublishDocuments,
            WorkflowAction::CreateRevision => Capability::CreateRevisions,
        }
    }

    /// Whether a locked target restricts this action to admin-tier actors.
    ///
    /// Opening a revision is how non-admins propose changes to a locked
    /// document, so it is the one action the lock does not gate.
    pub fn is_gated_by_lock(&self) -> bool {
        !matches!(self, WorkflowAction::CreateRevision)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::Edit => "edit",
            WorkflowAction::SubmitForReview => "submit_for_review",
            WorkflowAction::Approve => "approve",
            WorkflowAction::Reject => "reject",
            WorkflowAction::RequestFinalApproval => "request_final_approval",
            WorkflowAction::Publish => "publish",
            WorkflowAction::CreateRevision => "create_revision",
            WorkflowAction::PublishRevision => "publish_revision",
        }
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
