//! Data Transfer Objects for the documents API.
//!
//! Request bodies map onto application commands; responses wrap results in
//! the `{ok, message, data}` envelope of `HandlerResponse`.

use serde::{Deserialize, Serialize};

use crate::application::{MergeOutcome, TransitionOutcome};
use crate::domain::document::{
    Attributes, ChangeClass, Classification, Document, HostStatus, VersionNumber, WorkflowStatus,
};
use crate::domain::workflow::ContentEdit;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a draft document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub attributes: Attributes,
    /// Version text such as `"1.3"`.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub version_note: Option<String>,
}

/// Content edit; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub classification: Option<Classification>,
    pub attributes: Option<Attributes>,
    pub version_note: Option<String>,
    pub host_status: Option<HostStatus>,
}

impl From<UpdateDocumentRequest> for ContentEdit {
    fn from(request: UpdateDocumentRequest) -> Self {
        ContentEdit {
            title: request.title,
            body: request.body,
            classification: request.classification,
            attributes: request.attributes,
            version_note: request.version_note,
            host_status: request.host_status,
        }
    }
}

/// Request to submit a document for review.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubmitForReviewRequest {
    pub change_class: ChangeClass,
    pub version_note: Option<String>,
}

/// Reviewer decision comment. Optional for approvals, required for rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DecisionRequest {
    pub comment: String,
}

/// Request to open a revision of a published document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateRevisionRequest {
    pub change_class: ChangeClass,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Result of a review transition.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResponse {
    pub status: WorkflowStatus,
    pub version: VersionNumber,
    pub approval_count: usize,
    pub document: Document,
}

impl From<TransitionOutcome> for TransitionResponse {
    fn from(outcome: TransitionOutcome) -> Self {
        Self {
            status: outcome.status,
            version: outcome.version,
            approval_count: outcome.approval_count,
            document: outcome.document,
        }
    }
}

/// Result of merging a revision into its parent.
#[derive(Debug, Clone, Serialize)]
pub struct MergeResponse {
    pub parent: Document,
    pub revision: Document,
    pub resumed: bool,
}

impl From<MergeOutcome> for MergeResponse {
    fn from(outcome: MergeOutcome) -> Self {
        Self {
            parent: outcome.parent,
            revision: outcome.revision,
            resumed: outcome.resumed,
        }
    }
}
