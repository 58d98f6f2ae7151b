//! SubmitForReviewHandler - moves a draft or rejected document into review.

use std::sync::Arc;

use crate::application::services::{TransitionOutcome, WorkflowEngine};
use crate::domain::document::{ChangeClass, WorkflowError};
use crate::domain::foundation::{CommandMetadata, DocumentId};
use crate::domain::workflow::TransitionRequest;

/// Command to submit a document for review.
#[derive(Debug, Clone)]
pub struct SubmitForReviewCommand {
    pub document_id: DocumentId,
    pub change_class: ChangeClass,
    pub version_note: Option<String>,
}

pub struct SubmitForReviewHandler {
    engine: Arc<WorkflowEngine>,
}

impl SubmitForReviewHandler {
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(
        &self,
        cmd: SubmitForReviewCommand,
        metadata: CommandMetadata,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let request = TransitionRequest::SubmitForReview {
            change_class: cmd.change_class,
            version_note: cmd.version_note,
        };
        self.engine.transition(cmd.document_id, request, &metadata).await
    }
}
