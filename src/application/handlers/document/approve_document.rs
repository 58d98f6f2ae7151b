//! ApproveDocumentHandler - records an approval decision.

use std::sync::Arc;

use crate::application::services::{TransitionOutcome, WorkflowEngine};
use crate::domain::document::WorkflowError;
use crate::domain::foundation::{CommandMetadata, DocumentId};
use crate::domain::workflow::TransitionRequest;

/// Command to approve a document under review.
#[derive(Debug, Clone)]
pub struct ApproveDocumentCommand {
    pub document_id: DocumentId,
    pub comment: String,
}

pub struct ApproveDocumentHandler {
    engine: Arc<WorkflowEngine>,
}

impl ApproveDocumentHandler {
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(
        &self,
        cmd: ApproveDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let request = TransitionRequest::Approve { comment: cmd.comment };
        self.engine.transition(cmd.document_id, request, &metadata).await
    }
}
