//! RejectDocumentHandler - sends a document back to its author.

use std::sync::Arc;

use crate::application::services::{TransitionOutcome, WorkflowEngine};
use crate::domain::document::WorkflowError;
use crate::domain::foundation::{CommandMetadata, DocumentId};
use crate::domain::workflow::TransitionRequest;

/// Command to reject a document under review. The comment is required.
#[derive(Debug, Clone)]
pub struct RejectDocumentCommand {
    pub document_id: DocumentId,
    pub comment: String,
}

pub struct RejectDocumentHandler {
    engine: Arc<WorkflowEngine>,
}

impl RejectDocumentHandler {
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(
        &self,
        cmd: RejectDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let request = TransitionRequest::Reject { comment: cmd.comment };
        self.engine.transition(cmd.document_id, request, &metadata).await
    }
}
