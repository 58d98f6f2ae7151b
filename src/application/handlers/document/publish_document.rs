//! PublishDocumentHandler - publishes and locks an approved document.

use std::sync::Arc;

use crate::application::services::{TransitionOutcome, WorkflowEngine};
use crate::domain::document::WorkflowError;
use crate::domain::foundation::{CommandMetadata, DocumentId};
use crate::domain::workflow::TransitionRequest;

#[derive(Debug, Clone)]
pub struct PublishDocumentCommand {
    pub document_id: DocumentId,
}

pub struct PublishDocumentHandler {
    engine: Arc<WorkflowEngine>,
}

impl PublishDocumentHandler {
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(
        &self,
        cmd: PublishDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<TransitionOutcome, WorkflowError> {
        self.engine
            .transition(cmd.document_id, TransitionRequest::Publish, &metadata)
            .await
    }
}
