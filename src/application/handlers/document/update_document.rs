//! UpdateDocumentHandler - content edits outside the review transitions.

use std::sync::Arc;

use crate::application::services::WorkflowEngine;
use crate::domain::document::{Document, WorkflowError};
use crate::domain::foundation::{CommandMetadata, DocumentId};
use crate::domain::workflow::ContentEdit;

#[derive(Debug, Clone)]
pub struct UpdateDocumentCommand {
    pub document_id: DocumentId,
    pub edit: ContentEdit,
}

pub struct UpdateDocumentHandler {
    engine: Arc<WorkflowEngine>,
}

impl UpdateDocumentHandler {
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(
        &self,
        cmd: UpdateDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<Document, WorkflowError> {
        self.engine.edit(cmd.document_id, cmd.edit, &metadata).await
    }
}
