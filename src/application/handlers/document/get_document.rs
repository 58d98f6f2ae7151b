//! GetDocumentHandler - reads one document.

use std::sync::Arc;

use crate::application::services::WorkflowEngine;
use crate::domain::document::{Document, WorkflowError};
use crate::domain::foundation::DocumentId;

#[derive(Debug, Clone)]
pub struct GetDocumentQuery {
    pub document_id: DocumentId,
}

pub struct GetDocumentHandler {
    engine: Arc<WorkflowEngine>,
}

impl GetDocumentHandler {
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(&self, query: GetDocumentQuery) -> Result<Document, WorkflowError> {
        self.engine.get(query.document_id).await
    }
}
