//! CreateDocumentHandler - creates a draft document.

use std::sync::Arc;

use crate::application::services::{NewDocument, WorkflowEngine};
use crate::domain::document::{Attributes, Classification, Document, VersionNumber, WorkflowError};
use crate::domain::foundation::CommandMetadata;

/// Command to create a document. The caller becomes its author.
#[derive(Debug, Clone, Default)]
pub struct CreateDocumentCommand {
    pub title: String,
    pub body: String,
    pub slug: Option<String>,
    pub classification: Classification,
    pub attributes: Attributes,
    /// Version text such as `"1.3"`; absent means `0.0`.
    pub version: Option<String>,
    pub version_note: Option<String>,
}

pub struct CreateDocumentHandler {
    engine: Arc<WorkflowEngine>,
}

impl CreateDocumentHandler {
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(
        &self,
        cmd: CreateDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<Document, WorkflowError> {
        let version = match cmd.version.as_deref() {
            Some(raw) => Some(VersionNumber::parse_or_initial(Some(raw))?),
            None => None,
        };
        let input = NewDocument {
            title: cmd.title,
            body: cmd.body,
            slug: cmd.slug,
            classification: cmd.classification,
            attributes: cmd.attributes,
            version,
            version_note: cmd.version_note,
        };
        self.engine.create(input, &metadata).await
    }
}
