//! CreateRevisionHandler - opens a revision of a published document.

use std::sync::Arc;

use crate::application::services::RevisionManager;
use crate::domain::document::{ChangeClass, Document, WorkflowError};
use crate::domain::foundation::{CommandMetadata, DocumentId};

#[derive(Debug, Clone)]
pub struct CreateRevisionCommand {
    pub parent_id: DocumentId,
    pub change_class: ChangeClass,
}

pub struct CreateRevisionHandler {
    revisions: Arc<RevisionManager>,
}

impl CreateRevisionHandler {
    pub fn new(revisions: Arc<RevisionManager>) -> Self {
        Self { revisions }
    }

    /// Returns the new revision.
    pub async fn handle(
        &self,
        cmd: CreateRevisionCommand,
        metadata: CommandMetadata,
    ) -> Result<Document, WorkflowError> {
        self.revisions
            .create(cmd.parent_id, cmd.change_class, &metadata)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::document::test_support::{meta, published, services};
    use crate::domain::document::{ErrorKind, VersionNumber, WorkflowStatus};

    #[tokio::test]
    async fn locked_parent_still_accepts_revisions_from_authors() {
        let services = services();
        let parent = published(&services).await;
        assert!(parent.is_locked());
        let handler = CreateRevisionHandler::new(services.revisions.clone());

        let revision = handler
            .handle(
                CreateRevisionCommand {
                    parent_id: parent.id(),
                    change_class: ChangeClass::Minor,
                },
                meta("alice"),
            )
            .await
            .unwrap();

        assert_eq!(revision.workflow_status(), WorkflowStatus::Draft);
        assert_eq!(revision.version_number(), VersionNumber::new(0, 2));
        assert!(revision.approvals().is_empty());
        assert!(revision.revision_history().is_empty());
        assert!(!revision.is_locked());
    }

    #[tokio::test]
    async fn missing_parent_is_not_found() {
        let services = services();
        let err = CreateRevisionHandler::new(services.revisions.clone())
            .handle(
                CreateRevisionCommand {
                    parent_id: DocumentId::new(),
                    change_class: ChangeClass::Minor,
                },
                meta("alice"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
