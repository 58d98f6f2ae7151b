//! PublishRevisionHandler - merges an approved revision into its parent.

use std::sync::Arc;

use crate::application::services::{MergeOutcome, RevisionManager};
use crate::domain::document::WorkflowError;
use crate::domain::foundation::{CommandMetadata, DocumentId};

#[derive(Debug, Clone)]
pub struct PublishRevisionCommand {
    pub revision_id: DocumentId,
}

pub struct PublishRevisionHandler {
    revisions: Arc<RevisionManager>,
}

impl PublishRevisionHandler {
    pub fn new(revisions: Arc<RevisionManager>) -> Self {
        Self { revisions }
    }

    pub async fn handle(
        &self,
        cmd: PublishRevisionCommand,
        metadata: CommandMetadata,
    ) -> Result<MergeOutcome, WorkflowError> {
        self.revisions.publish(cmd.revision_id, &metadata).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::document::test_support::{approved, meta, published, services};
    use crate::domain::document::{ChangeClass, ErrorKind, HistoryEvent};

    #[tokio::test]
    async fn merge_tags_migrated_history() {
        let services = services();
        let parent = published(&services).await;
        let revision = services
            .revisions
            .create(parent.id(), ChangeClass::Minor, &meta("alice"))
            .await
            .unwrap();
        approved(&services, revision.id()).await;

        let outcome = PublishRevisionHandler::new(services.revisions.clone())
            .handle(PublishRevisionCommand { revision_id: revision.id() }, meta("root"))
            .await
            .unwrap();

        let history = outcome.parent.revision_history();
        let separator = history
            .iter()
            .position(|e| e.is_separator_for(revision.id()))
            .unwrap();
        assert_eq!(separator, parent.revision_history().len() + 1);
        assert_eq!(history[separator].status_label, "Revision 0.2 merged");
        assert!(history[separator + 1..history.len() - 1].iter().all(|e| e.from_revision));
        assert_eq!(history.last().unwrap().event, HistoryEvent::RevisionPublished);

        let sequences: Vec<u32> = history.iter().map(|e| e.sequence_number).collect();
        let expected: Vec<u32> = (1..=history.len() as u32).collect();
        assert_eq!(sequences, expected);
    }

    #[tokio::test]
    async fn draft_revision_cannot_be_published() {
        let services = services();
        let parent = published(&services).await;
        let revision = services
            .revisions
            .create(parent.id(), ChangeClass::Minor, &meta("alice"))
            .await
            .unwrap();

        let err = PublishRevisionHandler::new(services.revisions.clone())
            .handle(PublishRevisionCommand { revision_id: revision.id() }, meta("root"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn ordinary_document_is_not_a_revision() {
        let services = services();
        let parent = published(&services).await;

        let err = PublishRevisionHandler::new(services.revisions.clone())
            .handle(PublishRevisionCommand { revision_id: parent.id() }, meta("root"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }
}
