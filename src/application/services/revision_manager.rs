//! Revision manager - opens revisions against published documents and
//! merges approved revisions back into their parents.
//!
//! A parent has at most one open revision. The claim is the parent's
//! `open_revision_id` marker, written with compare-and-set against the
//! snapshot on which the "no open revision" check ran; a concurrent
//! creator loses the race, re-reads, and finds the winner's claim. A claim
//! whose revision is not stored yet still counts as open.

use std::sync::Arc;

use super::field_writer::{FieldWriter, HistoryAppend, WriteOutcome};
use super::notifier::notify;
use super::workflow_engine::{refused, WorkflowEngine};
use crate::config::WorkflowConfig;
use crate::domain::document::{ChangeClass, Document, FieldUpdate, RevisionCreated, RevisionPublished, WorkflowError};
use crate::domain::foundation::{CommandMetadata, DocumentId, EventId, Timestamp};
use crate::domain::revision::{
    check_mergeable, check_parent_accepts_revision, draft_revision, ensure_no_open_revision,
    plan_merge, MergePlan,
};
use crate::domain::workflow::WorkflowAction;
use crate::ports::{DocumentFilter, DocumentStore, EventPublisher};

/// Parent and revision after a successful merge.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub parent: Document,
    pub revision: Document,
    /// True when an earlier, partially applied merge was completed.
    pub resumed: bool,
}

pub struct RevisionManager {
    engine: Arc<WorkflowEngine>,
    store: Arc<dyn DocumentStore>,
    publisher: Arc<dyn EventPublisher>,
    writer: FieldWriter,
    config: WorkflowConfig,
}

impl RevisionManager {
    pub fn new(
        engine: Arc<WorkflowEngine>,
        store: Arc<dyn DocumentStore>,
        publisher: Arc<dyn EventPublisher>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            writer: FieldWriter::new(store.clone()),
            engine,
            store,
            publisher,
            config,
        }
    }

    /// Opens a revision of `parent_id` targeting the next version for
    /// `change_class`.
    pub async fn create(
        &self,
        parent_id: DocumentId,
        change_class: ChangeClass,
        metadata: &CommandMetadata,
    ) -> Result<Document, WorkflowError> {
        let actor = &metadata.actor_id;
        let action = WorkflowAction::CreateRevision;

        for attempt in 0..=self.config.max_conflict_retries {
            let parent = self.engine.get(parent_id).await?;
            self.engine
                .authorize(actor, action, &parent)
                .await
                .map_err(|err| refused(parent_id, actor, action, err))?;
            check_parent_accepts_revision(&parent).map_err(|err| refused(parent_id, actor, action, err))?;

            let marker_target = match parent.open_revision_id() {
                Some(id) => match self.store.get(id).await? {
                    Some(target) => Some(target),
                    // Claimed by a request that has not inserted its revision yet.
                    None => {
                        let err = WorkflowError::RevisionExists {
                            parent_id,
                            revision_id: id,
                        };
                        return Err(refused(parent_id, actor, action, err));
                    }
                },
                None => None,
            };
            let scanned = self
                .store
                .query(&DocumentFilter::open_revisions_of(parent_id))
                .await?;
            ensure_no_open_revision(&parent, marker_target.as_ref(), &scanned)
                .map_err(|err| refused(parent_id, actor, action, err))?;

            let revision_id = DocumentId::new();
            match self
                .store
                .compare_and_set(parent_id, parent.stamp(), FieldUpdate::OpenRevisionId(Some(revision_id)))
                .await
            {
                Ok(_) => {}
                Err(err) if err.is_conflict() => {
                    tracing::debug!(parent_id = %parent_id, attempt, "revision claim lost a race, re-checking");
                    continue;
                }
                Err(err) => return Err(WorkflowError::store_write_failed(err.to_string())),
            }

            let draft = draft_revision(&parent, revision_id, actor.clone(), change_class);
            if let Err(err) = self.store.insert(&draft.revision).await {
                self.release_claim(parent_id, revision_id).await;
                return Err(WorkflowError::store_write_failed(err.to_string()));
            }

            let append = HistoryAppend {
                document_id: parent_id,
                actor_id: actor.clone(),
                event: draft.parent_history_event(),
                version: draft.current_version,
                revision_id: Some(revision_id),
            };
            self.writer
                .append_history(&append, self.config.max_conflict_retries)
                .await?;

            tracing::info!(
                parent_id = %parent_id,
                revision_id = %revision_id,
                actor_id = %actor,
                change_class = %change_class,
                next_version = %draft.next_version,
                "revision created"
            );

            let event = RevisionCreated {
                event_id: EventId::new(),
                parent_id,
                revision_id,
                actor_id: actor.clone(),
                change_class,
                current_version: draft.current_version,
                next_version: draft.next_version,
                created_at: Timestamp::now(),
            };
            notify(self.publisher.as_ref(), &event, metadata).await;

            return self.engine.get(revision_id).await;
        }

        Err(WorkflowError::store_write_failed(format!(
            "document {} kept changing, gave up claiming a revision after {} attempts",
            parent_id,
            self.config.max_conflict_retries + 1
        )))
    }

    /// Merges the approved revision `revision_id` into its parent and
    /// archives it.
    pub async fn publish(
        &self,
        revision_id: DocumentId,
        metadata: &CommandMetadata,
    ) -> Result<MergeOutcome, WorkflowError> {
        let actor = &metadata.actor_id;
        let action = WorkflowAction::PublishRevision;

        for attempt in 0..=self.config.max_conflict_retries {
            let revision = self.engine.get(revision_id).await?;
            let parent = match revision.revision_parent_id() {
                Some(id) => self.store.get(id).await?,
                None => None,
            };

            self.engine
                .authorize(actor, action, &revision)
                .await
                .map_err(|err| refused(revision_id, actor, action, err))?;
            if let Some(parent) = &parent {
                self.engine
                    .authorize(actor, action, parent)
                    .await
                    .map_err(|err| refused(parent.id(), actor, action, err))?;
            }
            check_mergeable(&revision, parent.as_ref())
                .map_err(|err| refused(revision_id, actor, action, err))?;
            let Some(parent) = parent else {
                return Err(WorkflowError::invalid_state("revision has no parent"));
            };

            let plan = plan_merge(&parent, &revision, actor, &self.config.revision_separator_note)?;
            match self.apply_merge(&parent, &revision, &plan).await? {
                WriteOutcome::Applied { writes } => {
                    tracing::info!(
                        parent_id = %parent.id(),
                        revision_id = %revision_id,
                        actor_id = %actor,
                        version = %revision.version_number(),
                        resumed = plan.resumed,
                        writes,
                        "revision merged"
                    );

                    let event = RevisionPublished {
                        event_id: EventId::new(),
                        parent_id: parent.id(),
                        revision_id,
                        actor_id: actor.clone(),
                        version: revision.version_number(),
                        published_at: Timestamp::now(),
                    };
                    notify(self.publisher.as_ref(), &event, metadata).await;

                    return Ok(MergeOutcome {
                        parent: self.engine.get(parent.id()).await?,
                        revision: self.engine.get(revision_id).await?,
                        resumed: plan.resumed,
                    });
                }
                WriteOutcome::Conflict { landed } => {
                    tracing::debug!(revision_id = %revision_id, attempt, landed, "merge lost a race, re-planning");
                }
            }
        }

        Err(WorkflowError::store_write_failed(format!(
            "parent of revision {} kept changing, gave up after {} attempts",
            revision_id,
            self.config.max_conflict_retries + 1
        )))
    }

    /// Parent writes first, then the revision, each as one chain of
    /// compare-and-set writes. An interrupted merge is re-planned from a
    /// fresh read; the separators make the re-plan skip what already landed.
    async fn apply_merge(
        &self,
        parent: &Document,
        revision: &Document,
        plan: &MergePlan,
    ) -> Result<WriteOutcome, WorkflowError> {
        let parent_writes: Vec<FieldUpdate> =
            plan.parent_writes.iter().map(|(_, update)| update.clone()).collect();

        let parent_written = match self.writer.execute(parent, &parent_writes).await? {
            WriteOutcome::Applied { writes } => writes,
            conflict @ WriteOutcome::Conflict { .. } => return Ok(conflict),
        };

        match self.writer.execute(revision, &plan.revision_writes).await? {
            WriteOutcome::Applied { writes } => Ok(WriteOutcome::Applied {
                writes: parent_written + writes,
            }),
            WriteOutcome::Conflict { landed } => Ok(WriteOutcome::Conflict {
                landed: parent_written + landed,
            }),
        }
    }

    async fn release_claim(&self, parent_id: DocumentId, revision_id: DocumentId) {
        let Ok(Some(parent)) = self.store.get(parent_id).await else {
            return;
        };
        if parent.open_revision_id() != Some(revision_id) {
            return;
        }
        if let Err(err) = self
            .store
            .compare_and_set(parent_id, parent.stamp(), FieldUpdate::OpenRevisionId(None))
            .await
        {
            tracing::warn!(
                parent_id = %parent_id,
                revision_id = %revision_id,
                error = %err,
                "could not release revision claim"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::authorization::RoleBasedAuthorizationChecker;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::config::{ActorRoles, RoleTable};
    use crate::domain::document::{ErrorKind, HistoryEvent, HostStatus, VersionNumber, WorkflowStatus};
    use crate::domain::workflow::TransitionRequest;
    use std::collections::BTreeMap;

    struct Fixture {
        engine: Arc<WorkflowEngine>,
        revisions: RevisionManager,
        store: Arc<InMemoryDocumentStore>,
        bus: Arc<InMemoryEventBus>,
    }

    fn fixture() -> Fixture {
        let mut actors = BTreeMap::new();
        actors.insert("alice".to_string(), vec!["author".to_string()]);
        actors.insert("rita".to_string(), vec!["reviewer".to_string()]);
        actors.insert("ravi".to_string(), vec!["reviewer".to_string()]);
        actors.insert("root".to_string(), vec!["admin".to_string()]);
        let checker = Arc::new(RoleBasedAuthorizationChecker::new(
            RoleTable::default(),
            ActorRoles::new(actors),
        ));

        let store = Arc::new(InMemoryDocumentStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let config = WorkflowConfig::default();
        let engine = Arc::new(WorkflowEngine::new(store.clone(), checker, bus.clone(), config.clone()));
        let revisions = RevisionManager::new(engine.clone(), store.clone(), bus.clone(), config);
        Fixture {
            engine,
            revisions,
            store,
            bus,
        }
    }

    fn meta(actor: &str) -> CommandMetadata {
        CommandMetadata::new(crate::domain::foundation::ActorId::new(actor).unwrap())
    }

    async fn walk_to_published(f: &Fixture, id: DocumentId, change_class: ChangeClass) {
        let steps = [
            ("alice", TransitionRequest::SubmitForReview { change_class, version_note: None }),
            ("rita", TransitionRequest::Approve { comment: String::new() }),
            ("ravi", TransitionRequest::Approve { comment: String::new() }),
        ];
        for (actor, request) in steps {
            f.engine.transition(id, request, &meta(actor)).await.unwrap();
        }
    }

    async fn published_parent(f: &Fixture) -> Document {
        let doc = f
            .engine
            .create(
                crate::application::services::NewDocument {
                    title: "Brinell Hardness".to_string(),
                    body: "v1".to_string(),
                    ..Default::default()
                },
                &meta("alice"),
            )
            .await
            .unwrap();
        walk_to_published(f, doc.id(), ChangeClass::Minor).await;
        f.engine
            .transition(doc.id(), TransitionRequest::Publish, &meta("root"))
            .await
            .unwrap()
            .document
    }

    #[tokio::test]
    async fn creates_revision_with_precomputed_version() {
        let f = fixture();
        let parent = published_parent(&f).await;

        let revision = f.revisions.create(parent.id(), ChangeClass::Major, &meta("alice")).await.unwrap();

        assert!(revision.is_revision());
        assert_eq!(revision.revision_parent_id(), Some(parent.id()));
        assert_eq!(revision.version_number(), VersionNumber::new(1, 0));
        assert!(revision.version_precomputed());
        assert_eq!(revision.title(), parent.title());
        assert_ne!(revision.slug(), parent.slug());

        let parent = f.engine.get(parent.id()).await.unwrap();
        assert_eq!(parent.open_revision_id(), Some(revision.id()));
        let last = parent.revision_history().last().unwrap();
        assert_eq!(last.revision_id, Some(revision.id()));
        assert!(matches!(last.event, HistoryEvent::RevisionCreated { .. }));
        assert!(f.bus.has_event("document.revision_created"));
    }

    #[tokio::test]
    async fn second_open_revision_is_refused() {
        let f = fixture();
        let parent = published_parent(&f).await;
        let first = f.revisions.create(parent.id(), ChangeClass::Minor, &meta("alice")).await.unwrap();

        let err = f.revisions.create(parent.id(), ChangeClass::Minor, &meta("rita")).await.unwrap_err();
        assert_eq!(
            err,
            WorkflowError::RevisionExists {
                parent_id: parent.id(),
                revision_id: first.id()
            }
        );
    }

    #[tokio::test]
    async fn claim_without_inserted_revision_still_blocks() {
        let f = fixture();
        let parent = published_parent(&f).await;
        let in_flight = DocumentId::new();
        f.store
            .set_field(parent.id(), FieldUpdate::OpenRevisionId(Some(in_flight)))
            .await
            .unwrap();

        let err = f.revisions.create(parent.id(), ChangeClass::Minor, &meta("alice")).await.unwrap_err();
        assert_eq!(
            err,
            WorkflowError::RevisionExists {
                parent_id: parent.id(),
                revision_id: in_flight
            }
        );
    }

    #[tokio::test]
    async fn unpublished_parent_cannot_be_revised() {
        let f = fixture();
        let doc = f
            .engine
            .create(
                crate::application::services::NewDocument {
                    title: "Draft Method".to_string(),
                    ..Default::default()
                },
                &meta("alice"),
            )
            .await
            .unwrap();

        let err = f.revisions.create(doc.id(), ChangeClass::Minor, &meta("alice")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn unknown_actor_cannot_create_revision() {
        let f = fixture();
        let parent = published_parent(&f).await;
        let err = f.revisions.create(parent.id(), ChangeClass::Minor, &meta("mallory")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    }

    #[tokio::test]
    async fn publishes_revision_into_parent() {
        let f = fixture();
        let parent = published_parent(&f).await;
        let approvals_before = parent.approvals().len();
        let revision = f.revisions.create(parent.id(), ChangeClass::Minor, &meta("alice")).await.unwrap();

        f.engine
            .edit(
                revision.id(),
                crate::domain::workflow::ContentEdit {
                    body: Some("v2".to_string()),
                    ..Default::default()
                },
                &meta("alice"),
            )
            .await
            .unwrap();
        walk_to_published(&f, revision.id(), ChangeClass::Minor).await;

        let outcome = f.revisions.publish(revision.id(), &meta("root")).await.unwrap();

        assert!(!outcome.resumed);
        assert_eq!(outcome.parent.slug(), parent.slug());
        assert_eq!(outcome.parent.body(), "v2");
        assert_eq!(outcome.parent.version_number(), VersionNumber::new(0, 2));
        assert_eq!(outcome.parent.approvals().len(), approvals_before + 1 + 2);
        assert_eq!(outcome.parent.workflow_status(), WorkflowStatus::Published);
        assert_eq!(outcome.parent.host_status(), HostStatus::Published);
        assert!(outcome.parent.is_locked());
        assert_eq!(outcome.parent.open_revision_id(), None);
        assert_eq!(outcome.revision.workflow_status(), WorkflowStatus::Archived);
        assert!(f.bus.has_event("document.revision_published"));

        // Merged revisions no longer block new ones.
        assert!(f.revisions.create(parent.id(), ChangeClass::Minor, &meta("alice")).await.is_ok());
    }

    #[tokio::test]
    async fn retried_merge_does_not_duplicate_separator() {
        let f = fixture();
        let parent = published_parent(&f).await;
        let revision = f.revisions.create(parent.id(), ChangeClass::Minor, &meta("alice")).await.unwrap();
        walk_to_published(&f, revision.id(), ChangeClass::Minor).await;

        f.store.fail_writes_to("open_revision_id").await;
        let err = f.revisions.publish(revision.id(), &meta("root")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreWriteFailed);

        f.store.clear_failures().await;
        let outcome = f.revisions.publish(revision.id(), &meta("root")).await.unwrap();
        assert!(outcome.resumed);

        let separators = outcome
            .parent
            .approvals()
            .iter()
            .filter(|e| e.is_separator_for(revision.id()))
            .count();
        assert_eq!(separators, 1);
        let history_separators = outcome
            .parent
            .revision_history()
            .iter()
            .filter(|e| e.is_separator_for(revision.id()))
            .count();
        assert_eq!(history_separators, 1);
    }

    #[tokio::test]
    async fn merged_revision_cannot_be_published_again() {
        let f = fixture();
        let parent = published_parent(&f).await;
        let revision = f.revisions.create(parent.id(), ChangeClass::Minor, &meta("alice")).await.unwrap();
        walk_to_published(&f, revision.id(), ChangeClass::Minor).await;
        f.revisions.publish(revision.id(), &meta("root")).await.unwrap();

        let err = f.revisions.publish(revision.id(), &meta("root")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn reviewer_cannot_merge() {
        let f = fixture();
        let parent = published_parent(&f).await;
        let revision = f.revisions.create(parent.id(), ChangeClass::Minor, &meta("alice")).await.unwrap();
        walk_to_published(&f, revision.id(), ChangeClass::Minor).await;

        let err = f.revisions.publish(revision.id(), &meta("rita")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    }
}
