//! Workflow engine - runs review transitions and content edits.
//!
//! Each request is a read-guard-write cycle: load the document, check the
//! authorization checker and the lock gate, plan the transition, execute
//! the plan. When another write interrupts the plan, the cycle starts over
//! from a fresh read, up to `max_conflict_retries` times. The guards run
//! again on every attempt, so a request can be refused after a concurrent
//! one changed the document's state.

use std::sync::Arc;

use super::field_writer::{FieldWriter, HistoryAppend, WriteOutcome};
use super::notifier::notify;
use crate::config::WorkflowConfig;
use crate::domain::document::{
    Attributes, Classification, Document, DocumentApproved, DocumentPublished, DocumentRejected,
    DocumentSubmittedForReview, FieldUpdate, FinalApprovalRequested, VersionNumber, WorkflowError,
    WorkflowStatus,
};
use crate::domain::foundation::{
    ActorId, CapabilitySet, CommandMetadata, DocumentId, DomainError, EventId, Timestamp,
};
use crate::domain::workflow::{
    check_lock_gate, plan, plan_edit, ContentEdit, TransitionPlan, TransitionRequest,
    WorkflowAction,
};
use crate::ports::{AuthorizationChecker, DocumentStore, EventPublisher};

/// State of a document after a successful transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub document: Document,
    pub status: WorkflowStatus,
    pub version: VersionNumber,
    pub approval_count: usize,
}

/// Input for creating a document.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub title: String,
    pub body: String,
    pub slug: Option<String>,
    pub classification: Classification,
    pub attributes: Attributes,
    pub version: Option<VersionNumber>,
    pub version_note: Option<String>,
}

pub struct WorkflowEngine {
    store: Arc<dyn DocumentStore>,
    checker: Arc<dyn AuthorizationChecker>,
    publisher: Arc<dyn EventPublisher>,
    writer: FieldWriter,
    config: WorkflowConfig,
}

impl WorkflowEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        checker: Arc<dyn AuthorizationChecker>,
        publisher: Arc<dyn EventPublisher>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            writer: FieldWriter::new(store.clone()),
            store,
            checker,
            publisher,
            config,
        }
    }

    /// Loads a document.
    pub async fn get(&self, id: DocumentId) -> Result<Document, WorkflowError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(id))
    }

    /// Checker first, then the lock gate. A failing checker denies.
    pub(crate) async fn authorize(
        &self,
        actor: &ActorId,
        action: WorkflowAction,
        document: &Document,
    ) -> Result<CapabilitySet, WorkflowError> {
        let allowed = self
            .checker
            .can(actor, action, document)
            .await
            .map_err(checker_unavailable)?;
        if !allowed {
            return Err(WorkflowError::not_authorized(format!(
                "{} may not {} document {}",
                actor,
                action,
                document.id()
            )));
        }
        let capabilities = self
            .checker
            .capabilities(actor)
            .await
            .map_err(checker_unavailable)?;
        check_lock_gate(document, action, &capabilities)?;
        Ok(capabilities)
    }

    /// Creates a draft document authored by the calling actor.
    pub async fn create(
        &self,
        input: NewDocument,
        metadata: &CommandMetadata,
    ) -> Result<Document, WorkflowError> {
        let actor = &metadata.actor_id;
        let mut document = Document::new(DocumentId::new(), actor.clone(), input.title, input.body)?
            .with_classification(input.classification)
            .with_attributes(input.attributes)?;
        if let Some(slug) = input.slug {
            document = document.with_slug(slug)?;
        }
        if let Some(version) = input.version {
            document = document.with_version(version, input.version_note);
        }

        self.authorize(actor, WorkflowAction::Edit, &document)
            .await
            .map_err(|err| refused(document.id(), actor, WorkflowAction::Edit, err))?;

        self.store.insert(&document).await?;
        tracing::info!(
            document_id = %document.id(),
            actor_id = %actor,
            slug = document.slug(),
            "document created"
        );
        Ok(document)
    }

    /// Applies a content edit.
    pub async fn edit(
        &self,
        id: DocumentId,
        edit: ContentEdit,
        metadata: &CommandMetadata,
    ) -> Result<Document, WorkflowError> {
        let actor = &metadata.actor_id;
        for attempt in 0..=self.config.max_conflict_retries {
            let snapshot = self.get(id).await?;
            self.authorize(actor, WorkflowAction::Edit, &snapshot)
                .await
                .map_err(|err| refused(id, actor, WorkflowAction::Edit, err))?;
            let writes = plan_edit(&snapshot, &edit)
                .map_err(|err| refused(id, actor, WorkflowAction::Edit, err))?;

            match self.writer.execute(&snapshot, &writes).await? {
                WriteOutcome::Applied { writes } => {
                    tracing::info!(document_id = %id, actor_id = %actor, writes, "document edited");
                    return self.get(id).await;
                }
                WriteOutcome::Conflict { landed } => {
                    tracing::debug!(document_id = %id, attempt, landed, "edit lost a race, re-planning");
                }
            }
        }
        Err(self.gave_up(id))
    }

    /// Runs one review transition.
    pub async fn transition(
        &self,
        id: DocumentId,
        request: TransitionRequest,
        metadata: &CommandMetadata,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let actor = &metadata.actor_id;
        let action = request.action();

        let mut written_version: Option<VersionNumber> = None;
        for attempt in 0..=self.config.max_conflict_retries {
            let snapshot = self.get(id).await?;
            self.authorize(actor, action, &snapshot)
                .await
                .map_err(|err| refused(id, actor, action, err))?;
            let mut plan = plan(&snapshot, actor, &request).map_err(|err| refused(id, actor, action, err))?;
            if let Some(version) = written_version {
                plan.pin_version(version);
            }

            match self.writer.execute(&snapshot, &plan.writes).await? {
                WriteOutcome::Applied { .. } => {
                    return self.finish(&snapshot, &request, plan, metadata).await;
                }
                WriteOutcome::Conflict { landed } => {
                    let version_landed = plan
                        .effective_writes(&snapshot)
                        .iter()
                        .take(landed)
                        .any(|w| matches!(w, FieldUpdate::VersionNumber(_)));
                    if version_landed {
                        written_version = Some(plan.version_after);
                    }
                    tracing::debug!(
                        document_id = %id,
                        action = %action,
                        attempt,
                        landed,
                        "transition lost a race, re-planning"
                    );
                }
            }
        }
        Err(self.gave_up(id))
    }

    async fn finish(
        &self,
        snapshot: &Document,
        request: &TransitionRequest,
        plan: TransitionPlan,
        metadata: &CommandMetadata,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let id = snapshot.id();
        let actor = &metadata.actor_id;

        if let Some(event) = plan.history.clone() {
            let append = HistoryAppend {
                document_id: id,
                actor_id: actor.clone(),
                event,
                version: plan.version_after,
                revision_id: None,
            };
            self.writer
                .append_history(&append, self.config.max_conflict_retries)
                .await?;
        }

        tracing::info!(
            document_id = %id,
            actor_id = %actor,
            action = %request.action(),
            status = %plan.status_after,
            version = %plan.version_after,
            approvals = plan.approval_count,
            "transition applied"
        );

        self.announce(id, request, &plan, metadata).await;

        Ok(TransitionOutcome {
            document: self.get(id).await?,
            status: plan.status_after,
            version: plan.version_after,
            approval_count: plan.approval_count,
        })
    }

    async fn announce(
        &self,
        document_id: DocumentId,
        request: &TransitionRequest,
        plan: &TransitionPlan,
        metadata: &CommandMetadata,
    ) {
        let publisher = self.publisher.as_ref();
        let actor_id = metadata.actor_id.clone();
        let now = Timestamp::now();

        match request {
            TransitionRequest::SubmitForReview { .. } => {
                let event = DocumentSubmittedForReview {
                    event_id: EventId::new(),
                    document_id,
                    actor_id,
                    version: plan.version_after,
                    submitted_at: now,
                };
                notify(publisher, &event, metadata).await;
            }
            TransitionRequest::Approve { .. } => {
                let event = DocumentApproved {
                    event_id: EventId::new(),
                    document_id,
                    actor_id,
                    approval_count: plan.approval_count,
                    status: plan.status_after,
                    approved_at: now,
                };
                notify(publisher, &event, metadata).await;
            }
            TransitionRequest::Reject { comment } => {
                let event = DocumentRejected {
                    event_id: EventId::new(),
                    document_id,
                    actor_id,
                    comment: comment.trim().to_string(),
                    rejected_at: now,
                };
                notify(publisher, &event, metadata).await;
            }
            TransitionRequest::RequestFinalApproval => {
                let event = FinalApprovalRequested {
                    event_id: EventId::new(),
                    document_id,
                    actor_id,
                    requested_at: now,
                };
                notify(publisher, &event, metadata).await;
            }
            TransitionRequest::Publish => {
                let event = DocumentPublished {
                    event_id: EventId::new(),
                    document_id,
                    actor_id,
                    version: plan.version_after,
                    published_at: now,
                };
                notify(publisher, &event, metadata).await;
            }
        }
    }

    fn gave_up(&self, id: DocumentId) -> WorkflowError {
        tracing::warn!(
            document_id = %id,
            retries = self.config.max_conflict_retries,
            "giving up after repeated write conflicts"
        );
        WorkflowError::store_write_failed(format!(
            "document {} kept changing, gave up after {} attempts",
            id,
            self.config.max_conflict_retries + 1
        ))
    }
}

fn checker_unavailable(err: DomainError) -> WorkflowError {
    WorkflowError::not_authorized(format!("authorization check failed: {}", err))
}

/// Logs a refused request and passes the error through.
pub(crate) fn refused(
    id: DocumentId,
    actor: &ActorId,
    action: WorkflowAction,
    err: WorkflowError,
) -> WorkflowError {
    tracing::warn!(
        document_id = %id,
        actor_id = %actor,
        action = %action,
        kind = %err.kind(),
        "request refused: {}",
        err
    );
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::domain::document::{ChangeClass, ErrorKind, HistoryEvent, HostStatus};
    use crate::domain::foundation::{Capability, ErrorCode};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mocks
    // ════════════════════════════════════════════════════════════════════════════

    struct MockChecker {
        grants: Mutex<HashMap<String, CapabilitySet>>,
        fail: bool,
    }

    impl MockChecker {
        fn new() -> Self {
            Self {
                grants: Mutex::new(HashMap::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn grant(self, actor: &str, caps: &[Capability]) -> Self {
            self.grants
                .lock()
                .unwrap()
                .insert(actor.to_string(), caps.iter().copied().collect());
            self
        }
    }

    #[async_trait]
    impl AuthorizationChecker for MockChecker {
        async fn capabilities(&self, actor: &ActorId) -> Result<CapabilitySet, DomainError> {
            if self.fail {
                return Err(DomainError::new(ErrorCode::InternalError, "directory down"));
            }
            Ok(self.grants.lock().unwrap().get(actor.as_str()).cloned().unwrap_or_default())
        }

        async fn can(
            &self,
            actor: &ActorId,
            action: WorkflowAction,
            document: &Document,
        ) -> Result<bool, DomainError> {
            let caps = self.capabilities(actor).await?;
            Ok(caps.has(action.required_capability(document.author_id() == actor)))
        }
    }

    struct Fixture {
        engine: WorkflowEngine,
        store: Arc<InMemoryDocumentStore>,
        bus: Arc<InMemoryEventBus>,
    }

    fn fixture_with(checker: MockChecker) -> Fixture {
        let store = Arc::new(InMemoryDocumentStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let engine = WorkflowEngine::new(
            store.clone(),
            Arc::new(checker),
            bus.clone(),
            WorkflowConfig::default(),
        );
        Fixture { engine, store, bus }
    }

    fn fixture() -> Fixture {
        fixture_with(
            MockChecker::new()
                .grant("alice", &[Capability::EditOwnDocuments, Capability::CreateRevisions])
                .grant("rita", &[Capability::ApproveDocuments])
                .grant("ravi", &[Capability::ApproveDocuments])
                .grant("root", &Capability::ALL),
        )
    }

    fn meta(actor: &str) -> CommandMetadata {
        CommandMetadata::new(ActorId::new(actor).unwrap()).with_correlation_id("test")
    }

    fn submit(change_class: ChangeClass) -> TransitionRequest {
        TransitionRequest::SubmitForReview {
            change_class,
            version_note: None,
        }
    }

    fn approve() -> TransitionRequest {
        TransitionRequest::Approve {
            comment: String::new(),
        }
    }

    async fn draft(f: &Fixture) -> Document {
        f.engine
            .create(
                NewDocument {
                    title: "Charpy Impact".to_string(),
                    ..NewDocument::default()
                },
                &meta("alice"),
            )
            .await
            .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn end_to_end_draft_to_published() {
        let f = fixture();
        let doc = draft(&f).await;

        let submitted = f.engine.transition(doc.id(), submit(ChangeClass::Minor), &meta("alice")).await.unwrap();
        assert_eq!(submitted.status, WorkflowStatus::PendingReview);
        assert_eq!(submitted.version, VersionNumber::new(0, 1));
        assert_eq!(submitted.document.host_status(), HostStatus::Pending);

        let first = f.engine.transition(doc.id(), approve(), &meta("rita")).await.unwrap();
        assert_eq!(first.approval_count, 1);
        assert_eq!(first.status, WorkflowStatus::PendingReview);

        let second = f.engine.transition(doc.id(), approve(), &meta("ravi")).await.unwrap();
        assert_eq!(second.approval_count, 2);
        assert_eq!(second.status, WorkflowStatus::Approved);

        let published = f.engine.transition(doc.id(), TransitionRequest::Publish, &meta("root")).await.unwrap();
        assert_eq!(published.status, WorkflowStatus::Published);
        assert!(published.document.is_locked());
        assert_eq!(published.document.host_status(), HostStatus::Published);

        let events: Vec<HistoryEvent> = published
            .document
            .revision_history()
            .iter()
            .map(|e| e.event.clone())
            .collect();
        assert_eq!(
            events,
            vec![HistoryEvent::SubmittedForReview, HistoryEvent::Approved, HistoryEvent::Published]
        );
        assert_eq!(f.bus.events_of_type("document.approved").len(), 2);
        assert!(f.bus.has_event("document.published"));
    }

    #[tokio::test]
    async fn missing_document_is_not_found_before_authorization() {
        let f = fixture_with(MockChecker::failing());
        let err = f
            .engine
            .transition(DocumentId::new(), approve(), &meta("rita"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn authorization_is_checked_before_state() {
        let f = fixture();
        let doc = draft(&f).await;

        // Draft cannot be approved, but the author lacks the capability first.
        let err = f.engine.transition(doc.id(), approve(), &meta("alice")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);

        let err = f.engine.transition(doc.id(), approve(), &meta("rita")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn checker_failure_refuses_the_request() {
        let f = fixture();
        let doc = draft(&f).await;
        let broken = WorkflowEngine::new(
            f.store.clone(),
            Arc::new(MockChecker::failing()),
            f.bus.clone(),
            WorkflowConfig::default(),
        );

        let err = broken.transition(doc.id(), submit(ChangeClass::Minor), &meta("alice")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
        assert_eq!(f.engine.get(doc.id()).await.unwrap().workflow_status(), WorkflowStatus::Draft);
    }

    #[tokio::test]
    async fn reject_without_comment_changes_nothing() {
        let f = fixture();
        let doc = draft(&f).await;
        f.engine.transition(doc.id(), submit(ChangeClass::Minor), &meta("alice")).await.unwrap();
        let before = f.engine.get(doc.id()).await.unwrap();

        let err = f
            .engine
            .transition(doc.id(), TransitionRequest::Reject { comment: "  ".into() }, &meta("rita"))
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::MissingComment);
        let after = f.engine.get(doc.id()).await.unwrap();
        assert_eq!(after.workflow_status(), WorkflowStatus::PendingReview);
        assert_eq!(after.stamp(), before.stamp());
    }

    #[tokio::test]
    async fn locked_document_admits_only_admin_tier() {
        let f = fixture();
        let doc = draft(&f).await;
        f.store
            .set_field(doc.id(), crate::domain::document::FieldUpdate::IsLocked(true))
            .await
            .unwrap();

        let err = f
            .engine
            .edit(doc.id(), ContentEdit { body: Some("x".into()), ..ContentEdit::default() }, &meta("alice"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);

        let edited = f
            .engine
            .edit(doc.id(), ContentEdit { body: Some("x".into()), ..ContentEdit::default() }, &meta("root"))
            .await
            .unwrap();
        assert_eq!(edited.body(), "x");
    }

    #[tokio::test]
    async fn edit_path_cannot_publish() {
        let f = fixture();
        let doc = draft(&f).await;

        let err = f
            .engine
            .edit(
                doc.id(),
                ContentEdit {
                    host_status: Some(HostStatus::Published),
                    ..ContentEdit::default()
                },
                &meta("root"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
        assert_eq!(f.engine.get(doc.id()).await.unwrap().host_status(), HostStatus::Draft);
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_transition() {
        let f = fixture();
        let doc = draft(&f).await;
        f.bus.fail_publishes(true);

        let outcome = f.engine.transition(doc.id(), submit(ChangeClass::Major), &meta("alice")).await;
        assert!(outcome.is_ok());
        assert_eq!(f.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn partial_write_failure_reports_store_write_failed() {
        let f = fixture();
        let doc = draft(&f).await;
        f.store.fail_writes_to("host_status").await;

        let err = f
            .engine
            .transition(doc.id(), submit(ChangeClass::Minor), &meta("alice"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreWriteFailed);
    }

    #[tokio::test]
    async fn create_requires_edit_capability() {
        let f = fixture();
        let err = f
            .engine
            .create(
                NewDocument {
                    title: "Hardness".to_string(),
                    ..NewDocument::default()
                },
                &meta("rita"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
        assert!(f.store.is_empty().await);
    }
}
