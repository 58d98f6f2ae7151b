//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use method_workflow::adapters::{InMemoryDocumentStore, InMemoryEventBus, RoleBasedAuthorizationChecker};
use method_workflow::application::{NewDocument, RevisionManager, WorkflowEngine};
use method_workflow::config::{ActorRoles, RoleTable, WorkflowConfig};
use method_workflow::domain::document::{ChangeClass, Document};
use method_workflow::domain::foundation::{ActorId, CommandMetadata, DocumentId};
use method_workflow::domain::workflow::TransitionRequest;

pub struct Harness {
    pub engine: Arc<WorkflowEngine>,
    pub revisions: Arc<RevisionManager>,
    pub store: Arc<InMemoryDocumentStore>,
    pub bus: Arc<InMemoryEventBus>,
}

/// alice authors, rita and ravi review, root administers.
pub fn actor_roles() -> ActorRoles {
    let mut actors = BTreeMap::new();
    actors.insert("alice".to_string(), vec!["author".to_string()]);
    actors.insert("rita".to_string(), vec!["reviewer".to_string()]);
    actors.insert("ravi".to_string(), vec!["reviewer".to_string()]);
    actors.insert("root".to_string(), vec!["admin".to_string()]);
    ActorRoles::new(actors)
}

pub fn harness() -> Harness {
    harness_with(WorkflowConfig::default())
}

pub fn harness_with(config: WorkflowConfig) -> Harness {
    let checker = Arc::new(RoleBasedAuthorizationChecker::new(RoleTable::default(), actor_roles()));
    let store = Arc::new(InMemoryDocumentStore::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let engine = Arc::new(WorkflowEngine::new(store.clone(), checker, bus.clone(), config.clone()));
    let revisions = Arc::new(RevisionManager::new(engine.clone(), store.clone(), bus.clone(), config));
    Harness {
        engine,
        revisions,
        store,
        bus,
    }
}

pub fn meta(actor: &str) -> CommandMetadata {
    CommandMetadata::new(ActorId::new(actor).unwrap()).with_source("test")
}

pub fn submit(change_class: ChangeClass) -> TransitionRequest {
    TransitionRequest::SubmitForReview {
        change_class,
        version_note: None,
    }
}

pub fn approve() -> TransitionRequest {
    TransitionRequest::Approve {
        comment: String::new(),
    }
}

pub async fn draft(h: &Harness, title: &str) -> Document {
    h.engine
        .create(
            NewDocument {
                title: title.to_string(),
                body: "Procedure v1".to_string(),
                ..NewDocument::default()
            },
            &meta("alice"),
        )
        .await
        .unwrap()
}

/// Submits as alice and approves as both reviewers.
pub async fn approve_fully(h: &Harness, id: DocumentId, change_class: ChangeClass) {
    h.engine.transition(id, submit(change_class), &meta("alice")).await.unwrap();
    for reviewer in ["rita", "ravi"] {
        h.engine.transition(id, approve(), &meta(reviewer)).await.unwrap();
    }
}

pub async fn published(h: &Harness, title: &str) -> Document {
    let doc = draft(h, title).await;
    approve_fully(h, doc.id(), ChangeClass::Minor).await;
    h.engine
        .transition(doc.id(), TransitionRequest::Publish, &meta("root"))
        .await
        .unwrap()
        .document
}
