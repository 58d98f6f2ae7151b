//! In-Memory Document Store Adapter
//!
//! Keeps documents in a map behind a `tokio` lock. Each write takes the
//! write lock, so compare-and-set is atomic with respect to every other
//! write. Useful for tests, demos and single-process deployments.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::document::{Document, FieldUpdate};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};
use crate::ports::{DocumentFilter, DocumentStore, Stamp};

/// In-memory record store with per-document write stamps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<DocumentId, Document>>>,
    /// Field names whose writes fail, for exercising partial-failure paths.
    failing_fields: Arc<RwLock<HashSet<&'static str>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write of `field` fail with `DatabaseError`.
    pub async fn fail_writes_to(&self, field: &'static str) {
        self.failing_fields.write().await.insert(field);
    }

    /// Stop injecting write failures.
    pub async fn clear_failures(&self) {
        self.failing_fields.write().await.clear();
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn check_injected_failure(&self, update: &FieldUpdate) -> Result<(), DomainError> {
        if self.failing_fields.read().await.contains(update.name()) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("write to '{}' failed", update.name()),
            ));
        }
        Ok(())
    }
}

fn not_found(id: DocumentId) -> DomainError {
    DomainError::new(ErrorCode::DocumentNotFound, format!("Document not found: {}", id))
        .with_detail("document_id", id.to_string())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, id: DocumentId) -> Result<Option<Document>, DomainError> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn insert(&self, document: &Document) -> Result<Stamp, DomainError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&document.id()) {
            return Err(DomainError::validation(
                "id",
                format!("Document {} already exists", document.id()),
            ));
        }
        documents.insert(document.id(), document.clone());
        Ok(document.stamp())
    }

    async fn set_field(&self, id: DocumentId, update: FieldUpdate) -> Result<Stamp, DomainError> {
        self.check_injected_failure(&update).await?;

        let mut documents = self.documents.write().await;
        let document = documents.get_mut(&id).ok_or_else(|| not_found(id))?;
        document.apply(update);
        Ok(document.stamp())
    }

    async fn compare_and_set(
        &self,
        id: DocumentId,
        expected: Stamp,
        update: FieldUpdate,
    ) -> Result<Stamp, DomainError> {
        self.check_injected_failure(&update).await?;

        let mut documents = self.documents.write().await;
        let document = documents.get_mut(&id).ok_or_else(|| not_found(id))?;
        if document.stamp() != expected {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!(
                    "Document {} was modified concurrently (expected stamp {}, found {})",
                    id,
                    expected,
                    document.stamp()
                ),
            )
            .with_detail("field", update.name()));
        }
        document.apply(update);
        Ok(document.stamp())
    }

    async fn query(&self, filter: &DocumentFilter) -> Result<Vec<Document>, DomainError> {
        let documents = self.documents.read().await;
        let mut matching: Vec<Document> = documents
            .values()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        matching.sort_by_key(|doc| *doc.created_at());
        Ok(matching)
    }
}
