//! Document store port - the host platform's record store.
//!
//! Documents are persisted field by field. Each write is atomic on its own;
//! there is no multi-field transaction. Every successful write bumps the
//! document's stamp, which callers use for optimistic concurrency.

use async_trait::async_trait;

use crate::domain::document::{Document, FieldUpdate};
use crate::domain::foundation::{DocumentId, DomainError, StateMachine};

/// Write stamp returned by the store after each write.
pub type Stamp = u64;

/// Criteria for [`DocumentStore::query`]. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub is_revision: Option<bool>,
    pub revision_parent_id: Option<DocumentId>,
    /// Exclude documents in a terminal workflow state.
    pub open_only: bool,
}

impl DocumentFilter {
    /// Unmerged revisions of `parent_id`.
    pub fn open_revisions_of(parent_id: DocumentId) -> Self {
        Self {
            is_revision: Some(true),
            revision_parent_id: Some(parent_id),
            open_only: true,
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.is_revision.map_or(true, |want| doc.is_revision() == want)
            && self
                .revision_parent_id
                .map_or(true, |parent| doc.revision_parent_id() == Some(parent))
            && (!self.open_only || !doc.workflow_status().is_terminal())
    }
}

/// Port for document persistence.
///
/// Implementations must ensure:
/// - `set_field` and `compare_and_set` are atomic per call
/// - the stamp strictly increases with every write to a document
/// - `compare_and_set` fails with `ConcurrencyConflict` when the stored stamp
///   differs from `expected`, writing nothing
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find a document by id. Returns `None` if not found.
    async fn get(&self, id: DocumentId) -> Result<Option<Document>, DomainError>;

    /// Persist a new document.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a document with the same id exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, document: &Document) -> Result<Stamp, DomainError>;

    /// Unconditionally write one field.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn set_field(&self, id: DocumentId, update: FieldUpdate) -> Result<Stamp, DomainError>;

    /// Write one field only if the document still carries `expected`.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the document was written since `expected`
    /// - `DocumentNotFound` if the document doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn compare_and_set(
        &self,
        id: DocumentId,
        expected: Stamp,
        update: FieldUpdate,
    ) -> Result<Stamp, DomainError>;

    /// Documents matching `filter`.
    async fn query(&self, filter: &DocumentFilter) -> Result<Vec<Document>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{ChangeClass, WorkflowStatus};
    use crate::domain::foundation::ActorId;
    use crate::domain::revision::draft_revision;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn DocumentStore) {}

    fn parent() -> Document {
        Document::new(DocumentId::new(), ActorId::new("author").unwrap(), "Parent", "").unwrap()
    }

    #[test]
    fn default_filter_matches_everything() {
        assert!(DocumentFilter::default().matches(&parent()));
    }

    #[test]
    fn open_revision_filter_selects_unmerged_children() {
        let parent = parent();
        let mut revision = draft_revision(
            &parent,
            DocumentId::new(),
            ActorId::new("author").unwrap(),
            ChangeClass::Minor,
        )
        .revision;
        let filter = DocumentFilter::open_revisions_of(parent.id());

        assert!(!filter.matches(&parent));
        assert!(filter.matches(&revision));

        revision.apply(FieldUpdate::WorkflowStatus(WorkflowStatus::Archived));
        assert!(!filter.matches(&revision));
    }
}
