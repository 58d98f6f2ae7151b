//! Opening a revision against a published document.

use crate::domain::document::{ChangeClass, Document, HistoryEvent, VersionNumber, WorkflowError};
use crate::domain::foundation::{ActorId, DocumentId};
use crate::domain::workflow::VersionCalculator;

/// Everything needed to persist a new revision and record it on the parent.
#[derive(Debug, Clone)]
pub struct RevisionDraft {
    pub revision: Document,
    pub change_class: ChangeClass,
    pub current_version: VersionNumber,
    pub next_version: VersionNumber,
}

impl RevisionDraft {
    /// History event appended to the parent.
    pub fn parent_history_event(&self) -> HistoryEvent {
        HistoryEvent::RevisionCreated {
            change_class: self.change_class,
            current_version: self.current_version,
            next_version: self.next_version,
        }
    }
}

/// Only published or locked documents that are not themselves revisions
/// can be revised.
pub fn check_parent_accepts_revision(parent: &Document) -> Result<(), WorkflowError> {
    if parent.is_revision() {
        return Err(WorkflowError::invalid_state(format!(
            "document {} is itself a revision",
            parent.id()
        )));
    }
    if !parent.accepts_revisions() {
        return Err(WorkflowError::invalid_state(format!(
            "revisions can only be created from published or locked documents, document {} is {}",
            parent.id(),
            parent.host_status()
        )));
    }
    Ok(())
}

/// Whether `candidate` is an unmerged revision of `parent_id`.
pub fn is_open_revision_of(candidate: &Document, parent_id: DocumentId) -> bool {
    candidate.is_open_revision() && candidate.revision_parent_id() == Some(parent_id)
}

/// Fails with `RevisionExists` when any candidate is an open revision of the parent.
///
/// `marker_target` is the document named by the parent's open-revision
/// marker. A marker naming a merged revision is stale and ignored. Callers
/// decide what a marker naming a missing document means.
pub fn ensure_no_open_revision(
    parent: &Document,
    marker_target: Option<&Document>,
    scanned: &[Document],
) -> Result<(), WorkflowError> {
    let open = marker_target
        .into_iter()
        .chain(scanned.iter())
        .find(|doc| is_open_revision_of(doc, parent.id()));

    match open {
        Some(existing) => Err(WorkflowError::RevisionExists {
            parent_id: parent.id(),
            revision_id: existing.id(),
        }),
        None => Ok(()),
    }
}

/// Slug of a revision: the parent's slug with a short id suffix.
pub fn revision_slug(parent_slug: &str, revision_id: DocumentId) -> String {
    format!("{}-revision-{}", parent_slug, revision_id.short())
}

/// Builds the draft revision of `parent` targeting the next version.
pub fn draft_revision(
    parent: &Document,
    revision_id: DocumentId,
    author_id: ActorId,
    change_class: ChangeClass,
) -> RevisionDraft {
    let current_version = parent.version_number();
    let next_version = VersionCalculator::next(current_version, change_class);
    let revision = Document::revision_of(
        parent,
        revision_id,
        author_id,
        revision_slug(parent.slug(), revision_id),
        next_version,
    );

    RevisionDraft {
        revision,
        change_class,
        current_version,
        next_version,
    }
}
