//! Merging an approved revision back into its parent.
//!
//! The record store has no multi-field transaction, so the merge is a fixed
//! sequence of single-field writes. Lock and status are written after all
//! content, so a parent left half-merged by a failure is never mistaken for
//! a finished publish, and the approvals/history merges are skipped on
//! re-entry once the parent already holds this revision's separator.

use std::fmt;

use crate::domain::document::approval::{ApprovalEntry, RevisionSeparator};
use crate::domain::document::fields::without_workflow_fields;
use crate::domain::document::history::{self, HistoryEntry};
use crate::domain::document::{
    Document, FieldUpdate, HistoryEvent, HostStatusChange, WorkflowError, WorkflowStatus,
};
use crate::domain::foundation::{ActorId, StateMachine, Timestamp};
use crate::domain::workflow::PublishContext;

/// Placeholder replaced by the revision's version in separator notes.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Stage of the merge a write belongs to, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MergeStep {
    Content,
    Taxonomy,
    Approvals,
    History,
    Attributes,
    Version,
    Finalize,
    ArchiveRevision,
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MergeStep::Content => "content",
            MergeStep::Taxonomy => "taxonomy",
            MergeStep::Approvals => "approvals",
            MergeStep::History => "history",
            MergeStep::Attributes => "attributes",
            MergeStep::Version => "version",
            MergeStep::Finalize => "finalize",
            MergeStep::ArchiveRevision => "archive_revision",
        };
        f.write_str(name)
    }
}

/// Ordered writes for one merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan {
    /// Writes to the parent, in execution order.
    pub parent_writes: Vec<(MergeStep, FieldUpdate)>,
    /// Writes to the revision, executed after every parent write.
    pub revision_writes: Vec<FieldUpdate>,
    /// True when this is a retry of a partially applied merge.
    pub resumed: bool,
}

/// Guards for publishing `revision` into `parent`.
pub fn check_mergeable(revision: &Document, parent: Option<&Document>) -> Result<(), WorkflowError> {
    if !revision.is_revision() {
        return Err(WorkflowError::invalid_state(format!(
            "document {} is not a revision",
            revision.id()
        )));
    }
    let Some(parent) = parent else {
        return Err(WorkflowError::invalid_state(format!(
            "revision {} does not reference an existing parent",
            revision.id()
        )));
    };
    if revision.revision_parent_id() != Some(parent.id()) {
        return Err(WorkflowError::invalid_state(format!(
            "revision {} does not belong to document {}",
            revision.id(),
            parent.id()
        )));
    }
    match revision.workflow_status() {
        WorkflowStatus::Approved => Ok(()),
        WorkflowStatus::Archived => Err(WorkflowError::invalid_state(format!(
            "revision {} has already been merged",
            revision.id()
        ))),
        other => Err(WorkflowError::invalid_state(format!(
            "only approved revisions can be published, revision is {}",
            other
        ))),
    }
}

/// Plans the merge of an approved `revision` into `parent`.
///
/// Call [`check_mergeable`] first.
pub fn plan_merge(
    parent: &Document,
    revision: &Document,
    actor: &ActorId,
    separator_note: &str,
) -> Result<MergePlan, WorkflowError> {
    let archived = revision.workflow_status().transition_to(WorkflowStatus::Archived)?;
    let note = separator_note.replace(VERSION_PLACEHOLDER, &revision.version_number().to_string());
    let resumed = parent.approvals_contain_separator_for(revision.id())
        || parent.history_contains_separator_for(revision.id());

    let mut writes = vec![
        (MergeStep::Content, FieldUpdate::Title(revision.title().to_string())),
        (MergeStep::Content, FieldUpdate::Body(revision.body().to_string())),
        (MergeStep::Taxonomy, FieldUpdate::Classification(revision.classification().clone())),
    ];

    if !parent.approvals_contain_separator_for(revision.id()) {
        writes.push((MergeStep::Approvals, FieldUpdate::Approvals(merged_approvals(parent, revision, &note))));
    }
    if !parent.history_contains_separator_for(revision.id()) {
        writes.push((MergeStep::History, FieldUpdate::History(merged_history(parent, revision, actor, &note))));
    }

    let mut attributes = parent.attributes().clone();
    attributes.extend(without_workflow_fields(revision.attributes()));
    writes.push((MergeStep::Attributes, FieldUpdate::Attributes(attributes)));

    if revision.version_number() != parent.version_number() {
        writes.push((MergeStep::Version, FieldUpdate::VersionNumber(revision.version_number())));
    }
    if let Some(note) = revision.version_note() {
        writes.push((MergeStep::Version, FieldUpdate::VersionNote(note.to_string())));
    }

    let context = PublishContext::for_revision_merge(actor.clone(), revision.id());
    writes.push((MergeStep::Finalize, FieldUpdate::IsLocked(true)));
    writes.push((MergeStep::Finalize, FieldUpdate::WorkflowStatus(WorkflowStatus::Published)));
    writes.push((MergeStep::Finalize, FieldUpdate::HostStatus(HostStatusChange::published(context))));
    writes.push((MergeStep::Finalize, FieldUpdate::OpenRevisionId(None)));

    Ok(MergePlan {
        parent_writes: writes,
        revision_writes: vec![FieldUpdate::WorkflowStatus(archived)],
        resumed,
    })
}

fn merged_approvals(parent: &Document, revision: &Document, note: &str) -> Vec<ApprovalEntry> {
    let mut approvals = parent.approvals().to_vec();
    approvals.push(ApprovalEntry::RevisionSeparator(RevisionSeparator {
        revision_id: revision.id(),
        version: revision.version_number(),
        note: note.to_string(),
        timestamp: Timestamp::now(),
    }));
    approvals.extend(revision.approvals().iter().cloned());
    approvals
}

fn merged_history(parent: &Document, revision: &Document, actor: &ActorId, note: &str) -> Vec<HistoryEntry> {
    let mut merged = parent.revision_history().to_vec();
    history::append(
        &mut merged,
        actor.clone(),
        HistoryEvent::RevisionSeparator { note: note.to_string() },
        revision.version_number(),
        Some(revision.id()),
    );

    for entry in revision.revision_history() {
        let mut migrated = entry.clone();
        migrated.sequence_number = history::next_sequence(&merged);
        migrated.from_revision = true;
        migrated.revision_id = Some(revision.id());
        merged.push(migrated);
    }

    history::append(
        &mut merged,
        actor.clone(),
        HistoryEvent::RevisionPublished,
        revision.version_number(),
        Some(revision.id()),
    );
    merged
}
