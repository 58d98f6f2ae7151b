//! Single-field writes and the set of workflow-internal fields.
//!
//! The record store only offers atomic single-field writes, so every change
//! the workflow makes is expressed as one [`FieldUpdate`].

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

use super::{ApprovalEntry, Classification, HistoryEntry, HostStatus, VersionNumber, WorkflowError, WorkflowStatus};
use crate::domain::foundation::DocumentId;
use crate::domain::workflow::PublishContext;

/// Custom attributes keyed by name.
pub type Attributes = BTreeMap<String, JsonValue>;

/// Fields owned by the workflow itself.
///
/// This list is the single source of truth for what a revision merge must
/// never copy from child to parent, and what an editor may not set through
/// custom attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowField {
    WorkflowStatus,
    IsLocked,
    Approvals,
    RevisionParentId,
    IsRevision,
    AwaitingFinalApproval,
    VersionPrecomputed,
    OpenRevisionId,
}

impl WorkflowField {
    pub const ALL: [WorkflowField; 8] = [
        WorkflowField::WorkflowStatus,
        WorkflowField::IsLocked,
        WorkflowField::Approvals,
        WorkflowField::RevisionParentId,
        WorkflowField::IsRevision,
        WorkflowField::AwaitingFinalApproval,
        WorkflowField::VersionPrecomputed,
        WorkflowField::OpenRevisionId,
    ];

    /// Canonical attribute key.
    pub fn key(&self) -> &'static str {
        match self {
            WorkflowField::WorkflowStatus => "workflow_status",
            WorkflowField::IsLocked => "is_locked",
            WorkflowField::Approvals => "approvals",
            WorkflowField::RevisionParentId => "revision_parent_id",
            WorkflowField::IsRevision => "is_revision",
            WorkflowField::AwaitingFinalApproval => "awaiting_final_approval",
            WorkflowField::VersionPrecomputed => "version_precomputed",
            WorkflowField::OpenRevisionId => "open_revision_id",
        }
    }

    /// Legacy spellings imported records may still carry.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            WorkflowField::OpenRevisionId => &["revision_exists"],
            WorkflowField::VersionPrecomputed => &["version_already_incremented"],
            _ => &[],
        }
    }

    /// Resolves an attribute key, ignoring case and `_`/`-` separators.
    pub fn from_key(key: &str) -> Option<Self> {
        let wanted = normalize(key);
        Self::ALL.into_iter().find(|field| {
            normalize(field.key()) == wanted || field.aliases().iter().any(|a| normalize(a) == wanted)
        })
    }
}

impl fmt::Display for WorkflowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// True when `key` names a workflow-internal field.
pub fn is_workflow_internal(key: &str) -> bool {
    WorkflowField::from_key(key).is_some()
}

/// Copy of `attributes` without any workflow-internal key.
pub fn without_workflow_fields(attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .filter(|(key, _)| !is_workflow_internal(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Host status writes
// ════════════════════════════════════════════════════════════════════════════════

/// A host-status write. Setting `published` needs a [`PublishContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostStatusChange {
    status: HostStatus,
    context: Option<PublishContext>,
}

impl HostStatusChange {
    /// Any status except `published`.
    pub fn unpublished(status: HostStatus) -> Result<Self, WorkflowError> {
        if status == HostStatus::Published {
            return Err(WorkflowError::not_authorized(
                "documents can only be published through the publish action",
            ));
        }
        Ok(Self { status, context: None })
    }

    pub fn published(context: PublishContext) -> Self {
        Self {
            status: HostStatus::Published,
            context: Some(context),
        }
    }

    pub fn status(&self) -> HostStatus {
        self.status
    }

    pub fn context(&self) -> Option<&PublishContext> {
        self.context.as_ref()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// FieldUpdate
// ════════════════════════════════════════════════════════════════════════════════

/// One atomic write to one document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Title(String),
    Body(String),
    Classification(Classification),
    Attributes(Attributes),
    HostStatus(HostStatusChange),
    WorkflowStatus(WorkflowStatus),
    VersionNumber(VersionNumber),
    VersionNote(String),
    IsLocked(bool),
    Approvals(Vec<ApprovalEntry>),
    History(Vec<HistoryEntry>),
    IsRevision(bool),
    RevisionParentId(Option<DocumentId>),
    AwaitingFinalApproval(bool),
    VersionPrecomputed(bool),
    OpenRevisionId(Option<DocumentId>),
}

impl FieldUpdate {
    /// Field name for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self.workflow_field() {
            Some(field) => field.key(),
            None => match self {
                FieldUpdate::Title(_) => "title",
                FieldUpdate::Body(_) => "body",
                FieldUpdate::Classification(_) => "classification",
                FieldUpdate::Attributes(_) => "attributes",
                FieldUpdate::HostStatus(_) => "host_status",
                FieldUpdate::VersionNumber(_) => "version_number",
                FieldUpdate::VersionNote(_) => "version_note",
                FieldUpdate::History(_) => "revision_history",
                _ => "workflow",
            },
        }
    }

    pub fn workflow_field(&self) -> Option<WorkflowField> {
        match self {
            FieldUpdate::WorkflowStatus(_) => Some(WorkflowField::WorkflowStatus),
            FieldUpdate::IsLocked(_) => Some(WorkflowField::IsLocked),
            FieldUpdate::Approvals(_) => Some(WorkflowField::Approvals),
            FieldUpdate::RevisionParentId(_) => Some(WorkflowField::RevisionParentId),
            FieldUpdate::IsRevision(_) => Some(WorkflowField::IsRevision),
            FieldUpdate::AwaitingFinalApproval(_) => Some(WorkflowField::AwaitingFinalApproval),
            FieldUpdate::VersionPrecomputed(_) => Some(WorkflowField::VersionPrecomputed),
            FieldUpdate::OpenRevisionId(_) => Some(WorkflowField::OpenRevisionId),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ActorId;
    use serde_json::json;

    #[test]
    fn every_workflow_field_resolves_from_its_key() {
        for field in WorkflowField::ALL {
            assert_eq!(WorkflowField::from_key(field.key()), Some(field));
        }
    }

    #[test]
    fn legacy_spellings_are_recognised() {
        assert_eq!(WorkflowField::from_key("workflowStatus"), Some(WorkflowField::WorkflowStatus));
        assert_eq!(WorkflowField::from_key("isLocked"), Some(WorkflowField::IsLocked));
        assert_eq!(WorkflowField::from_key("revisionExists"), Some(WorkflowField::OpenRevisionId));
        assert_eq!(WorkflowField::from_key("awaiting-final-approval"), Some(WorkflowField::AwaitingFinalApproval));
        assert_eq!(WorkflowField::from_key("method_scope"), None);
    }

    #[test]
    fn workflow_keys_are_stripped_from_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("method_scope".into(), json!("ferrous alloys"));
        attributes.insert("isRevision".into(), json!(true));
        attributes.insert("approvals".into(), json!([]));

        let filtered = without_workflow_fields(&attributes);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("method_scope"));
    }

    #[test]
    fn publishing_without_context_is_refused() {
        let err = HostStatusChange::unpublished(HostStatus::Published).unwrap_err();
        assert_eq!(err.kind(), crate::domain::document::ErrorKind::NotAuthorized);
        assert!(HostStatusChange::unpublished(HostStatus::Pending).is_ok());
    }

    #[test]
    fn publishing_with_context_carries_it() {
        let context = PublishContext::for_approval(ActorId::new("admin").unwrap());
        let change = HostStatusChange::published(context.clone());
        assert_eq!(change.status(), HostStatus::Published);
        assert_eq!(change.context(), Some(&context));
    }

    #[test]
    fn update_names_use_canonical_keys() {
        assert_eq!(FieldUpdate::OpenRevisionId(None).name(), "open_revision_id");
        assert_eq!(FieldUpdate::Title("x".into()).name(), "title");
    }
}
