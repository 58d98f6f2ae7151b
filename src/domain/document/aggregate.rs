//! Document aggregate.
//!
//! A document is either a standalone method in progress, a published parent,
//! or a revision proposing changes to a parent. Revisions are full documents
//! distinguished only by `is_revision` and `revision_parent_id`.

use serde::{Deserialize, Serialize};

use super::approval::{self, ApprovalEntry};
use super::fields::{Attributes, FieldUpdate};
use super::{Classification, HistoryEntry, HostStatus, VersionNumber, WorkflowError, WorkflowStatus};
use crate::domain::foundation::{ActorId, DocumentId, StateMachine, Timestamp, ValidationError};

/// Maximum length for a document title.
pub const MAX_TITLE_LENGTH: usize = 300;

/// Document aggregate.
///
/// # Invariants
///
/// - `slug` never changes after creation
/// - `approvals` holds at most one decision per actor in the open cycle
/// - `revision_history` sequence numbers are `1..=len`
/// - `stamp` is maintained by the record store and bumps on every write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    slug: String,
    title: String,
    body: String,
    classification: Classification,
    attributes: Attributes,
    host_status: HostStatus,
    workflow_status: WorkflowStatus,
    version_number: VersionNumber,
    version_note: Option<String>,
    is_locked: bool,
    approvals: Vec<ApprovalEntry>,
    revision_history: Vec<HistoryEntry>,
    is_revision: bool,
    revision_parent_id: Option<DocumentId>,
    author_id: ActorId,
    awaiting_final_approval: bool,
    version_precomputed: bool,
    /// Marker on a parent naming its open revision.
    open_revision_id: Option<DocumentId>,
    stamp: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Document {
    /// Creates a draft document at version `0.0`.
    ///
    /// # Errors
    ///
    /// - `Validation` if the title is blank or too long
    pub fn new(
        id: DocumentId,
        author_id: ActorId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, WorkflowError> {
        let title = title.into();
        Self::validate_title(&title)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            slug: slugify(&title),
            title,
            body: body.into(),
            classification: Classification::new(),
            attributes: Attributes::new(),
            host_status: HostStatus::Draft,
            workflow_status: WorkflowStatus::Draft,
            version_number: VersionNumber::INITIAL,
            version_note: None,
            is_locked: false,
            approvals: Vec::new(),
            revision_history: Vec::new(),
            is_revision: false,
            revision_parent_id: None,
            author_id,
            awaiting_final_approval: false,
            version_precomputed: false,
            open_revision_id: None,
            stamp: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Builder: use an explicit slug instead of one derived from the title.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Result<Self, WorkflowError> {
        let slug = slug.into();
        validate_slug(&slug)?;
        self.slug = slug;
        Ok(self)
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Builder: custom attributes. Workflow-internal keys are refused.
    pub fn with_attributes(mut self, attributes: Attributes) -> Result<Self, WorkflowError> {
        reject_workflow_keys(&attributes)?;
        self.attributes = attributes;
        Ok(self)
    }

    pub fn with_version(mut self, version: VersionNumber, note: Option<String>) -> Self {
        self.version_number = version;
        self.version_note = note;
        self
    }

    /// Builds the draft revision of `parent`.
    ///
    /// Content, taxonomy and custom attributes are copied; workflow state
    /// starts fresh and the version is the precomputed target.
    pub(crate) fn revision_of(
        parent: &Document,
        id: DocumentId,
        author_id: ActorId,
        slug: String,
        target_version: VersionNumber,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            slug,
            title: parent.title.clone(),
            body: parent.body.clone(),
            classification: parent.classification.clone(),
            attributes: super::fields::without_workflow_fields(&parent.attributes),
            host_status: HostStatus::Draft,
            workflow_status: WorkflowStatus::Draft,
            version_number: target_version,
            version_note: None,
            is_locked: false,
            approvals: Vec::new(),
            revision_history: Vec::new(),
            is_revision: true,
            revision_parent_id: Some(parent.id),
            author_id,
            awaiting_final_approval: false,
            version_precomputed: true,
            open_revision_id: None,
            stamp: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn validate_title(title: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ValidationError::invalid_format(
                "title",
                format!("must be at most {} characters", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Stable external address. Never rewritten, not even by a revision merge.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn host_status(&self) -> HostStatus {
        self.host_status
    }

    pub fn workflow_status(&self) -> WorkflowStatus {
        self.workflow_status
    }

    pub fn version_number(&self) -> VersionNumber {
        self.version_number
    }

    pub fn version_note(&self) -> Option<&str> {
        self.version_note.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn approvals(&self) -> &[ApprovalEntry] {
        &self.approvals
    }

    pub fn revision_history(&self) -> &[HistoryEntry] {
        &self.revision_history
    }

    pub fn is_revision(&self) -> bool {
        self.is_revision
    }

    pub fn revision_parent_id(&self) -> Option<DocumentId> {
        self.revision_parent_id
    }

    pub fn author_id(&self) -> &ActorId {
        &self.author_id
    }

    pub fn awaiting_final_approval(&self) -> bool {
        self.awaiting_final_approval
    }

    pub fn version_precomputed(&self) -> bool {
        self.version_precomputed
    }

    pub fn open_revision_id(&self) -> Option<DocumentId> {
        self.open_revision_id
    }

    /// Write stamp for compare-and-set.
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Distinct actors approving in the open cycle.
    pub fn approval_count(&self) -> usize {
        approval::approval_count(&self.approvals)
    }

    /// A revision that has not yet been merged.
    pub fn is_open_revision(&self) -> bool {
        self.is_revision && !self.workflow_status.is_terminal()
    }

    /// Revisions may only be opened against documents the public can see, or
    /// that have been locked by an earlier publish.
    pub fn accepts_revisions(&self) -> bool {
        self.host_status == HostStatus::Published || self.is_locked
    }

    pub fn approvals_contain_separator_for(&self, revision_id: DocumentId) -> bool {
        self.approvals.iter().any(|e| e.is_separator_for(revision_id))
    }

    pub fn history_contains_separator_for(&self, revision_id: DocumentId) -> bool {
        self.revision_history.iter().any(|e| e.is_separator_for(revision_id))
    }

    /// True when writing `update` would not change anything.
    pub fn already_holds(&self, update: &FieldUpdate) -> bool {
        match update {
            FieldUpdate::Title(v) => &self.title == v,
            FieldUpdate::Body(v) => &self.body == v,
            FieldUpdate::Classification(v) => &self.classification == v,
            FieldUpdate::Attributes(v) => &self.attributes == v,
            FieldUpdate::HostStatus(v) => self.host_status == v.status(),
            FieldUpdate::WorkflowStatus(v) => self.workflow_status == *v,
            FieldUpdate::VersionNumber(v) => self.version_number == *v,
            FieldUpdate::VersionNote(v) => self.version_note.as_deref() == Some(v.as_str()),
            FieldUpdate::IsLocked(v) => self.is_locked == *v,
            FieldUpdate::Approvals(v) => &self.approvals == v,
            FieldUpdate::History(v) => &self.revision_history == v,
            FieldUpdate::IsRevision(v) => self.is_revision == *v,
            FieldUpdate::RevisionParentId(v) => self.revision_parent_id == *v,
            FieldUpdate::AwaitingFinalApproval(v) => self.awaiting_final_approval == *v,
            FieldUpdate::VersionPrecomputed(v) => self.version_precomputed == *v,
            FieldUpdate::OpenRevisionId(v) => self.open_revision_id == *v,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation (record store only)
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies one field write and bumps the stamp.
    pub(crate) fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Title(v) => self.title = v,
            FieldUpdate::Body(v) => self.body = v,
            FieldUpdate::Classification(v) => self.classification = v,
            FieldUpdate::Attributes(v) => self.attributes = v,
            FieldUpdate::HostStatus(v) => self.host_status = v.status(),
            FieldUpdate::WorkflowStatus(v) => self.workflow_status = v,
            FieldUpdate::VersionNumber(v) => self.version_number = v,
            FieldUpdate::VersionNote(v) => self.version_note = Some(v),
            FieldUpdate::IsLocked(v) => self.is_locked = v,
            FieldUpdate::Approvals(v) => self.approvals = v,
            FieldUpdate::History(v) => self.revision_history = v,
            FieldUpdate::IsRevision(v) => self.is_revision = v,
            FieldUpdate::RevisionParentId(v) => self.revision_parent_id = v,
            FieldUpdate::AwaitingFinalApproval(v) => self.awaiting_final_approval = v,
            FieldUpdate::VersionPrecomputed(v) => self.version_precomputed = v,
            FieldUpdate::OpenRevisionId(v) => self.open_revision_id = v,
        }
        self.stamp += 1;
        self.updated_at = Timestamp::now();
    }
}

/// Refuses custom attributes that would shadow workflow-internal fields.
pub fn reject_workflow_keys(attributes: &Attributes) -> Result<(), ValidationError> {
    match attributes.keys().find(|k| super::fields::is_workflow_internal(k)) {
        Some(key) => Err(ValidationError::invalid_format(
            "attributes",
            format!("'{}' is a reserved workflow field", key),
        )),
        None => Ok(()),
    }
}

/// Lowercase, dash-separated form of `text`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "document".to_string()
    } else {
        slug
    }
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::empty_field("slug"));
    }
    let well_formed = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !well_formed || slug.starts_with('-') || slug.ends_with('-') {
        return Err(ValidationError::invalid_format(
            "slug",
            "use lowercase letters, digits and inner dashes",
        ));
    }
    Ok(())
}
