//! Workflow transitions as pure guard-and-plan functions.
//!
//! Planning never touches the store. It evaluates the guards for a request
//! against a snapshot of the document and returns the ordered field writes,
//! the history event to append, and a summary of the resulting state. The
//! engine executes the plan as a chain of compare-and-set writes, each
//! against the stamp left by the one before, so a concurrent write stops
//! the plan and it is recomputed from a fresh read.
//!
//! `workflow_status` is always the last write. Until it lands, every guard
//! still sees the old state, and a plan recomputed after an interrupted
//! attempt skips the writes that already landed.

use super::{PublishContext, VersionCalculator, WorkflowAction};
use crate::domain::document::approval::{self, Approval, Decision};
use crate::domain::document::{
    reject_workflow_keys, Attributes, ChangeClass, Classification, Document, FieldUpdate,
    HistoryEvent, HostStatus, HostStatusChange, VersionNumber, WorkflowError, WorkflowStatus,
};
use crate::domain::foundation::{ActorId, CapabilitySet, StateMachine, ValidationError};

/// Distinct approvals needed before a document can be published.
pub const REQUIRED_APPROVALS: usize = 2;

/// A state-changing request on one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionRequest {
    SubmitForReview {
        change_class: ChangeClass,
        version_note: Option<String>,
    },
    Approve {
        comment: String,
    },
    Reject {
        comment: String,
    },
    RequestFinalApproval,
    Publish,
}

impl TransitionRequest {
    pub fn action(&self) -> WorkflowAction {
        match self {
            TransitionRequest::SubmitForReview { .. } => WorkflowAction::SubmitForReview,
            TransitionRequest::Approve { .. } => WorkflowAction::Approve,
            TransitionRequest::Reject { .. } => WorkflowAction::Reject,
            TransitionRequest::RequestFinalApproval => WorkflowAction::RequestFinalApproval,
            TransitionRequest::Publish => WorkflowAction::Publish,
        }
    }
}

/// Ordered writes and bookkeeping for one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub writes: Vec<FieldUpdate>,
    pub history: Option<HistoryEvent>,
    pub status_after: WorkflowStatus,
    pub version_after: VersionNumber,
    pub approval_count: usize,
}

impl TransitionPlan {
    fn new(doc: &Document) -> Self {
        Self {
            writes: Vec::new(),
            history: None,
            status_after: doc.workflow_status(),
            version_after: doc.version_number(),
            approval_count: doc.approval_count(),
        }
    }

    /// Keeps a version that an interrupted attempt of the same request
    /// already wrote, so a retried submission does not bump it twice.
    pub fn pin_version(&mut self, version: VersionNumber) {
        for write in &mut self.writes {
            if let FieldUpdate::VersionNumber(planned) = write {
                *planned = version;
                self.version_after = version;
            }
        }
    }

    /// Writes that would change the snapshot, in order.
    pub fn effective_writes(&self, snapshot: &Document) -> Vec<FieldUpdate> {
        self.writes
            .iter()
            .filter(|w| !snapshot.already_holds(w))
            .cloned()
            .collect()
    }
}

/// A locked document only admits admin-tier actors.
pub fn check_lock_gate(
    doc: &Document,
    action: WorkflowAction,
    capabilities: &CapabilitySet,
) -> Result<(), WorkflowError> {
    if action.is_gated_by_lock() && doc.is_locked() && !capabilities.is_admin_tier() {
        return Err(WorkflowError::not_authorized(format!(
            "document {} is locked; only administrators may {}",
            doc.id(),
            action
        )));
    }
    Ok(())
}

/// Evaluates state guards for `request` and plans its writes.
///
/// Authorization has already been checked by the caller.
pub fn plan(
    doc: &Document,
    actor: &ActorId,
    request: &TransitionRequest,
) -> Result<TransitionPlan, WorkflowError> {
    match request {
        TransitionRequest::SubmitForReview {
            change_class,
            version_note,
        } => plan_submit(doc, *change_class, version_note.as_deref()),
        TransitionRequest::Approve { comment } => plan_approve(doc, actor, comment),
        TransitionRequest::Reject { comment } => plan_reject(doc, actor, comment),
        TransitionRequest::RequestFinalApproval => plan_request_final_approval(doc),
        TransitionRequest::Publish => plan_publish(doc, actor),
    }
}

fn plan_submit(
    doc: &Document,
    change_class: ChangeClass,
    version_note: Option<&str>,
) -> Result<TransitionPlan, WorkflowError> {
    let status = doc.workflow_status();
    if !status.accepts_submission() {
        return Err(WorkflowError::invalid_state(format!(
            "only draft or rejected documents can be submitted, document is {}",
            status
        )));
    }
    let target = status.transition_to(WorkflowStatus::PendingReview)?;

    // A revision keeps the target recorded on its parent through every
    // resubmission.
    let version = if doc.version_precomputed() {
        doc.version_number()
    } else {
        VersionCalculator::for_submission(doc.version_number(), change_class)
    };

    let mut plan = TransitionPlan::new(doc);
    plan.writes.push(FieldUpdate::Approvals(Vec::new()));
    plan.writes.push(FieldUpdate::AwaitingFinalApproval(false));
    plan.writes.push(FieldUpdate::VersionNumber(version));
    if let Some(note) = version_note.map(str::trim).filter(|n| !n.is_empty()) {
        plan.writes.push(FieldUpdate::VersionNote(note.to_string()));
    }
    plan.writes.push(FieldUpdate::HostStatus(HostStatusChange::unpublished(HostStatus::Pending)?));
    plan.writes.push(FieldUpdate::WorkflowStatus(target));

    plan.history = Some(HistoryEvent::SubmittedForReview);
    plan.status_after = target;
    plan.version_after = version;
    plan.approval_count = 0;
    Ok(plan)
}

fn require_under_review(doc: &Document, verb: &str) -> Result<(), WorkflowError> {
    if doc.workflow_status().is_under_review() {
        Ok(())
    } else {
        Err(WorkflowError::invalid_state(format!(
            "cannot {} a document that is {}",
            verb,
            doc.workflow_status()
        )))
    }
}

/// A rejection in the open cycle of a document still under review means
/// the rejection's own writes have not finished.
fn require_no_pending_rejection(doc: &Document, verb: &str) -> Result<(), WorkflowError> {
    if approval::has_rejection(doc.approvals()) {
        return Err(WorkflowError::invalid_state(format!(
            "cannot {} a document that has been rejected in this review cycle",
            verb
        )));
    }
    Ok(())
}

fn plan_approve(doc: &Document, actor: &ActorId, comment: &str) -> Result<TransitionPlan, WorkflowError> {
    require_under_review(doc, "approve")?;
    require_no_pending_rejection(doc, "approve")?;

    let mut approvals = doc.approvals().to_vec();
    approval::upsert_decision(
        &mut approvals,
        Approval::new(actor.clone(), Decision::Approved, comment.trim(), doc.version_number()),
    );
    let count = approval::approval_count(&approvals);

    let mut plan = TransitionPlan::new(doc);
    plan.writes.push(FieldUpdate::Approvals(approvals));
    plan.approval_count = count;

    if count >= REQUIRED_APPROVALS {
        let target = doc.workflow_status().transition_to(WorkflowStatus::Approved)?;
        plan.writes.push(FieldUpdate::AwaitingFinalApproval(false));
        plan.writes.push(FieldUpdate::WorkflowStatus(target));
        plan.history = Some(HistoryEvent::Approved);
        plan.status_after = target;
    } else if doc.awaiting_final_approval() {
        plan.writes.push(FieldUpdate::WorkflowStatus(WorkflowStatus::PendingFinalApproval));
        plan.status_after = WorkflowStatus::PendingFinalApproval;
    }
    Ok(plan)
}

fn plan_reject(doc: &Document, actor: &ActorId, comment: &str) -> Result<TransitionPlan, WorkflowError> {
    require_under_review(doc, "reject")?;

    let comment = comment.trim();
    if comment.is_empty() {
        return Err(WorkflowError::MissingComment);
    }
    let target = doc.workflow_status().transition_to(WorkflowStatus::Rejected)?;

    let mut approvals = doc.approvals().to_vec();
    approval::upsert_decision(
        &mut approvals,
        Approval::new(actor.clone(), Decision::Rejected, comment, doc.version_number()),
    );

    let mut plan = TransitionPlan::new(doc);
    plan.approval_count = approval::approval_count(&approvals);
    plan.writes.push(FieldUpdate::Approvals(approvals));
    plan.writes.push(FieldUpdate::AwaitingFinalApproval(false));
    plan.writes.push(FieldUpdate::HostStatus(HostStatusChange::unpublished(HostStatus::Draft)?));
    plan.writes.push(FieldUpdate::WorkflowStatus(target));
    plan.history = Some(HistoryEvent::Rejected);
    plan.status_after = target;
    Ok(plan)
}

fn plan_request_final_approval(doc: &Document) -> Result<TransitionPlan, WorkflowError> {
    let count = doc.approval_count();
    if doc.workflow_status() != WorkflowStatus::PendingReview {
        return Err(WorkflowError::invalid_state(format!(
            "final approval can only be requested while pending review, document is {}",
            doc.workflow_status()
        )));
    }
    if doc.awaiting_final_approval() {
        return Err(WorkflowError::invalid_state("final approval has already been requested"));
    }
    require_no_pending_rejection(doc, "request final approval for")?;
    if count != 1 {
        return Err(WorkflowError::invalid_state(format!(
            "final approval needs exactly one existing approval, found {}",
            count
        )));
    }
    let target = doc.workflow_status().transition_to(WorkflowStatus::PendingFinalApproval)?;

    let mut plan = TransitionPlan::new(doc);
    plan.writes.push(FieldUpdate::AwaitingFinalApproval(true));
    plan.writes.push(FieldUpdate::WorkflowStatus(target));
    plan.history = Some(HistoryEvent::FinalApprovalRequested);
    plan.status_after = target;
    Ok(plan)
}

fn plan_publish(doc: &Document, actor: &ActorId) -> Result<TransitionPlan, WorkflowError> {
    if doc.is_revision() {
        return Err(WorkflowError::invalid_state(format!(
            "document {} is a revision; publish it with publish-revision to merge it into its parent",
            doc.id()
        )));
    }
    let status = doc.workflow_status();
    if status.is_published() || status.is_terminal() {
        return Err(WorkflowError::invalid_state(format!(
            "document is already {}",
            status
        )));
    }

    // The approval count is reported before the state so that an early
    // publish attempt names what is missing.
    let count = doc.approval_count();
    if count < REQUIRED_APPROVALS {
        return Err(WorkflowError::InsufficientApprovals { found: count });
    }
    let target = status.transition_to(WorkflowStatus::Published)?;

    let context = PublishContext::for_approval(actor.clone());
    let mut plan = TransitionPlan::new(doc);
    plan.writes.push(FieldUpdate::IsLocked(true));
    plan.writes.push(FieldUpdate::HostStatus(HostStatusChange::published(context)));
    plan.writes.push(FieldUpdate::WorkflowStatus(target));
    plan.history = Some(HistoryEvent::Published);
    plan.status_after = target;
    Ok(plan)
}

// ════════════════════════════════════════════════════════════════════════════════
// Content edits
// ════════════════════════════════════════════════════════════════════════════════

/// Requested content changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentEdit {
    pub title: Option<String>,
    pub body: Option<String>,
    pub classification: Option<Classification>,
    pub attributes: Option<Attributes>,
    pub version_note: Option<String>,
    pub host_status: Option<HostStatus>,
}

/// Plans the writes for a content edit.
///
/// The edit path carries no [`PublishContext`], so asking it to publish is
/// refused as unauthorized.
pub fn plan_edit(doc: &Document, edit: &ContentEdit) -> Result<Vec<FieldUpdate>, WorkflowError> {
    let host_status = edit.host_status.map(HostStatusChange::unpublished).transpose()?;

    if doc.workflow_status().is_terminal() {
        return Err(WorkflowError::invalid_state(format!(
            "document is {} and can no longer be edited",
            doc.workflow_status()
        )));
    }

    let mut writes = Vec::new();
    if let Some(title) = &edit.title {
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        writes.push(FieldUpdate::Title(title.clone()));
    }
    if let Some(body) = &edit.body {
        writes.push(FieldUpdate::Body(body.clone()));
    }
    if let Some(classification) = &edit.classification {
        writes.push(FieldUpdate::Classification(classification.clone()));
    }
    if let Some(attributes) = &edit.attributes {
        reject_workflow_keys(attributes)?;
        writes.push(FieldUpdate::Attributes(attributes.clone()));
    }
    if let Some(note) = &edit.version_note {
        writes.push(FieldUpdate::VersionNote(note.clone()));
    }
    if let Some(change) = host_status {
        writes.push(FieldUpdate::HostStatus(change));
    }

    Ok(writes
        .into_iter()
        .filter(|w| !doc.already_holds(w))
        .collect())
}
