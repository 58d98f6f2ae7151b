//! Document module - the versioned test-method record and its workflow data.
//!
//! A document carries two statuses: the host platform's publish state and the
//! workflow state driven by review. Approvals are cycle-scoped; the revision
//! history is the durable audit trail.

mod aggregate;
pub mod approval;
mod errors;
mod events;
pub mod fields;
pub mod history;
mod status;
mod values;

pub use aggregate::{reject_workflow_keys, slugify, Document, MAX_TITLE_LENGTH};
pub use approval::{Approval, ApprovalEntry, Decision, RevisionSeparator};
pub use errors::{ErrorKind, WorkflowError};
pub use events::{
    DocumentApproved, DocumentPublished, DocumentRejected, DocumentSubmittedForReview,
    FinalApprovalRequested, RevisionCreated, RevisionPublished,
};
pub use fields::{Attributes, FieldUpdate, HostStatusChange, WorkflowField};
pub use history::{HistoryEntry, HistoryEvent};
pub use status::{HostStatus, WorkflowStatus};
pub use values::{ChangeClass, Classification, VersionNumber};
