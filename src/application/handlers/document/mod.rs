//! Document command and query handlers.
//!
//! Each handler takes a command naming the document plus its payload and
//! the request's `CommandMetadata`, and delegates to the workflow services.

mod approve_document;
mod create_document;
mod create_revision;
mod get_document;
mod publish_document;
mod publish_revision;
mod reject_document;
mod request_final_approval;
mod submit_for_review;
mod update_document;

pub use approve_document::{ApproveDocumentCommand, ApproveDocumentHandler};
pub use create_document::{CreateDocumentCommand, CreateDocumentHandler};
pub use create_revision::{CreateRevisionCommand, CreateRevisionHandler};
pub use get_document::{GetDocumentHandler, GetDocumentQuery};
pub use publish_document::{PublishDocumentCommand, PublishDocumentHandler};
pub use publish_revision::{PublishRevisionCommand, PublishRevisionHandler};
pub use reject_document::{RejectDocumentCommand, RejectDocumentHandler};
pub use request_final_approval::{RequestFinalApprovalCommand, RequestFinalApprovalHandler};
pub use submit_for_review::{SubmitForReviewCommand, SubmitForReviewHandler};
pub use update_document::{UpdateDocumentCommand, UpdateDocumentHandler};
