//! Command and query handlers.

pub mod document;
mod response;

pub use document::{
    ApproveDocumentCommand, ApproveDocumentHandler, CreateDocumentCommand, CreateDocumentHandler,
    CreateRevisionCommand, CreateRevisionHandler, GetDocumentHandler, GetDocumentQuery,
    PublishDocumentCommand, PublishDocumentHandler, PublishRevisionCommand, PublishRevisionHandler,
    RejectDocumentCommand, RejectDocumentHandler, RequestFinalApprovalCommand,
    RequestFinalApprovalHandler, SubmitForReviewCommand, SubmitForReviewHandler,
    UpdateDocumentCommand, UpdateDocumentHandler,
};
pub use response::HandlerResponse;
