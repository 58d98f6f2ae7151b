//! Axum router configuration for document endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    approve_document, create_document, create_revision, get_document, publish_document,
    publish_revision, reject_document, request_final_approval, submit_for_review,
    update_document, DocumentsAppState,
};

/// Create the documents API router.
///
/// # Routes
///
/// ## Content
/// - `POST /` - Create a draft document
/// - `GET /:id` - Read a document
/// - `PUT /:id` - Edit content fields
///
/// ## Review
/// - `POST /:id/submit` - Submit for review
/// - `POST /:id/approve` - Record an approval
/// - `POST /:id/reject` - Reject with a comment
/// - `POST /:id/request-final-approval` - Hand off to an administrator
/// - `POST /:id/publish` - Publish after dual approval
///
/// ## Revisions
/// - `POST /:id/revisions` - Open a revision of a published document
/// - `POST /:id/publish-revision` - Merge an approved revision into its parent
pub fn documents_routes() -> Router<DocumentsAppState> {
    Router::new()
        // Content
        .route("/", post(create_document))
        .route("/:id", get(get_document).put(update_document))
        // Review
        .route("/:id/submit", post(submit_for_review))
        .route("/:id/approve", post(approve_document))
        .route("/:id/reject", post(reject_document))
        .route("/:id/request-final-approval", post(request_final_approval))
        .route("/:id/publish", post(publish_document))
        // Revisions
        .route("/:id/revisions", post(create_revision))
        .route("/:id/publish-revision", post(publish_revision))
}

/// Create the complete documents module router, mounted at `/api/documents`.
pub fn documents_router() -> Router<DocumentsAppState> {
    documents_routes()
}
