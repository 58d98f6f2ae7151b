//! HTTP handlers for document endpoints.
//!
//! These connect axum routes to the application command handlers. The
//! authenticated actor always comes from `RequireAuth`, never from the body.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    ApproveDocumentCommand, ApproveDocumentHandler, CreateDocumentCommand, CreateDocumentHandler,
    CreateRevisionCommand, CreateRevisionHandler, GetDocumentHandler, GetDocumentQuery,
    HandlerResponse, PublishDocumentCommand, PublishDocumentHandler, PublishRevisionCommand,
    PublishRevisionHandler, RejectDocumentCommand, RejectDocumentHandler,
    RequestFinalApprovalCommand, RequestFinalApprovalHandler, SubmitForReviewCommand,
    SubmitForReviewHandler, UpdateDocumentCommand, UpdateDocumentHandler,
};
use crate::application::{RevisionManager, WorkflowEngine};
use crate::domain::document::{Document, ErrorKind, WorkflowError};
use crate::domain::foundation::{AuthenticatedActor, CommandMetadata, DocumentId, ValidationError};

use super::dto::{
    CreateDocumentRequest, CreateRevisionRequest, DecisionRequest, MergeResponse,
    SubmitForReviewRequest, TransitionResponse, UpdateDocumentRequest,
};

/// Header whose value, when present, becomes the correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the document routes. Cloned per request.
#[derive(Clone)]
pub struct DocumentsAppState {
    pub engine: Arc<WorkflowEngine>,
    pub revisions: Arc<RevisionManager>,
}

impl DocumentsAppState {
    pub fn new(engine: Arc<WorkflowEngine>, revisions: Arc<RevisionManager>) -> Self {
        Self { engine, revisions }
    }

    pub fn create_handler(&self) -> CreateDocumentHandler {
        CreateDocumentHandler::new(self.engine.clone())
    }

    pub fn get_handler(&self) -> GetDocumentHandler {
        GetDocumentHandler::new(self.engine.clone())
    }

    pub fn update_handler(&self) -> UpdateDocumentHandler {
        UpdateDocumentHandler::new(self.engine.clone())
    }

    pub fn submit_handler(&self) -> SubmitForReviewHandler {
        SubmitForReviewHandler::new(self.engine.clone())
    }

    pub fn approve_handler(&self) -> ApproveDocumentHandler {
        ApproveDocumentHandler::new(self.engine.clone())
    }

    pub fn reject_handler(&self) -> RejectDocumentHandler {
        RejectDocumentHandler::new(self.engine.clone())
    }

    pub fn final_approval_handler(&self) -> RequestFinalApprovalHandler {
        RequestFinalApprovalHandler::new(self.engine.clone())
    }

    pub fn publish_handler(&self) -> PublishDocumentHandler {
        PublishDocumentHandler::new(self.engine.clone())
    }

    pub fn create_revision_handler(&self) -> CreateRevisionHandler {
        CreateRevisionHandler::new(self.revisions.clone())
    }

    pub fn publish_revision_handler(&self) -> PublishRevisionHandler {
        PublishRevisionHandler::new(self.revisions.clone())
    }
}

fn metadata(actor: AuthenticatedActor, headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new(actor.id).with_source("http");
    match headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        Some(request_id) => metadata.with_correlation_id(request_id),
        None => metadata,
    }
}

fn parse_id(raw: &str) -> Result<DocumentId, DocumentApiError> {
    raw.parse::<DocumentId>().map_err(|e| {
        DocumentApiError(ValidationError::invalid_format("document_id", e.to_string()).into())
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/documents/:id
pub async fn get_document(
    State(state): State<DocumentsAppState>,
    RequireAuth(_actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<HandlerResponse<Document>>, DocumentApiError> {
    let query = GetDocumentQuery {
        document_id: parse_id(&id)?,
    };
    let document = state.get_handler().handle(query).await?;
    Ok(Json(HandlerResponse::success("document loaded", document)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/documents
pub async fn create_document(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    headers: HeaderMap,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, DocumentApiError> {
    let cmd = CreateDocumentCommand {
        title: request.title,
        body: request.body,
        slug: request.slug,
        classification: request.classification,
        attributes: request.attributes,
        version: request.version,
        version_note: request.version_note,
    };
    let document = state
        .create_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(HandlerResponse::success("document created", document)),
    ))
}

/// PUT /api/documents/:id
pub async fn update_document(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Json<HandlerResponse<Document>>, DocumentApiError> {
    let cmd = UpdateDocumentCommand {
        document_id: parse_id(&id)?,
        edit: request.into(),
    };
    let document = state
        .update_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok(Json(HandlerResponse::success("document updated", document)))
}

/// POST /api/documents/:id/submit
pub async fn submit_for_review(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SubmitForReviewRequest>,
) -> Result<Json<HandlerResponse<TransitionResponse>>, DocumentApiError> {
    let cmd = SubmitForReviewCommand {
        document_id: parse_id(&id)?,
        change_class: request.change_class,
        version_note: request.version_note,
    };
    let outcome = state
        .submit_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok(Json(HandlerResponse::success(
        "submitted for review",
        outcome.into(),
    )))
}

/// POST /api/documents/:id/approve
pub async fn approve_document(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<HandlerResponse<TransitionResponse>>, DocumentApiError> {
    let cmd = ApproveDocumentCommand {
        document_id: parse_id(&id)?,
        comment: request.comment,
    };
    let outcome = state
        .approve_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok(Json(HandlerResponse::success("approval recorded", outcome.into())))
}

/// POST /api/documents/:id/reject
pub async fn reject_document(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<HandlerResponse<TransitionResponse>>, DocumentApiError> {
    let cmd = RejectDocumentCommand {
        document_id: parse_id(&id)?,
        comment: request.comment,
    };
    let outcome = state
        .reject_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok(Json(HandlerResponse::success("document rejected", outcome.into())))
}

/// POST /api/documents/:id/request-final-approval
pub async fn request_final_approval(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<HandlerResponse<TransitionResponse>>, DocumentApiError> {
    let cmd = RequestFinalApprovalCommand {
        document_id: parse_id(&id)?,
    };
    let outcome = state
        .final_approval_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok(Json(HandlerResponse::success(
        "final approval requested",
        outcome.into(),
    )))
}

/// POST /api/documents/:id/publish
pub async fn publish_document(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<HandlerResponse<TransitionResponse>>, DocumentApiError> {
    let cmd = PublishDocumentCommand {
        document_id: parse_id(&id)?,
    };
    let outcome = state
        .publish_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok(Json(HandlerResponse::success("document published", outcome.into())))
}

/// POST /api/documents/:id/revisions
pub async fn create_revision(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<CreateRevisionRequest>,
) -> Result<impl IntoResponse, DocumentApiError> {
    let cmd = CreateRevisionCommand {
        parent_id: parse_id(&id)?,
        change_class: request.change_class,
    };
    let revision = state
        .create_revision_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(HandlerResponse::success("revision created", revision)),
    ))
}

/// POST /api/documents/:id/publish-revision
pub async fn publish_revision(
    State(state): State<DocumentsAppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<HandlerResponse<MergeResponse>>, DocumentApiError> {
    let cmd = PublishRevisionCommand {
        revision_id: parse_id(&id)?,
    };
    let outcome = state
        .publish_revision_handler()
        .handle(cmd, metadata(actor, &headers))
        .await?;
    Ok(Json(HandlerResponse::success(
        "revision merged into parent",
        outcome.into(),
    )))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Workflow error rendered as an HTTP response.
#[derive(Debug)]
pub struct DocumentApiError(pub WorkflowError);

impl From<WorkflowError> for DocumentApiError {
    fn from(err: WorkflowError) -> Self {
        Self(err)
    }
}

/// HTTP status for a refusal kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
        ErrorKind::InvalidState | ErrorKind::InsufficientApprovals | ErrorKind::RevisionExists => {
            StatusCode::CONFLICT
        }
        ErrorKind::MissingComment | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::StoreWriteFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DocumentApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        let body = HandlerResponse::<()>::failure(&self.0);
        (status, Json(body)).into_response()
    }
}
