//! HTTP adapter for document endpoints.
//!
//! Exposes the review workflow via REST API under `/api/documents`. Every
//! route requires a Bearer token; responses use the `{ok, message, data}`
//! envelope and refusal kinds map onto HTTP statuses.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{status_for, DocumentApiError, DocumentsAppState, REQUEST_ID_HEADER};
pub use routes::documents_router;
