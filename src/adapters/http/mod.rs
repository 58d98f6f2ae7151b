//! HTTP adapters - REST API implementations.

pub mod documents;
pub mod middleware;

use std::time::Duration;

use axum::{http::StatusCode, middleware::from_fn_with_state, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use documents::{documents_router, DocumentsAppState};
pub use middleware::{auth_middleware, AuthState};

/// Builds the full API: document routes behind Bearer authentication.
pub fn api_router(state: DocumentsAppState, auth: AuthState) -> Router {
    Router::new()
        .nest("/api/documents", documents_router())
        .route("/health", axum::routing::get(|| async { StatusCode::OK }))
        .layer(from_fn_with_state(auth, auth_middleware))
        .with_state(state)
}

/// Wraps the router in the transport layers used by the server binary.
///
/// Layers run outside-in: request id assignment, tracing, timeout.
pub fn with_transport_layers(router: Router, timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
