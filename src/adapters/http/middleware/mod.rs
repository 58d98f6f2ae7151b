//! HTTP middleware for axum.
//!
//! - `auth` - Bearer authentication middleware and the `RequireAuth` extractor

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
