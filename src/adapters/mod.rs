//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the workflow core to the host platform:
//! - `auth` - Bearer token session validation
//! - `authorization` - Role-table capability checks
//! - `events` - Notifier implementations (in-memory bus, tracing log)
//! - `http` - axum REST API
//! - `storage` - Document stores with compare-and-set stamps

pub mod auth;
pub mod authorization;
pub mod events;
pub mod http;
pub mod storage;

pub use auth::StaticTokenValidator;
pub use authorization::RoleBasedAuthorizationChecker;
pub use events::{InMemoryEventBus, TracingEventPublisher};
pub use storage::InMemoryDocumentStore;
