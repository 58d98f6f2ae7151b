//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the workflow core and the host platform. Adapters implement these ports.
//!
//! - `DocumentStore` - Field-level record store with compare-and-set
//! - `AuthorizationChecker` - Capability lookups for actors
//! - `EventPublisher` - Notifier for completed transitions
//! - `SessionValidator` - Bearer credential validation at the boundary

mod authorization_checker;
mod document_store;
mod event_publisher;
mod session_validator;

pub use authorization_checker::AuthorizationChecker;
pub use document_store::{DocumentFilter, DocumentStore, Stamp};
pub use event_publisher::EventPublisher;
pub use session_validator::SessionValidator;
