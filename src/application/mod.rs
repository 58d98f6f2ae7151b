//! Application layer - services and request handlers.
//!
//! Services run the read-guard-write cycle against the ports; handlers are
//! the per-request entry points that adapters call.

pub mod handlers;
pub mod services;

pub use handlers::HandlerResponse;
pub use services::{MergeOutcome, NewDocument, RevisionManager, TransitionOutcome, WorkflowEngine};
