//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors, event plumbing and the
//! capability vocabulary used across the workflow.

mod auth;
mod capability;
mod command;
mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedActor};
pub use capability::{Capability, CapabilitySet};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{ActorId, DocumentId};
pub use state_machine::{InvalidTransition, StateMachine};
pub use timestamp::Timestamp;
