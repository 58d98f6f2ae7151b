//! Command infrastructure for request handlers.
//!
//! Every handler receives a single `CommandMetadata` instead of loose
//! actor/correlation parameters, and propagates it to emitted events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ActorId;

/// Metadata context for command handlers.
///
/// The actor has already been authenticated by the boundary that built this
/// value; business-rule authorization still happens in the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The actor executing this command.
    pub actor_id: ActorId,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "http", "cli", "test").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for an actor.
    pub fn new(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
