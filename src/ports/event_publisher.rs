//! EventPublisher port - the notifier.
//!
//! The workflow announces completed transitions through this port without
//! knowing how notifications are delivered (email, chat, in-memory bus).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing workflow events.
///
/// From the workflow's point of view delivery is fire-and-forget: a failed
/// publish is logged by the caller and never fails the action that caused it.
///
/// # Example
///
/// ```ignore
/// let envelope = DocumentApproved { .. }.to_envelope()?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events, in order, best effort.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
