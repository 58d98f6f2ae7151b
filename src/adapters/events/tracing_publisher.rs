//! Notifier that writes workflow events to the log.
//!
//! The default notifier for the standalone server: each event becomes one
//! structured `tracing` record under the `method_workflow::events` target.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::info!(
            target: "method_workflow::events",
            event_id = %event.event_id,
            event_type = %event.event_type,
            document_id = %event.aggregate_id,
            actor_id = event.metadata.actor_id.as_deref().unwrap_or("-"),
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            payload = %event.payload,
            "workflow event"
        );
        Ok(())
    }
}
