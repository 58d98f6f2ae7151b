//! Fire-and-forget delivery of workflow events.

use crate::domain::foundation::{CommandMetadata, SerializableDomainEvent};
use crate::ports::EventPublisher;

/// Wraps `event` in an envelope carrying the request's correlation and
/// actor, and hands it to the notifier. Failures are logged, never returned.
pub(crate) async fn notify<E>(publisher: &dyn EventPublisher, event: &E, metadata: &CommandMetadata)
where
    E: SerializableDomainEvent,
{
    let envelope = match event.to_envelope() {
        Ok(envelope) => envelope
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.as_str()),
        Err(err) => {
            tracing::warn!(
                event_type = event.event_type(),
                error = %err,
                "could not serialize workflow event"
            );
            return;
        }
    };

    let event_type = envelope.event_type.clone();
    if let Err(err) = publisher.publish(envelope).await {
        tracing::warn!(
            event_type = %event_type,
            document_id = %event.aggregate_id(),
            error = %err,
            "notifier failed, event dropped"
        );
    }
}
