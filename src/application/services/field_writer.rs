//! Executes planned field writes against the record store.
//!
//! The store only offers single-field writes. A plan is executed as a chain
//! of compare-and-set writes: the first against the snapshot's stamp, each
//! later one against the stamp the previous write returned. Any write from
//! elsewhere in between breaks the chain, and the caller re-reads and
//! re-plans. Writes before the break stay applied.

use std::sync::Arc;

use crate::domain::document::history;
use crate::domain::document::{Document, FieldUpdate, HistoryEvent, VersionNumber, WorkflowError};
use crate::domain::foundation::{ActorId, DocumentId, DomainError};
use crate::ports::DocumentStore;

/// Result of executing a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Every effective write landed.
    Applied { writes: usize },
    /// Another write came in first; re-read and re-plan. The first `landed`
    /// effective writes of the plan were applied before that.
    Conflict { landed: usize },
}

/// One history entry to append.
#[derive(Debug, Clone)]
pub struct HistoryAppend {
    pub document_id: DocumentId,
    pub actor_id: ActorId,
    pub event: HistoryEvent,
    pub version: VersionNumber,
    pub revision_id: Option<DocumentId>,
}

#[derive(Clone)]
pub struct FieldWriter {
    store: Arc<dyn DocumentStore>,
}

impl FieldWriter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Writes the fields of `writes` that differ from `snapshot`, in order.
    ///
    /// # Errors
    ///
    /// `StoreWriteFailed` if any write fails for a reason other than a
    /// concurrent write. Writes before the failing one stay applied.
    pub async fn execute(
        &self,
        snapshot: &Document,
        writes: &[FieldUpdate],
    ) -> Result<WriteOutcome, WorkflowError> {
        let pending = writes
            .iter()
            .filter(|update| !snapshot.already_holds(update))
            .cloned();

        let mut stamp = snapshot.stamp();
        let mut applied = 0;
        for update in pending {
            let field = update.name();
            match self.store.compare_and_set(snapshot.id(), stamp, update).await {
                Ok(next) => {
                    stamp = next;
                    applied += 1;
                }
                Err(err) if err.is_conflict() => {
                    tracing::debug!(
                        document_id = %snapshot.id(),
                        field,
                        stamp,
                        landed = applied,
                        "document changed underneath the plan, write rejected"
                    );
                    return Ok(WriteOutcome::Conflict { landed: applied });
                }
                Err(err) => return Err(write_failed(snapshot.id(), field, err)),
            }
        }
        Ok(WriteOutcome::Applied { writes: applied })
    }

    /// Appends one history entry with read-modify-write, retrying on
    /// conflict up to `max_retries` times.
    pub async fn append_history(
        &self,
        append: &HistoryAppend,
        max_retries: u32,
    ) -> Result<(), WorkflowError> {
        for attempt in 0..=max_retries {
            let document = self
                .store
                .get(append.document_id)
                .await?
                .ok_or_else(|| WorkflowError::not_found(append.document_id))?;

            let mut entries = document.revision_history().to_vec();
            history::append(
                &mut entries,
                append.actor_id.clone(),
                append.event.clone(),
                append.version,
                append.revision_id,
            );

            match self
                .store
                .compare_and_set(document.id(), document.stamp(), FieldUpdate::History(entries))
                .await
            {
                Ok(_) => return Ok(()),
                Err(err) if err.is_conflict() => {
                    tracing::debug!(document_id = %document.id(), attempt, "history append conflicted, retrying");
                }
                Err(err) => return Err(write_failed(document.id(), "revision_history", err)),
            }
        }

        Err(WorkflowError::store_write_failed(format!(
            "history of document {} kept changing, gave up after {} attempts",
            append.document_id,
            max_retries + 1
        )))
    }
}

fn write_failed(id: DocumentId, field: &str, err: DomainError) -> WorkflowError {
    tracing::warn!(document_id = %id, field, error = %err, "field write failed");
    WorkflowError::store_write_failed(format!("writing '{}' on document {}: {}", field, id, err))
}
