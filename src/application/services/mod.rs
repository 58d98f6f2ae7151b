//! Application services shared by the request handlers.
//!
//! - `WorkflowEngine` - review transitions, content edits, creation
//! - `RevisionManager` - opening and merging revisions
//! - `FieldWriter` - plan execution against the record store

mod field_writer;
mod notifier;
mod revision_manager;
mod workflow_engine;

pub use field_writer::{FieldWriter, HistoryAppend, WriteOutcome};
pub use revision_manager::{MergeOutcome, RevisionManager};
pub use workflow_engine::{NewDocument, TransitionOutcome, WorkflowEngine};
