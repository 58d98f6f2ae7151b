//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors, events, capabilities)
//! - `document` - The document aggregate, approvals, history and field writes
//! - `workflow` - Version calculator and review state machine
//! - `revision` - Revision drafting and merge planning

pub mod document;
pub mod foundation;
pub mod revision;
pub mod workflow;
