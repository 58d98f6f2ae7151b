//! Workflow module - version arithmetic and the review state machine.
//!
//! Everything here is pure: guards and plans are computed from a document
//! snapshot, and the application layer executes them against the ports.

mod action;
mod publish_context;
pub mod transitions;
mod version;

pub use action::WorkflowAction;
pub use publish_context::{PublishContext, PublishOrigin};
pub use transitions::{
    check_lock_gate, plan, plan_edit, ContentEdit, TransitionPlan, TransitionRequest,
    REQUIRED_APPROVALS,
};
pub use version::VersionCalculator;
