//! Revision module - child drafts of published documents and their merge.
//!
//! A revision is a full document flagged with `is_revision` and pointing at
//! its parent. It goes through the ordinary review workflow and, once
//! approved, is merged back into the parent and archived. The parent keeps
//! its slug throughout.

mod creation;
mod merge;

pub use creation::{
    check_parent_accepts_revision, draft_revision, ensure_no_open_revision, is_open_revision_of,
    revision_slug, RevisionDraft,
};
pub use merge::{check_mergeable, plan_merge, MergePlan, MergeStep, VERSION_PLACEHOLDER};
