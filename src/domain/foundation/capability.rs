//! Capabilities an actor may hold.
//!
//! The workflow asks "may this actor approve?" instead of "is this actor a
//! reviewer?". Mapping host roles onto capabilities is configuration, done by
//! the authorization adapter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// A single permission understood by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Edit and submit documents the actor authored.
    EditOwnDocuments,
    /// Edit and submit documents authored by someone else.
    EditOthersDocuments,
    /// Record approve/reject decisions.
    ApproveDocuments,
    /// Publish approved documents and merge approved revisions.
    PublishDocuments,
    /// Open a revision against a published document.
    CreateRevisions,
    /// Edit or transition documents that are locked (admin tier).
    ManageLockedDocuments,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::EditOwnDocuments,
        Capability::EditOthersDocuments,
        Capability::ApproveDocuments,
        Capability::PublishDocuments,
        Capability::CreateRevisions,
        Capability::ManageLockedDocuments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::EditOwnDocuments => "edit_own_documents",
            Capability::EditOthersDocuments => "edit_others_documents",
            Capability::ApproveDocuments => "approve_documents",
            Capability::PublishDocuments => "publish_documents",
            Capability::CreateRevisions => "create_revisions",
            Capability::ManageLockedDocuments => "manage_locked_documents",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("capability", format!("unknown capability '{}'", s)))
    }
}

/// The set of capabilities resolved for one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Admin tier is the ability to touch locked documents.
    pub fn is_admin_tier(&self) -> bool {
        self.has(Capability::ManageLockedDocuments)
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    pub fn extend(&mut self, other: &CapabilitySet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
