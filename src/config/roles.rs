//! Role and actor tables for the role-based authorization adapter
//!
//! The workflow core only knows capabilities. Host roles are mapped onto
//! capabilities here, and actors onto roles. Both tables are usually given
//! in `method-workflow.toml`:
//!
//! ```toml
//! [roles]
//! author = ["edit_own_documents", "create_revisions"]
//! reviewer = ["edit_own_documents", "approve_documents"]
//!
//! [actors]
//! alice = ["author"]
//! bob = ["reviewer"]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use super::error::ValidationError;
use crate::domain::foundation::{Capability, CapabilitySet};

/// Role name to capabilities.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RoleTable(BTreeMap<String, Vec<Capability>>);

impl RoleTable {
    pub fn new(roles: BTreeMap<String, Vec<Capability>>) -> Self {
        Self(roles)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    /// Union of the capabilities of `roles`. Unknown roles grant nothing.
    pub fn capabilities_for<'a>(&self, roles: impl IntoIterator<Item = &'a str>) -> CapabilitySet {
        roles
            .into_iter()
            .filter_map(|role| self.0.get(role))
            .flatten()
            .copied()
            .collect()
    }
}

impl Default for RoleTable {
    /// Author, reviewer and admin tiers.
    fn default() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert(
            "author".to_string(),
            vec![Capability::EditOwnDocuments, Capability::CreateRevisions],
        );
        roles.insert(
            "reviewer".to_string(),
            vec![
                Capability::EditOwnDocuments,
                Capability::CreateRevisions,
                Capability::ApproveDocuments,
            ],
        );
        roles.insert("admin".to_string(), Capability::ALL.to_vec());
        Self(roles)
    }
}

/// Actor id to role names.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ActorRoles(BTreeMap<String, Vec<String>>);

impl ActorRoles {
    pub fn new(actors: BTreeMap<String, Vec<String>>) -> Self {
        Self(actors)
    }

    pub fn roles_of(&self, actor: &str) -> &[String] {
        self.0.get(actor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every role referenced must exist in `roles`.
    pub fn validate(&self, roles: &RoleTable) -> Result<(), ValidationError> {
        for (actor, assigned) in &self.0 {
            if let Some(role) = assigned.iter().find(|r| !roles.contains(r)) {
                return Err(ValidationError::UnknownRole {
                    actor: actor.clone(),
                    role: role.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_admin_holds_every_capability() {
        let table = RoleTable::default();
        let admin = table.capabilities_for(["admin"]);
        for capability in Capability::ALL {
            assert!(admin.has(capability));
        }
        assert!(admin.is_admin_tier());
    }

    #[test]
    fn reviewers_cannot_publish_by_default() {
        let reviewer = RoleTable::default().capabilities_for(["reviewer"]);
        assert!(reviewer.has(Capability::ApproveDocuments));
        assert!(!reviewer.has(Capability::PublishDocuments));
        assert!(!reviewer.is_admin_tier());
    }

    #[test]
    fn capabilities_of_several_roles_are_merged() {
        let table = RoleTable::default();
        let caps = table.capabilities_for(["author", "reviewer", "ghost"]);
        assert!(caps.has(Capability::CreateRevisions));
        assert!(caps.has(Capability::ApproveDocuments));
    }

    #[test]
    fn unknown_role_assignment_is_rejected() {
        let mut actors = BTreeMap::new();
        actors.insert("alice".to_string(), vec!["author".to_string(), "owner".to_string()]);
        let err = ActorRoles::new(actors).validate(&RoleTable::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownRole {
                actor: "alice".to_string(),
                role: "owner".to_string()
            }
        );
    }

    #[test]
    fn deserializes_from_snake_case_capability_names() {
        let table: RoleTable =
            serde_json::from_str(r#"{"qa": ["approve_documents", "publish_documents"]}"#).unwrap();
        let caps = table.capabilities_for(["qa"]);
        assert!(caps.has(Capability::PublishDocuments));
        assert!(!caps.has(Capability::EditOwnDocuments));
    }
}
