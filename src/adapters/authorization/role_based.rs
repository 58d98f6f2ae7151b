//! Role-table authorization checker.
//!
//! Resolves an actor's roles from the `actors` table and the roles'
//! capabilities from the `roles` table. Actors missing from the table hold
//! no capabilities and are refused everything.

use async_trait::async_trait;

use crate::config::{ActorRoles, AppConfig, RoleTable};
use crate::domain::document::Document;
use crate::domain::foundation::{ActorId, CapabilitySet, DomainError};
use crate::domain::workflow::WorkflowAction;
use crate::ports::AuthorizationChecker;

#[derive(Debug, Clone, Default)]
pub struct RoleBasedAuthorizationChecker {
    roles: RoleTable,
    actors: ActorRoles,
}

impl RoleBasedAuthorizationChecker {
    pub fn new(roles: RoleTable, actors: ActorRoles) -> Self {
        Self { roles, actors }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.roles.clone(), config.actors.clone())
    }

    fn resolve(&self, actor: &ActorId) -> CapabilitySet {
        self.roles.capabilities_for(
            self.actors
                .roles_of(actor.as_str())
                .iter()
                .map(String::as_str),
        )
    }
}

#[async_trait]
impl AuthorizationChecker for RoleBasedAuthorizationChecker {
    async fn capabilities(&self, actor: &ActorId) -> Result<CapabilitySet, DomainError> {
        Ok(self.resolve(actor))
    }

    async fn can(
        &self,
        actor: &ActorId,
        action: WorkflowAction,
        document: &Document,
    ) -> Result<bool, DomainError> {
        let is_author = document.author_id() == actor;
        Ok(self.resolve(actor).has(action.required_capability(is_author)))
    }
}
