//! Authentication configuration

use serde::Deserialize;
use std::collections::BTreeMap;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum bearer token length accepted in production.
pub const MIN_PRODUCTION_TOKEN_LENGTH: usize = 24;

/// Static bearer tokens for the reference session validator
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Token to actor id
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// In production, short tokens are refused.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        for (token, actor) in &self.tokens {
            if actor.trim().is_empty() {
                return Err(ValidationError::EmptyTokenActor);
            }
            if *environment == Environment::Production && token.len() < MIN_PRODUCTION_TOKEN_LENGTH {
                return Err(ValidationError::WeakToken(actor.clone()));
            }
        }
        Ok(())
    }
}
