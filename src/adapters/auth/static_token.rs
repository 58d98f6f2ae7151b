//! Static bearer-token session validator.
//!
//! Maps configured tokens to actors. Suitable for local deployments and
//! tests; a real deployment puts an identity provider behind the
//! `SessionValidator` port instead.
//!
//! # Example
//!
//! ```ignore
//! let validator = StaticTokenValidator::new()
//!     .with_actor("alice-token", "alice")?;
//!
//! let actor = validator.validate("alice-token").await?;
//! assert_eq!(actor.id.as_str(), "alice");
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::config::AuthConfig;
use crate::domain::foundation::{ActorId, AuthError, AuthenticatedActor, ValidationError};
use crate::ports::SessionValidator;

/// Token table validator.
#[derive(Debug, Default)]
pub struct StaticTokenValidator {
    tokens: RwLock<HashMap<String, AuthenticatedActor>>,
    /// Error returned for every validation while set
    force_error: RwLock<Option<AuthError>>,
}

impl StaticTokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from configuration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ValidationError> {
        config
            .tokens
            .iter()
            .try_fold(Self::new(), |validator, (token, actor)| {
                validator.with_actor(token.clone(), actor.clone())
            })
    }

    /// Adds a token for `actor_id`.
    pub fn with_actor(
        self,
        token: impl Into<String>,
        actor_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let actor = AuthenticatedActor::new(ActorId::new(actor_id)?, None);
        self.add_token(token, actor);
        Ok(self)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Clears the forced error.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, actor: AuthenticatedActor) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), actor);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }

    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl SessionValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedActor, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn returns_actor_for_registered_token() {
        let validator = StaticTokenValidator::new().with_actor("t-1", "alice").unwrap();

        let actor = validator.validate("t-1").await.unwrap();
        assert_eq!(actor.id.as_str(), "alice");
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = StaticTokenValidator::new();
        assert!(matches!(validator.validate("t-1").await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn builds_from_config() {
        let mut tokens = BTreeMap::new();
        tokens.insert("a".to_string(), "alice".to_string());
        tokens.insert("b".to_string(), "bob".to_string());
        let validator = StaticTokenValidator::from_config(&AuthConfig { tokens }).unwrap();

        assert_eq!(validator.token_count(), 2);
        assert_eq!(validator.validate("b").await.unwrap().id.as_str(), "bob");
    }

    #[test]
    fn blank_actor_in_config_is_rejected() {
        let mut tokens = BTreeMap::new();
        tokens.insert("a".to_string(), "  ".to_string());
        assert!(StaticTokenValidator::from_config(&AuthConfig { tokens }).is_err());
    }

    #[tokio::test]
    async fn forced_error_wins_until_cleared() {
        let validator = StaticTokenValidator::new()
            .with_actor("t-1", "alice")
            .unwrap()
            .with_error(AuthError::service_unavailable("down"));

        assert!(matches!(
            validator.validate("t-1").await,
            Err(AuthError::ServiceUnavailable(_))
        ));

        validator.clear_error();
        assert!(validator.validate("t-1").await.is_ok());
    }

    #[tokio::test]
    async fn removed_token_stops_validating() {
        let validator = StaticTokenValidator::new().with_actor("t-1", "alice").unwrap();
        validator.remove_token("t-1");
        assert!(validator.validate("t-1").await.is_err());
    }
}
