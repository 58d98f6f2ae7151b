//! Application configuration module
//!
//! Type-safe configuration loading using the `config` and `dotenvy` crates.
//! Values come from an optional `method-workflow.toml` in the working
//! directory, overridden by environment variables with the
//! `METHOD_WORKFLOW` prefix. Nested values use double underscores.
//!
//! # Example
//!
//! ```no_run
//! use method_workflow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod error;
mod logging;
mod roles;
mod server;
mod workflow;

pub use auth::{AuthConfig, MIN_PRODUCTION_TOKEN_LENGTH};
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use roles::{ActorRoles, RoleTable};
pub use server::{Environment, ServerConfig};
pub use workflow::{WorkflowConfig, MAX_CONFLICT_RETRIES_LIMIT};

use serde::Deserialize;

/// Base name of the optional configuration file.
pub const CONFIG_FILE: &str = "method-workflow";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development configuration with no actors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Conflict retries and merge wording
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Role name to capabilities
    #[serde(default)]
    pub roles: RoleTable,

    /// Actor id to role names
    #[serde(default)]
    pub actors: ActorRoles,

    /// Static bearer tokens
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from the optional file and environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `METHOD_WORKFLOW__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `METHOD_WORKFLOW__WORKFLOW__MAX_CONFLICT_RETRIES=3`
    ///
    /// Keys read from the environment are lowercased by the `config` crate,
    /// so bearer tokens and actor tables belong in the file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::default()
                    .prefix("METHOD_WORKFLOW")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.workflow.validate()?;
        self.logging.validate()?;
        self.actors.validate(&self.roles)?;
        self.auth.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
