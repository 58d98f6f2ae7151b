//! Authorization adapters.
//!
//! - `RoleBasedAuthorizationChecker` - Role and actor tables from configuration

mod role_based;

pub use role_based::RoleBasedAuthorizationChecker;
