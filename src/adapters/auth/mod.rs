//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `static_token` - Token table loaded from configuration

mod static_token;

pub use static_token::StaticTokenValidator;
