//! The facade tying the OAuth2 and passkey modules together.
//!
//! Construction merges environment defaults with caller overrides; after
//! that every method dispatches to the module that owns the flow.

mod config;
mod core;
mod errors;

pub use config::{AuthConfig, AuthOverrides};
pub use core::AuthBroker;
pub use errors::AuthError;
