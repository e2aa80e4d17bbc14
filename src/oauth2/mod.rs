//! OAuth2 authorization-code helpers for Google and Yandex.
//!
//! Two capabilities per provider: build the authorization redirect URL,
//! and exchange a code for a token followed by a profile fetch. Everything
//! else (sessions, storage) is the caller's business.

mod config;
mod errors;
mod main;
mod provider;
mod types;

pub use config::{OAuth2Config, OAuth2Overrides};
pub use errors::OAuth2Error;
pub use main::OAuth2Client;
pub use provider::Provider;
pub use types::{CodeExchange, GoogleUserInfo, TokenResponse, UserProfile, YandexUserInfo};
