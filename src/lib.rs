//! auth-broker - thin authentication helpers for web backends.
//!
//! Three concerns, one facade:
//! - OAuth2 authorization-code flows for Google and Yandex (URL building,
//!   code-for-token exchange, profile fetch)
//! - Passkey (WebAuthn) registration and authentication, with all
//!   cryptography delegated to `webauthn-rs`
//! - Configuration merged from environment defaults and caller overrides
//!
//! Sessions, user accounts, and persistence stay with the caller; the
//! shipped in-memory passkey stores are placeholders behind injectable
//! traits.

mod broker;
mod oauth2;
mod passkey;
#[cfg(test)]
mod test_utils;
mod utils;

pub use broker::{AuthBroker, AuthConfig, AuthError, AuthOverrides};

pub use oauth2::{
    CodeExchange, GoogleUserInfo, OAuth2Client, OAuth2Config, OAuth2Error, OAuth2Overrides,
    Provider, TokenResponse, UserProfile, YandexUserInfo,
};

pub use passkey::{
    AuthenticationOutcome, ChallengeFlow, ChallengeStore, CredentialStore,
    InMemoryChallengeStore, InMemoryCredentialStore, PasskeyAuthenticator, PasskeyConfig,
    PasskeyError, PasskeyOverrides, RegistrationOutcome, StoredChallenge, StoredCredential,
};

// Wire types callers relay between the browser and this crate.
pub use webauthn_rs::prelude::{
    CreationChallengeResponse, PublicKeyCredential, RegisterPublicKeyCredential,
    RequestChallengeResponse,
};
