mod auth;
mod challenge;
mod register;
#[cfg(test)]
mod soft_authenticator;

use tokio::sync::Mutex;
use webauthn_rs::prelude::{Url, Webauthn, WebauthnBuilder};

use super::config::PasskeyConfig;
use super::errors::PasskeyError;
use super::store::{
    ChallengeStore, CredentialStore, InMemoryChallengeStore, InMemoryCredentialStore,
};

/// Orchestrates passkey registration and authentication.
///
/// Delegates all cryptographic work (challenge generation, COSE keys,
/// attestation and assertion verification) to `webauthn-rs` and only keeps
/// the two small books: the pending-challenge store and the credential
/// store. Both are injectable; the in-memory defaults are placeholders,
/// not production storage.
pub struct PasskeyAuthenticator {
    config: PasskeyConfig,
    pub(super) challenges: Mutex<Box<dyn ChallengeStore>>,
    pub(super) credentials: Mutex<Box<dyn CredentialStore>>,
}

impl PasskeyAuthenticator {
    /// Create an authenticator with the in-memory placeholder stores.
    pub fn new(config: PasskeyConfig) -> Self {
        Self::with_stores(
            config,
            InMemoryChallengeStore::new(),
            InMemoryCredentialStore::new(),
        )
    }

    /// Create an authenticator with injected challenge/credential stores.
    pub fn with_stores(
        config: PasskeyConfig,
        challenges: impl ChallengeStore,
        credentials: impl CredentialStore,
    ) -> Self {
        Self {
            config,
            challenges: Mutex::new(Box::new(challenges)),
            credentials: Mutex::new(Box::new(credentials)),
        }
    }

    pub fn config(&self) -> &PasskeyConfig {
        &self.config
    }

    /// Build the delegated verifier from the current configuration.
    ///
    /// Every passkey operation goes through here first: missing rp-id or
    /// origin fails fast with a configuration error before any store or
    /// network access.
    pub(super) fn webauthn(&self) -> Result<Webauthn, PasskeyError> {
        if self.config.rp_id.trim().is_empty() || self.config.origin.trim().is_empty() {
            return Err(PasskeyError::Config(
                "relying-party id and origin must be configured".to_string(),
            ));
        }

        let origin = Url::parse(&self.config.origin).map_err(|e| {
            PasskeyError::Config(format!("invalid origin '{}': {e}", self.config.origin))
        })?;
        let builder = WebauthnBuilder::new(&self.config.rp_id, &origin).map_err(|e| {
            PasskeyError::Config(format!(
                "invalid relying-party settings (rp_id={}, origin={}): {e:?}",
                self.config.rp_id, origin
            ))
        })?;
        builder
            .rp_name(&self.config.rp_name)
            .build()
            .map_err(|e| PasskeyError::Config(format!("failed to build verifier: {e:?}")))
    }
}

#[cfg(test)]
pub(super) fn test_config() -> PasskeyConfig {
    PasskeyConfig {
        rp_name: "Example".to_string(),
        rp_id: "localhost".to_string(),
        origin: "http://localhost:3000".to_string(),
        user_verification: "preferred".to_string(),
    }
}
