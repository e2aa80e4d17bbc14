use std::collections::HashMap;

use webauthn_rs::prelude::{
    CreationChallengeResponse, PublicKeyCredential, RegisterPublicKeyCredential,
    RequestChallengeResponse,
};

use crate::oauth2::{CodeExchange, OAuth2Client, OAuth2Config, Provider};
use crate::passkey::{
    AuthenticationOutcome, ChallengeStore, CredentialStore, PasskeyAuthenticator,
    RegistrationOutcome,
};

use super::config::{AuthConfig, AuthOverrides};
use super::errors::AuthError;

/// The single entry point callers construct.
///
/// Holds one OAuth2 client per supported provider and one passkey
/// authenticator, all built from a merged configuration. Every method is a
/// thin dispatch into the owning module; the broker adds no flow logic of
/// its own.
pub struct AuthBroker {
    clients: HashMap<Provider, OAuth2Client>,
    passkey: PasskeyAuthenticator,
}

impl AuthBroker {
    /// Build a broker from an explicit configuration.
    pub fn new(config: AuthConfig) -> Self {
        let clients = Provider::ALL
            .into_iter()
            .map(|provider| {
                let section = match provider {
                    Provider::Google => config.google.clone(),
                    Provider::Yandex => config.yandex.clone(),
                };
                (provider, OAuth2Client::new(provider, section))
            })
            .collect();

        Self {
            clients,
            passkey: PasskeyAuthenticator::new(config.passkey),
        }
    }

    /// Build a broker from the environment alone.
    pub fn from_env() -> Self {
        Self::new(AuthConfig::from_env())
    }

    /// Build a broker from the environment with caller overrides applied.
    pub fn with_overrides(overrides: AuthOverrides) -> Self {
        Self::new(AuthConfig::from_env().merge(overrides))
    }

    /// Replace the passkey stores, keeping the rest of the broker intact.
    pub fn with_passkey_stores(
        mut self,
        challenges: impl ChallengeStore,
        credentials: impl CredentialStore,
    ) -> Self {
        let config = self.passkey.config().clone();
        self.passkey = PasskeyAuthenticator::with_stores(config, challenges, credentials);
        self
    }

    fn client(&self, provider: &str) -> Result<&OAuth2Client, AuthError> {
        let provider: Provider = provider
            .parse()
            .map_err(|_| AuthError::UnsupportedProvider(provider.to_string()).log())?;
        self.clients
            .get(&provider)
            .ok_or_else(|| AuthError::UnsupportedProvider(provider.to_string()).log())
    }

    /// Resolved configuration for one provider, mainly for diagnostics.
    pub fn oauth2_config(&self, provider: &str) -> Result<&OAuth2Config, AuthError> {
        Ok(self.client(provider)?.config())
    }

    /// Build the authorization redirect URL for a provider.
    pub fn authorization_url(
        &self,
        provider: &str,
        state: Option<&str>,
    ) -> Result<String, AuthError> {
        Ok(self.client(provider)?.authorization_url(state)?)
    }

    /// Exchange an authorization code for a token and the user's profile.
    pub async fn exchange_code(
        &self,
        provider: &str,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<CodeExchange, AuthError> {
        Ok(self.client(provider)?.exchange_code(code, redirect_uri).await?)
    }

    /// Issue passkey registration options for a user.
    pub async fn start_registration(
        &self,
        user_id: &str,
        username: &str,
        display_name: &str,
    ) -> Result<CreationChallengeResponse, AuthError> {
        Ok(self
            .passkey
            .start_registration(user_id, username, display_name)
            .await?)
    }

    /// Verify a passkey registration response and store the credential.
    pub async fn finish_registration(
        &self,
        reg: &RegisterPublicKeyCredential,
        challenge: Option<&str>,
    ) -> Result<RegistrationOutcome, AuthError> {
        Ok(self.passkey.finish_registration(reg, challenge).await?)
    }

    /// Issue passkey authentication options for a user.
    pub async fn start_authentication(
        &self,
        user_id: &str,
    ) -> Result<RequestChallengeResponse, AuthError> {
        Ok(self.passkey.start_authentication(user_id).await?)
    }

    /// Verify a passkey assertion against a pending challenge.
    pub async fn finish_authentication(
        &self,
        auth: &PublicKeyCredential,
        challenge: Option<&str>,
    ) -> Result<AuthenticationOutcome, AuthError> {
        Ok(self.passkey.finish_authentication(auth, challenge).await?)
    }
}
