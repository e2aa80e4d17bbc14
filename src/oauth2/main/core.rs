use std::sync::LazyLock;

use url::Url;

use crate::oauth2::config::OAuth2Config;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::provider::Provider;
use crate::oauth2::types::{CodeExchange, GoogleUserInfo, TokenResponse, UserProfile, YandexUserInfo};

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

pub(crate) fn get_client() -> &'static reqwest::Client {
    &HTTP_CLIENT
}

/// One provider's capability set: build the authorization URL and run the
/// code-for-token exchange followed by the profile fetch.
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    provider: Provider,
    config: OAuth2Config,
}

impl OAuth2Client {
    pub fn new(provider: Provider, config: OAuth2Config) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    /// Build the provider's authorization redirect URL.
    ///
    /// Appends `client_id`, `redirect_uri`, `response_type=code`, `scope`,
    /// the provider's extra parameters, and `state` when given. All values
    /// are percent-encoded. No side effects.
    pub fn authorization_url(&self, state: Option<&str>) -> Result<String, OAuth2Error> {
        if self.config.client_id.is_empty() {
            return Err(OAuth2Error::Config(format!(
                "client_id is not configured for provider {}",
                self.provider
            )));
        }
        if self.config.redirect_uri.is_empty() {
            return Err(OAuth2Error::Config(format!(
                "redirect_uri is not configured for provider {}",
                self.provider
            )));
        }

        let mut url = Url::parse(self.provider.authorization_endpoint())
            .map_err(|e| OAuth2Error::Url(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", &self.config.redirect_uri);
            query.append_pair("response_type", "code");
            query.append_pair("scope", &self.config.scope);
            for (key, value) in self.provider.extra_auth_params() {
                query.append_pair(key, value);
            }
            if let Some(state) = state {
                query.append_pair("state", state);
            }
        }

        tracing::debug!("Auth URL for {}: {}", self.provider, url);
        Ok(url.into())
    }

    /// Exchange an authorization code for a token, then fetch the profile.
    ///
    /// Purely sequential: one POST to the token endpoint, one GET to the
    /// userinfo endpoint. No retries; every upstream failure propagates
    /// with its status and raw body.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<CodeExchange, OAuth2Error> {
        if code.trim().is_empty() {
            return Err(OAuth2Error::Validation(
                "authorization code must not be empty".to_string(),
            ));
        }
        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            return Err(OAuth2Error::Config(format!(
                "client_id/client_secret are not configured for provider {}",
                self.provider
            )));
        }

        let redirect_uri = redirect_uri.unwrap_or(&self.config.redirect_uri);
        let token = self.request_token(code, redirect_uri).await?;
        let profile = self.fetch_profile(&token.access_token).await?;

        Ok(CodeExchange { token, profile })
    }

    async fn request_token(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, OAuth2Error> {
        let response = get_client()
            .post(self.provider.token_endpoint())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| OAuth2Error::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::Request(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(
                "Token exchange for {} failed: {} {}",
                self.provider,
                status,
                body
            );
            return Err(OAuth2Error::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| OAuth2Error::Serde(format!("Failed to deserialize token response: {e}")))?;
        tracing::debug!("Token exchange for {} succeeded", self.provider);
        Ok(token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, OAuth2Error> {
        let response = get_client()
            .get(self.provider.userinfo_endpoint())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuth2Error::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::Request(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(
                "Profile fetch for {} failed: {} {}",
                self.provider,
                status,
                body
            );
            return Err(OAuth2Error::ProfileFetch {
                status: status.as_u16(),
                body,
            });
        }

        let profile = match self.provider {
            Provider::Google => {
                let info: GoogleUserInfo = serde_json::from_str(&body).map_err(|e| {
                    OAuth2Error::Serde(format!("Failed to deserialize Google profile: {e}"))
                })?;
                UserProfile::Google(info)
            }
            Provider::Yandex => {
                let info: YandexUserInfo = serde_json::from_str(&body).map_err(|e| {
                    OAuth2Error::Serde(format!("Failed to deserialize Yandex profile: {e}"))
                })?;
                UserProfile::Yandex(info)
            }
        };

        tracing::debug!("Fetched {} profile for user", self.provider);
        Ok(profile)
    }
}
