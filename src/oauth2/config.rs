use std::env;

use super::provider::Provider;

/// Static configuration for one OAuth2 provider.
///
/// Immutable after construction. Defaults come from the environment
/// (`OAUTH2_<PROVIDER>_CLIENT_ID` and friends); callers may override any
/// field at facade construction time. Missing values stay empty and fail
/// at operation time with a configuration error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

/// Caller-supplied overrides, merged shallowly over the environment defaults.
#[derive(Debug, Clone, Default)]
pub struct OAuth2Overrides {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
}

impl OAuth2Config {
    /// Read the environment defaults for one provider.
    ///
    /// Variable names follow the `OAUTH2_GOOGLE_CLIENT_ID` convention;
    /// the scope falls back to the provider's default scope when unset.
    pub fn from_env(provider: Provider) -> Self {
        let prefix = format!("OAUTH2_{}", provider.name().to_ascii_uppercase());
        let var = |suffix: &str| env::var(format!("{prefix}_{suffix}")).unwrap_or_default();

        let scope = match env::var(format!("{prefix}_SCOPE")) {
            Ok(s) if !s.trim().is_empty() => s,
            _ => provider.default_scope().to_string(),
        };

        Self {
            client_id: var("CLIENT_ID"),
            client_secret: var("CLIENT_SECRET"),
            redirect_uri: var("REDIRECT_URI"),
            scope,
        }
    }

    /// Apply caller overrides on top of this configuration.
    pub fn merge(mut self, overrides: OAuth2Overrides) -> Self {
        if let Some(client_id) = overrides.client_id {
            self.client_id = client_id;
        }
        if let Some(client_secret) = overrides.client_secret {
            self.client_secret = client_secret;
        }
        if let Some(redirect_uri) = overrides.redirect_uri {
            self.redirect_uri = redirect_uri;
        }
        if let Some(scope) = overrides.scope {
            self.scope = scope;
        }
        self
    }
}
