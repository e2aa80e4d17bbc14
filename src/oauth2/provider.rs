use std::fmt;
use std::str::FromStr;

use super::errors::OAuth2Error;

/// Supported OAuth2 providers.
///
/// Each variant carries its static authorization, token, and userinfo
/// endpoints, so adding a provider does not touch the shared flow logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    Yandex,
}

impl Provider {
    pub(crate) const ALL: [Provider; 2] = [Provider::Google, Provider::Yandex];

    /// Canonical lowercase name used for lookup and logging
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Yandex => "yandex",
        }
    }

    pub(crate) fn authorization_endpoint(&self) -> &'static str {
        match self {
            Provider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            Provider::Yandex => "https://oauth.yandex.com/authorize",
        }
    }

    pub(crate) fn token_endpoint(&self) -> &'static str {
        match self {
            Provider::Google => "https://oauth2.googleapis.com/token",
            Provider::Yandex => "https://oauth.yandex.com/token",
        }
    }

    pub(crate) fn userinfo_endpoint(&self) -> &'static str {
        match self {
            Provider::Google => "https://openidconnect.googleapis.com/v1/userinfo",
            Provider::Yandex => "https://login.yandex.ru/info?format=json",
        }
    }

    pub(crate) fn default_scope(&self) -> &'static str {
        match self {
            Provider::Google => "openid email profile",
            Provider::Yandex => "login:email login:info",
        }
    }

    /// Provider-specific additions to the authorization URL.
    /// Google asks for a refresh token and an explicit consent screen.
    pub(crate) fn extra_auth_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Provider::Google => &[("access_type", "offline"), ("prompt", "consent")],
            Provider::Yandex => &[],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = OAuth2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "yandex" => Ok(Provider::Yandex),
            other => Err(OAuth2Error::UnsupportedProvider(other.to_string())),
        }
    }
}
