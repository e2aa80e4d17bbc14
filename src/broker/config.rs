use crate::oauth2::{OAuth2Config, OAuth2Overrides};
use crate::passkey::{PasskeyConfig, PasskeyOverrides};

/// The facade's full configuration: one OAuth2 section per provider plus
/// the passkey relying-party settings.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub google: OAuth2Config,
    pub yandex: OAuth2Config,
    pub passkey: PasskeyConfig,
}

/// Caller-supplied overrides for any part of the configuration. Fields
/// left at their defaults keep the environment values.
#[derive(Debug, Clone, Default)]
pub struct AuthOverrides {
    pub google: OAuth2Overrides,
    pub yandex: OAuth2Overrides,
    pub passkey: PasskeyOverrides,
}

impl AuthConfig {
    /// Read every section from the environment.
    pub fn from_env() -> Self {
        use crate::oauth2::Provider;
        Self {
            google: OAuth2Config::from_env(Provider::Google),
            yandex: OAuth2Config::from_env(Provider::Yandex),
            passkey: PasskeyConfig::from_env(),
        }
    }

    /// Apply caller overrides section by section.
    pub fn merge(self, overrides: AuthOverrides) -> Self {
        Self {
            google: self.google.merge(overrides.google),
            yandex: self.yandex.merge(overrides.yandex),
            passkey: self.passkey.merge(overrides.passkey),
        }
    }
}
