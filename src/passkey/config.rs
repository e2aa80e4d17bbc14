use std::env;

/// Relying-party configuration for passkey operations.
///
/// Immutable after construction. Defaults come from the environment;
/// callers may override any field at facade construction time. Missing
/// rp-id/origin stay empty; every passkey operation asserts they are set
/// and fails with a configuration error otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasskeyConfig {
    pub rp_name: String,
    pub rp_id: String,
    pub origin: String,
    pub user_verification: String,
}

/// Caller-supplied overrides, merged shallowly over the environment defaults.
#[derive(Debug, Clone, Default)]
pub struct PasskeyOverrides {
    pub rp_name: Option<String>,
    pub rp_id: Option<String>,
    pub origin: Option<String>,
    pub user_verification: Option<String>,
}

/// Derive the relying-party id from an origin: strip the scheme, drop the port.
fn rp_id_from_origin(origin: &str) -> String {
    origin
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split(':')
        .next()
        .unwrap_or_default()
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn validate_user_verification(value: &str) -> String {
    match value.to_lowercase().as_str() {
        "required" => "required".to_string(),
        "preferred" => "preferred".to_string(),
        "discouraged" => "discouraged".to_string(),
        invalid => {
            tracing::warn!(
                "Invalid user verification: {}. Using default 'preferred'",
                invalid
            );
            "preferred".to_string()
        }
    }
}

impl PasskeyConfig {
    /// Read the environment defaults: `ORIGIN`, `PASSKEY_RP_ID` (derived
    /// from the origin when unset), `PASSKEY_RP_NAME` (defaults to the
    /// origin), `PASSKEY_USER_VERIFICATION` (defaults to `preferred`).
    pub fn from_env() -> Self {
        let origin = env::var("ORIGIN").unwrap_or_default();
        let rp_id = env::var("PASSKEY_RP_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| rp_id_from_origin(&origin));
        let rp_name = env::var("PASSKEY_RP_NAME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| origin.clone());
        let user_verification = validate_user_verification(
            &env::var("PASSKEY_USER_VERIFICATION").unwrap_or_else(|_| "preferred".to_string()),
        );

        Self {
            rp_name,
            rp_id,
            origin,
            user_verification,
        }
    }

    /// Apply caller overrides on top of this configuration.
    ///
    /// An overridden origin re-derives the rp-id unless the rp-id is
    /// overridden too.
    pub fn merge(mut self, overrides: PasskeyOverrides) -> Self {
        if let Some(origin) = overrides.origin {
            if overrides.rp_id.is_none() {
                self.rp_id = rp_id_from_origin(&origin);
            }
            if self.rp_name.is_empty() || self.rp_name == self.origin {
                self.rp_name = origin.clone();
            }
            self.origin = origin;
        }
        if let Some(rp_id) = overrides.rp_id {
            self.rp_id = rp_id;
        }
        if let Some(rp_name) = overrides.rp_name {
            self.rp_name = rp_name;
        }
        if let Some(user_verification) = overrides.user_verification {
            self.user_verification = validate_user_verification(&user_verification);
        }
        self
    }
}
