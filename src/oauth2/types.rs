use serde::{Deserialize, Serialize};

/// Token endpoint response, shared by Google and Yandex.
///
/// Both providers return the same basic shape for the authorization-code
/// grant; Google additionally includes an `id_token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

// The user data we'll get back from Google's OIDC userinfo endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
    pub hd: Option<String>,
}

// The user data we'll get back from login.yandex.ru/info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YandexUserInfo {
    pub id: String,
    pub login: Option<String>,
    pub client_id: Option<String>,
    pub default_email: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    pub real_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub default_avatar_id: Option<String>,
    pub is_avatar_empty: Option<bool>,
}

/// Provider-specific profile returned after a successful exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum UserProfile {
    Google(GoogleUserInfo),
    Yandex(YandexUserInfo),
}

impl UserProfile {
    /// Stable provider-scoped user identifier (`sub` for Google, `id` for Yandex)
    pub fn provider_user_id(&self) -> &str {
        match self {
            UserProfile::Google(info) => &info.sub,
            UserProfile::Yandex(info) => &info.id,
        }
    }

    /// Best-effort email address, if the provider reported one
    pub fn email(&self) -> Option<&str> {
        match self {
            UserProfile::Google(info) => info.email.as_deref(),
            UserProfile::Yandex(info) => info.default_email.as_deref(),
        }
    }
}

/// Result of a completed authorization-code exchange: the token response
/// plus the profile fetched with the fresh access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExchange {
    pub token: TokenResponse,
    pub profile: UserProfile,
}
