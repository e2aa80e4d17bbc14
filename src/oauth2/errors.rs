use thiserror::Error;

/// Errors that can occur during OAuth2 URL building and code exchange.
#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    /// The caller named a provider this crate does not support
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// A required input was missing or empty
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The provider configuration is incomplete
    #[error("Configuration error: {0}")]
    Config(String),

    /// The token endpoint returned a non-success status
    #[error("Token exchange failed: status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    /// The userinfo endpoint returned a non-success status
    #[error("Profile fetch failed: status {status}: {body}")]
    ProfileFetch { status: u16, body: String },

    /// The HTTP request itself failed before a status was available
    #[error("Request error: {0}")]
    Request(String),

    /// Serde error while decoding a provider response
    #[error("Serde error: {0}")]
    Serde(String),

    /// A provider endpoint or redirect URI failed to parse
    #[error("Url error: {0}")]
    Url(String),
}
