use thiserror::Error;

/// Errors that can occur during WebAuthn/Passkey orchestration.
///
/// Cryptographic failures are reported by the delegated WebAuthn library
/// and surface here as `Verification`; this crate never produces them
/// itself.
#[derive(Debug, Error)]
pub enum PasskeyError {
    /// Relying-party id/origin missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required input was missing or empty
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Unknown, expired, or mismatched challenge
    #[error("Invalid challenge: {0}")]
    Challenge(String),

    /// The delegated library could not start a registration ceremony
    #[error("Registration error: {0}")]
    Registration(String),

    /// The delegated library could not start an authentication ceremony
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The delegated library rejected the registration or assertion
    #[error("Verification error: {0}")]
    Verification(String),

    /// A requested resource (e.g. credential) is not stored
    #[error("Not found error: {0}")]
    NotFound(String),

    /// Error accessing or modifying stored passkey data
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error converting between data formats using Serde
    #[error("Json conversion(Serde) error: {0}")]
    Serde(String),
}
