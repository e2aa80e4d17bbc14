use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which ceremony a stored challenge was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeFlow {
    Registration,
    Authentication,
}

/// A challenge issued to a user, pending verification.
///
/// Keyed by the base64url challenge string. `state_json` carries the
/// serialized server-side state of the delegated WebAuthn library
/// (`PasskeyRegistration` or `PasskeyAuthentication`); this crate never
/// looks inside it. No expiry is enforced: a challenge lives until it is
/// consumed by a successful verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredChallenge {
    pub challenge: String,
    pub user_id: String,
    pub flow: ChallengeFlow,
    pub state_json: String,
    pub created_at: DateTime<Utc>,
}

/// A registered passkey credential.
///
/// `credential_json` is the delegated library's serialized `Passkey`
/// (public key, internal counter, and friends, kept opaque). `counter`
/// mirrors the signature counter as last reported by the library and is
/// the only field mutated after creation, besides `last_used_at`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredCredential {
    /// base64url-encoded credential id
    pub credential_id: String,
    pub user_id: String,
    pub credential_json: String,
    pub counter: u32,
    pub transports: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Result of a successful registration verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub credential_id: String,
    pub user_id: String,
}

/// Result of a successful authentication verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticationOutcome {
    pub credential_id: String,
    pub user_id: String,
    /// Signature counter reported by the delegated library
    pub counter: u32,
    /// Whether the library asked for the stored credential to be updated
    pub counter_updated: bool,
}
