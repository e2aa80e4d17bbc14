use serde::Deserialize;

use crate::passkey::errors::PasskeyError;
use crate::utils::base64url_decode;

/// The one field of the client data this crate reads itself. Everything
/// else in the payload is validated by the delegated library.
#[derive(Deserialize)]
struct CollectedClientData {
    challenge: String,
}

/// Extract the base64url challenge string from a response's `clientDataJSON`.
pub(super) fn challenge_from_client_data(client_data_json: &[u8]) -> Result<String, PasskeyError> {
    let client_data: CollectedClientData = serde_json::from_slice(client_data_json)
        .map_err(|e| PasskeyError::Challenge(format!("unreadable client data: {e}")))?;
    Ok(client_data.challenge)
}

/// Resolve the challenge to verify against: an explicit caller-supplied
/// value wins, otherwise it is read from the response payload.
pub(super) fn resolve_challenge(
    explicit: Option<&str>,
    client_data_json: &[u8],
) -> Result<String, PasskeyError> {
    let challenge = match explicit {
        Some(challenge) if !challenge.trim().is_empty() => challenge.to_string(),
        _ => challenge_from_client_data(client_data_json)?,
    };
    // Challenge keys must be well-formed base64url
    base64url_decode(&challenge)
        .map_err(|_| PasskeyError::Challenge("challenge is not valid base64url".to_string()))?;
    Ok(challenge)
}
