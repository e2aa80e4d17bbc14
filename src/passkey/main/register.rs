use chrono::Utc;
use uuid::Uuid;
use webauthn_rs::prelude::{
    CreationChallengeResponse, CredentialID, Passkey, PasskeyRegistration,
    RegisterPublicKeyCredential,
};

use crate::passkey::errors::PasskeyError;
use crate::passkey::types::{ChallengeFlow, RegistrationOutcome, StoredChallenge, StoredCredential};
use crate::utils::base64url_encode;

use super::PasskeyAuthenticator;
use super::challenge::resolve_challenge;

impl PasskeyAuthenticator {
    /// Issue registration (credential creation) options for a user.
    ///
    /// Option construction, including the random challenge, is delegated to
    /// the library. Credentials the user already registered are passed as an
    /// exclusion list so the same authenticator cannot re-register. The
    /// challenge-to-user mapping is persisted before the options are
    /// returned unmodified.
    pub async fn start_registration(
        &self,
        user_id: &str,
        username: &str,
        display_name: &str,
    ) -> Result<CreationChallengeResponse, PasskeyError> {
        for (name, value) in [
            ("user_id", user_id),
            ("username", username),
            ("display_name", display_name),
        ] {
            if value.trim().is_empty() {
                return Err(PasskeyError::Validation(format!(
                    "{name} must not be empty"
                )));
            }
        }

        let webauthn = self.webauthn()?;

        let exclude: Option<Vec<CredentialID>> = {
            let credentials = self.credentials.lock().await;
            let existing = credentials.get_by_user(user_id).await?;
            let mut ids = Vec::with_capacity(existing.len());
            for stored in &existing {
                let passkey: Passkey = serde_json::from_str(&stored.credential_json)
                    .map_err(|e| PasskeyError::Serde(format!("stored credential: {e}")))?;
                ids.push(passkey.cred_id().clone());
            }
            if ids.is_empty() { None } else { Some(ids) }
        };

        // The WebAuthn user handle must be a UUID; opaque user ids that are
        // not UUIDs get a fresh handle while the store keeps the original id.
        let user_handle = Uuid::parse_str(user_id).unwrap_or_else(|_| Uuid::new_v4());

        let (ccr, reg_state) = webauthn
            .start_passkey_registration(user_handle, username, display_name, exclude)
            .map_err(|e| {
                PasskeyError::Registration(format!("failed to start registration: {e:?}"))
            })?;

        let challenge = base64url_encode(&ccr.public_key.challenge);
        let state_json = serde_json::to_string(&reg_state)
            .map_err(|e| PasskeyError::Serde(e.to_string()))?;

        self.challenges
            .lock()
            .await
            .put(StoredChallenge {
                challenge: challenge.clone(),
                user_id: user_id.to_string(),
                flow: ChallengeFlow::Registration,
                state_json,
                created_at: Utc::now(),
            })
            .await?;

        tracing::debug!("Issued registration challenge {} for {}", challenge, user_id);
        Ok(ccr)
    }

    /// Verify a registration response and store the new credential.
    ///
    /// The challenge comes from the explicit argument or from the response's
    /// `clientDataJSON`. Verification against a challenge this crate never
    /// issued (or already consumed) fails closed. A failed verification
    /// leaves the challenge in place so the caller may retry; only success
    /// consumes it.
    pub async fn finish_registration(
        &self,
        reg: &RegisterPublicKeyCredential,
        challenge: Option<&str>,
    ) -> Result<RegistrationOutcome, PasskeyError> {
        let webauthn = self.webauthn()?;

        let challenge = resolve_challenge(challenge, reg.response.client_data_json.as_ref())?;
        let stored = self
            .challenges
            .lock()
            .await
            .get(&challenge)
            .await?
            .ok_or_else(|| PasskeyError::Challenge("unknown or expired challenge".to_string()))?;
        if stored.flow != ChallengeFlow::Registration {
            return Err(PasskeyError::Challenge(
                "challenge was not issued for registration".to_string(),
            ));
        }

        let reg_state: PasskeyRegistration = serde_json::from_str(&stored.state_json)
            .map_err(|e| PasskeyError::Serde(format!("stored registration state: {e}")))?;

        let passkey = webauthn
            .finish_passkey_registration(reg, &reg_state)
            .map_err(|e| {
                PasskeyError::Verification(format!("registration verification failed: {e:?}"))
            })?;

        let credential_id = base64url_encode(passkey.cred_id());
        let credential_json = serde_json::to_string(&passkey)
            .map_err(|e| PasskeyError::Serde(e.to_string()))?;

        // Transports as reported by the browser, when present
        let transports: Vec<String> = serde_json::to_value(&reg.response.transports)
            .ok()
            .and_then(|v| serde_json::from_value::<Option<Vec<String>>>(v).ok())
            .flatten()
            .unwrap_or_default();

        self.credentials
            .lock()
            .await
            .put(StoredCredential {
                credential_id: credential_id.clone(),
                user_id: stored.user_id.clone(),
                credential_json,
                counter: 0,
                transports,
                created_at: Utc::now(),
                last_used_at: None,
            })
            .await?;

        // Consume the challenge only after the credential is in place
        self.challenges.lock().await.remove(&challenge).await?;

        tracing::debug!(
            "Registered credential {} for {}",
            credential_id,
            stored.user_id
        );
        Ok(RegistrationOutcome {
            credential_id,
            user_id: stored.user_id,
        })
    }
}
