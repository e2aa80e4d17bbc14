use chrono::Utc;
use webauthn_rs::prelude::{
    Passkey, PasskeyAuthentication, PublicKeyCredential, RequestChallengeResponse,
};

use crate::passkey::errors::PasskeyError;
use crate::passkey::types::{AuthenticationOutcome, ChallengeFlow, StoredChallenge};
use crate::utils::base64url_encode;

use super::PasskeyAuthenticator;
use super::challenge::resolve_challenge;

impl PasskeyAuthenticator {
    /// Issue authentication (assertion) options for a user.
    ///
    /// All of the user's stored credentials go into the allow list; a user
    /// with no registered credentials cannot start an authentication. The
    /// challenge-to-user mapping is persisted before the options are
    /// returned unmodified.
    pub async fn start_authentication(
        &self,
        user_id: &str,
    ) -> Result<RequestChallengeResponse, PasskeyError> {
        if user_id.trim().is_empty() {
            return Err(PasskeyError::Validation(
                "user_id must not be empty".to_string(),
            ));
        }

        let webauthn = self.webauthn()?;

        let allow: Vec<Passkey> = {
            let credentials = self.credentials.lock().await;
            let existing = credentials.get_by_user(user_id).await?;
            if existing.is_empty() {
                return Err(PasskeyError::NotFound(format!(
                    "no credentials registered for user {user_id}"
                )));
            }
            let mut passkeys = Vec::with_capacity(existing.len());
            for stored in &existing {
                let passkey: Passkey = serde_json::from_str(&stored.credential_json)
                    .map_err(|e| PasskeyError::Serde(format!("stored credential: {e}")))?;
                passkeys.push(passkey);
            }
            passkeys
        };

        let (rcr, auth_state) = webauthn.start_passkey_authentication(&allow).map_err(|e| {
            PasskeyError::Authentication(format!("failed to start authentication: {e:?}"))
        })?;

        let challenge = base64url_encode(&rcr.public_key.challenge);
        let state_json = serde_json::to_string(&auth_state)
            .map_err(|e| PasskeyError::Serde(e.to_string()))?;

        self.challenges
            .lock()
            .await
            .put(StoredChallenge {
                challenge: challenge.clone(),
                user_id: user_id.to_string(),
                flow: ChallengeFlow::Authentication,
                state_json,
                created_at: Utc::now(),
            })
            .await?;

        tracing::debug!(
            "Issued authentication challenge {} for {}",
            challenge,
            user_id
        );
        Ok(rcr)
    }

    /// Verify an assertion response against a pending challenge.
    ///
    /// On success the stored credential's counter and last-used timestamp
    /// are updated from the verification result and the challenge is
    /// consumed. A failed verification leaves the challenge in place.
    pub async fn finish_authentication(
        &self,
        auth: &PublicKeyCredential,
        challenge: Option<&str>,
    ) -> Result<AuthenticationOutcome, PasskeyError> {
        let webauthn = self.webauthn()?;

        let challenge = resolve_challenge(challenge, auth.response.client_data_json.as_ref())?;
        let stored = self
            .challenges
            .lock()
            .await
            .get(&challenge)
            .await?
            .ok_or_else(|| PasskeyError::Challenge("unknown or expired challenge".to_string()))?;
        if stored.flow != ChallengeFlow::Authentication {
            return Err(PasskeyError::Challenge(
                "challenge was not issued for authentication".to_string(),
            ));
        }

        let mut credential = self
            .credentials
            .lock()
            .await
            .get(&auth.id)
            .await?
            .ok_or_else(|| PasskeyError::NotFound("unknown credential".to_string()))?;

        let auth_state: PasskeyAuthentication = serde_json::from_str(&stored.state_json)
            .map_err(|e| PasskeyError::Serde(format!("stored authentication state: {e}")))?;

        let result = webauthn
            .finish_passkey_authentication(auth, &auth_state)
            .map_err(|e| {
                PasskeyError::Verification(format!("authentication verification failed: {e:?}"))
            })?;

        // Let the library fold the result (counter, backup flags) back into
        // the stored credential before re-serializing it.
        let mut passkey: Passkey = serde_json::from_str(&credential.credential_json)
            .map_err(|e| PasskeyError::Serde(format!("stored credential: {e}")))?;
        if matches!(passkey.update_credential(&result), Some(true)) {
            credential.credential_json = serde_json::to_string(&passkey)
                .map_err(|e| PasskeyError::Serde(e.to_string()))?;
        }
        credential.counter = result.counter();
        credential.last_used_at = Some(Utc::now());

        let credential_id = credential.credential_id.clone();
        let user_id = credential.user_id.clone();
        self.credentials.lock().await.put(credential).await?;
        self.challenges.lock().await.remove(&challenge).await?;

        tracing::debug!("Authenticated {} with credential {}", user_id, credential_id);
        Ok(AuthenticationOutcome {
            credential_id,
            user_id,
            counter: result.counter(),
            counter_updated: result.needs_update(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passkey::main::soft_authenticator::SoftAuthenticator;
    use crate::passkey::main::test_config;
    use crate::passkey::types::StoredCredential;
    use serde_json::json;

    fn fake_assertion_response(credential_id: &str, challenge: &str) -> PublicKeyCredential {
        let client_data = json!({
            "type": "webauthn.get",
            "challenge": challenge,
            "origin": "http://localhost:3000",
            "crossOrigin": false
        })
        .to_string();

        serde_json::from_value(json!({
            "id": credential_id,
            "rawId": credential_id,
            "response": {
                "authenticatorData": base64url_encode(b"garbage"),
                "clientDataJSON": base64url_encode(client_data.as_bytes()),
                "signature": base64url_encode(b"garbage"),
                "userHandle": null
            },
            "type": "public-key",
            "extensions": {}
        }))
        .expect("test response should deserialize")
    }

    /// Run the full registration ceremony so authentication can start from
    /// a real stored credential.
    async fn register_credential(
        authenticator: &PasskeyAuthenticator,
        soft: &SoftAuthenticator,
        user_id: &str,
    ) -> String {
        let ccr = authenticator
            .start_registration(user_id, "user1", "User One")
            .await
            .unwrap();
        let response = soft.register(&ccr, "localhost", "http://localhost:3000");
        authenticator
            .finish_registration(&response, None)
            .await
            .unwrap()
            .credential_id
    }

    async fn put_auth_challenge(authenticator: &PasskeyAuthenticator, challenge: &str) {
        authenticator
            .challenges
            .lock()
            .await
            .put(StoredChallenge {
                challenge: challenge.to_string(),
                user_id: "u1".to_string(),
                flow: ChallengeFlow::Authentication,
                state_json: "{}".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_start_authentication_rejects_empty_user() {
        let authenticator = PasskeyAuthenticator::new(test_config());

        for user_id in ["", "   "] {
            let result = authenticator.start_authentication(user_id).await;
            match result {
                Err(PasskeyError::Validation(msg)) => assert!(msg.contains("must not be empty")),
                other => panic!("Expected Validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_start_authentication_requires_configuration() {
        let authenticator =
            PasskeyAuthenticator::new(crate::passkey::config::PasskeyConfig::default());

        let result = authenticator.start_authentication("u1").await;
        match result {
            Err(PasskeyError::Config(_)) => {}
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    /// A user with no stored credentials cannot be offered an allow list
    #[tokio::test]
    async fn test_start_authentication_without_credentials() {
        let authenticator = PasskeyAuthenticator::new(test_config());

        let result = authenticator.start_authentication("u1").await;
        match result {
            Err(PasskeyError::NotFound(msg)) => {
                assert!(msg.contains("no credentials registered"));
            }
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_finish_authentication_unknown_challenge_fails_closed() {
        let authenticator = PasskeyAuthenticator::new(test_config());

        let response = fake_assertion_response("Y3JlZC1pZA", "bm8tc3VjaC1jaGFsbGVuZ2U");
        let result = authenticator
            .finish_authentication(&response, Some("bm8tc3VjaC1jaGFsbGVuZ2U"))
            .await;
        match result {
            Err(PasskeyError::Challenge(msg)) => {
                assert_eq!(msg, "unknown or expired challenge");
            }
            other => panic!("Expected Challenge error, got {other:?}"),
        }
    }

    /// An assertion naming a credential this crate never stored is rejected
    /// before any verification state is touched.
    #[tokio::test]
    async fn test_finish_authentication_unknown_credential() {
        let authenticator = PasskeyAuthenticator::new(test_config());
        put_auth_challenge(&authenticator, "cGVuZGluZy1jaGFsbGVuZ2U").await;

        let response = fake_assertion_response("bm9wZQ", "cGVuZGluZy1jaGFsbGVuZ2U");
        let result = authenticator.finish_authentication(&response, None).await;
        match result {
            Err(PasskeyError::NotFound(msg)) => assert_eq!(msg, "unknown credential"),
            other => panic!("Expected NotFound error, got {other:?}"),
        }

        // The challenge survives the failed attempt
        let still_there = authenticator
            .challenges
            .lock()
            .await
            .get("cGVuZGluZy1jaGFsbGVuZ2U")
            .await
            .unwrap();
        assert!(still_there.is_some());
    }

    /// Happy path: a valid assertion overwrites the stored counter with the
    /// authenticator-reported value and consumes the challenge.
    #[tokio::test]
    async fn test_successful_authentication_updates_counter_and_consumes_challenge() {
        let authenticator = PasskeyAuthenticator::new(test_config());
        let mut soft = SoftAuthenticator::new();
        let credential_id = register_credential(&authenticator, &soft, "u1").await;

        let rcr = authenticator.start_authentication("u1").await.unwrap();
        let assertion = soft.sign(&rcr, "localhost", "http://localhost:3000");

        let outcome = authenticator
            .finish_authentication(&assertion, None)
            .await
            .unwrap();
        assert_eq!(outcome.credential_id, credential_id);
        assert_eq!(outcome.user_id, "u1");
        assert_eq!(outcome.counter, 1);
        assert!(outcome.counter_updated);

        let stored = authenticator
            .credentials
            .lock()
            .await
            .get(&credential_id)
            .await
            .unwrap()
            .expect("credential should still be stored");
        assert_eq!(stored.counter, 1);
        assert!(stored.last_used_at.is_some());

        // The challenge was consumed; replaying the assertion fails closed
        let replay = authenticator.finish_authentication(&assertion, None).await;
        match replay {
            Err(PasskeyError::Challenge(msg)) => {
                assert_eq!(msg, "unknown or expired challenge");
            }
            other => panic!("Expected Challenge error, got {other:?}"),
        }
    }

    /// The mirrored counter only ever moves to the reported value, so it
    /// increases across successive authentications and never decreases.
    #[tokio::test]
    async fn test_counter_increases_across_authentications() {
        let authenticator = PasskeyAuthenticator::new(test_config());
        let mut soft = SoftAuthenticator::new();
        let credential_id = register_credential(&authenticator, &soft, "u1").await;

        for expected in 1..=3u32 {
            let rcr = authenticator.start_authentication("u1").await.unwrap();
            let assertion = soft.sign(&rcr, "localhost", "http://localhost:3000");
            let outcome = authenticator
                .finish_authentication(&assertion, None)
                .await
                .unwrap();
            assert_eq!(outcome.counter, expected);

            let stored = authenticator
                .credentials
                .lock()
                .await
                .get(&credential_id)
                .await
                .unwrap()
                .expect("credential should still be stored");
            assert_eq!(stored.counter, expected);
        }
    }

    #[tokio::test]
    async fn test_finish_authentication_rejects_registration_challenge() {
        let authenticator = PasskeyAuthenticator::new(test_config());

        authenticator
            .challenges
            .lock()
            .await
            .put(StoredChallenge {
                challenge: "cmVnLWNoYWxsZW5nZQ".to_string(),
                user_id: "u1".to_string(),
                flow: ChallengeFlow::Registration,
                state_json: "{}".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let response = fake_assertion_response("Y3JlZC1pZA", "cmVnLWNoYWxsZW5nZQ");
        let result = authenticator
            .finish_authentication(&response, Some("cmVnLWNoYWxsZW5nZQ"))
            .await;
        match result {
            Err(PasskeyError::Challenge(msg)) => {
                assert!(msg.contains("not issued for authentication"));
            }
            other => panic!("Expected Challenge error, got {other:?}"),
        }
    }
}
