use async_trait::async_trait;
use std::collections::HashMap;

use super::errors::PasskeyError;
use super::types::{StoredChallenge, StoredCredential};

/// Challenge store keyed by the base64url challenge string.
///
/// The shipped in-memory implementation is a placeholder; production
/// deployments should inject a backend with atomic fetch-and-delete
/// semantics so concurrent verifications of the same challenge cannot
/// both pass the existence check.
#[async_trait]
pub trait ChallengeStore: Send + Sync + 'static {
    async fn put(&mut self, challenge: StoredChallenge) -> Result<(), PasskeyError>;

    async fn get(&self, challenge: &str) -> Result<Option<StoredChallenge>, PasskeyError>;

    /// Remove a challenge. Removing a missing challenge is not an error.
    async fn remove(&mut self, challenge: &str) -> Result<(), PasskeyError>;
}

/// Credential store keyed by the base64url credential id.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    async fn put(&mut self, credential: StoredCredential) -> Result<(), PasskeyError>;

    async fn get(&self, credential_id: &str) -> Result<Option<StoredCredential>, PasskeyError>;

    /// All credentials registered to one user, for exclusion/allow lists.
    async fn get_by_user(&self, user_id: &str) -> Result<Vec<StoredCredential>, PasskeyError>;

    async fn remove(&mut self, credential_id: &str) -> Result<(), PasskeyError>;
}

#[derive(Default)]
pub struct InMemoryChallengeStore {
    entry: HashMap<String, StoredChallenge>,
}

impl InMemoryChallengeStore {
    pub fn new() -> Self {
        tracing::debug!("Creating new in-memory challenge store");
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entry.len()
    }
}

#[async_trait]
impl ChallengeStore for InMemoryChallengeStore {
    async fn put(&mut self, challenge: StoredChallenge) -> Result<(), PasskeyError> {
        self.entry.insert(challenge.challenge.clone(), challenge);
        Ok(())
    }

    async fn get(&self, challenge: &str) -> Result<Option<StoredChallenge>, PasskeyError> {
        Ok(self.entry.get(challenge).cloned())
    }

    async fn remove(&mut self, challenge: &str) -> Result<(), PasskeyError> {
        self.entry.remove(challenge);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    entry: HashMap<String, StoredCredential>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        tracing::debug!("Creating new in-memory credential store");
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entry.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn put(&mut self, credential: StoredCredential) -> Result<(), PasskeyError> {
        self.entry
            .insert(credential.credential_id.clone(), credential);
        Ok(())
    }

    async fn get(&self, credential_id: &str) -> Result<Option<StoredCredential>, PasskeyError> {
        Ok(self.entry.get(credential_id).cloned())
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<StoredCredential>, PasskeyError> {
        Ok(self
            .entry
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn remove(&mut self, credential_id: &str) -> Result<(), PasskeyError> {
        self.entry.remove(credential_id);
        Ok(())
    }
}
