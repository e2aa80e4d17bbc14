//! WebAuthn/Passkey registration and authentication orchestration.
//!
//! This module wires challenge bookkeeping and credential storage around
//! `webauthn-rs`, which owns every cryptographic decision (challenge
//! randomness, COSE key handling, attestation and assertion verification).
//! The orchestration here is deliberately thin: issue options, persist the
//! challenge-to-user mapping, verify via the library, store the result.

mod config;
mod errors;
mod main;
mod store;
mod types;

pub use config::{PasskeyConfig, PasskeyOverrides};
pub use errors::PasskeyError;
pub use main::PasskeyAuthenticator;
pub use store::{
    ChallengeStore, CredentialStore, InMemoryChallengeStore, InMemoryCredentialStore,
};
pub use types::{
    AuthenticationOutcome, ChallengeFlow, RegistrationOutcome, StoredChallenge, StoredCredential,
};
