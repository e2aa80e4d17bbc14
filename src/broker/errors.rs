use thiserror::Error;

use crate::oauth2::OAuth2Error;
use crate::passkey::PasskeyError;

/// Facade-level errors. Most variants carry the underlying module error
/// unchanged so callers can still match on the specific failure.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The caller named a provider this crate does not support
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Error from the OAuth2 flows
    #[error(transparent)]
    OAuth2(#[from] OAuth2Error),

    /// Error from the passkey flows
    #[error(transparent)]
    Passkey(#[from] PasskeyError),
}

impl AuthError {
    /// Log the error at debug level and return it, for use at the point
    /// where a facade error is constructed.
    pub(crate) fn log(self) -> Self {
        tracing::debug!("AuthError: {:#?}", self);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<AuthError>();
    }

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: AuthError = OAuth2Error::Validation("authorization code must not be empty".to_string()).into();
        assert_eq!(err.to_string(), "Invalid input: authorization code must not be empty");

        let err: AuthError = PasskeyError::NotFound("unknown credential".to_string()).into();
        assert_eq!(err.to_string(), "Not found error: unknown credential");

        let err = AuthError::UnsupportedProvider("github".to_string()).log();
        assert_eq!(err.to_string(), "Unsupported provider: github");
    }
}
