//! Shared test initialization.

use std::sync::Once;

static ENV_INIT: Once = Once::new();

/// Load test environment variables once per test binary.
///
/// `.env_test` wins when present; a plain `.env` is the fallback. Tests
/// that depend on specific variables still set or clear them explicitly.
pub(crate) fn init_test_environment() {
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}
