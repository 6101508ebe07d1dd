//! Domain constants
//!
//! Fixed names the client and the back end agree on.

/// Storage key holding the access credential.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key holding the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Endpoint that exchanges a refresh credential for a new access credential.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh-token";
/// Entry point the UI is sent to once the session cannot be recovered.
pub const DEFAULT_LOGIN_PATH: &str = "/login";
/// Delay before the session-expired event reaches the navigator.
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 500;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TRANSPORT_ATTEMPTS: usize = 1;

/// Keychain service used when none is configured.
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Inkpost.api";

pub const AUTHORIZATION_SCHEME: &str = "Bearer";
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
