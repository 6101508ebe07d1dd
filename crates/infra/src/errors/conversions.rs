//! Conversions from external infrastructure errors into domain errors.

use inkpost_domain::InkpostError;
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub InkpostError);

impl From<InfraError> for InkpostError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<InkpostError> for InfraError {
    fn from(value: InkpostError) -> Self {
        Self(value)
    }
}

trait IntoInkpostError {
    fn into_inkpost(self) -> InkpostError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → InkpostError */
/* -------------------------------------------------------------------------- */

impl IntoInkpostError for KeyringError {
    fn into_inkpost(self) -> InkpostError {
        let description = self.to_string();

        match self {
            KeyringError::NoEntry => InkpostError::Storage("keychain entry not found".into()),
            KeyringError::BadEncoding(_) => {
                InkpostError::Storage("credential in keychain is not valid UTF-8".into())
            }
            KeyringError::TooLong(name, limit) => InkpostError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            KeyringError::Invalid(attr, reason) => {
                InkpostError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            KeyringError::PlatformFailure(err) => {
                InkpostError::Storage(format!("keychain platform error: {err}"))
            }
            KeyringError::NoStorageAccess(err) => {
                InkpostError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => InkpostError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_inkpost())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → InkpostError */
/* -------------------------------------------------------------------------- */

impl IntoInkpostError for HttpError {
    fn into_inkpost(self) -> InkpostError {
        if self.is_timeout() {
            return InkpostError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return InkpostError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return InkpostError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => InkpostError::Auth(message),
                400..=499 => InkpostError::InvalidInput(message),
                _ => InkpostError::Network(message),
            };
        }

        InkpostError::Network(format!("HTTP request failed: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_inkpost())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → InkpostError */
/* -------------------------------------------------------------------------- */

impl IntoInkpostError for std::io::Error {
    fn into_inkpost(self) -> InkpostError {
        InkpostError::Storage(format!("{:?}: {}", self.kind(), self))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(value.into_inkpost())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
