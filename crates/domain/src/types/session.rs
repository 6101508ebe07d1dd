//! Session lifecycle events

use serde::{Deserialize, Serialize};

/// Emitted once the client gives up on a session.
///
/// The navigator is expected to send the user to `redirect_to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionExpired {
    pub redirect_to: String,
    pub reason: String,
}

impl SessionExpired {
    /// Event pointing at `redirect_to`
    pub fn new(redirect_to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { redirect_to: redirect_to.into(), reason: reason.into() }
    }
}
