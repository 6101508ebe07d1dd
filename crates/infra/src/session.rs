//! Session navigators
//!
//! Receivers for the session-expired signal raised when a credential
//! refresh fails.

use async_trait::async_trait;
use inkpost_core::SessionNavigator;
use inkpost_domain::SessionExpired;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Forwards session-expired events to a channel consumed by the UI layer.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<SessionExpired>,
}

impl ChannelNavigator {
    /// Create a navigator and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionExpired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SessionNavigator for ChannelNavigator {
    async fn session_expired(&self, event: SessionExpired) {
        if let Err(e) = self.tx.send(event) {
            // Receiver gone: nobody left to redirect.
            debug!(redirect_to = %e.0.redirect_to, "session expired with no listener");
        }
    }
}

/// Logs session-expired events; for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

#[async_trait]
impl SessionNavigator for TracingNavigator {
    async fn session_expired(&self, event: SessionExpired) {
        warn!(redirect_to = %event.redirect_to, reason = %event.reason, "session expired, sign in again");
    }
}
