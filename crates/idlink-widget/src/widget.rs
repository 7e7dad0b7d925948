//! # Public Façade
//!
//! [`VerificationWidget`] is what the surrounding UI talks to: one entry
//! point to start verification and a `watch` channel of [`Snapshot`]s to
//! bind rendering against. No ambient global state — each widget owns its
//! transport and its channel.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use idlink_core::{ErrorCode, Identifier, SessionConfig};
use idlink_transport::WalletTransport;

use crate::attestation::VerificationResult;
use crate::pairing::PairingMaterial;
use crate::session::{Driver, VerificationState, WidgetOptions};

/// Read-only view of the verification lifecycle, published after every
/// state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Where the attempt currently stands.
    pub verification_state: VerificationState,
    /// The confirmed attestation, populated only in `Confirmed`.
    pub result: Option<VerificationResult>,
    /// The active failure code, populated only in `Failed`.
    pub error_code: Option<ErrorCode>,
    /// Material for the current connection attempt, superseded on
    /// reconnection.
    pub pairing: Option<PairingMaterial>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            verification_state: VerificationState::LoadingWidget,
            result: None,
            error_code: None,
            pairing: None,
        }
    }
}

/// The verification widget façade.
///
/// At most one active verification per widget instance is supported;
/// starting a new one while another is in flight must be serialized by
/// the caller.
pub struct VerificationWidget<T> {
    transport: Arc<T>,
    options: WidgetOptions,
    snapshot: Arc<watch::Sender<Snapshot>>,
}

impl<T: WalletTransport> VerificationWidget<T> {
    /// Create a widget owning the given transport.
    pub fn new(transport: T, options: WidgetOptions) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self {
            transport: Arc::new(transport),
            options,
            snapshot: Arc::new(tx),
        }
    }

    /// Start a verification attempt. Idempotent no-op when either
    /// identifier is empty. Must be called within a tokio runtime; the
    /// attempt is driven on a spawned task and progress is observable via
    /// [`subscribe()`](Self::subscribe).
    pub fn start_verification(&self, action_id: Identifier, signal: Identifier) {
        let config = SessionConfig::new(action_id, signal);
        if !config.is_complete() {
            debug!("ignoring verification start with an empty identifier");
            return;
        }

        let driver = Driver {
            transport: Arc::clone(&self.transport),
            options: self.options.clone(),
            snapshot: Arc::clone(&self.snapshot),
        };
        tokio::spawn(driver.run(config));
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_loading() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.verification_state, VerificationState::LoadingWidget);
        assert!(snapshot.result.is_none());
        assert!(snapshot.error_code.is_none());
        assert!(snapshot.pairing.is_none());
    }
}
