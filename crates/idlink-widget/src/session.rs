//! # Session State Machine
//!
//! Drives one verification attempt end to end and guarantees at most one
//! outstanding request per session handle.
//!
//! States: LoadingWidget → AwaitingConnection → AwaitingVerification →
//! {Confirmed | Failed}
//!
//! State moves forward only, except that a peer-deleted-session event
//! loops back through a fresh pairing attempt with the same config —
//! bounded by [`ReconnectPolicy::max_reconnects`] rather than the
//! unbounded retry a hostile peer could otherwise provoke.
//!
//! ## Ordering Invariants
//!
//! - The outcome (`Confirmed`/`Failed`) is committed before the session
//!   is closed; a close failure is logged and never overrides it.
//! - The session is closed exactly once per completed attempt.
//! - A deletion event racing the in-flight request is honored only if it
//!   names the current session handle; stale events are ignored.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use idlink_core::{ErrorCode, SessionConfig};
use idlink_transport::{
    ClientMetadata, CloseReason, PairingCapabilities, SessionHandle, WalletTransport,
};

use crate::attestation::{parse_attestation, VerificationResult};
use crate::classify::classify;
use crate::pairing;
use crate::request::{build_request, CHAIN_TAG, SESSION_EVENTS, VERIFICATION_METHOD};
use crate::widget::Snapshot;

/// Lifecycle of one verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    /// Initial state; no pairing requested yet.
    LoadingWidget,
    /// A pairing URI exists; waiting for the wallet to approve.
    AwaitingConnection,
    /// Session established; request in flight.
    AwaitingVerification,
    /// A structurally valid attestation was received (terminal).
    Confirmed,
    /// The attempt failed with an [`ErrorCode`] (terminal).
    Failed,
}

impl VerificationState {
    /// Whether this state admits no further transitions within the
    /// current attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    /// The wire string for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadingWidget => "loading_widget",
            Self::AwaitingConnection => "awaiting_connection",
            Self::AwaitingVerification => "awaiting_verification",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for VerificationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded timeouts on the two suspension points that depend entirely on
/// the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Maximum wait for the wallet to approve the pairing.
    pub approval: Duration,
    /// Maximum wait for the verification response.
    pub response: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            approval: Duration::from_secs(300),
            response: Duration::from_secs(120),
        }
    }
}

/// Bound on automatic reconnection after peer-initiated teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Fresh pairings allowed per `start_verification` call after the
    /// first. Exhaustion fails the attempt with `ConnectionFailed`.
    pub max_reconnects: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_reconnects: 3 }
    }
}

/// Per-widget configuration.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    /// Connection parameters for transport initialization.
    pub metadata: ClientMetadata,
    /// Page origin embedded into the mobile QR payload, if known.
    pub origin: Option<String>,
    /// Suspension-point timeouts.
    pub timeouts: Timeouts,
    /// Reconnection bound.
    pub reconnect: ReconnectPolicy,
}

impl WidgetOptions {
    /// Options with default timeouts and reconnect policy.
    pub fn new(metadata: ClientMetadata) -> Self {
        Self {
            metadata,
            origin: None,
            timeouts: Timeouts::default(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Set the page origin for mobile deep-link round-trip.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Override the suspension-point timeouts.
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Override the reconnection bound.
    pub fn with_reconnect_policy(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }
}

/// Capabilities declared when opening a pairing: the one verification
/// method, the zero-trust chain namespace tag, and the session events.
pub(crate) fn verification_capabilities() -> PairingCapabilities {
    PairingCapabilities {
        methods: vec![VERIFICATION_METHOD.to_owned()],
        chains: vec![CHAIN_TAG.to_owned()],
        events: SESSION_EVENTS.iter().map(|e| (*e).to_owned()).collect(),
    }
}

/// How one attempt ended, from the retry loop's perspective.
enum AttemptOutcome {
    /// The attempt committed an outcome (or deliberately holds); no
    /// automatic retry.
    Completed,
    /// The peer deleted the session; retry with the same config.
    PeerDeleted,
}

/// The driver for one `start_verification` call. Exclusively owns the
/// transport handle and the current session handle for its lifetime.
pub(crate) struct Driver<T> {
    pub(crate) transport: Arc<T>,
    pub(crate) options: WidgetOptions,
    pub(crate) snapshot: Arc<watch::Sender<Snapshot>>,
}

impl<T: WalletTransport> Driver<T> {
    /// Run the attempt loop until an outcome is committed or the
    /// reconnect budget is exhausted.
    pub(crate) async fn run(self, config: SessionConfig) {
        let mut reconnects = 0u32;
        loop {
            match self.attempt(&config).await {
                AttemptOutcome::Completed => return,
                AttemptOutcome::PeerDeleted => {
                    reconnects += 1;
                    if reconnects > self.options.reconnect.max_reconnects {
                        warn!(reconnects, "reconnect budget exhausted after peer deletions");
                        self.fail(ErrorCode::ConnectionFailed);
                        return;
                    }
                    info!(attempt = reconnects, "peer deleted session, opening fresh pairing");
                }
            }
        }
    }

    /// One pairing attempt: initialize, pair, await approval, then hand
    /// off to the established-connection path.
    async fn attempt(&self, config: &SessionConfig) -> AttemptOutcome {
        self.reset();

        if let Err(err) = self.transport.initialize(&self.options.metadata).await {
            warn!(error = %err, "client initialization failed");
            self.fail(ErrorCode::ConnectionFailed);
            return AttemptOutcome::Completed;
        }

        let mut pairing = match self.transport.open_pairing(verification_capabilities()).await {
            Ok(pairing) => pairing,
            Err(err) => {
                warn!(error = %err, "unable to open pairing");
                self.fail(ErrorCode::ConnectionFailed);
                return AttemptOutcome::Completed;
            }
        };

        let material = pairing
            .uri
            .as_deref()
            .and_then(|uri| pairing::derive(uri, self.options.origin.as_deref()));
        let Some(material) = material else {
            warn!("pairing opened without a usable URI");
            self.fail(ErrorCode::ConnectionFailed);
            return AttemptOutcome::Completed;
        };

        debug!(uri = %material.uri, "pairing URI obtained");
        self.snapshot.send_modify(|s| {
            s.verification_state = VerificationState::AwaitingConnection;
            s.pairing = Some(material);
        });

        let session = match timeout(self.options.timeouts.approval, pairing.approval).await {
            Err(_) => {
                warn!("timed out awaiting wallet approval");
                self.fail(ErrorCode::ConnectionFailed);
                return AttemptOutcome::Completed;
            }
            Ok(Err(_)) => {
                warn!("approval channel dropped before resolution");
                self.fail(ErrorCode::ConnectionFailed);
                return AttemptOutcome::Completed;
            }
            Ok(Ok(None)) => {
                // Peer declined or the pairing lapsed without a session:
                // hold in AwaitingConnection until the peer deletes the
                // session or the caller retries.
                debug!("approval resolved without a session, holding");
                return match pairing.deleted.recv().await {
                    Some(_) => AttemptOutcome::PeerDeleted,
                    None => AttemptOutcome::Completed,
                };
            }
            Ok(Ok(Some(handle))) => handle,
        };

        info!(session = %session, "wallet approved, issuing verification request");
        self.on_connection_established(config, session, pairing.deleted)
            .await
    }

    /// The established-connection path: send the request, validate the
    /// response, commit the outcome, and tear the session down exactly
    /// once.
    async fn on_connection_established(
        &self,
        config: &SessionConfig,
        session: SessionHandle,
        mut deleted: mpsc::UnboundedReceiver<SessionHandle>,
    ) -> AttemptOutcome {
        self.snapshot
            .send_modify(|s| s.verification_state = VerificationState::AwaitingVerification);

        let payload = build_request(config);
        let request = timeout(
            self.options.timeouts.response,
            self.transport.request(&session, CHAIN_TAG, payload),
        );
        tokio::pin!(request);
        let mut deleted_open = true;

        let outcome = loop {
            tokio::select! {
                outcome = &mut request => break outcome,
                event = deleted.recv(), if deleted_open => match event {
                    Some(topic) if topic == session => {
                        // The in-flight request now targets a dead
                        // session; drop it and reconnect.
                        debug!(session = %session, "peer deleted session mid-request");
                        return AttemptOutcome::PeerDeleted;
                    }
                    Some(stale) => {
                        debug!(session = %stale, "ignoring deletion of stale session");
                    }
                    None => deleted_open = false,
                },
            }
        };

        match outcome {
            Err(_) => {
                warn!(session = %session, "timed out awaiting verification response");
                self.fail(ErrorCode::GenericError);
            }
            Ok(Ok(response)) => match parse_attestation(&response) {
                Some(result) => {
                    info!(session = %session, "attestation passed shape validation");
                    self.confirm(result);
                }
                None => {
                    warn!(session = %session, "response failed the attestation shape check");
                    self.fail(ErrorCode::UnexpectedResponse);
                }
            },
            Ok(Err(err)) => {
                warn!(session = %session, error = %err, "verification request failed");
                self.fail(classify(&err));
            }
        }

        // The outcome is committed; teardown must not change it.
        if let Err(err) = self
            .transport
            .close_session(&session, CloseReason::UserDisconnected)
            .await
        {
            warn!(session = %session, error = %err, "unable to close session");
        }

        AttemptOutcome::Completed
    }

    /// Reset the snapshot for a fresh pairing attempt.
    fn reset(&self) {
        self.snapshot.send_modify(|s| {
            s.verification_state = VerificationState::LoadingWidget;
            s.error_code = None;
            s.result = None;
            s.pairing = None;
        });
    }

    fn fail(&self, code: ErrorCode) {
        self.snapshot.send_modify(|s| {
            s.error_code = Some(code);
            s.verification_state = VerificationState::Failed;
        });
    }

    fn confirm(&self, result: VerificationResult) {
        self.snapshot.send_modify(|s| {
            s.result = Some(result);
            s.verification_state = VerificationState::Confirmed;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(VerificationState::Confirmed.is_terminal());
        assert!(VerificationState::Failed.is_terminal());
        assert!(!VerificationState::LoadingWidget.is_terminal());
        assert!(!VerificationState::AwaitingConnection.is_terminal());
        assert!(!VerificationState::AwaitingVerification.is_terminal());
    }

    #[test]
    fn test_capabilities_declare_single_method() {
        let caps = verification_capabilities();
        assert_eq!(caps.methods, vec![VERIFICATION_METHOD.to_owned()]);
        assert_eq!(caps.chains, vec![CHAIN_TAG.to_owned()]);
        assert_eq!(caps.events.len(), 2);
    }

    #[test]
    fn test_state_wire_strings() {
        assert_eq!(VerificationState::AwaitingConnection.as_str(), "awaiting_connection");
        let json = serde_json::to_string(&VerificationState::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }
}
