//! # Wallet Transport Trait
//!
//! Defines the abstract interface to the pairwise session client. All
//! implementations (wire-level client, scripted mock) must satisfy this
//! trait.
//!
//! ## Security Invariant
//!
//! The trait requires `Send + Sync` bounds for safe use from the driver
//! task. Session handles are opaque: the state machine owns exactly one
//! at a time and replaces it wholesale on reconnection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::TransportError;

/// Opaque correlation id (topic) for an established peer session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(pub String);

impl SessionHandle {
    /// Generate a fresh random handle.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The underlying topic string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Connection parameters for client initialization: how the widget
/// introduces itself to the relay and to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetadata {
    /// Relay project identifier.
    pub project_id: String,
    /// Human-readable application name shown in the wallet.
    pub name: String,
    /// Short description shown in the wallet's approval prompt.
    pub description: String,
    /// The application's canonical URL.
    pub url: String,
    /// Icon URLs for the wallet to render.
    pub icons: Vec<String>,
}

/// Capabilities declared when opening a pairing: which methods, chain
/// namespace tags, and events the session must support. The chain tag is
/// a namespace label, not a live network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingCapabilities {
    /// Required RPC methods.
    pub methods: Vec<String>,
    /// Required chain namespace tags.
    pub chains: Vec<String>,
    /// Events the session subscribes to.
    pub events: Vec<String>,
}

/// Reason code sent with a session close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The widget finished its attempt and is tearing the session down.
    UserDisconnected,
}

impl CloseReason {
    /// The standard numeric reason code.
    pub fn code(&self) -> u16 {
        match self {
            Self::UserDisconnected => 6000,
        }
    }

    /// The standard reason message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::UserDisconnected => "User disconnected.",
        }
    }
}

/// An open pairing: the one-time connection URI plus the channels over
/// which the transport reports peer approval and peer-initiated teardown.
///
/// `approval` resolves once: `Some(handle)` when the peer approves,
/// `None` when it declines or the pairing lapses without a session.
/// `deleted` may fire at any time after a session exists; events carry
/// the handle of the deleted session so stale notifications can be
/// recognized and ignored.
pub struct Pairing {
    /// The one-time pairing URI, if the relay produced one.
    pub uri: Option<String>,
    /// Resolves with the session handle on peer approval.
    pub approval: oneshot::Receiver<Option<SessionHandle>>,
    /// Unsolicited peer-deleted-session events.
    pub deleted: mpsc::UnboundedReceiver<SessionHandle>,
}

/// Abstract interface to the pairwise-encrypted session client.
///
/// The trait ensures that the wire-level client and the scripted mock are
/// interchangeable at compile time.
#[async_trait]
pub trait WalletTransport: Send + Sync + 'static {
    /// Initialize the underlying client with the given connection
    /// parameters. Called once per verification attempt, before pairing.
    async fn initialize(&self, metadata: &ClientMetadata) -> Result<(), TransportError>;

    /// Open a new pairing declaring the required capabilities.
    async fn open_pairing(
        &self,
        capabilities: PairingCapabilities,
    ) -> Result<Pairing, TransportError>;

    /// Issue a request over an established session and await the peer's
    /// response. Fails with a transport error on rejection, timeout, or
    /// disconnect.
    async fn request(
        &self,
        session: &SessionHandle,
        chain_tag: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;

    /// Close an established session with the given reason.
    async fn close_session(
        &self,
        session: &SessionHandle,
        reason: CloseReason,
    ) -> Result<(), TransportError>;
}

// Shared transports satisfy the trait, so a caller can keep a handle to
// the same client the widget owns (the mock relies on this in tests).
#[async_trait]
impl<T: WalletTransport> WalletTransport for std::sync::Arc<T> {
    async fn initialize(&self, metadata: &ClientMetadata) -> Result<(), TransportError> {
        (**self).initialize(metadata).await
    }

    async fn open_pairing(
        &self,
        capabilities: PairingCapabilities,
    ) -> Result<Pairing, TransportError> {
        (**self).open_pairing(capabilities).await
    }

    async fn request(
        &self,
        session: &SessionHandle,
        chain_tag: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        (**self).request(session, chain_tag, payload).await
    }

    async fn close_session(
        &self,
        session: &SessionHandle,
        reason: CloseReason,
    ) -> Result<(), TransportError> {
        (**self).close_session(session, reason).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_reason_standard_pair() {
        let reason = CloseReason::UserDisconnected;
        assert_eq!(reason.code(), 6000);
        assert_eq!(reason.message(), "User disconnected.");
    }

    #[test]
    fn test_session_handles_distinct() {
        assert_ne!(SessionHandle::generate(), SessionHandle::generate());
    }

    #[test]
    fn test_session_handle_display() {
        let handle = SessionHandle("abc".into());
        assert_eq!(handle.to_string(), "session:abc");
    }
}
