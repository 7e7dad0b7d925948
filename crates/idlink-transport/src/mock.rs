//! # Scripted Mock Transport
//!
//! A deterministic, in-process `WalletTransport` for driving the state
//! machine in tests. Pairings and responses are scripted ahead of time;
//! peer-deleted-session events are fired on demand; every request and
//! close call is recorded for assertion.
//!
//! Behind the default-on `mock` feature so the wire-level client build
//! can drop it.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::error::TransportError;
use crate::traits::{
    ClientMetadata, CloseReason, Pairing, PairingCapabilities, SessionHandle, WalletTransport,
};

/// One scripted answer to `open_pairing`.
#[derive(Debug)]
pub enum PairingScript {
    /// Produce a URI and approve immediately with the given session.
    Approve {
        /// The pairing URI to hand back.
        uri: String,
        /// The session handle the approval resolves with.
        session: SessionHandle,
    },
    /// Produce a URI but resolve approval empty (peer declined).
    Decline {
        /// The pairing URI to hand back.
        uri: String,
    },
    /// Produce a URI but leave approval unresolved forever.
    Stall {
        /// The pairing URI to hand back.
        uri: String,
    },
    /// Succeed, but with no URI.
    NoUri,
    /// Fail the pairing outright.
    Fail(String),
}

/// One scripted answer to `request`.
#[derive(Debug)]
pub enum ResponseScript {
    /// Resolve with this response value.
    Reply(serde_json::Value),
    /// Fail with this transport error.
    Fail(TransportError),
    /// Never resolve. Used to exercise deletion races and timeouts.
    Hang,
}

/// A request the state machine issued, captured for assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The session handle the request targeted.
    pub session: SessionHandle,
    /// The chain namespace tag.
    pub chain_tag: String,
    /// The full JSON-RPC payload.
    pub payload: serde_json::Value,
}

#[derive(Default)]
struct MockState {
    pairings: VecDeque<PairingScript>,
    responses: VecDeque<ResponseScript>,
    requests: Vec<RecordedRequest>,
    closes: Vec<(SessionHandle, CloseReason)>,
    deleted_senders: Vec<mpsc::UnboundedSender<SessionHandle>>,
    // Held so stalled approvals never resolve instead of erroring.
    stalled_approvals: Vec<oneshot::Sender<Option<SessionHandle>>>,
    init_calls: usize,
    pairing_calls: usize,
}

/// Scripted mock implementation of [`WalletTransport`].
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    /// Create an empty mock. Unscripted calls fail loudly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next pairing outcome.
    pub fn script_pairing(&self, script: PairingScript) {
        self.lock().pairings.push_back(script);
    }

    /// Queue the next request outcome.
    pub fn script_response(&self, script: ResponseScript) {
        self.lock().responses.push_back(script);
    }

    /// Fire a peer-deleted-session event for the given handle to every
    /// live pairing.
    pub fn fire_session_deleted(&self, session: &SessionHandle) {
        let mut state = self.lock();
        state
            .deleted_senders
            .retain(|tx| tx.send(session.clone()).is_ok());
    }

    /// Requests issued so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Close calls issued so far.
    pub fn closes(&self) -> Vec<(SessionHandle, CloseReason)> {
        self.lock().closes.clone()
    }

    /// Number of `close_session` calls.
    pub fn close_calls(&self) -> usize {
        self.lock().closes.len()
    }

    /// Number of `open_pairing` calls.
    pub fn pairing_calls(&self) -> usize {
        self.lock().pairing_calls
    }

    /// Number of `initialize` calls.
    pub fn init_calls(&self) -> usize {
        self.lock().init_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock transport state poisoned")
    }
}

#[async_trait]
impl WalletTransport for MockTransport {
    async fn initialize(&self, _metadata: &ClientMetadata) -> Result<(), TransportError> {
        self.lock().init_calls += 1;
        Ok(())
    }

    async fn open_pairing(
        &self,
        _capabilities: PairingCapabilities,
    ) -> Result<Pairing, TransportError> {
        let script = {
            let mut state = self.lock();
            state.pairing_calls += 1;
            state.pairings.pop_front()
        };

        let (approval_tx, approval_rx) = oneshot::channel();
        let (deleted_tx, deleted_rx) = mpsc::unbounded_channel();

        let uri = match script {
            Some(PairingScript::Approve { uri, session }) => {
                let _ = approval_tx.send(Some(session));
                Some(uri)
            }
            Some(PairingScript::Decline { uri }) => {
                let _ = approval_tx.send(None);
                Some(uri)
            }
            Some(PairingScript::Stall { uri }) => {
                self.lock().stalled_approvals.push(approval_tx);
                Some(uri)
            }
            Some(PairingScript::NoUri) => None,
            Some(PairingScript::Fail(reason)) => {
                return Err(TransportError::Pairing(reason));
            }
            None => {
                return Err(TransportError::Pairing("no scripted pairing".into()));
            }
        };

        self.lock().deleted_senders.push(deleted_tx);

        Ok(Pairing {
            uri,
            approval: approval_rx,
            deleted: deleted_rx,
        })
    }

    async fn request(
        &self,
        session: &SessionHandle,
        chain_tag: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let script = {
            let mut state = self.lock();
            state.requests.push(RecordedRequest {
                session: session.clone(),
                chain_tag: chain_tag.to_owned(),
                payload,
            });
            state.responses.pop_front()
        };

        match script {
            Some(ResponseScript::Reply(value)) => Ok(value),
            Some(ResponseScript::Fail(err)) => Err(err),
            Some(ResponseScript::Hang) => std::future::pending().await,
            None => Err(TransportError::Relay("no scripted response".into())),
        }
    }

    async fn close_session(
        &self,
        session: &SessionHandle,
        reason: CloseReason,
    ) -> Result<(), TransportError> {
        self.lock().closes.push((session.clone(), reason));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capabilities() -> PairingCapabilities {
        PairingCapabilities {
            methods: vec!["test_method".into()],
            chains: vec!["test:0".into()],
            events: vec![],
        }
    }

    #[tokio::test]
    async fn test_approve_script_resolves_session() {
        let mock = MockTransport::new();
        let handle = SessionHandle::generate();
        mock.script_pairing(PairingScript::Approve {
            uri: "wc:pair@2".into(),
            session: handle.clone(),
        });

        let pairing = mock.open_pairing(capabilities()).await.unwrap();
        assert_eq!(pairing.uri.as_deref(), Some("wc:pair@2"));
        assert_eq!(pairing.approval.await.unwrap(), Some(handle));
    }

    #[tokio::test]
    async fn test_deleted_event_reaches_open_pairing() {
        let mock = MockTransport::new();
        let handle = SessionHandle::generate();
        mock.script_pairing(PairingScript::Decline {
            uri: "wc:pair@2".into(),
        });

        let mut pairing = mock.open_pairing(capabilities()).await.unwrap();
        mock.fire_session_deleted(&handle);
        assert_eq!(pairing.deleted.recv().await, Some(handle));
    }

    #[tokio::test]
    async fn test_unscripted_calls_fail() {
        let mock = MockTransport::new();
        assert!(mock.open_pairing(capabilities()).await.is_err());
        let res = mock
            .request(&SessionHandle::generate(), "test:0", serde_json::json!({}))
            .await;
        assert!(res.is_err());
    }
}
