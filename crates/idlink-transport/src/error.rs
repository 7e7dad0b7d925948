//! # Transport Errors
//!
//! Tagged failure variants for the transport boundary. The widget's
//! classifier translates these into the closed `ErrorCode` set once, at
//! the boundary — no string matching happens in the core logic.

use thiserror::Error;

/// Error raised by a [`crate::WalletTransport`] implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying client could not be initialized.
    #[error("client initialization failed: {0}")]
    Init(String),

    /// Pairing negotiation failed before a session existed.
    #[error("pairing failed: {0}")]
    Pairing(String),

    /// The peer rejected the request and reported a machine-readable
    /// code. The code is passed through verbatim for classification.
    #[error("peer rejected request: {code}")]
    PeerRejected {
        /// The peer-supplied failure code string.
        code: String,
    },

    /// The relay or wire connection failed mid-session.
    #[error("relay failure: {0}")]
    Relay(String),

    /// The session handle no longer refers to a live session.
    #[error("session already closed")]
    SessionClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_peer_code() {
        let err = TransportError::PeerRejected {
            code: "verification_rejected".into(),
        };
        assert!(err.to_string().contains("verification_rejected"));
    }
}
