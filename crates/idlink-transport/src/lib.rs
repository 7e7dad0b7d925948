//! # idlink-transport — The Wallet Transport Boundary
//!
//! Defines the seam between the verification state machine and the
//! underlying pairwise-encrypted session client. The state machine only
//! ever sees [`WalletTransport`]; the wire-level client and the scripted
//! [`mock::MockTransport`] are interchangeable at compile time.
//!
//! ## Security Invariant
//!
//! Errors cross this boundary as tagged variants, never as bare strings.
//! The peer's machine-readable failure code travels in
//! [`error::TransportError::PeerRejected`] and is interpreted exactly
//! once, by the widget's classifier.

pub mod error;
pub mod traits;

#[cfg(feature = "mock")]
pub mod mock;

pub use error::TransportError;
pub use traits::{
    ClientMetadata, CloseReason, Pairing, PairingCapabilities, SessionHandle, WalletTransport,
};
