//! # idlink-widget — The Verification Session Core
//!
//! Drives one identity-verification attempt end to end: obtain a pairing
//! URI from the transport, wait for the wallet's approval, issue a single
//! challenge-response request, validate the returned attestation, and
//! tear the session down exactly once regardless of outcome. When the
//! peer unilaterally deletes the session, a fresh pairing is opened
//! automatically with the same configuration, up to a bounded number of
//! reconnects.
//!
//! ## Usage
//!
//! ```no_run
//! use idlink_core::Identifier;
//! use idlink_transport::ClientMetadata;
//! use idlink_widget::{VerificationWidget, WidgetOptions};
//!
//! # fn demo<T: idlink_transport::WalletTransport>(transport: T) {
//! let metadata = ClientMetadata {
//!     project_id: "my-project".into(),
//!     name: "My App".into(),
//!     description: "Identity verification".into(),
//!     url: "https://my.app".into(),
//!     icons: vec![],
//! };
//! let widget = VerificationWidget::new(transport, WidgetOptions::new(metadata));
//! let _updates = widget.subscribe();
//! widget.start_verification(Identifier::plain("my_action"), Identifier::plain("my_signal"));
//! # }
//! ```
//!
//! ## Concurrency
//!
//! One driver task per verification attempt; the widget publishes
//! [`Snapshot`]s over a `tokio::sync::watch` channel. At most one active
//! verification per widget instance is supported — starting a new one
//! while another is in flight is not guarded here and must be serialized
//! by the caller.

pub mod attestation;
pub mod classify;
pub mod pairing;
pub mod request;
pub mod session;
pub mod widget;

pub use attestation::{is_valid_attestation, VerificationResult};
pub use classify::classify;
pub use pairing::{PairingMaterial, QrPayload};
pub use session::{ReconnectPolicy, Timeouts, VerificationState, WidgetOptions};
pub use widget::{Snapshot, VerificationWidget};
