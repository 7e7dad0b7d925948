//! # Error Classifier
//!
//! Collapses arbitrary transport failures into the closed `ErrorCode`
//! set. The peer's machine-readable code is honored only on an exact
//! match; everything else is generic. Connection-phase failures are
//! classified at the call site (the state machine knows whether a session
//! existed yet), so this function never returns `ConnectionFailed`.

use idlink_core::ErrorCode;
use idlink_transport::TransportError;

/// Classify a request-phase transport error.
pub fn classify(error: &TransportError) -> ErrorCode {
    match error {
        TransportError::PeerRejected { code } => {
            ErrorCode::from_code(code).unwrap_or(ErrorCode::GenericError)
        }
        _ => ErrorCode::GenericError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_peer_code_passes_through() {
        let err = TransportError::PeerRejected {
            code: "verification_rejected".into(),
        };
        assert_eq!(classify(&err), ErrorCode::VerificationRejected);

        let err = TransportError::PeerRejected {
            code: "already_signed".into(),
        };
        assert_eq!(classify(&err), ErrorCode::AlreadySigned);
    }

    #[test]
    fn test_unrecognized_peer_code_is_generic() {
        let err = TransportError::PeerRejected {
            code: "Verification_Rejected".into(),
        };
        assert_eq!(classify(&err), ErrorCode::GenericError);

        let err = TransportError::PeerRejected {
            code: "wallet exploded".into(),
        };
        assert_eq!(classify(&err), ErrorCode::GenericError);
    }

    #[test]
    fn test_non_peer_errors_are_generic() {
        assert_eq!(
            classify(&TransportError::Relay("socket closed".into())),
            ErrorCode::GenericError
        );
        assert_eq!(classify(&TransportError::SessionClosed), ErrorCode::GenericError);
    }
}
