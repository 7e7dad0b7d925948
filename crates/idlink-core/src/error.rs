//! # Error Codes — The Closed Failure Taxonomy
//!
//! Every failure the widget can surface collapses into one `ErrorCode`.
//! Three codes are produced locally (connection, response shape, generic);
//! the rest are machine-readable codes the peer itself may report.
//!
//! ## Design
//!
//! - Peer-reported codes are recognized by **exact** string match via
//!   [`ErrorCode::from_code()`]. Anything unrecognized falls back to
//!   [`ErrorCode::GenericError`] at the classification boundary.
//! - At most one code is active at a time; it is set only on the
//!   transition into the failed state and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// The closed set of user-visible failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Pairing or connection negotiation failed.
    ConnectionFailed,
    /// The peer answered, but the attestation shape was invalid.
    UnexpectedResponse,
    /// Peer-reported: the user rejected the verification request.
    VerificationRejected,
    /// Peer-reported: this identity already verified for this action.
    AlreadySigned,
    /// Peer-reported: the action id was not recognized.
    InvalidActionId,
    /// Anything that fits no other code.
    GenericError,
}

impl ErrorCode {
    /// The machine-readable wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectionFailed => "connection_failed",
            Self::UnexpectedResponse => "unexpected_response",
            Self::VerificationRejected => "verification_rejected",
            Self::AlreadySigned => "already_signed",
            Self::InvalidActionId => "invalid_action_id",
            Self::GenericError => "generic_error",
        }
    }

    /// Parse a peer-supplied code string. Returns `None` unless the
    /// string exactly matches a known code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "connection_failed" => Some(Self::ConnectionFailed),
            "unexpected_response" => Some(Self::UnexpectedResponse),
            "verification_rejected" => Some(Self::VerificationRejected),
            "already_signed" => Some(Self::AlreadySigned),
            "invalid_action_id" => Some(Self::InvalidActionId),
            "generic_error" => Some(Self::GenericError),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_codes() {
        let codes = [
            ErrorCode::ConnectionFailed,
            ErrorCode::UnexpectedResponse,
            ErrorCode::VerificationRejected,
            ErrorCode::AlreadySigned,
            ErrorCode::InvalidActionId,
            ErrorCode::GenericError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::from_code(code.as_str()), Some(code));
        }
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(ErrorCode::from_code("Verification_Rejected"), None);
        assert_eq!(ErrorCode::from_code("verification_rejected "), None);
        assert_eq!(ErrorCode::from_code("something else entirely"), None);
        assert_eq!(ErrorCode::from_code(""), None);
    }

    #[test]
    fn test_serde_wire_strings() {
        let json = serde_json::to_string(&ErrorCode::AlreadySigned).unwrap();
        assert_eq!(json, "\"already_signed\"");
        let parsed: ErrorCode = serde_json::from_str("\"generic_error\"").unwrap();
        assert_eq!(parsed, ErrorCode::GenericError);
    }
}
