//! # Attestation Validator
//!
//! Shape validation for the peer's verification response: the
//! `{proof, merkle_root, nullifier_hash}` triple, each field present and
//! each passing the ABI-like encoding check. This is a syntactic guard
//! only — cryptographic proof verification happens downstream.
//!
//! Absence or malformation of any field invalidates the whole candidate;
//! there is no partial acceptance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use idlink_core::is_abi_encoded;

/// A structurally valid attestation returned by the wallet.
///
/// Owned by the state machine once confirmed; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The zero-knowledge proof, ABI-like encoded.
    pub proof: String,
    /// The identity set's Merkle root the proof was generated against.
    pub merkle_root: String,
    /// The nullifier hash preventing double verification.
    pub nullifier_hash: String,
}

/// Extract a structurally valid attestation from a raw response value.
///
/// Returns `None` if any of the three required fields is missing, is not
/// a string, or fails the encoding check.
pub fn parse_attestation(response: &Value) -> Option<VerificationResult> {
    Some(VerificationResult {
        proof: encoded_field(response, "proof")?,
        merkle_root: encoded_field(response, "merkle_root")?,
        nullifier_hash: encoded_field(response, "nullifier_hash")?,
    })
}

/// Type-narrowing predicate over a raw response value.
pub fn is_valid_attestation(response: &Value) -> bool {
    parse_attestation(response).is_some()
}

fn encoded_field(response: &Value, name: &str) -> Option<String> {
    let value = response.get(name)?.as_str()?;
    is_abi_encoded(value).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoded(fill: char) -> String {
        format!("0x{}", std::iter::repeat(fill).take(64).collect::<String>())
    }

    fn valid_response() -> Value {
        json!({
            "proof": encoded('a'),
            "merkle_root": encoded('b'),
            "nullifier_hash": encoded('c'),
        })
    }

    #[test]
    fn test_accepts_complete_response() {
        let response = valid_response();
        assert!(is_valid_attestation(&response));
        let result = parse_attestation(&response).unwrap();
        assert_eq!(result.proof, encoded('a'));
        assert_eq!(result.merkle_root, encoded('b'));
        assert_eq!(result.nullifier_hash, encoded('c'));
    }

    #[test]
    fn test_rejects_any_missing_field() {
        for field in ["proof", "merkle_root", "nullifier_hash"] {
            let mut response = valid_response();
            response.as_object_mut().unwrap().remove(field);
            assert!(!is_valid_attestation(&response), "missing {field} accepted");
        }
    }

    #[test]
    fn test_rejects_any_malformed_field() {
        for field in ["proof", "merkle_root", "nullifier_hash"] {
            let mut response = valid_response();
            response[field] = json!("not-encoded");
            assert!(!is_valid_attestation(&response), "malformed {field} accepted");
        }
    }

    #[test]
    fn test_rejects_non_string_field() {
        let mut response = valid_response();
        response["proof"] = json!(12345);
        assert!(!is_valid_attestation(&response));
    }

    #[test]
    fn test_validity_monotonic_in_field_presence() {
        // Removing a present, valid field can only flip true -> false.
        let full = valid_response();
        assert!(is_valid_attestation(&full));
        let mut reduced = full.clone();
        reduced.as_object_mut().unwrap().remove("nullifier_hash");
        assert!(!is_valid_attestation(&reduced));
    }

    #[test]
    fn test_rejects_non_object_responses() {
        assert!(!is_valid_attestation(&json!(null)));
        assert!(!is_valid_attestation(&json!("0xabc")));
        assert!(!is_valid_attestation(&json!([encoded('a')])));
    }

    #[test]
    fn test_extra_fields_are_tolerated() {
        let mut response = valid_response();
        response["credential_type"] = json!("orb");
        assert!(is_valid_attestation(&response));
    }
}
