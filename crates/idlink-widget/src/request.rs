//! # Verification Request Builder
//!
//! Builds the JSON-RPC envelope for the single challenge-response request
//! sent over an established session.
//!
//! ## Security Invariant
//!
//! The raw `action_id` and `signal` never appear in the payload — only
//! their digests do. The correlation id is drawn from a range wide enough
//! that collision is negligible for the single in-flight request.

use std::ops::RangeInclusive;

use rand::Rng;
use serde_json::{json, Value};

use idlink_core::{digest_identifier, SessionConfig};

/// JSON-RPC protocol version tag.
pub const PROTOCOL_VERSION: &str = "2.0";

/// The single RPC method the session is opened for.
pub const VERIFICATION_METHOD: &str = "wld_worldIDVerification";

/// Zero-trust chain namespace tag. A namespace label only — no blockchain
/// execution is implied.
pub const CHAIN_TAG: &str = "eip155:0";

/// Events the session subscribes to when declaring capabilities.
pub const SESSION_EVENTS: [&str; 2] = ["chainChanged", "accountsChanged"];

/// Correlation id range for request/response matching.
pub const CORRELATION_ID_RANGE: RangeInclusive<u64> = 100_000..=9_999_999;

/// Build the verification request payload from a per-attempt config.
///
/// Produces a fresh random correlation id on every call.
pub fn build_request(config: &SessionConfig) -> Value {
    json!({
        "jsonrpc": PROTOCOL_VERSION,
        "method": VERIFICATION_METHOD,
        "id": rand::thread_rng().gen_range(CORRELATION_ID_RANGE),
        "params": [{
            "signal": digest_identifier(&config.signal).as_str(),
            "action_id": digest_identifier(&config.action_id).as_str(),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlink_core::Identifier;

    fn config() -> SessionConfig {
        SessionConfig::new(
            Identifier::plain("wid_staging_123"),
            Identifier::plain("user_signal_456"),
        )
    }

    #[test]
    fn test_envelope_shape() {
        let payload = build_request(&config());
        assert_eq!(payload["jsonrpc"], PROTOCOL_VERSION);
        assert_eq!(payload["method"], VERIFICATION_METHOD);
        assert!(payload["id"].is_u64());
        assert_eq!(payload["params"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_raw_values_never_transmitted() {
        let payload = build_request(&config());
        let rendered = payload.to_string();
        assert!(!rendered.contains("wid_staging_123"));
        assert!(!rendered.contains("user_signal_456"));

        let params = &payload["params"][0];
        assert!(params["signal"].as_str().is_some_and(|s| s.starts_with("0x")));
        assert!(params["action_id"].as_str().is_some_and(|s| s.starts_with("0x")));
    }

    #[test]
    fn test_digests_are_deterministic_across_builds() {
        let a = build_request(&config());
        let b = build_request(&config());
        assert_eq!(a["params"], b["params"]);
    }

    #[test]
    fn test_correlation_id_in_range() {
        for _ in 0..64 {
            let id = build_request(&config())["id"].as_u64().unwrap();
            assert!(CORRELATION_ID_RANGE.contains(&id));
        }
    }

    #[test]
    fn test_correlation_ids_vary() {
        let ids: std::collections::HashSet<u64> = (0..32)
            .map(|_| build_request(&config())["id"].as_u64().unwrap())
            .collect();
        // 32 draws from a ~10M range: collisions across all draws would
        // indicate a broken generator.
        assert!(ids.len() > 1);
    }
}
