//! # Identity Digest — The Hashing Collaborator Contract
//!
//! Computes the digest form of an [`Identifier`] for inclusion in a
//! verification request. The contract is what matters to the state
//! machine: deterministic, collision-resistant, rendered in a fixed
//! `0x`-hex format that itself passes the ABI-like encoding check.
//!
//! ## Security Invariant
//!
//! [`digest_identifier()`] is the only way to obtain an
//! [`IdentityDigest`]. Raw `action_id`/`signal` values therefore cannot
//! reach a wire payload by construction — the request builder's field
//! types only admit digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::identifier::Identifier;

/// A digest of an application identifier, rendered as `0x` plus 64
/// lowercase hex characters.
///
/// Produced exclusively by [`digest_identifier()`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityDigest(String);

impl IdentityDigest {
    /// The `0x`-hex rendering of the digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the digest, yielding the rendered string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for IdentityDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the digest of an identifier.
///
/// Plain and pre-encoded identifiers are hashed over their string form,
/// so two integrations supplying the same value agree on the digest. The
/// output is SHA-256, `0x`-hex, always 66 characters.
pub fn digest_identifier(id: &Identifier) -> IdentityDigest {
    use std::fmt::Write;

    let hash = Sha256::digest(id.as_str().as_bytes());
    let mut rendered = String::with_capacity(66);
    rendered.push_str("0x");
    for byte in hash {
        // Writing to a String cannot fail.
        let _ = write!(rendered, "{byte:02x}");
    }
    IdentityDigest(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::is_abi_encoded;

    #[test]
    fn test_digest_deterministic() {
        let id = Identifier::plain("wid_staging_123");
        assert_eq!(digest_identifier(&id), digest_identifier(&id));
    }

    #[test]
    fn test_digest_format() {
        let digest = digest_identifier(&Identifier::plain("my_action"));
        assert_eq!(digest.as_str().len(), 66);
        assert!(digest.as_str().starts_with("0x"));
        assert!(is_abi_encoded(digest.as_str()));
    }

    #[test]
    fn test_different_inputs_different_digests() {
        let a = digest_identifier(&Identifier::plain("a"));
        let b = digest_identifier(&Identifier::plain("b"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_sha256_vector() {
        // SHA256("abc") — verified against Python hashlib.sha256(b"abc").hexdigest()
        let digest = digest_identifier(&Identifier::plain("abc"));
        assert_eq!(
            digest.as_str(),
            "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_never_contains_raw_value() {
        let digest = digest_identifier(&Identifier::plain("user@example.com"));
        assert!(!digest.as_str().contains("user@example.com"));
    }
}
