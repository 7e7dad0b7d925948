//! # Identifier Newtypes
//!
//! Application-supplied identifiers for a verification attempt. These
//! prevent accidental confusion between the two inputs — you cannot pass
//! a signal where an action id is expected without it being visible at
//! the call site.
//!
//! ## Security Invariant
//!
//! Identifiers are never transmitted raw. The request builder consumes
//! them only through [`crate::digest_identifier()`].

use serde::{Deserialize, Serialize};

/// An application-supplied identifier: either a plain UTF-8 string or a
/// pre-encoded advanced value (already in ABI-like `0x`-hex form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    /// A plain string identifier, hashed as raw UTF-8 bytes.
    Plain(String),
    /// A pre-encoded value supplied by an advanced integration.
    Encoded(String),
}

impl Identifier {
    /// Construct a plain string identifier.
    pub fn plain(value: impl Into<String>) -> Self {
        Self::Plain(value.into())
    }

    /// Construct a pre-encoded identifier.
    pub fn encoded(value: impl Into<String>) -> Self {
        Self::Encoded(value.into())
    }

    /// The underlying string form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(s) | Self::Encoded(s) => s,
        }
    }

    /// Whether the identifier is empty. Empty identifiers make
    /// verification a no-op rather than an error.
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable per-attempt configuration: the action being verified and the
/// signal bound to it. Created once when verification starts and reused
/// verbatim for every automatic reconnection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// The action the user is verifying for.
    pub action_id: Identifier,
    /// The signal committed to by the proof.
    pub signal: Identifier,
}

impl SessionConfig {
    /// Create a new per-attempt configuration.
    pub fn new(action_id: Identifier, signal: Identifier) -> Self {
        Self { action_id, signal }
    }

    /// Whether both fields are non-empty and verification may proceed.
    pub fn is_complete(&self) -> bool {
        !self.action_id.is_empty() && !self.signal.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identifier() {
        assert!(Identifier::plain("").is_empty());
        assert!(Identifier::encoded("").is_empty());
        assert!(!Identifier::plain("wid_test").is_empty());
    }

    #[test]
    fn test_config_completeness() {
        let complete = SessionConfig::new(Identifier::plain("a"), Identifier::plain("s"));
        assert!(complete.is_complete());

        let no_action = SessionConfig::new(Identifier::plain(""), Identifier::plain("s"));
        assert!(!no_action.is_complete());

        let no_signal = SessionConfig::new(Identifier::plain("a"), Identifier::plain(""));
        assert!(!no_signal.is_complete());
    }

    #[test]
    fn test_display_is_raw_form() {
        assert_eq!(Identifier::plain("wid_staging_123").to_string(), "wid_staging_123");
    }
}
