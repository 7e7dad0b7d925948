//! # Pairing Material Derivation
//!
//! Turns a raw pairing URI into the two QR payload renderings the UI
//! displays: a default payload, and a mobile payload that additionally
//! embeds the current page origin so a native scan can deep-link back to
//! the originating page. Pure formatting — no network or crypto work.

use serde::{Deserialize, Serialize};

/// Base of the deep link wrapped around the raw pairing URI.
pub const DEEP_LINK_BASE: &str = "https://id.idlink.dev/verify";

/// A string ready to be handed to a QR encoder (rendering out of scope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QrPayload(String);

impl QrPayload {
    /// The encoded payload string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the UI needs to display one connection attempt.
///
/// Derived once per attempt and superseded wholesale on reconnection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingMaterial {
    /// The raw one-time pairing URI.
    pub uri: String,
    /// Deep-link payload for direct display.
    pub default_qr: QrPayload,
    /// Deep-link payload with the page origin embedded for round-trip.
    pub mobile_qr: QrPayload,
}

/// Derive pairing material from a raw URI.
///
/// Returns `None` for an empty URI so callers leave prior state
/// untouched.
pub fn derive(uri: &str, origin: Option<&str>) -> Option<PairingMaterial> {
    if uri.is_empty() {
        return None;
    }
    Some(PairingMaterial {
        uri: uri.to_owned(),
        default_qr: QrPayload(deep_link(uri, None)),
        mobile_qr: QrPayload(deep_link(uri, origin)),
    })
}

fn deep_link(uri: &str, return_to: Option<&str>) -> String {
    let mut link = format!("{DEEP_LINK_BASE}?w={}", urlencoding::encode(uri));
    if let Some(origin) = return_to {
        link.push_str("&return_to=");
        link.push_str(&urlencoding::encode(origin));
    }
    link
}
