//! # ABI-Like Encoding Check
//!
//! A syntactic well-formedness predicate for encoded binary values as they
//! appear in peer responses: `0x`-prefixed, lowercase hex, at least one
//! full 32-byte word. This is a shape check only — cryptographic proof
//! verification happens downstream and is out of scope here.

/// Minimum length of a well-formed encoded value: the `0x` prefix plus
/// one 32-byte word rendered as 64 hex characters.
pub const MIN_ENCODED_LEN: usize = 66;

/// Check whether `value` is a well-formed ABI-like encoded binary value.
///
/// Accepts only `0x`-prefixed lowercase hexadecimal of at least
/// [`MIN_ENCODED_LEN`] characters. Uppercase hex, odd prefixes, and bare
/// hex without the prefix are all rejected.
pub fn is_abi_encoded(value: &str) -> bool {
    let Some(body) = value.strip_prefix("0x") else {
        return false;
    };
    value.len() >= MIN_ENCODED_LEN
        && !body.is_empty()
        && body.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
