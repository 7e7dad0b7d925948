//! # idlink-core — Foundational Types for the idlink Widget
//!
//! This crate is the bedrock of the idlink workspace. It defines the
//! type-system primitives shared by the transport boundary and the
//! verification state machine; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Identifier`,
//!    `IdentityDigest` — no bare strings crossing the request boundary.
//!
//! 2. **Digests, never raw identifiers.** Any value destined for the peer
//!    flows through [`digest_identifier()`]; the raw `action_id`/`signal`
//!    strings never appear in a wire payload.
//!
//! 3. **One closed `ErrorCode` enum.** Exhaustive `match` everywhere;
//!    peer-reported codes are recognized by exact string match only.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `idlink-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod encoding;
pub mod error;
pub mod identifier;

// Re-export primary types for ergonomic imports.
pub use digest::{digest_identifier, IdentityDigest};
pub use encoding::is_abi_encoded;
pub use error::ErrorCode;
pub use identifier::{Identifier, SessionConfig};
