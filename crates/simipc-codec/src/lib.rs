//! # Codec - Payload Preparation Primitives
//!
//! Deterministic building blocks for the simulated send and receive paths.
//! These are teaching stand-ins with the observable shape of their
//! production counterparts, not cryptography.
//!
//! ## Components
//!
//! | Module | Primitive | Use Case |
//! |--------|-----------|----------|
//! | `checksum` | 32-bit rolling digest | Integrity signing/verification |
//! | `encoding` | Base64 | Reversible "encryption" of payloads |
//! | `token` | base36 minting | Session token issuance |
//!
//! ## Properties
//!
//! - **Deterministic**: `checksum` and `encoding` are pure functions, so
//!   any single-character change to a payload is detectable.
//! - **Reversible**: `encoding::decode` recovers exactly what
//!   `encoding::encode` produced; corrupted ciphertext fails loudly.
//! - **Inspectable**: outputs are short printable strings sized for
//!   narrative logs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checksum;
pub mod encoding;
pub mod errors;
pub mod token;

// Re-exports
pub use errors::CodecError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
