//! Codec error types.

use thiserror::Error;

/// Payload codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Ciphertext could not be decoded back to bytes
    #[error("Decoding failed: {0}")]
    DecodeFailed(String),

    /// Decoded bytes do not form valid UTF-8 text
    #[error("Malformed plaintext: {0}")]
    MalformedPlaintext(String),
}
