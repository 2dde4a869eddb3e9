//! # Transport Encoding
//!
//! Reversible Base64 encoding standing in for payload encryption. The
//! send path narrates the output as ciphertext; the receive path decodes
//! it back, and any corruption of the encoded text surfaces as a decode
//! failure rather than silently garbled plaintext.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::errors::CodecError;

/// Encodes `plain` for transport.
#[must_use]
pub fn encode(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

/// Decodes transport text back to the original payload.
///
/// Fails when `encoded` is not valid Base64 or does not decode to valid
/// UTF-8, which is exactly what happens once a tamper marker has been
/// appended to the ciphertext.
pub fn decode(encoded: &str) -> Result<String, CodecError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| CodecError::DecodeFailed(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CodecError::MalformedPlaintext(e.to_string()))
}
