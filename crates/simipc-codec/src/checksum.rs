//! # Integrity Checksum
//!
//! A 32-bit rolling digest over the payload's UTF-16 code units, rendered
//! with the label shape of a real MAC so it reads correctly in the packet
//! inspector. Any single-character change to the payload changes the
//! digest, which is the only property the verification drill needs.
//!
//! ## Digest Format
//!
//! `hmac_sha256_<hex>x8f2`, where `<hex>` is the lowercase magnitude of
//! the signed 32-bit accumulator.

/// Computes the integrity checksum for `payload`.
///
/// The accumulator folds each UTF-16 code unit as `h = h * 31 + unit`,
/// wrapping in signed 32-bit space.
#[must_use]
pub fn compute(payload: &str) -> String {
    let mut hash: i32 = 0;
    for unit in payload.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    format!("hmac_sha256_{:x}x8f2", hash.unsigned_abs())
}

/// Recomputes the checksum for `payload` and compares it to `expected`.
#[must_use]
pub fn verify(payload: &str, expected: &str) -> bool {
    compute(payload) == expected
}
