//! # Session Token Minting
//!
//! Issues the opaque bearer tokens handed out at the end of a successful
//! handshake. Tokens are random base36 so they read like the real thing
//! in logs, while staying short enough to preview inline.

use rand::Rng;

/// Prefix carried by every session token.
pub const TOKEN_PREFIX: &str = "tok_";

/// Number of random characters following the prefix.
pub const TOKEN_LENGTH: usize = 16;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mints a fresh session token, e.g. `tok_9fj2k1x0aqpz7m3b`.
#[must_use]
pub fn mint() -> String {
    let mut rng = rand::thread_rng();
    let mut token = String::with_capacity(TOKEN_PREFIX.len() + TOKEN_LENGTH);
    token.push_str(TOKEN_PREFIX);
    for _ in 0..TOKEN_LENGTH {
        let idx = rng.gen_range(0..BASE36.len());
        token.push(BASE36[idx] as char);
    }
    token
}
