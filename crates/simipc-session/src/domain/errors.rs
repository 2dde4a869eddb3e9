//! # Rejection and Delivery Errors
//!
//! Every refusal and failure the controller can narrate. The `Display`
//! text of each variant is the exact activity log line, so the taxonomy
//! and the narration cannot drift apart.

use simipc_codec::CodecError;
use simipc_types::LogLevel;
use thiserror::Error;

/// Precondition violations refused by `send` before any state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendRejection {
    /// No session token has been issued yet
    #[error("ACCESS DENIED: Missing valid session token.")]
    NotAuthenticated,

    /// Payload was empty or whitespace only
    #[error("VALIDATION ERROR: Empty payload rejected.")]
    EmptyPayload,

    /// The single channel slot is reserved or occupied
    #[error("CHANNEL BUSY: Wait for receiver to clear buffer.")]
    ChannelBusy,
}

impl SendRejection {
    /// Log level the refusal is narrated at.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        match self {
            SendRejection::NotAuthenticated | SendRejection::EmptyPayload => LogLevel::Error,
            SendRejection::ChannelBusy => LogLevel::Warning,
        }
    }
}

/// Precondition violations refused by `receive` before any state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReceiveRejection {
    /// No session token has been issued yet
    #[error("ACCESS DENIED: Authentication required to poll channels.")]
    NotAuthenticated,

    /// Nothing is parked in the channel buffer
    #[error("Buffer Empty: No messages pending in queue.")]
    BufferEmpty,
}

impl ReceiveRejection {
    /// Log level the refusal is narrated at. An empty buffer is routine
    /// polling, not a fault, so it stays at debug.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        match self {
            ReceiveRejection::NotAuthenticated => LogLevel::Error,
            ReceiveRejection::BufferEmpty => LogLevel::Debug,
        }
    }
}

/// Failures detected while processing a parked slot after the receive
/// delay. Both discard the slot; only an integrity mismatch touches the
/// `integrity_errors` counter.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Recomputed checksum disagreed with the stored one
    #[error("CRITICAL: Integrity Check Failed! HMAC mismatch. Discarding packet.")]
    IntegrityMismatch {
        /// Checksum recomputed over the payload as received.
        expected: String,
        /// Checksum stored in the slot at send time.
        received: String,
    },

    /// Stored ciphertext would not decode back to plaintext
    #[error("Decryption failed: Ciphertext corrupted or invalid.")]
    DecodeFailed(#[source] CodecError),
}
