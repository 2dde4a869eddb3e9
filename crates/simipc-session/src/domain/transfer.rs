//! # Transfer Pipeline
//!
//! Pure send-side preparation and receive-side processing. The controller
//! narrates and schedules; everything that decides *what* happens to a
//! payload lives here, lock-free and synchronous.
//!
//! The receive side is split into two stages (`verify_slot`, then
//! `decode_slot`) because each stage narrates before the next runs: an
//! unsigned slot logs its bypassed check even when the decode afterwards
//! fails.

use simipc_codec::{checksum, encoding};
use simipc_types::ChannelSlot;

use crate::domain::entities::{SendRequest, Verification};
use crate::domain::errors::DeliveryError;

/// Marker appended to a payload by an in-flight modification.
pub const CORRUPTION_SUFFIX: &str = "_CORRUPTED";

/// A payload after send-side preparation.
///
/// `text` is what will sit in the channel buffer; the checksum, when
/// present, was computed over that exact text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPayload {
    /// Payload as it will be stored (encoded when encryption was requested).
    pub text: String,
    /// Integrity checksum over `text`, absent for unsigned sends.
    pub checksum: Option<String>,
}

/// Applies the requested preparation steps to the payload.
///
/// Encoding runs first so the checksum covers the transmitted form, not
/// the plaintext. Verification on the receive side therefore works
/// without decoding.
#[must_use]
pub fn prepare(request: &SendRequest) -> PreparedPayload {
    let text = if request.encrypt {
        encoding::encode(&request.payload)
    } else {
        request.payload.clone()
    };
    let checksum = request.sign.then(|| checksum::compute(&text));
    PreparedPayload { text, checksum }
}

/// Builds the channel slot for a prepared payload.
///
/// Called at delivery time, so the slot's id and creation timestamp
/// reflect when the payload entered the buffer, not when the send was
/// dispatched.
#[must_use]
pub fn build_slot(prepared: PreparedPayload, request: &SendRequest) -> ChannelSlot {
    let mut slot = ChannelSlot::new(prepared.text, request.method);
    slot.encrypted = request.encrypt;
    slot.signed = request.sign;
    slot.checksum = prepared.checksum;
    slot
}

/// Injects the in-flight corruption into a parked slot.
///
/// The stored checksum is deliberately left untouched; the mismatch is
/// what the receive-side verification exists to catch. Repeated calls
/// compound the suffix.
pub fn corrupt(slot: &mut ChannelSlot) {
    slot.payload.push_str(CORRUPTION_SUFFIX);
    slot.tampered = true;
}

/// Receive stage 1: integrity verification.
///
/// Recomputes the checksum over the payload as it currently is, so any
/// corruption since send time is caught. Unsigned slots bypass the check
/// and stand or fall on the decode stage alone.
pub fn verify_slot(slot: &ChannelSlot) -> Result<Verification, DeliveryError> {
    if !slot.signed {
        return Ok(Verification::Skipped);
    }
    let expected = checksum::compute(&slot.payload);
    if slot.checksum.as_deref() != Some(expected.as_str()) {
        return Err(DeliveryError::IntegrityMismatch {
            expected,
            received: slot.checksum_label().to_owned(),
        });
    }
    Ok(Verification::Passed)
}

/// Receive stage 2: plaintext recovery.
///
/// Unencrypted payloads pass through as-is, corrupted or not.
pub fn decode_slot(slot: &ChannelSlot) -> Result<String, DeliveryError> {
    if !slot.encrypted {
        return Ok(slot.payload.clone());
    }
    encoding::decode(&slot.payload).map_err(DeliveryError::DecodeFailed)
}
