//! # Controller Domain Entities
//!
//! Request, advisory, and outcome types exchanged between the controller
//! and its collaborators.

use serde::{Deserialize, Serialize};
use simipc_types::IpcMethod;

/// Parameters of one send operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    /// Payload text to transmit (stored raw, encoded when `encrypt`).
    pub payload: String,
    /// Transport to attribute the transfer to.
    pub method: IpcMethod,
    /// Apply the reversible transport encoding before storing.
    pub encrypt: bool,
    /// Attach an integrity checksum.
    pub sign: bool,
}

impl SendRequest {
    /// Creates a request with the default security posture:
    /// signing on, encryption off, queue transport.
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            method: IpcMethod::Queue,
            encrypt: false,
            sign: true,
        }
    }

    /// Selects the transport.
    #[must_use]
    pub fn with_method(mut self, method: IpcMethod) -> Self {
        self.method = method;
        self
    }

    /// Turns transport encoding on.
    #[must_use]
    pub fn encrypted(mut self) -> Self {
        self.encrypt = true;
        self
    }

    /// Turns the integrity checksum off.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.sign = false;
        self
    }
}

/// Advisory result of dispatching an operation.
///
/// Operations never return `Err`; a refusal is part of the normal
/// vocabulary and its details speak through the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Accepted; the delayed completion will land on a spawned task.
    Scheduled,
    /// Applied synchronously in full.
    Completed,
    /// Refused by a precondition check; no state changed.
    Rejected,
}

impl Dispatch {
    /// True unless the operation was refused.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Dispatch::Rejected)
    }
}

/// How the integrity check concluded for a payload that moved past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Checksum recomputed over the received payload and matched.
    Passed,
    /// Slot was unsigned; the check was bypassed.
    Skipped,
}
