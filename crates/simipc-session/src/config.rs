//! # Controller Configuration
//!
//! Construction parameters for the session controller. Defaults reproduce
//! the canonical demo setup; the runtime layers environment and CLI
//! overrides on top before construction.

use std::time::Duration;

use crate::DEFAULT_CHANNEL_CAPACITY;

/// Complete controller configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Identifier of the simulated client process.
    pub process_id: String,
    /// Simulated latency per workflow step.
    pub latency: LatencyProfile,
    /// Capacity of the broadcast event bus.
    pub event_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            process_id: "process_alpha_1".to_owned(),
            latency: LatencyProfile::default(),
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Simulated latency for each delayed workflow step.
///
/// These delays are the whole "network": every other part of the
/// simulation is synchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Handshake duration before the token is issued.
    pub auth: Duration,
    /// Transit time before a sent payload lands in the buffer.
    pub transmit: Duration,
    /// Polling time before a receive processes the buffer.
    pub receive: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            auth: Duration::from_millis(600),
            transmit: Duration::from_millis(500),
            receive: Duration::from_millis(800),
        }
    }
}

impl LatencyProfile {
    /// Zero-delay profile. Completions still land on spawned tasks, so
    /// ordering is identical to a delayed run; use `quiesce` to join them.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            auth: Duration::ZERO,
            transmit: Duration::ZERO,
            receive: Duration::ZERO,
        }
    }
}
