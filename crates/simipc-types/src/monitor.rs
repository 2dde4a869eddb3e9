//! # Channel Monitor View
//!
//! Derives a per-transport status board from the single channel buffer,
//! the read model behind the `status` surface of the simulator.

use serde::{Deserialize, Serialize};

use crate::entities::{ChannelState, IpcMethod};

/// Reported condition of one transport on the status board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// No pending payload attributed to this transport.
    Idle,
    /// A payload is parked and waiting for the receiver.
    DataPending,
    /// A shared memory segment is held until the reader releases it.
    Locked,
}

impl ChannelStatus {
    /// Uppercase tag used when rendering the status board.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ChannelStatus::Idle => "IDLE",
            ChannelStatus::DataPending => "DATA PENDING",
            ChannelStatus::Locked => "LOCKED",
        }
    }
}

/// Status of a single transport given the current buffer occupancy.
///
/// Only a parked payload marks a transport active; an in-flight send still
/// reports `Idle` because nothing is observable in the buffer yet. Shared
/// memory reports `Locked` rather than `DataPending` since the segment
/// stays mapped until the reader clears it.
#[must_use]
pub fn status_of(method: IpcMethod, channel: &ChannelState) -> ChannelStatus {
    match channel.slot() {
        Some(slot) if slot.method == method => match method {
            IpcMethod::SharedMemory => ChannelStatus::Locked,
            _ => ChannelStatus::DataPending,
        },
        _ => ChannelStatus::Idle,
    }
}

/// Full status board, one row per transport in display order.
#[must_use]
pub fn channel_overview(channel: &ChannelState) -> [(IpcMethod, ChannelStatus); 3] {
    [
        (IpcMethod::Queue, status_of(IpcMethod::Queue, channel)),
        (IpcMethod::Pipe, status_of(IpcMethod::Pipe, channel)),
        (
            IpcMethod::SharedMemory,
            status_of(IpcMethod::SharedMemory, channel),
        ),
    ]
}
