//! # Session Events
//!
//! Defines all event types that flow through the session bus. Collaborators
//! that render live views (the CLI's follow mode, tests) subscribe here
//! instead of polling snapshots.

use serde::{Deserialize, Serialize};
use simipc_types::{ChannelSlot, LogEntry};

/// All events the controller can publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    // =========================================================================
    // ACTIVITY LOG
    // =========================================================================
    /// A narrative line was appended to the activity log.
    LogAppended(LogEntry),

    /// The activity log was cleared wholesale.
    LogCleared,

    // =========================================================================
    // SESSION
    // =========================================================================
    /// A handshake completed and a token was issued.
    SessionAuthenticated {
        /// Process the session belongs to.
        process_id: String,
        /// The full session token (previews belong to the log, not here).
        token: String,
    },

    // =========================================================================
    // CHANNEL
    // =========================================================================
    /// A delayed send completed and parked its payload in the buffer.
    SlotStored(ChannelSlot),

    /// An in-flight modification corrupted the parked payload.
    SlotTampered(ChannelSlot),

    /// The buffer was cleared by the receive path.
    SlotCleared {
        /// True when the payload was delivered, false when it was discarded.
        delivered: bool,
    },
}

impl SessionEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::LogAppended(_) | Self::LogCleared => EventTopic::ActivityLog,
            Self::SessionAuthenticated { .. } => EventTopic::Session,
            Self::SlotStored(_) | Self::SlotTampered(_) | Self::SlotCleared { .. } => {
                EventTopic::Channel
            }
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Activity log appends and clears.
    ActivityLog,
    /// Authentication lifecycle.
    Session,
    /// Channel buffer occupancy changes.
    Channel,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &SessionEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
