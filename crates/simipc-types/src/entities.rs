//! # Core Domain Entities
//!
//! Defines the entities that make up the simulated IPC stack: the activity
//! log, the authentication session, the transport channel, and the transfer
//! telemetry counters.
//!
//! ## Clusters
//!
//! - **Activity Log**: `LogLevel`, `LogEntry`
//! - **Session**: `SessionState`, `Session`
//! - **Channel**: `IpcMethod`, `ChannelSlot`, `ChannelState`
//! - **Telemetry & Snapshots**: `TransferStats`, `SessionSnapshot`

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CLUSTER A: ACTIVITY LOG
// =============================================================================

/// Severity class of an activity log line.
///
/// The five levels match the narrative roles the simulator distinguishes:
/// protocol milestones (`Success`), rejected operations (`Error`),
/// high-level flow markers (`Info`), degraded-security notices (`Warning`),
/// and internal mechanics (`Debug`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// An operation completed as intended.
    Success,
    /// An operation was refused or a check failed.
    Error,
    /// A high-level step in the workflow.
    Info,
    /// The workflow continued but with a security property missing.
    Warning,
    /// Low-level detail interleaved between the headline lines.
    Debug,
}

impl LogLevel {
    /// Uppercase tag used when rendering a log line.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Success => "SUCCESS",
            LogLevel::Error => "ERROR",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the append-only activity log.
///
/// The timestamp is captured once, when the entry is created, so replaying
/// or re-rendering the log never re-stamps history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity class of this line.
    pub level: LogLevel,
    /// Human-readable narrative text.
    pub message: String,
    /// Wall-clock time of day (`HH:MM:SS.mmm`) when the entry was appended.
    pub timestamp: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current local time of day.
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }
}

// =============================================================================
// CLUSTER B: SESSION
// =============================================================================

/// Lifecycle of the authentication session.
///
/// Transitions only move forward within one run:
/// `Unauthenticated -> Authenticating -> Authenticated`. A full reset is the
/// only way back to `Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No handshake has been attempted since the last reset.
    #[default]
    Unauthenticated,
    /// A handshake is in flight; privileged operations are still refused.
    Authenticating,
    /// A session token has been issued.
    Authenticated,
}

/// The simulated client process and its authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identifier of the process the session belongs to (e.g. `process_alpha_1`).
    pub process_id: String,
    /// Current lifecycle state.
    pub state: SessionState,
    /// Session token, present only once authentication has completed.
    pub token: Option<String>,
}

impl Session {
    /// Creates a fresh, unauthenticated session for `process_id`.
    #[must_use]
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            state: SessionState::Unauthenticated,
            token: None,
        }
    }

    /// True once a token has been issued.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }
}

// =============================================================================
// CLUSTER C: CHANNEL
// =============================================================================

/// Transport mechanism a payload is attributed to.
///
/// The choice changes how the transfer is narrated and how the channel
/// monitor reports occupancy; the buffer semantics are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IpcMethod {
    /// Message queue.
    #[default]
    Queue,
    /// Named pipe.
    Pipe,
    /// Shared memory segment.
    SharedMemory,
}

impl IpcMethod {
    /// All methods, in display order.
    pub const ALL: [IpcMethod; 3] = [IpcMethod::Queue, IpcMethod::Pipe, IpcMethod::SharedMemory];

    /// Lowercase identifier used in serialized form and narrative text.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            IpcMethod::Queue => "queue",
            IpcMethod::Pipe => "pipe",
            IpcMethod::SharedMemory => "shared_memory",
        }
    }

    /// Uppercase tag used in bracketed log prefixes, e.g. `[SHARED_MEMORY]`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            IpcMethod::Queue => "QUEUE",
            IpcMethod::Pipe => "PIPE",
            IpcMethod::SharedMemory => "SHARED_MEMORY",
        }
    }
}

impl fmt::Display for IpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Error returned when a string does not name a known [`IpcMethod`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ipc method: {0}")]
pub struct ParseMethodError(pub String);

impl FromStr for IpcMethod {
    type Err = ParseMethodError;

    /// Accepts the wire names plus the common short forms used by the CLI.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" => Ok(IpcMethod::Queue),
            "pipe" => Ok(IpcMethod::Pipe),
            "shared_memory" | "shared-memory" | "shm" => Ok(IpcMethod::SharedMemory),
            other => Err(ParseMethodError(other.to_owned())),
        }
    }
}

/// A payload occupying the single-slot channel buffer.
///
/// The slot records how the payload was prepared (`encrypted`, `signed`)
/// separately from the payload text itself, so the receive path never has
/// to guess from the content. `signed` is authoritative: a slot with
/// `signed == false` carries no checksum and skips verification entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSlot {
    /// Unique identifier of this transfer.
    pub id: Uuid,
    /// Payload as it sits in the buffer (ciphertext when `encrypted`).
    pub payload: String,
    /// Integrity checksum computed at send time, absent for unsigned sends.
    pub checksum: Option<String>,
    /// Unix timestamp in milliseconds when the payload entered the buffer.
    pub created_at: u64,
    /// Whether the payload was encrypted before transmission.
    pub encrypted: bool,
    /// Whether an integrity checksum was attached.
    pub signed: bool,
    /// Transport the payload is attributed to.
    pub method: IpcMethod,
    /// Set when an in-flight modification has been injected.
    pub tampered: bool,
}

impl ChannelSlot {
    /// Creates a slot for `payload` with a fresh id and creation time.
    ///
    /// Security attributes default to off; the sender flips them as it
    /// applies each preparation step.
    #[must_use]
    pub fn new(payload: impl Into<String>, method: IpcMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: payload.into(),
            checksum: None,
            created_at: unix_millis(),
            encrypted: false,
            signed: false,
            method,
            tampered: false,
        }
    }

    /// Byte length of the payload as stored in the buffer.
    #[must_use]
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    /// Checksum for display, with unsigned slots rendered as `UNSIGNED`.
    #[must_use]
    pub fn checksum_label(&self) -> &str {
        self.checksum.as_deref().unwrap_or("UNSIGNED")
    }
}

/// Occupancy of the single-slot transport buffer.
///
/// `Transmitting` exists so the send path can reserve the buffer atomically
/// before its delivery delay elapses; a second sender observes the
/// reservation and is refused instead of overwriting the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    /// Buffer is empty and accepting a new transfer.
    #[default]
    Idle,
    /// A send has reserved the buffer but delivery has not completed.
    Transmitting,
    /// A payload is parked in the buffer awaiting the receiver.
    Occupied(ChannelSlot),
}

impl ChannelState {
    /// True when the buffer is empty and unreserved.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, ChannelState::Idle)
    }

    /// True while a send is in flight.
    #[must_use]
    pub fn is_transmitting(&self) -> bool {
        matches!(self, ChannelState::Transmitting)
    }

    /// The parked slot, if delivery has completed.
    #[must_use]
    pub fn slot(&self) -> Option<&ChannelSlot> {
        match self {
            ChannelState::Occupied(slot) => Some(slot),
            _ => None,
        }
    }
}

// =============================================================================
// CLUSTER D: TELEMETRY & SNAPSHOTS
// =============================================================================

/// Monotonic transfer counters for the current run.
///
/// Counters survive channel clears and log purges; only a full reset
/// zeroes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransferStats {
    /// Payloads that completed delivery into the channel buffer.
    pub sent: u64,
    /// Payloads successfully acquired by the receiver.
    pub received: u64,
    /// Receives discarded because checksum verification failed.
    pub integrity_errors: u64,
    /// In-flight modifications injected into the buffer.
    pub tamper_attempts: u64,
}

/// A point-in-time view of the whole simulator, suitable for rendering
/// or JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The client session and its authentication state.
    pub session: Session,
    /// Occupancy of the transport buffer.
    pub channel: ChannelState,
    /// Transfer counters for the run.
    pub stats: TransferStats,
    /// The activity log, oldest entry first.
    pub logs: Vec<LogEntry>,
}

// =============================================================================
// WALL CLOCK
// =============================================================================

/// Returns the current Unix timestamp in milliseconds.
///
/// # Panics
///
/// This function will NOT panic. If the system clock is before UNIX_EPOCH
/// (which should never happen on any sane system), it returns 0.
#[must_use]
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =============================================================================
// TESTS
// =============================================================================
