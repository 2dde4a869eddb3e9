//! # Session Controller Service
//!
//! Application service that implements the `SessionControlApi` trait and
//! owns every piece of simulator state: the session, the channel buffer,
//! the activity log, and the transfer counters.
//!
//! ## Architecture
//!
//! Each workflow splits into a synchronous dispatch half and a deferred
//! completion half:
//! - Dispatch checks preconditions, narrates the preparation steps, and
//!   reserves state under a short-lived lock
//! - Completion runs on a spawned task after the configured latency and
//!   applies the state change
//!
//! The controller is cheap to clone; clones share one state block, so a
//! CLI loop and a background renderer can hold their own handles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use simipc_codec::token;
use simipc_types::{
    preview, ChannelState, LogEntry, LogLevel, Session, SessionSnapshot, SessionState,
    TransferStats,
};

use crate::bus::{SessionBus, Subscription};
use crate::config::ControllerConfig;
use crate::domain::entities::{Dispatch, SendRequest, Verification};
use crate::domain::errors::{DeliveryError, ReceiveRejection, SendRejection};
use crate::domain::transfer;
use crate::events::{EventFilter, SessionEvent};
use crate::ports::inbound::SessionControlApi;

/// Transfer counters, updated lock-free from completion tasks.
#[derive(Debug, Default)]
struct Counters {
    sent: AtomicU64,
    received: AtomicU64,
    integrity_errors: AtomicU64,
    tamper_attempts: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> TransferStats {
        TransferStats {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            integrity_errors: self.integrity_errors.load(Ordering::Relaxed),
            tamper_attempts: self.tamper_attempts.load(Ordering::Relaxed),
        }
    }
}

/// Shared state block behind every controller handle.
struct ControllerInner {
    config: ControllerConfig,
    session: RwLock<Session>,
    channel: RwLock<ChannelState>,
    logs: RwLock<Vec<LogEntry>>,
    counters: Counters,
    bus: SessionBus,
    /// Handles of in-flight completion tasks, drained by `quiesce`.
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ControllerInner {
    /// Append a narrative line, mirror it to tracing, and broadcast it.
    fn append_log(&self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry::new(level, message);
        match entry.level {
            LogLevel::Info | LogLevel::Success => info!("{}", entry.message),
            LogLevel::Warning => warn!("{}", entry.message),
            LogLevel::Error => error!("{}", entry.message),
            LogLevel::Debug => debug!("{}", entry.message),
        }
        self.logs.write().push(entry.clone());
        self.bus.publish(SessionEvent::LogAppended(entry));
    }

    /// Release the channel buffer after a receive completion.
    fn clear_channel(&self, delivered: bool) {
        *self.channel.write() = ChannelState::Idle;
        self.bus.publish(SessionEvent::SlotCleared { delivered });
    }

    fn track(&self, handle: JoinHandle<()>) {
        self.tasks.lock().push(handle);
    }
}

/// Session controller.
///
/// Implements [`SessionControlApi`]; all mutation funnels through the
/// dispatch methods and their spawned completions. Observers read
/// consistent copies via [`SessionController::snapshot`] or follow the
/// event stream via [`SessionController::subscribe`].
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<ControllerInner>,
}

impl SessionController {
    /// Create a controller with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    /// Create a controller with a custom configuration.
    #[must_use]
    pub fn with_config(config: ControllerConfig) -> Self {
        let bus = SessionBus::with_capacity(config.event_capacity);
        let session = Session::new(config.process_id.clone());
        Self {
            inner: Arc::new(ControllerInner {
                config,
                session: RwLock::new(session),
                channel: RwLock::new(ChannelState::Idle),
                logs: RwLock::new(Vec::new()),
                counters: Counters::default(),
                bus,
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The configuration this controller was built with.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Subscribe to the controller's event stream.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.inner.bus.subscribe(filter)
    }

    fn reject_send(&self, rejection: SendRejection) -> Dispatch {
        self.inner.append_log(rejection.level(), rejection.to_string());
        Dispatch::Rejected
    }

    fn reject_receive(&self, rejection: ReceiveRejection) -> Dispatch {
        self.inner.append_log(rejection.level(), rejection.to_string());
        Dispatch::Rejected
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionControlApi for SessionController {
    async fn authenticate(&self, process_id: &str) -> Dispatch {
        // The identifier binds on the first completed handshake and stays
        // fixed for the life of the session; a later handshake renews the
        // token for the bound process. Only a cold session shows the
        // in-progress state.
        let subject = {
            let mut session = self.inner.session.write();
            match session.state {
                SessionState::Authenticated => session.process_id.clone(),
                SessionState::Unauthenticated => {
                    session.state = SessionState::Authenticating;
                    process_id.to_owned()
                }
                SessionState::Authenticating => process_id.to_owned(),
            }
        };

        self.inner
            .append_log(LogLevel::Info, format!("Initiating handshake for {subject}..."));
        self.inner
            .append_log(LogLevel::Debug, "Protocol: TLS 1.3 handshake initiated.");
        self.inner.append_log(
            LogLevel::Debug,
            "Generating ephemeral keypair for session negotiation.",
        );

        let inner = Arc::clone(&self.inner);
        let delay = self.inner.config.latency.auth;
        let handle = tokio::spawn(async move {
            sleep(delay).await;

            let token = token::mint();
            let bound = {
                let mut session = inner.session.write();
                if session.state != SessionState::Authenticated {
                    session.process_id = subject;
                }
                session.state = SessionState::Authenticated;
                session.token = Some(token.clone());
                session.process_id.clone()
            };
            inner.append_log(
                LogLevel::Debug,
                "Token Exchange: AES-GCM session key established.",
            );
            inner.append_log(
                LogLevel::Success,
                format!("Process authenticated. Session Token: {}", preview(&token, 12)),
            );
            inner.bus.publish(SessionEvent::SessionAuthenticated {
                process_id: bound,
                token,
            });
        });
        self.inner.track(handle);

        Dispatch::Scheduled
    }

    async fn send(&self, request: SendRequest) -> Dispatch {
        if !self.inner.session.read().is_authenticated() {
            return self.reject_send(SendRejection::NotAuthenticated);
        }
        if request.payload.trim().is_empty() {
            return self.reject_send(SendRejection::EmptyPayload);
        }

        // Reserve the channel under the same lock as the occupancy check,
        // so two overlapping sends cannot both pass it.
        {
            let mut channel = self.inner.channel.write();
            if !channel.is_idle() {
                drop(channel);
                return self.reject_send(SendRejection::ChannelBusy);
            }
            *channel = ChannelState::Transmitting;
        }

        let prepared = transfer::prepare(&request);

        self.inner.append_log(
            LogLevel::Info,
            format!("OUTBOUND [{}]: Preparing payload...", request.method.label()),
        );
        self.inner.append_log(
            LogLevel::Debug,
            "Serialization: Converting payload to JSON stream.",
        );
        if request.encrypt {
            // The trailing ellipsis is part of the line, even when the
            // whole ciphertext fits on it.
            let shown: String = prepared.text.chars().take(20).collect();
            self.inner.append_log(
                LogLevel::Info,
                format!("ENCRYPTION: AES-256 applied. Ciphertext: {shown}..."),
            );
            self.inner.append_log(
                LogLevel::Debug,
                "Cipher: IV generation and block padding complete.",
            );
        } else {
            self.inner.append_log(
                LogLevel::Warning,
                "SECURITY WARNING: Transmitting payload in plain text. Interception risk detected.",
            );
        }
        if request.sign {
            self.inner.append_log(
                LogLevel::Debug,
                "Signing: Computing HMAC-SHA256 signature for integrity check.",
            );
        } else {
            self.inner.append_log(
                LogLevel::Warning,
                "SECURITY WARNING: HMAC Signing disabled. Integrity not guaranteed.",
            );
        }

        let inner = Arc::clone(&self.inner);
        let delay = self.inner.config.latency.transmit;
        // Counted in UTF-16 units, the size the payload editor reports.
        let payload_units = request.payload.encode_utf16().count();
        let handle = tokio::spawn(async move {
            sleep(delay).await;

            let slot = transfer::build_slot(prepared, &request);
            *inner.channel.write() = ChannelState::Occupied(slot.clone());
            inner.counters.sent.fetch_add(1, Ordering::Relaxed);
            inner.append_log(
                LogLevel::Success,
                format!(
                    "TRANSMITTED: {payload_units} bytes sent via {}.",
                    request.method.wire_name()
                ),
            );
            inner.bus.publish(SessionEvent::SlotStored(slot));
        });
        self.inner.track(handle);

        Dispatch::Scheduled
    }

    async fn tamper(&self) -> Dispatch {
        let tampered = {
            let mut channel = self.inner.channel.write();
            match &mut *channel {
                ChannelState::Occupied(slot) => {
                    transfer::corrupt(slot);
                    Some(slot.clone())
                }
                ChannelState::Idle | ChannelState::Transmitting => None,
            }
        };
        let Some(slot) = tampered else {
            // Nothing parked to corrupt; the refusal stays out of the log.
            return Dispatch::Rejected;
        };

        self.inner
            .counters
            .tamper_attempts
            .fetch_add(1, Ordering::Relaxed);
        self.inner.append_log(
            LogLevel::Warning,
            "NETWORK ALERT: Man-in-the-Middle modification detected!",
        );
        self.inner.bus.publish(SessionEvent::SlotTampered(slot));

        Dispatch::Completed
    }

    async fn receive(&self) -> Dispatch {
        if !self.inner.session.read().is_authenticated() {
            return self.reject_receive(ReceiveRejection::NotAuthenticated);
        }
        // The completion works on this captured copy; a tamper landing
        // during the receive window no longer affects the frames in flight.
        let captured = self.inner.channel.read().slot().cloned();
        let Some(slot) = captured else {
            return self.reject_receive(ReceiveRejection::BufferEmpty);
        };

        self.inner.append_log(
            LogLevel::Info,
            format!("POLLING [{}] channel...", slot.method.label()),
        );
        self.inner.append_log(
            LogLevel::Debug,
            format!(
                "Buffer Check: Reading pending frames from {} buffer.",
                slot.method.wire_name()
            ),
        );

        let inner = Arc::clone(&self.inner);
        let delay = self.inner.config.latency.receive;
        let handle = tokio::spawn(async move {
            sleep(delay).await;

            let verification = match transfer::verify_slot(&slot) {
                Ok(verification) => verification,
                Err(failure) => {
                    inner.append_log(LogLevel::Error, failure.to_string());
                    if let DeliveryError::IntegrityMismatch { expected, received } = failure {
                        inner.append_log(
                            LogLevel::Debug,
                            format!(
                                "Expected: {}, Received: {}",
                                preview(&expected, 10),
                                preview(&received, 10)
                            ),
                        );
                    }
                    inner.counters.integrity_errors.fetch_add(1, Ordering::Relaxed);
                    inner.clear_channel(false);
                    return;
                }
            };
            match verification {
                Verification::Passed => inner.append_log(
                    LogLevel::Success,
                    "VERIFICATION: HMAC signature matched. Message valid.",
                ),
                Verification::Skipped => inner.append_log(
                    LogLevel::Warning,
                    "SKIPPED: Integrity check bypassed (Unsigned Message).",
                ),
            }

            let plaintext = match transfer::decode_slot(&slot) {
                Ok(plaintext) => plaintext,
                Err(failure) => {
                    inner.append_log(LogLevel::Error, failure.to_string());
                    inner.clear_channel(false);
                    return;
                }
            };
            if slot.encrypted {
                inner.append_log(LogLevel::Debug, "Decryption: AES-256 decryption successful.");
            }

            inner.append_log(LogLevel::Success, "RECEIVED: Payload acquired from buffer.");
            inner.append_log(LogLevel::Info, format!("DECODED: \"{plaintext}\""));
            inner.counters.received.fetch_add(1, Ordering::Relaxed);
            inner.clear_channel(true);
        });
        self.inner.track(handle);

        Dispatch::Scheduled
    }

    fn clear_log(&self) {
        self.inner.logs.write().clear();
        self.inner.bus.publish(SessionEvent::LogCleared);
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.inner.session.read().clone(),
            channel: self.inner.channel.read().clone(),
            stats: self.inner.counters.snapshot(),
            logs: self.inner.logs.read().clone(),
        }
    }

    async fn quiesce(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut tasks = self.inner.tasks.lock();
                if tasks.is_empty() {
                    return;
                }
                tasks.drain(..).collect()
            };
            for handle in drained {
                if let Err(join_error) = handle.await {
                    warn!(?join_error, "Deferred completion aborted");
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
