//! # Session Controller - The Simulator Core
//!
//! Owns all mutable simulator state and every simulated workflow. External
//! collaborators (the CLI, tests) drive it through the inbound API and
//! observe it through snapshots and the broadcast event stream; direct
//! state mutation from outside is impossible.
//!
//! ## Workflow Shape
//!
//! ```text
//! ┌──────────────┐  authenticate/send/      ┌─────────────────────┐
//! │ Collaborator │  tamper/receive          │  SessionController  │
//! │ (CLI, tests) │ ───────────────────────▶ │  session │ channel  │
//! │              │                          │  log     │ counters │
//! └──────────────┘                          └─────────────────────┘
//!        ▲                                     │          │
//!        │           SessionEvent              │          ▼ spawn
//!        └──────────────────────────────────── ▼   deferred completions
//!                                        ┌───────────┐  (simulated latency)
//!                                        │SessionBus │
//!                                        └───────────┘
//! ```
//!
//! ## Layers
//!
//! - **Domain** (`domain/`): pure payload preparation and delivery logic,
//!   no I/O and no locks
//! - **Ports** (`ports/`): the inbound trait collaborators program against
//! - **Service** (`service.rs`): the controller wiring state, spawned
//!   completions, narration, and events together
//!
//! ## Dispatch Contract
//!
//! Operations never return `Err`. Preconditions are checked synchronously
//! and refused as [`Dispatch::Rejected`]; accepted work lands later on a
//! spawned task. Failures speak through the activity log and the counters.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-export main types
pub use bus::{SessionBus, Subscription, SubscriptionError};
pub use config::{ControllerConfig, LatencyProfile};
pub use domain::entities::{Dispatch, SendRequest, Verification};
pub use domain::errors::{DeliveryError, ReceiveRejection, SendRejection};
pub use events::{EventFilter, EventTopic, SessionEvent};
pub use ports::inbound::SessionControlApi;
pub use service::SessionController;

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
