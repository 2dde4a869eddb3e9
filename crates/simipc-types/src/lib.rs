//! # Shared Types Crate
//!
//! This crate contains all domain entities shared across the IPC workflow
//! simulator: the session and channel state machines, the activity log
//! model, and the transfer telemetry counters.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Closed State Machines**: Session and channel lifecycles are enums,
//!   so illegal states are unrepresentable rather than checked at runtime.
//! - **Plain Data**: Entities carry no behavior beyond constructors and
//!   read accessors; all transitions live in the session controller.

pub mod display;
pub mod entities;
pub mod monitor;

pub use display::preview;
pub use entities::*;
pub use monitor::{channel_overview, status_of, ChannelStatus};
