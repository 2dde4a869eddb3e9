//! # Inbound Ports (Driving Ports / API)
//!
//! The trait collaborators program against to drive the simulation.

use async_trait::async_trait;
use simipc_types::SessionSnapshot;

use crate::domain::entities::{Dispatch, SendRequest};

/// Primary session control API.
///
/// This is the main entry point for driving the simulated workflow.
/// Implementations must be thread-safe (`Send + Sync`).
///
/// ## Contract
///
/// - No method returns `Err`; refusals surface as [`Dispatch::Rejected`]
///   and narrate themselves through the activity log.
/// - Methods returning [`Dispatch::Scheduled`] complete later on a
///   spawned task; callers needing determinism await `quiesce`.
#[async_trait]
pub trait SessionControlApi: Send + Sync {
    /// Run the authentication handshake for `process_id`.
    ///
    /// No precondition: a repeat call re-runs the handshake and replaces
    /// the token on completion. The identifier binds on the first
    /// completed handshake and stays fixed afterwards; the session is
    /// never downgraded while the new handshake runs.
    async fn authenticate(&self, process_id: &str) -> Dispatch;

    /// Prepare and transmit a payload into the channel buffer.
    ///
    /// Refused when unauthenticated, when the payload is empty or
    /// whitespace, or when the single buffer slot is reserved or occupied.
    async fn send(&self, request: SendRequest) -> Dispatch;

    /// Corrupt the parked payload in place.
    ///
    /// Requires an occupied buffer; refused silently otherwise (the
    /// refusal is not a workflow step worth narrating). Repeat calls
    /// compound the corruption.
    async fn tamper(&self) -> Dispatch;

    /// Poll the channel, verify, decode, and clear.
    ///
    /// Refused when unauthenticated; an empty buffer is narrated at debug
    /// level and refused without side effects.
    async fn receive(&self) -> Dispatch;

    /// Empty the activity log wholesale.
    fn clear_log(&self);

    /// Read-only view of the entire simulator state.
    fn snapshot(&self) -> SessionSnapshot;

    /// Await every in-flight delayed completion dispatched so far.
    async fn quiesce(&self);
}
