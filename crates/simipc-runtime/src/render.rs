//! # Terminal Rendering
//!
//! Plain-text formatting for activity log lines and the status board.
//! Everything here is a pure `&state -> String` function so the shell and
//! the scripted runner share one look.

use simipc_types::{
    channel_overview, preview, ChannelState, LogEntry, SessionSnapshot, SessionState,
};

/// One activity log line: `[HH:MM:SS.mmm] [LEVEL  ] message`.
#[must_use]
pub fn format_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] [{:<7}] {}",
        entry.timestamp,
        entry.level.label(),
        entry.message
    )
}

/// The full status board: session, per-transport channels, buffer, stats.
#[must_use]
pub fn format_status(snapshot: &SessionSnapshot) -> String {
    let mut lines = vec!["SESSION".to_string()];
    lines.push(format!("  process:   {}", snapshot.session.process_id));
    lines.push(format!(
        "  state:     {}",
        session_state_label(snapshot.session.state)
    ));
    lines.push(format!(
        "  token:     {}",
        snapshot
            .session
            .token
            .as_deref()
            .map_or_else(|| "none".to_string(), |token| preview(token, 12))
    ));

    lines.push("CHANNELS".to_string());
    for (method, status) in channel_overview(&snapshot.channel) {
        lines.push(format!("  {:<14} {}", method.label(), status.label()));
    }

    lines.push("BUFFER".to_string());
    match &snapshot.channel {
        ChannelState::Idle => lines.push("  empty".to_string()),
        ChannelState::Transmitting => lines.push("  transmit in progress".to_string()),
        ChannelState::Occupied(slot) => {
            lines.push(format!(
                "  payload:   {}  ({} bytes)",
                preview(&slot.payload, 24),
                slot.payload_size()
            ));
            lines.push(format!("  method:    {}", slot.method.label()));
            lines.push(format!("  attrs:     {}", slot_attrs(slot)));
            lines.push(format!("  checksum:  {}", slot.checksum_label()));
        }
    }

    lines.push("STATS".to_string());
    lines.push(format!(
        "  sent: {}   received: {}   integrity errors: {}   tamper attempts: {}",
        snapshot.stats.sent,
        snapshot.stats.received,
        snapshot.stats.integrity_errors,
        snapshot.stats.tamper_attempts
    ));

    lines.join("\n")
}

fn session_state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Unauthenticated => "NOT AUTHENTICATED",
        SessionState::Authenticating => "AUTHENTICATING...",
        SessionState::Authenticated => "AUTHENTICATED",
    }
}

fn slot_attrs(slot: &simipc_types::ChannelSlot) -> String {
    let mut attrs = Vec::new();
    attrs.push(if slot.encrypted { "encrypted" } else { "plaintext" });
    attrs.push(if slot.signed { "signed" } else { "unsigned" });
    if slot.tampered {
        attrs.push("TAMPERED");
    }
    attrs.join(", ")
}
