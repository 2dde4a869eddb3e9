//! # Transfer Flow Tests
//!
//! Drives the controller through the same surface the runtime uses: the
//! inbound API for commands, snapshots and the event stream for
//! observation. Covers the authenticated happy paths, every synchronous
//! precondition refusal, and the snapshot export.

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::timeout;

    use simipc_codec::{checksum, encoding, token};
    use simipc_session::{
        ControllerConfig, Dispatch, EventFilter, EventTopic, LatencyProfile, SendRequest,
        SessionControlApi, SessionController, SessionEvent,
    };
    use simipc_types::{IpcMethod, LogLevel, SessionSnapshot, SessionState};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Controller with zero latency; completions still land on spawned
    /// tasks, so every step is followed by `quiesce`.
    fn instant_controller() -> SessionController {
        SessionController::with_config(ControllerConfig {
            latency: LatencyProfile::instant(),
            ..ControllerConfig::default()
        })
    }

    async fn authenticated() -> SessionController {
        let controller = instant_controller();
        controller.authenticate("process_alpha_1").await;
        controller.quiesce().await;
        controller
    }

    fn log_messages(controller: &SessionController) -> Vec<String> {
        controller
            .snapshot()
            .logs
            .into_iter()
            .map(|entry| entry.message)
            .collect()
    }

    fn has_line(controller: &SessionController, needle: &str) -> bool {
        log_messages(controller).iter().any(|m| m.contains(needle))
    }

    // =========================================================================
    // FULL TRANSFER CYCLE
    // =========================================================================

    /// Encrypted and signed payload survives the full cycle, and the slot
    /// contents agree with the codec crate at every step.
    #[tokio::test]
    async fn test_secure_transfer_end_to_end() {
        let controller = authenticated().await;

        let accepted = controller
            .send(SendRequest::new("Hello from Process A!").encrypted())
            .await;
        assert_eq!(accepted, Dispatch::Scheduled);
        controller.quiesce().await;

        let slot = controller
            .snapshot()
            .channel
            .slot()
            .cloned()
            .expect("payload should be parked");
        assert!(slot.encrypted);
        assert!(slot.signed);
        assert_eq!(slot.payload, encoding::encode("Hello from Process A!"));
        assert_eq!(
            slot.checksum.as_deref(),
            Some(checksum::compute(&slot.payload).as_str()),
            "checksum must cover the stored ciphertext"
        );

        controller.receive().await;
        controller.quiesce().await;

        let done = controller.snapshot();
        assert!(done.channel.is_idle());
        assert_eq!(done.stats.sent, 1);
        assert_eq!(done.stats.received, 1);
        assert_eq!(done.stats.integrity_errors, 0);
        assert!(has_line(&controller, "VERIFICATION: HMAC signature matched"));
        assert!(has_line(&controller, "DECODED: \"Hello from Process A!\""));
    }

    /// The default posture is signed plaintext: the buffer holds the raw
    /// text and the send path warns about interception.
    #[tokio::test]
    async fn test_default_posture_is_signed_plaintext() {
        let controller = authenticated().await;

        controller.send(SendRequest::new("status report")).await;
        controller.quiesce().await;

        let slot = controller
            .snapshot()
            .channel
            .slot()
            .cloned()
            .expect("payload should be parked");
        assert!(!slot.encrypted);
        assert!(slot.signed);
        assert_eq!(slot.payload, "status report");
        assert!(has_line(
            &controller,
            "SECURITY WARNING: Transmitting payload in plain text"
        ));

        controller.receive().await;
        controller.quiesce().await;
        assert!(has_line(&controller, "DECODED: \"status report\""));
    }

    /// Transmission size is counted in UTF-16 units, not UTF-8 bytes.
    #[tokio::test]
    async fn test_transmitted_count_uses_utf16_units() {
        let controller = authenticated().await;

        // "ping 🚀" is 9 UTF-8 bytes but 7 UTF-16 units.
        controller.send(SendRequest::new("ping 🚀")).await;
        controller.quiesce().await;

        assert!(has_line(&controller, "TRANSMITTED: 7 bytes sent via queue."));
    }

    // =========================================================================
    // TRANSPORT ATTRIBUTION
    // =========================================================================

    /// Both legs narrate the transport the payload was attributed to.
    #[tokio::test]
    async fn test_shared_memory_attribution() {
        let controller = authenticated().await;

        controller
            .send(SendRequest::new("segment write").with_method(IpcMethod::SharedMemory))
            .await;
        controller.quiesce().await;
        assert!(has_line(&controller, "OUTBOUND [SHARED_MEMORY]: Preparing payload..."));
        assert!(has_line(
            &controller,
            "TRANSMITTED: 13 bytes sent via shared_memory."
        ));

        controller.receive().await;
        controller.quiesce().await;
        assert!(has_line(&controller, "POLLING [SHARED_MEMORY] channel..."));
        assert!(has_line(
            &controller,
            "Buffer Check: Reading pending frames from shared_memory buffer."
        ));
    }

    // =========================================================================
    // PRECONDITION REFUSALS
    // =========================================================================

    #[tokio::test]
    async fn test_send_requires_authentication() {
        let controller = instant_controller();

        let outcome = controller.send(SendRequest::new("too early")).await;

        assert_eq!(outcome, Dispatch::Rejected);
        assert!(has_line(&controller, "ACCESS DENIED: Missing valid session token."));
        assert_eq!(controller.snapshot().stats.sent, 0);
    }

    #[tokio::test]
    async fn test_receive_requires_authentication() {
        let controller = instant_controller();

        let outcome = controller.receive().await;

        assert_eq!(outcome, Dispatch::Rejected);
        assert!(has_line(
            &controller,
            "ACCESS DENIED: Authentication required to poll channels."
        ));
    }

    /// Whitespace-only payloads are refused before any channel work.
    #[tokio::test]
    async fn test_blank_payload_rejected() {
        let controller = authenticated().await;

        let outcome = controller.send(SendRequest::new("   \t  ")).await;

        assert_eq!(outcome, Dispatch::Rejected);
        assert!(has_line(&controller, "VALIDATION ERROR: Empty payload rejected."));
        assert!(controller.snapshot().channel.is_idle());
    }

    /// A parked payload blocks further sends until the receiver clears it.
    #[tokio::test]
    async fn test_channel_busy_until_receiver_clears() {
        let controller = authenticated().await;
        controller.send(SendRequest::new("first")).await;
        controller.quiesce().await;

        let refused = controller.send(SendRequest::new("second")).await;
        assert_eq!(refused, Dispatch::Rejected);
        assert!(has_line(&controller, "CHANNEL BUSY: Wait for receiver to clear buffer."));

        let slot = controller
            .snapshot()
            .channel
            .slot()
            .cloned()
            .expect("first payload should survive the refusal");
        assert_eq!(slot.payload, "first");

        controller.receive().await;
        controller.quiesce().await;

        let resent = controller.send(SendRequest::new("second")).await;
        assert_eq!(resent, Dispatch::Scheduled);
        controller.quiesce().await;
        assert_eq!(controller.snapshot().stats.sent, 2);
    }

    #[tokio::test]
    async fn test_empty_buffer_poll_is_refused() {
        let controller = authenticated().await;

        let outcome = controller.receive().await;

        assert_eq!(outcome, Dispatch::Rejected);
        assert!(has_line(&controller, "Buffer Empty: No messages pending in queue."));
        assert_eq!(controller.snapshot().stats.received, 0);

        let last = controller
            .snapshot()
            .logs
            .last()
            .cloned()
            .expect("refusal should be logged");
        assert_eq!(last.level, LogLevel::Debug, "an empty buffer is not an error");
    }

    // =========================================================================
    // SESSION LIFECYCLE
    // =========================================================================

    /// Re-running the handshake reissues the token without downgrading the
    /// session; the identifier stays bound to the first handshake even
    /// when the renewal asks for another one.
    #[tokio::test]
    async fn test_reauthentication_keeps_bound_identity() {
        let controller = authenticated().await;
        let first = controller.snapshot().session;
        assert_eq!(first.state, SessionState::Authenticated);
        let first_token = first.token.expect("token issued");

        controller.authenticate("process_beta_2").await;
        controller.quiesce().await;

        let second = controller.snapshot().session;
        assert_eq!(second.state, SessionState::Authenticated);
        assert_eq!(second.process_id, "process_alpha_1");
        let second_token = second.token.expect("token reissued");
        assert_ne!(first_token, second_token);
        assert!(
            !has_line(&controller, "process_beta_2"),
            "renewal narrates under the bound identifier"
        );
    }

    /// Issued tokens match the codec crate's advertised shape.
    #[tokio::test]
    async fn test_token_matches_codec_shape() {
        let controller = authenticated().await;

        let issued = controller.snapshot().session.token.expect("token issued");

        assert!(issued.starts_with(token::TOKEN_PREFIX));
        assert_eq!(issued.len(), token::TOKEN_PREFIX.len() + token::TOKEN_LENGTH);
    }

    // =========================================================================
    // LOG AND SNAPSHOT
    // =========================================================================

    /// Clearing the log never touches the transfer counters.
    #[tokio::test]
    async fn test_clear_log_keeps_counters() {
        let controller = authenticated().await;
        controller.send(SendRequest::new("audit me")).await;
        controller.quiesce().await;
        controller.receive().await;
        controller.quiesce().await;

        controller.clear_log();

        let snapshot = controller.snapshot();
        assert!(snapshot.logs.is_empty());
        assert_eq!(snapshot.stats.sent, 1);
        assert_eq!(snapshot.stats.received, 1);
    }

    /// The full snapshot survives a JSON round trip unchanged.
    #[tokio::test]
    async fn test_snapshot_round_trips_through_json() {
        let controller = authenticated().await;
        controller.send(SendRequest::new("persist me").encrypted()).await;
        controller.quiesce().await;

        let snapshot = controller.snapshot();
        let json = serde_json::to_string(&snapshot).expect("snapshot serializes");
        let restored: SessionSnapshot = serde_json::from_str(&json).expect("snapshot deserializes");

        assert_eq!(restored, snapshot);
    }

    // =========================================================================
    // EVENT CHOREOGRAPHY
    // =========================================================================

    /// A channel subscriber sees the store and the delivered clear, in order.
    #[tokio::test]
    async fn test_channel_events_follow_transfer() {
        let controller = authenticated().await;
        let mut channel_sub = controller.subscribe(EventFilter::topics(vec![EventTopic::Channel]));

        controller.send(SendRequest::new("tracked")).await;
        controller.quiesce().await;

        let stored = timeout(Duration::from_millis(100), channel_sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        match stored {
            SessionEvent::SlotStored(slot) => assert_eq!(slot.payload, "tracked"),
            other => panic!("Expected SlotStored, got {:?}", other),
        }

        controller.receive().await;
        controller.quiesce().await;

        let cleared = timeout(Duration::from_millis(100), channel_sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        assert!(matches!(cleared, SessionEvent::SlotCleared { delivered: true }));
    }

    /// A session subscriber gets the full token and none of the narration.
    #[tokio::test]
    async fn test_session_topic_isolated_from_narration() {
        let controller = instant_controller();
        let mut session_sub = controller.subscribe(EventFilter::topics(vec![EventTopic::Session]));

        controller.authenticate("process_alpha_1").await;
        controller.quiesce().await;

        let event = timeout(Duration::from_millis(100), session_sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        match event {
            SessionEvent::SessionAuthenticated { process_id, token } => {
                assert_eq!(process_id, "process_alpha_1");
                assert!(token.starts_with(token::TOKEN_PREFIX));
            }
            other => panic!("Expected SessionAuthenticated, got {:?}", other),
        }

        // The narration lines published alongside never match this filter.
        assert!(matches!(session_sub.try_recv(), Ok(None)));
    }
}
