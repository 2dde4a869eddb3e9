//! # Tamper Drills
//!
//! In-flight corruption against every security posture. The interesting
//! cases are the unsigned ones: skipping the checksum turns corruption
//! into either a silent delivery of garbage or an opaque decode failure,
//! depending on whether the payload was encrypted.

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::timeout;

    use simipc_codec::checksum;
    use simipc_session::{
        ControllerConfig, Dispatch, EventFilter, EventTopic, LatencyProfile, SendRequest,
        SessionControlApi, SessionController, SessionEvent,
    };

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

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
    // SIGNED PAYLOADS: DETECTION
    // =========================================================================

    /// The baseline drill: a signed payload is corrupted in flight, the
    /// checksum no longer matches, and the packet is discarded.
    #[tokio::test]
    async fn test_signed_tamper_is_detected_and_discarded() {
        let controller = authenticated().await;
        controller
            .send(SendRequest::new("Transfer 500 credits to process_beta_2."))
            .await;
        controller.quiesce().await;

        let outcome = controller.tamper().await;
        assert_eq!(outcome, Dispatch::Completed);
        assert!(has_line(
            &controller,
            "NETWORK ALERT: Man-in-the-Middle modification detected!"
        ));

        controller.receive().await;
        controller.quiesce().await;

        let snapshot = controller.snapshot();
        assert!(snapshot.channel.is_idle());
        assert_eq!(snapshot.stats.integrity_errors, 1);
        assert_eq!(snapshot.stats.received, 0);
        assert!(has_line(
            &controller,
            "CRITICAL: Integrity Check Failed! HMAC mismatch. Discarding packet."
        ));
        assert!(
            !log_messages(&controller).iter().any(|m| m.starts_with("DECODED")),
            "a discarded payload must never be decoded"
        );
    }

    /// Corruption appends to the payload but leaves the send-time checksum
    /// in place, which is exactly what the verifier catches.
    #[tokio::test]
    async fn test_tamper_preserves_send_time_checksum() {
        let controller = authenticated().await;
        controller.send(SendRequest::new("x")).await;
        controller.quiesce().await;
        let before = controller
            .snapshot()
            .channel
            .slot()
            .cloned()
            .expect("payload should be parked");

        controller.tamper().await;

        let after = controller
            .snapshot()
            .channel
            .slot()
            .cloned()
            .expect("payload should still be parked");
        assert_eq!(after.payload, "x_CORRUPTED");
        assert!(after.tampered);
        assert_eq!(after.checksum, before.checksum);
        assert_eq!(after.checksum.as_deref(), Some(checksum::compute("x").as_str()));
    }

    /// After a discard the channel is free again and the next transfer
    /// goes through untouched.
    #[tokio::test]
    async fn test_channel_recovers_after_discard() {
        let controller = authenticated().await;
        controller.send(SendRequest::new("doomed")).await;
        controller.quiesce().await;
        controller.tamper().await;
        controller.receive().await;
        controller.quiesce().await;

        controller.send(SendRequest::new("fresh start")).await;
        controller.quiesce().await;
        controller.receive().await;
        controller.quiesce().await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.stats.sent, 2);
        assert_eq!(snapshot.stats.received, 1);
        assert_eq!(snapshot.stats.integrity_errors, 1);
        assert!(has_line(&controller, "DECODED: \"fresh start\""));
    }

    // =========================================================================
    // UNSIGNED PAYLOADS: THE BLIND SPOTS
    // =========================================================================

    /// Unsigned plaintext: verification is skipped and the corrupted text
    /// is delivered as if it were genuine.
    #[tokio::test]
    async fn test_unsigned_plaintext_corruption_is_delivered() {
        let controller = authenticated().await;
        controller
            .send(SendRequest::new("telemetry ping 42").unsigned())
            .await;
        controller.quiesce().await;
        controller.tamper().await;
        controller.receive().await;
        controller.quiesce().await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.stats.received, 1);
        assert_eq!(snapshot.stats.integrity_errors, 0);
        assert!(has_line(
            &controller,
            "SKIPPED: Integrity check bypassed (Unsigned Message)."
        ));
        assert!(has_line(&controller, "DECODED: \"telemetry ping 42_CORRUPTED\""));
    }

    /// Unsigned ciphertext: verification is skipped, then the decode step
    /// chokes on the corrupted ciphertext. The narration keeps that order.
    #[tokio::test]
    async fn test_unsigned_encrypted_corruption_fails_decode() {
        let controller = authenticated().await;
        controller
            .send(SendRequest::new("secret state").unsigned().encrypted())
            .await;
        controller.quiesce().await;
        controller.tamper().await;
        controller.receive().await;
        controller.quiesce().await;

        let snapshot = controller.snapshot();
        assert!(snapshot.channel.is_idle());
        assert_eq!(snapshot.stats.received, 0);
        // A decode failure is not an integrity failure; no checksum existed.
        assert_eq!(snapshot.stats.integrity_errors, 0);

        let messages = log_messages(&controller);
        let skipped = messages
            .iter()
            .position(|m| m.contains("SKIPPED: Integrity check bypassed"))
            .expect("verification narration present");
        let failed = messages
            .iter()
            .position(|m| m.contains("Decryption failed: Ciphertext corrupted or invalid."))
            .expect("decode failure narrated");
        assert!(skipped < failed, "verification outcome precedes the decode failure");
    }

    // =========================================================================
    // TAMPER TIMING
    // =========================================================================

    /// Nothing parked means nothing to corrupt: the attack misses without
    /// leaving a trace in the log or the counters.
    #[tokio::test]
    async fn test_tamper_with_no_parked_payload_is_silent() {
        let controller = authenticated().await;

        let outcome = controller.tamper().await;

        assert_eq!(outcome, Dispatch::Rejected);
        assert!(!has_line(&controller, "NETWORK ALERT"));
        assert_eq!(controller.snapshot().stats.tamper_attempts, 0);
    }

    /// During the transmit window the channel is reserved but empty, so a
    /// tamper attempt misses and the payload lands clean.
    #[tokio::test]
    async fn test_tamper_during_transmit_window_misses() {
        let controller = SessionController::with_config(ControllerConfig {
            latency: LatencyProfile {
                auth: Duration::ZERO,
                transmit: Duration::from_millis(50),
                receive: Duration::ZERO,
            },
            ..ControllerConfig::default()
        });
        controller.authenticate("process_alpha_1").await;
        controller.quiesce().await;

        controller.send(SendRequest::new("in flight")).await;
        let outcome = controller.tamper().await;
        assert_eq!(outcome, Dispatch::Rejected);

        controller.quiesce().await;
        let slot = controller
            .snapshot()
            .channel
            .slot()
            .cloned()
            .expect("payload should land after the window");
        assert!(!slot.tampered);
        assert_eq!(slot.payload, "in flight");
    }

    /// Each tamper compounds the previous one.
    #[tokio::test]
    async fn test_repeated_tampering_compounds() {
        let controller = authenticated().await;
        controller.send(SendRequest::new("ledger").unsigned()).await;
        controller.quiesce().await;

        controller.tamper().await;
        controller.tamper().await;

        let slot = controller
            .snapshot()
            .channel
            .slot()
            .cloned()
            .expect("payload should be parked");
        assert!(slot.tampered);
        assert_eq!(slot.payload, "ledger_CORRUPTED_CORRUPTED");
        assert_eq!(controller.snapshot().stats.tamper_attempts, 2);
    }

    // =========================================================================
    // EVENT CHOREOGRAPHY
    // =========================================================================

    /// A channel subscriber watching an attacked transfer sees the tamper
    /// and then a clear that reports the payload as not delivered.
    #[tokio::test]
    async fn test_tamper_events_report_discard() {
        let controller = authenticated().await;
        controller.send(SendRequest::new("watched")).await;
        controller.quiesce().await;

        // Subscribe after the store so the tamper is the first event.
        let mut channel_sub = controller.subscribe(EventFilter::topics(vec![EventTopic::Channel]));
        controller.tamper().await;
        controller.receive().await;
        controller.quiesce().await;

        let tampered = timeout(Duration::from_millis(100), channel_sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        match tampered {
            SessionEvent::SlotTampered(slot) => {
                assert!(slot.tampered);
                assert!(slot.payload.ends_with("_CORRUPTED"));
            }
            other => panic!("Expected SlotTampered, got {:?}", other),
        }

        let cleared = timeout(Duration::from_millis(100), channel_sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        assert!(matches!(cleared, SessionEvent::SlotCleared { delivered: false }));
    }
}
