//! # Runtime Configuration
//!
//! Latency and identity settings for the simulator front end, with
//! environment overrides:
//!
//! - `SIMIPC_PROCESS_ID` - default process identifier
//! - `SIMIPC_AUTH_MS` - handshake delay in milliseconds
//! - `SIMIPC_TRANSMIT_MS` - transmit delay in milliseconds
//! - `SIMIPC_RECEIVE_MS` - receive delay in milliseconds

use std::time::Duration;

use simipc_session::{ControllerConfig, LatencyProfile};
use tracing::warn;

/// Runtime settings assembled from defaults and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Process identifier offered to the handshake by default.
    pub process_id: String,
    /// Handshake delay in milliseconds.
    pub auth_ms: u64,
    /// Transmit delay in milliseconds.
    pub transmit_ms: u64,
    /// Receive delay in milliseconds.
    pub receive_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            process_id: "process_alpha_1".to_string(),
            auth_ms: 600,
            transmit_ms: 500,
            receive_ms: 800,
        }
    }
}

impl SimConfig {
    /// Load configuration from defaults and environment overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(process_id) = std::env::var("SIMIPC_PROCESS_ID") {
            if process_id.trim().is_empty() {
                warn!("SIMIPC_PROCESS_ID is empty, keeping default");
            } else {
                config.process_id = process_id;
            }
        }
        if let Some(ms) = env_millis("SIMIPC_AUTH_MS") {
            config.auth_ms = ms;
        }
        if let Some(ms) = env_millis("SIMIPC_TRANSMIT_MS") {
            config.transmit_ms = ms;
        }
        if let Some(ms) = env_millis("SIMIPC_RECEIVE_MS") {
            config.receive_ms = ms;
        }

        config
    }

    /// Zero every delay, for CI runs and scripted demos.
    #[must_use]
    pub fn instant(mut self) -> Self {
        self.auth_ms = 0;
        self.transmit_ms = 0;
        self.receive_ms = 0;
        self
    }

    /// Convert into the controller's configuration form.
    #[must_use]
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            process_id: self.process_id.clone(),
            latency: LatencyProfile {
                auth: Duration::from_millis(self.auth_ms),
                transmit: Duration::from_millis(self.transmit_ms),
                receive: Duration::from_millis(self.receive_ms),
            },
            ..ControllerConfig::default()
        }
    }
}

fn env_millis(name: &str) -> Option<u64> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("{name} must be an integer millisecond count, ignoring {value:?}");
            None
        }
    }
}
