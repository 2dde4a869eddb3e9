//! # Scripted Walkthroughs
//!
//! Canned command sequences that exercise the workflow end to end. Each
//! scenario authenticates first, then plays its steps with a quiesce
//! between dispatch and the next command, so the narration lands in a
//! deterministic order.

use std::str::FromStr;

use simipc_session::{SendRequest, SessionControlApi, SessionController};

use crate::render;

/// A named walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// All three legs in sequence.
    Tour,
    /// Encrypt, sign, verify, decode.
    Secure,
    /// A signed payload is corrupted in flight and discarded.
    Tamper,
    /// An unsigned payload carries its corruption to the reader.
    Unsigned,
}

impl Scenario {
    /// Scenario name as accepted on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Tour => "tour",
            Scenario::Secure => "secure",
            Scenario::Tamper => "tamper",
            Scenario::Unsigned => "unsigned",
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tour" => Ok(Scenario::Tour),
            "secure" => Ok(Scenario::Secure),
            "tamper" => Ok(Scenario::Tamper),
            "unsigned" => Ok(Scenario::Unsigned),
            other => Err(format!(
                "unknown scenario '{other}', expected one of: tour, secure, tamper, unsigned"
            )),
        }
    }
}

/// Streams new activity log lines to stdout as steps complete.
pub struct StepPrinter {
    enabled: bool,
    cursor: usize,
}

impl StepPrinter {
    /// A printer that writes formatted lines to stdout.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled, cursor: 0 }
    }

    /// A printer that swallows everything, for tests and `--json` runs.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(false)
    }

    fn banner(&self, text: &str) {
        if self.enabled {
            println!();
            println!("--- {text} ---");
        }
    }

    fn flush(&mut self, controller: &SessionController) {
        let logs = controller.snapshot().logs;
        if self.enabled {
            for entry in &logs[self.cursor..] {
                println!("{}", render::format_entry(entry));
            }
        }
        self.cursor = logs.len();
    }
}

/// Run a scenario and print its narration and final state.
pub async fn run(controller: &SessionController, scenario: Scenario, json: bool) {
    let mut printer = StepPrinter::new(!json);
    drive(controller, scenario, &mut printer).await;

    let snapshot = controller.snapshot();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        println!();
        println!("{}", render::format_status(&snapshot));
    }
}

/// Play a scenario's steps against the controller.
pub async fn drive(controller: &SessionController, scenario: Scenario, printer: &mut StepPrinter) {
    printer.banner("handshake");
    let process_id = controller.config().process_id.clone();
    controller.authenticate(&process_id).await;
    step(controller, printer).await;

    match scenario {
        Scenario::Secure => secure_leg(controller, printer).await,
        Scenario::Tamper => tamper_leg(controller, printer).await,
        Scenario::Unsigned => unsigned_leg(controller, printer).await,
        Scenario::Tour => {
            secure_leg(controller, printer).await;
            tamper_leg(controller, printer).await;
            unsigned_leg(controller, printer).await;
        }
    }
}

async fn step(controller: &SessionController, printer: &mut StepPrinter) {
    controller.quiesce().await;
    printer.flush(controller);
}

async fn secure_leg(controller: &SessionController, printer: &mut StepPrinter) {
    printer.banner("secure delivery: encrypt, sign, verify, decode");
    controller
        .send(SendRequest::new("Hello from Process A!").encrypted())
        .await;
    step(controller, printer).await;
    controller.receive().await;
    step(controller, printer).await;
}

async fn tamper_leg(controller: &SessionController, printer: &mut StepPrinter) {
    printer.banner("tamper detection: corrupted payload is discarded");
    controller
        .send(SendRequest::new("Transfer 500 credits to process_beta_2."))
        .await;
    step(controller, printer).await;
    controller.tamper().await;
    printer.flush(controller);
    controller.receive().await;
    step(controller, printer).await;
}

async fn unsigned_leg(controller: &SessionController, printer: &mut StepPrinter) {
    printer.banner("unsigned passthrough: corruption reaches the reader");
    controller
        .send(SendRequest::new("telemetry ping 42").unsigned())
        .await;
    step(controller, printer).await;
    controller.tamper().await;
    printer.flush(controller);
    controller.receive().await;
    step(controller, printer).await;
}
