//! # simipc
//!
//! Command line front end for the secure IPC workflow simulator.
//!
//! ```text
//! simipc run                      # scripted tour with realistic latencies
//! simipc run tamper --instant     # one scenario, no delays
//! simipc run secure --json        # machine readable final state
//! simipc shell                    # interactive command loop
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use simipc_runtime::config::SimConfig;
use simipc_runtime::scenario::{self, Scenario};
use simipc_runtime::shell;
use simipc_session::SessionController;

/// Educational simulator of a secure inter-process communication workflow.
#[derive(Parser, Debug)]
#[command(name = "simipc")]
#[command(about = "Secure IPC workflow simulator", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show the structured tracing mirror of the activity log
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a scripted walkthrough and print the resulting state
    Run(RunArgs),
    /// Drive the session interactively, one command per line
    Shell(ShellArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Scenario to play: tour, secure, tamper, or unsigned
    #[arg(default_value = "tour")]
    scenario: Scenario,

    /// Collapse all simulated latencies to zero
    #[arg(long)]
    instant: bool,

    /// Emit the final session snapshot as JSON instead of the status board
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ShellArgs {
    /// Collapse all simulated latencies to zero
    #[arg(long)]
    instant: bool,
}

fn init_tracing(verbose: bool) -> Result<()> {
    // Narration already reaches stdout through the printers; keep the
    // tracing mirror quiet unless explicitly requested.
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_controller(instant: bool) -> SessionController {
    let mut config = SimConfig::from_env();
    if instant {
        config = config.instant();
    }
    SessionController::with_config(config.controller_config())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Command::Run(args) => {
            let controller = build_controller(args.instant);
            scenario::run(&controller, args.scenario, args.json).await;
        }
        Command::Shell(args) => {
            let controller = build_controller(args.instant);
            shell::run(controller).await?;
        }
    }

    Ok(())
}
