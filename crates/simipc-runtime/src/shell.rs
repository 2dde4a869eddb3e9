//! # Interactive Shell
//!
//! A line-based front end over the session controller. Commands dispatch
//! and return immediately; a background follower subscribed to the event
//! stream prints narration as the delayed completions land, so the shell
//! keeps the workflow's fire-and-forget feel.

use std::io::Write;
use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use simipc_session::{
    Dispatch, EventFilter, EventTopic, SendRequest, SessionControlApi, SessionController,
    SessionEvent,
};
use simipc_types::{IpcMethod, ParseMethodError};

use crate::render;

const HELP_TEXT: &str = "\
commands:
  auth [process_id]        run the authentication handshake
  send [flags] <message>   transmit a payload
                           flags: --encrypt, --no-sign, --method queue|pipe|shm
  tamper                   corrupt the parked payload in flight
  recv                     poll the channel and process the payload
  status                   show session, channels, buffer, and stats
  log                      replay the full activity log
  clear                    clear the activity log
  wait                     block until pending completions land
  help                     this text
  quit                     leave the shell";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Run the handshake, optionally under a custom process id.
    Auth {
        /// Identifier to hand to the handshake; default when absent.
        process_id: Option<String>,
    },
    /// Transmit a payload.
    Send {
        /// Message text, whitespace-normalized from the remaining tokens.
        message: String,
        /// Transport to attribute the transfer to.
        method: IpcMethod,
        /// Encode the payload before it enters the buffer.
        encrypt: bool,
        /// Attach an integrity checksum.
        sign: bool,
    },
    /// Corrupt the parked payload.
    Tamper,
    /// Poll the channel.
    Recv,
    /// Print the status board.
    Status,
    /// Replay the whole activity log.
    Log,
    /// Clear the activity log.
    Clear,
    /// Await pending completions.
    Wait,
    /// Print the command reference.
    Help,
    /// Leave the shell.
    Quit,
}

/// Rejected shell input, with user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellParseError {
    /// Not a recognized command word.
    #[error("unknown command '{0}', try 'help'")]
    UnknownCommand(String),

    /// A flag the send command does not know.
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),

    /// `send` with no message text.
    #[error("send needs a message, e.g. send --encrypt hello world")]
    MissingMessage,

    /// `--method` with no value.
    #[error("--method needs a value: queue, pipe, or shm")]
    MissingMethod,

    /// `--method` with an unrecognized value.
    #[error("unknown method '{0}', expected queue, pipe, or shm")]
    BadMethod(String),

    /// Trailing tokens after a command that takes none.
    #[error("'{0}' takes no further arguments")]
    TooManyArgs(&'static str),
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, ShellParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&command) = tokens.first() else {
        return Ok(None);
    };

    let parsed = match command {
        "auth" => {
            if tokens.len() > 2 {
                return Err(ShellParseError::TooManyArgs("auth"));
            }
            ShellCommand::Auth {
                process_id: tokens.get(1).map(|&pid| pid.to_owned()),
            }
        }
        "send" => parse_send(&tokens[1..])?,
        "tamper" => bare(ShellCommand::Tamper, "tamper", &tokens)?,
        "recv" | "receive" => bare(ShellCommand::Recv, "recv", &tokens)?,
        "status" => bare(ShellCommand::Status, "status", &tokens)?,
        "log" => bare(ShellCommand::Log, "log", &tokens)?,
        "clear" => bare(ShellCommand::Clear, "clear", &tokens)?,
        "wait" => bare(ShellCommand::Wait, "wait", &tokens)?,
        "help" => bare(ShellCommand::Help, "help", &tokens)?,
        "quit" | "exit" => bare(ShellCommand::Quit, "quit", &tokens)?,
        other => return Err(ShellParseError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(parsed))
}

fn bare(
    command: ShellCommand,
    name: &'static str,
    tokens: &[&str],
) -> Result<ShellCommand, ShellParseError> {
    if tokens.len() > 1 {
        return Err(ShellParseError::TooManyArgs(name));
    }
    Ok(command)
}

fn parse_send(tokens: &[&str]) -> Result<ShellCommand, ShellParseError> {
    let mut method = IpcMethod::default();
    let mut encrypt = false;
    let mut sign = true;
    let mut words: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "--encrypt" => encrypt = true,
            "--no-sign" => sign = false,
            "--method" => {
                i += 1;
                let value = tokens.get(i).ok_or(ShellParseError::MissingMethod)?;
                method = parse_method(value)?;
            }
            flag if flag.starts_with("--method=") => {
                method = parse_method(&flag["--method=".len()..])?;
            }
            flag if flag.starts_with("--") => {
                return Err(ShellParseError::UnknownFlag(flag.to_owned()));
            }
            word => words.push(word),
        }
        i += 1;
    }

    if words.is_empty() {
        return Err(ShellParseError::MissingMessage);
    }
    Ok(ShellCommand::Send {
        message: words.join(" "),
        method,
        encrypt,
        sign,
    })
}

fn parse_method(value: &str) -> Result<IpcMethod, ShellParseError> {
    IpcMethod::from_str(value).map_err(|ParseMethodError(name)| ShellParseError::BadMethod(name))
}

enum Flow {
    Continue,
    Quit,
}

/// Run the shell until `quit` or end of input.
pub async fn run(controller: SessionController) -> anyhow::Result<()> {
    println!("simipc interactive shell. Type 'help' for commands, 'quit' to exit.");

    let mut follower = controller.subscribe(EventFilter::topics(vec![EventTopic::ActivityLog]));
    let printer = tokio::spawn(async move {
        while let Some(event) = follower.recv().await {
            if let SessionEvent::LogAppended(entry) = event {
                println!("{}", render::format_entry(&entry));
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if matches!(execute(&controller, command).await, Flow::Quit) {
                    break;
                }
            }
            Err(error) => println!("{error}"),
        }
        print_prompt();
    }

    // Let the pending completions land, then drop the last controller
    // handle so the follower drains its buffer and sees the bus close.
    controller.quiesce().await;
    drop(controller);
    let _ = printer.await;

    Ok(())
}

async fn execute(controller: &SessionController, command: ShellCommand) -> Flow {
    match command {
        ShellCommand::Auth { process_id } => {
            let pid = process_id.unwrap_or_else(|| controller.config().process_id.clone());
            controller.authenticate(&pid).await;
        }
        ShellCommand::Send {
            message,
            method,
            encrypt,
            sign,
        } => {
            let mut request = SendRequest::new(message).with_method(method);
            if encrypt {
                request = request.encrypted();
            }
            if !sign {
                request = request.unsigned();
            }
            controller.send(request).await;
        }
        ShellCommand::Tamper => {
            if controller.tamper().await == Dispatch::Rejected {
                println!("nothing in the buffer to corrupt");
            }
        }
        ShellCommand::Recv => {
            controller.receive().await;
        }
        ShellCommand::Status => println!("{}", render::format_status(&controller.snapshot())),
        ShellCommand::Log => {
            for entry in &controller.snapshot().logs {
                println!("{}", render::format_entry(entry));
            }
        }
        ShellCommand::Clear => {
            controller.clear_log();
            println!("log cleared");
        }
        ShellCommand::Wait => controller.quiesce().await,
        ShellCommand::Help => println!("{HELP_TEXT}"),
        ShellCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn print_prompt() {
    print!("simipc> ");
    let _ = std::io::stdout().flush();
}
