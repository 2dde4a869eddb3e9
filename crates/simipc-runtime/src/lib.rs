//! # simipc Runtime
//!
//! Terminal front end for the workflow simulator. Two entry points share
//! one controller wiring:
//!
//! - `scenario`: scripted walkthroughs for demos and CI
//! - `shell`: an interactive command loop with live narration
//!
//! `render` holds the shared text formatting and `config` the latency and
//! identity settings with their environment overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod render;
pub mod scenario;
pub mod shell;

pub use config::SimConfig;
pub use scenario::Scenario;
