//! Automata to regular expressions
//!
//! A terminal tool for drawing finite automata and turning them into regular
//! expressions.
//!
//! This library provides functionality for:
//! - Editing automata (states, transitions, initial/final markers)
//! - Building the right-linear equation system of an automaton
//! - Solving that system with Arden's lemma by state elimination
//! - Matching words against automata and derived expressions
//! - Importing automata from TOML/JSON definition files
//! - Drawing and editing automata in an interactive TUI

pub mod automaton;
pub mod cli;
pub mod config;
pub mod definition;
pub mod equations;
pub mod error;
pub mod expr;
pub mod tui;

pub use config::Config;
pub use error::{Error, Result};

use std::path::Path;
use std::sync::Mutex;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level.
///
/// `RUST_LOG` takes precedence over `level`. With a `file`, events are
/// appended there instead of stderr, which keeps the TUI screen clean.
pub fn init_logging(level: &str, file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match file {
        Some(path) => {
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(log_file)),
            )
        }
        None => None,
    };
    let stderr_layer = file
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}
