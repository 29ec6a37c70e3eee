//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Automaton editing and derivation errors
    #[error(transparent)]
    Automaton(#[from] AutomatonError),

    /// Definition file parsing or validation errors
    #[error("Definition error in {file:?}: {message}")]
    Definition { file: PathBuf, message: String },

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Editor interrupted with Ctrl+C
    #[error("User quit")]
    UserQuit,

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by user input against an automaton.
///
/// These are the conditions the editor reports in a message box rather than
/// aborting on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// A required form field was left empty
    #[error("Missing {0}: select a source state, a target state and a symbol")]
    MissingField(&'static str),

    /// Reference to a state that does not exist
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// A state with this id already exists
    #[error("Duplicate state: {0}")]
    DuplicateState(String),

    /// State number not below [`crate::automaton::MAX_STATE_NUMBER`]
    #[error("State number {0} is out of range")]
    StateNumberOutOfRange(usize),

    /// Transition index outside the transition list
    #[error("No transition at index {index} ({len} transitions)")]
    TransitionIndex { index: usize, len: usize },

    /// Derivation requested on an empty automaton
    #[error("No states defined")]
    NoStates,

    /// Derivation requested without any final state
    #[error("No final state defined")]
    NoFinalState,

    /// Derivation requested without an initial state
    #[error("No initial state defined")]
    NoInitialState,
}

/// How loudly a user-facing error should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl AutomatonError {
    pub fn severity(&self) -> Severity {
        match self {
            AutomatonError::MissingField(_) | AutomatonError::TransitionIndex { .. } => {
                Severity::Warning
            }
            AutomatonError::UnknownState(_)
            | AutomatonError::DuplicateState(_)
            | AutomatonError::StateNumberOutOfRange(_) => Severity::Error,
            AutomatonError::NoStates
            | AutomatonError::NoFinalState
            | AutomatonError::NoInitialState => Severity::Info,
        }
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a definition error for the given file
    pub fn definition(file: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Definition {
            file: file.into(),
            message: msg.into(),
        }
    }

    /// Create a TUI error
    pub fn tui(err: impl std::fmt::Display) -> Self {
        Self::Tui(err.to_string())
    }

    /// Check if error is a user quit
    pub fn is_user_quit(&self) -> bool {
        matches!(self, Error::UserQuit)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Definition {
            file: PathBuf::from("unknown"),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Custom(format!("JSON error: {}", err))
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert_eq!(err.to_string(), "test error");

        let err = Error::definition("dfa.toml", "bad state id");
        assert_eq!(err.to_string(), "Definition error in \"dfa.toml\": bad state id");
    }

    #[test]
    fn test_automaton_error_is_transparent() {
        let err: Error = AutomatonError::UnknownState("q7".to_string()).into();
        assert_eq!(err.to_string(), "Unknown state: q7");
    }

    #[test]
    fn test_severity() {
        assert_eq!(AutomatonError::MissingField("symbol").severity(), Severity::Warning);
        assert_eq!(AutomatonError::UnknownState("q1".into()).severity(), Severity::Error);
        assert_eq!(AutomatonError::NoFinalState.severity(), Severity::Info);
        assert_eq!(
            AutomatonError::StateNumberOutOfRange(usize::MAX).severity(),
            Severity::Error
        );
    }

    #[test]
    fn test_user_quit() {
        let err = Error::UserQuit;
        assert!(err.is_user_quit());

        let err = Error::custom("other");
        assert!(!err.is_user_quit());
    }

    #[test]
    fn test_bail_macro() {
        fn check(n: usize) -> Result<usize> {
            crate::ensure!(n > 0, "expected a positive count, got {}", n);
            Ok(n)
        }
        assert!(check(1).is_ok());
        assert_eq!(check(0).unwrap_err().to_string(), "expected a positive count, got 0");
    }
}
