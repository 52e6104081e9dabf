//! Error types for the datagen-connect framework.

use thiserror::Error;

/// Errors surfaced to the host across the connector and task contracts.
///
/// The variants classify failures the way the host needs to react to
/// them: configuration and initialization errors are fatal to their
/// unit and never retried blindly, generation errors are transient and
/// left to the host's retry policy, and [`ConnectError::Cancelled`] is
/// not a failure at all.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// A required configuration key is missing or its value failed
    /// validation. Raised at connector start; fatal to job startup.
    #[error("Configuration error for key '{key}': {message}")]
    Configuration {
        /// The offending configuration key.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// The generation engine rejected its configuration while building
    /// the worker context. Fatal to that worker; restarting with the
    /// same configuration fails deterministically.
    #[error("Engine initialization failed: {0}")]
    EngineInitialization(String),

    /// The generation engine failed while producing a batch. Possibly
    /// transient; whether to retry the poll is the host's decision.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// A blocked poll was interrupted by a stop request. Not a
    /// failure: the correct reaction is to return promptly with no
    /// batch, and callers must not log this as an error.
    #[error("Poll cancelled by stop request")]
    Cancelled,

    /// The caller violated the lifecycle contract, e.g. polling a task
    /// that was never started or was already stopped. A caller bug,
    /// not a transient condition.
    #[error("Invalid state for {operation}: {state}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the component was actually in.
        state: &'static str,
    },
}

impl ConnectError {
    /// Whether this is the cooperative-cancellation signal rather than
    /// a real failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConnectError::Cancelled)
    }
}

/// Result alias used throughout the framework.
pub type Result<T> = std::result::Result<T, ConnectError>;
