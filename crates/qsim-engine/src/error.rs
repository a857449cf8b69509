//! Error types for the engine contract.

use thiserror::Error;

/// Errors that can occur when building or running an engine circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The engine circuit is malformed.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// The initial state does not fit the register.
    #[error("Invalid initial state: {0}")]
    InvalidInitialState(String),

    /// The engine wrote a different amount of output than requested.
    #[error("Engine returned {got} values, expected {expected}")]
    OutputSizeMismatch {
        /// Number of values requested.
        expected: usize,
        /// Number of values written.
        got: usize,
    },

    /// The engine reported a failure status.
    #[error("Engine call failed with status {code}: {message}")]
    Failed {
        /// Status code returned by the engine.
        code: i32,
        /// Human-readable description of the status.
        message: String,
    },

    /// The engine does not support the requested feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
