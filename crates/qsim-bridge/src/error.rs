//! Error types for the bridge.

use qsim_engine::EngineError;
use qsim_ir::IrError;
use thiserror::Error;

/// Errors that can occur while translating or simulating a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// Circuit model error.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Engine error.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A gate the engine only supports on fewer qubits.
    #[error("{gate_name} on {num_qubits} qubits is not supported; use 1 or 2 qubits")]
    UnsupportedQubitCount {
        /// Name of the gate.
        gate_name: String,
        /// Number of qubits it was applied to.
        num_qubits: u32,
    },

    /// An option key reserved for the bridge itself.
    #[error("Option '{0}' is reserved and cannot be set")]
    ReservedOption(String),

    /// An option with an unusable value.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Two measurements record under the same key.
    #[error("Measurement key '{0}' is used by more than one measurement")]
    DuplicateMeasurementKey(String),

    /// An amplitude index that does not fit the register.
    #[error("Bitstring {value} does not fit in {num_qubits} qubit(s)")]
    InvalidBitstring {
        /// The requested basis index.
        value: u64,
        /// Register width.
        num_qubits: usize,
    },

    /// A state vector with zero norm cannot be sampled.
    #[error("Cannot sample from a state vector with zero norm")]
    DegenerateState,
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
