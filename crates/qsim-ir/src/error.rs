//! Error types for the IR crate.

use crate::qubit::Qubit;
use thiserror::Error;

/// Errors that can occur while building or transforming circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// The same qubit appears twice where distinct qubits are required.
    #[error("Duplicate qubit {qubit}{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: Qubit,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Two operations in one moment act on the same qubit.
    #[error("Moment already contains an operation on {0}")]
    OverlappingMoment(Qubit),

    /// A circuit qubit is missing from an explicit qubit order.
    #[error("Qubit {0} is not part of the explicit qubit order")]
    QubitNotInOrder(Qubit),

    /// Parameter is unbound.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// Zipped sweeps have different lengths.
    #[error("Cannot zip sweeps of different lengths: {0:?}")]
    SweepLengthMismatch(Vec<usize>),

    /// A matrix does not have the size implied by its qubit count.
    #[error(
        "Matrix of length {got} does not fit a {num_qubits}-qubit gate{}",
        format_expected_entries(.expected)
    )]
    InvalidMatrix {
        /// Number of qubits of the gate.
        num_qubits: u32,
        /// Expected number of entries, `None` if it overflows `usize`.
        expected: Option<usize>,
        /// Actual number of entries.
        got: usize,
    },

    /// An operation can neither be kept nor decomposed further.
    #[error("Cannot decompose gate '{0}'")]
    CannotDecompose(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

fn format_expected_entries(expected: &Option<usize>) -> String {
    match expected {
        Some(n) => format!(" (expected {n})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
