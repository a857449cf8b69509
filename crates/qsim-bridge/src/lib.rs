//! Bridge between moment-based circuits and the qsim engine
//!
//! This crate turns a [`qsim_ir::Circuit`] into the engine's flat,
//! time-stepped representation and runs it through any [`QsimEngine`]:
//!
//! - [`gate_opcode`] classifies gates; gates without an opcode are decomposed
//! - [`translate`] reverses the qubit order and flattens moments into time
//!   steps
//! - [`QsimSimulator`] samples measurements, computes amplitudes and final
//!   states, one engine call per parameter assignment
//!
//! # Example
//!
//! ```rust
//! use qsim_bridge::translate;
//! use qsim_ir::{Circuit, Gate, Qubit, QubitOrder};
//!
//! let (a, b) = (Qubit::line(0), Qubit::line(1));
//! let mut circuit = Circuit::new();
//! circuit
//!     .apply(Gate::h(), [a.clone()])
//!     .unwrap()
//!     .apply(Gate::cnot(), [a, b])
//!     .unwrap();
//!
//! let engine_circuit = translate(&circuit, &QubitOrder::Default).unwrap();
//! // The first qubit of the order is the engine's highest index.
//! assert_eq!(engine_circuit.gates[1].qubits, vec![1, 0]);
//! ```
//!
//! [`QsimEngine`]: qsim_engine::QsimEngine

pub mod classify;
pub mod error;
pub mod options;
pub mod result;
pub mod sampling;
pub mod simulator;
pub mod translate;

pub use classify::gate_opcode;
pub use error::{BridgeError, BridgeResult};
pub use options::QsimOptions;
pub use result::{MeasurementRecord, SimulatorState, StateVectorTrialResult, TrialResult};
pub use sampling::sample_state_vector;
pub use simulator::QsimSimulator;
pub use translate::{engine_qubit_map, reverse_index, translate};
