//! Circuit model for the qsim bridge
//!
//! This crate provides the circuit data structures the bridge translates
//! from: qubits, gates in the power-gate convention, operations, moments and
//! circuits, plus symbolic parameters, sweeps and gate decomposition.
//!
//! # Overview
//!
//! A [`Circuit`] is an ordered list of [`Moment`]s; each moment holds
//! [`Operation`]s on disjoint [`Qubit`]s. Gates with symbolic parameters are
//! resolved with a [`ParamResolver`], and a [`Sweep`] expands into the list
//! of resolvers a simulator iterates over.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qsim_ir::{Circuit, Gate, Qubit};
//!
//! let (a, b) = (Qubit::line(0), Qubit::line(1));
//! let mut circuit = Circuit::new();
//! circuit
//!     .apply(Gate::h(), [a.clone()])
//!     .unwrap()
//!     .apply(Gate::cnot(), [a.clone(), b.clone()])
//!     .unwrap()
//!     .apply(Gate::measure("m", 2), [a, b])
//!     .unwrap();
//!
//! assert_eq!(circuit.depth(), 3);
//! assert!(circuit.are_all_measurements_terminal());
//! ```
//!
//! # Example: Parameter Sweep
//!
//! ```rust
//! use qsim_ir::{Circuit, Gate, ParameterExpression, Qubit, Sweep};
//!
//! let mut circuit = Circuit::new();
//! circuit
//!     .apply(Gate::rx(ParameterExpression::symbol("theta")), [Qubit::line(0)])
//!     .unwrap();
//!
//! let resolvers = Sweep::linspace("theta", 0.0, 1.0, 3).to_resolvers().unwrap();
//! for resolver in &resolvers {
//!     assert!(!circuit.resolve_parameters(resolver).unwrap().is_parameterized());
//! }
//! ```

pub mod circuit;
pub mod decompose;
pub mod error;
pub mod gate;
pub mod operation;
pub mod parameter;
pub mod qubit;
pub mod sweep;

pub use circuit::Circuit;
pub use decompose::{decompose, decompose_once};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, MatrixGate, MeasurementGate, PowGate};
pub use operation::{Moment, Operation};
pub use parameter::{ParamResolver, ParameterExpression};
pub use qubit::{Qubit, QubitOrder};
pub use sweep::{Sweep, Sweepable};
