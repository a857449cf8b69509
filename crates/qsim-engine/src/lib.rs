//! Engine contract for the qsim state-vector simulator
//!
//! This crate defines what the bridge hands to a simulation engine and what
//! it gets back, independent of how the engine is reached:
//!
//! - [`Opcode`]: the gate kinds the engine applies natively
//! - [`EngineCircuit`]: a flat list of gates with explicit time steps
//! - [`RunOptions`] and [`InitialState`]: per-call settings
//! - [`QsimEngine`]: the three simulation entry points
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use qsim_engine::{EngineCircuit, Opcode};
//!
//! let mut circuit = EngineCircuit::new(2);
//! circuit
//!     .add_gate(Opcode::H, 0, vec![1], BTreeMap::new())
//!     .unwrap()
//!     .add_gate(Opcode::CX, 1, vec![1, 0], BTreeMap::new())
//!     .unwrap();
//! assert_eq!(circuit.max_time(), Some(1));
//! ```

pub mod circuit;
pub mod engine;
pub mod error;
pub mod opcode;
pub mod options;

pub use circuit::{EngineCircuit, EngineGate};
pub use engine::QsimEngine;
pub use error::{EngineError, EngineResult};
pub use opcode::Opcode;
pub use options::{InitialState, RunOptions};
