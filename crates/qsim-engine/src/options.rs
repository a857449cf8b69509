//! Per-call run options and initial states.

use num_complex::Complex32;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};

/// Options passed to the engine with every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Number of engine worker threads.
    pub num_threads: u32,
    /// Maximum number of qubits a fused gate may span.
    pub max_fused_size: u32,
    /// Engine verbosity level.
    pub verbosity: u32,
    /// Random seed for engine-side sampling.
    pub seed: u64,
    /// Additional single-letter integer options, passed through unchanged.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, i64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            num_threads: 1,
            max_fused_size: 2,
            verbosity: 0,
            seed: 0,
            extra: BTreeMap::new(),
        }
    }
}

/// The state the engine starts simulating from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InitialState {
    /// A computational basis state, by engine index.
    Basis(u64),
    /// An explicit state vector of length `2^n`, in engine index order.
    Vector(Vec<Complex32>),
}

impl Default for InitialState {
    fn default() -> Self {
        InitialState::Basis(0)
    }
}

impl InitialState {
    /// Build a state vector from interleaved `(re, im)` pairs.
    pub fn from_interleaved(values: &[f32]) -> EngineResult<Self> {
        if values.len() % 2 != 0 {
            return Err(EngineError::InvalidInitialState(format!(
                "interleaved buffer has odd length {}",
                values.len()
            )));
        }
        Ok(InitialState::Vector(
            values
                .chunks_exact(2)
                .map(|pair| Complex32::new(pair[0], pair[1]))
                .collect(),
        ))
    }

    /// Check that the state fits a register of `num_qubits` qubits.
    pub fn validate(&self, num_qubits: u32) -> EngineResult<()> {
        let dim = 1u128.checked_shl(num_qubits).unwrap_or(u128::MAX);
        match self {
            InitialState::Basis(index) if u128::from(*index) >= dim => {
                Err(EngineError::InvalidInitialState(format!(
                    "basis state {index} out of range for {num_qubits} qubit(s)"
                )))
            }
            InitialState::Vector(v) if v.len() as u128 != dim => {
                Err(EngineError::InvalidInitialState(format!(
                    "state vector has {} amplitudes; {num_qubits} qubit(s) need {dim}",
                    v.len()
                )))
            }
            _ => Ok(()),
        }
    }
}
