//! The engine trait.
//!
//! # Method table
//!
//! | Method | Returns |
//! |--------|---------|
//! | `name()` | `&str` |
//! | `sample()` | one bit per measured qubit |
//! | `simulate_amplitudes()` | one amplitude per requested bitstring |
//! | `simulate_fullstate()` | `2^n` amplitudes |
//!
//! All calls are synchronous and independent of each other: an engine keeps
//! no state between calls. Threading is internal to the engine and
//! controlled by [`RunOptions::num_threads`].

use num_complex::Complex32;

use crate::circuit::EngineCircuit;
use crate::error::EngineResult;
use crate::options::{InitialState, RunOptions};

/// A state-vector simulation engine.
///
/// Qubit indices, bitstrings and state-vector indices are all in engine
/// order: engine qubit `k` is bit `k` of a basis index, and character `k`
/// of a bitstring.
pub trait QsimEngine: Send + Sync {
    /// Get the name of this engine.
    fn name(&self) -> &str;

    /// Run the circuit once, collapsing at each measurement gate.
    ///
    /// Returns one `0`/`1` value per measured qubit: measurement gates in
    /// time order, operands in gate order within each gate.
    fn sample(&self, circuit: &EngineCircuit, options: &RunOptions) -> EngineResult<Vec<u8>>;

    /// Compute the final amplitudes of the given basis states.
    ///
    /// Each bitstring has one `'0'`/`'1'` character per qubit.
    fn simulate_amplitudes(
        &self,
        circuit: &EngineCircuit,
        options: &RunOptions,
        bitstrings: &[String],
    ) -> EngineResult<Vec<Complex32>>;

    /// Compute the full final state vector, starting from `initial`.
    fn simulate_fullstate(
        &self,
        circuit: &EngineCircuit,
        options: &RunOptions,
        initial: &InitialState,
    ) -> EngineResult<Vec<Complex32>>;
}

impl<E: QsimEngine + ?Sized> QsimEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sample(&self, circuit: &EngineCircuit, options: &RunOptions) -> EngineResult<Vec<u8>> {
        (**self).sample(circuit, options)
    }

    fn simulate_amplitudes(
        &self,
        circuit: &EngineCircuit,
        options: &RunOptions,
        bitstrings: &[String],
    ) -> EngineResult<Vec<Complex32>> {
        (**self).simulate_amplitudes(circuit, options, bitstrings)
    }

    fn simulate_fullstate(
        &self,
        circuit: &EngineCircuit,
        options: &RunOptions,
        initial: &InitialState,
    ) -> EngineResult<Vec<Complex32>> {
        (**self).simulate_fullstate(circuit, options, initial)
    }
}
