//! Simulator facade over a [`QsimEngine`].

use std::collections::BTreeMap;

use ndarray::{Array1, Array2};
use num_complex::Complex32;
use qsim_engine::{EngineCircuit, EngineError, InitialState, QsimEngine};
use qsim_ir::{
    Circuit, IrError, MeasurementGate, Operation, ParamResolver, Qubit, QubitOrder, Sweepable,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, instrument};

use crate::error::{BridgeError, BridgeResult};
use crate::options::QsimOptions;
use crate::result::{MeasurementRecord, SimulatorState, StateVectorTrialResult, TrialResult};
use crate::sampling::sample_state_vector;
use crate::translate::translate;

/// Exclusive upper bound of the seeds handed to the engine.
pub const SEED_LIMIT: u64 = (1 << 31) - 1;

/// Where one measurement's bits live in the flat engine output.
struct MeasurementSlot<'a> {
    gate: &'a MeasurementGate,
    qubits: &'a [Qubit],
    start: usize,
}

/// Runs circuits on a qsim engine.
///
/// Holds the engine, the options applied to every call and the random
/// generator that seeds engine calls and final-state sampling.
pub struct QsimSimulator<E> {
    engine: E,
    options: QsimOptions,
    rng: StdRng,
}

impl<E: QsimEngine> QsimSimulator<E> {
    /// Create a simulator with default options and an entropy-seeded
    /// generator.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            options: QsimOptions::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the options, validating them first.
    pub fn with_options(mut self, options: QsimOptions) -> BridgeResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Reseed the generator for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The options applied to every call.
    pub fn options(&self) -> &QsimOptions {
        &self.options
    }

    /// Draw a fresh engine seed.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen_range(0..SEED_LIMIT)
    }

    /// Resolve parameters and sample the circuit's measurements.
    pub fn run(
        &mut self,
        circuit: &Circuit,
        resolver: &ParamResolver,
        repetitions: usize,
    ) -> BridgeResult<MeasurementRecord> {
        let resolved = circuit.resolve_parameters(resolver)?;
        self.sample_measure_results(&resolved, repetitions)
    }

    /// Sample the circuit once per parameter assignment.
    #[instrument(skip(self, circuit, params))]
    pub fn run_sweep(
        &mut self,
        circuit: &Circuit,
        params: impl Into<Sweepable>,
        repetitions: usize,
    ) -> BridgeResult<Vec<TrialResult>> {
        let resolvers = params.into().to_resolvers()?;
        debug!("Sweeping {} parameter assignment(s)", resolvers.len());
        resolvers
            .into_iter()
            .map(|params| {
                let measurements = self.run(circuit, &params, repetitions)?;
                Ok(TrialResult {
                    params,
                    measurements,
                })
            })
            .collect()
    }

    /// Sample the measurements of a resolved circuit.
    ///
    /// If no gate follows any measurement and more than one repetition is
    /// requested, the final state is computed once and sampled locally.
    /// Otherwise the engine runs the circuit once per repetition.
    #[instrument(skip(self, circuit))]
    pub fn sample_measure_results(
        &mut self,
        circuit: &Circuit,
        repetitions: usize,
    ) -> BridgeResult<MeasurementRecord> {
        let ordered = QubitOrder::Default.order_for(&circuit.all_qubits())?;
        let position: FxHashMap<&Qubit, usize> =
            ordered.iter().enumerate().map(|(i, q)| (q, i)).collect();

        let mut slots = Vec::new();
        let mut keys = FxHashSet::default();
        let mut width = 0;
        for op in circuit.measurement_operations() {
            let Some(gate) = op.gate().as_measurement() else {
                continue;
            };
            if !keys.insert(gate.key.as_str()) {
                return Err(BridgeError::DuplicateMeasurementKey(gate.key.clone()));
            }
            slots.push(MeasurementSlot {
                gate,
                qubits: op.qubits(),
                start: width,
            });
            width += op.qubits().len();
        }

        let mut record = MeasurementRecord::new();
        if slots.is_empty() {
            debug!("Circuit has no measurements; nothing to sample");
            return Ok(record);
        }

        let mut bits: Vec<Array2<u8>> = slots
            .iter()
            .map(|s| Array2::zeros((repetitions, s.qubits.len())))
            .collect();

        if circuit.are_all_measurements_terminal() && repetitions > 1 {
            info!(
                "Circuit has no intermediate measurements; sampling repeatedly from the final state vector"
            );
            let stripped = circuit.map_operations(Operation::measurement_to_identities)?;
            let engine_circuit = translate(&stripped, &QubitOrder::Default)?;
            let state = self.fullstate(&engine_circuit, &InitialState::default())?;
            let samples =
                sample_state_vector(&state, ordered.len(), repetitions, &mut self.rng)?;
            for (slot, out) in slots.iter().zip(bits.iter_mut()) {
                for (col, q) in slot.qubits.iter().enumerate() {
                    let source = position
                        .get(q)
                        .copied()
                        .ok_or_else(|| IrError::QubitNotInOrder(q.clone()))?;
                    out.column_mut(col).assign(&samples.column(source));
                }
            }
        } else {
            let engine_circuit = translate(circuit, &QubitOrder::Default)?;
            for rep in 0..repetitions {
                let seed = self.next_seed();
                let options = self.options.to_run_options(seed);
                let flat = self.engine.sample(&engine_circuit, &options)?;
                if flat.len() != width {
                    return Err(EngineError::OutputSizeMismatch {
                        expected: width,
                        got: flat.len(),
                    }
                    .into());
                }
                for (slot, out) in slots.iter().zip(bits.iter_mut()) {
                    for col in 0..slot.qubits.len() {
                        out[[rep, col]] = flat[slot.start + col];
                    }
                }
            }
        }

        for (slot, mut out) in slots.iter().zip(bits) {
            for col in 0..slot.qubits.len() {
                if slot.gate.is_inverted(col) {
                    out.column_mut(col).mapv_inplace(|b| b ^ 1);
                }
            }
            record.insert(slot.gate.key.clone(), out);
        }
        Ok(record)
    }

    /// Amplitudes of the given basis states for a single parameter
    /// assignment.
    pub fn compute_amplitudes(
        &mut self,
        circuit: &Circuit,
        bitstrings: &[u64],
        resolver: &ParamResolver,
        qubit_order: &QubitOrder,
    ) -> BridgeResult<Vec<Complex32>> {
        let engine_bitstrings = self.engine_bitstrings(circuit, bitstrings, qubit_order)?;
        self.amplitudes_for(circuit, resolver, qubit_order, &engine_bitstrings)
    }

    /// Amplitudes of the given basis states, once per parameter assignment.
    ///
    /// Bitstrings are big-endian basis indices over `qubit_order`.
    #[instrument(skip(self, circuit, bitstrings, params))]
    pub fn compute_amplitudes_sweep(
        &mut self,
        circuit: &Circuit,
        bitstrings: &[u64],
        params: impl Into<Sweepable>,
        qubit_order: &QubitOrder,
    ) -> BridgeResult<Vec<Vec<Complex32>>> {
        let engine_bitstrings = self.engine_bitstrings(circuit, bitstrings, qubit_order)?;
        params
            .into()
            .to_resolvers()?
            .iter()
            .map(|resolver| self.amplitudes_for(circuit, resolver, qubit_order, &engine_bitstrings))
            .collect()
    }

    fn engine_bitstrings(
        &self,
        circuit: &Circuit,
        bitstrings: &[u64],
        qubit_order: &QubitOrder,
    ) -> BridgeResult<Vec<String>> {
        let num_qubits = qubit_order.order_for(&circuit.all_qubits())?.len();
        bitstrings
            .iter()
            .map(|&b| engine_bitstring(b, num_qubits))
            .collect()
    }

    fn amplitudes_for(
        &mut self,
        circuit: &Circuit,
        resolver: &ParamResolver,
        qubit_order: &QubitOrder,
        engine_bitstrings: &[String],
    ) -> BridgeResult<Vec<Complex32>> {
        let resolved = circuit.resolve_parameters(resolver)?;
        let engine_circuit = translate(&resolved, qubit_order)?;
        let seed = self.next_seed();
        let options = self.options.to_run_options(seed);
        let amplitudes =
            self.engine
                .simulate_amplitudes(&engine_circuit, &options, engine_bitstrings)?;
        if amplitudes.len() != engine_bitstrings.len() {
            return Err(EngineError::OutputSizeMismatch {
                expected: engine_bitstrings.len(),
                got: amplitudes.len(),
            }
            .into());
        }
        Ok(amplitudes)
    }

    /// Final state for a single parameter assignment.
    pub fn simulate(
        &mut self,
        circuit: &Circuit,
        resolver: &ParamResolver,
        qubit_order: &QubitOrder,
        initial_state: &InitialState,
    ) -> BridgeResult<StateVectorTrialResult> {
        let qubit_map = state_qubit_map(circuit, qubit_order, initial_state)?;
        self.state_for(circuit, resolver.clone(), qubit_order, initial_state, &qubit_map)
    }

    /// Final state, once per parameter assignment.
    ///
    /// A basis-state initial state is a big-endian index over `qubit_order`.
    /// The initial state is checked once, before any engine call.
    #[instrument(skip(self, circuit, params, initial_state))]
    pub fn simulate_sweep(
        &mut self,
        circuit: &Circuit,
        params: impl Into<Sweepable>,
        qubit_order: &QubitOrder,
        initial_state: &InitialState,
    ) -> BridgeResult<Vec<StateVectorTrialResult>> {
        let qubit_map = state_qubit_map(circuit, qubit_order, initial_state)?;
        params
            .into()
            .to_resolvers()?
            .into_iter()
            .map(|params| self.state_for(circuit, params, qubit_order, initial_state, &qubit_map))
            .collect()
    }

    fn state_for(
        &mut self,
        circuit: &Circuit,
        params: ParamResolver,
        qubit_order: &QubitOrder,
        initial_state: &InitialState,
        qubit_map: &BTreeMap<Qubit, usize>,
    ) -> BridgeResult<StateVectorTrialResult> {
        let resolved = circuit.resolve_parameters(&params)?;
        let engine_circuit = translate(&resolved, qubit_order)?;
        let state = self.fullstate(&engine_circuit, initial_state)?;
        Ok(StateVectorTrialResult {
            params,
            measurements: MeasurementRecord::new(),
            final_state: SimulatorState {
                state_vector: Array1::from(state),
                qubit_map: qubit_map.clone(),
            },
        })
    }

    /// Full state with a fresh seed, checking the returned length.
    ///
    /// The engine index of a basis state equals its big-endian index over
    /// the unreversed qubit order, so the vector is returned as is.
    fn fullstate(
        &mut self,
        circuit: &EngineCircuit,
        initial: &InitialState,
    ) -> BridgeResult<Vec<Complex32>> {
        let expected = 1usize.checked_shl(circuit.num_qubits).ok_or_else(|| {
            EngineError::Unsupported(format!("{} qubit state vector", circuit.num_qubits))
        })?;
        let seed = self.next_seed();
        let options = self.options.to_run_options(seed);
        let state = self.engine.simulate_fullstate(circuit, &options, initial)?;
        if state.len() != expected {
            return Err(EngineError::OutputSizeMismatch {
                expected,
                got: state.len(),
            }
            .into());
        }
        Ok(state)
    }
}

/// Validate the initial state and map each qubit to its big-endian position.
fn state_qubit_map(
    circuit: &Circuit,
    qubit_order: &QubitOrder,
    initial_state: &InitialState,
) -> BridgeResult<BTreeMap<Qubit, usize>> {
    let ordered = qubit_order.order_for(&circuit.all_qubits())?;
    initial_state.validate(ordered.len() as u32)?;
    Ok(ordered.into_iter().enumerate().map(|(i, q)| (q, i)).collect())
}

/// Write a big-endian basis index in engine order: character `k` is the
/// bit of engine qubit `k`.
fn engine_bitstring(value: u64, num_qubits: usize) -> BridgeResult<String> {
    if num_qubits < 64 && value >> num_qubits != 0 {
        return Err(BridgeError::InvalidBitstring { value, num_qubits });
    }
    Ok((0..num_qubits)
        .map(|k| match value.checked_shr(k as u32).unwrap_or(0) & 1 {
            1 => '1',
            _ => '0',
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_bitstring_is_reversed() {
        // 0b110 over three qubits is "110" big-endian, "011" in engine order.
        assert_eq!(engine_bitstring(6, 3).unwrap(), "011");
        assert_eq!(engine_bitstring(1, 3).unwrap(), "100");
        assert_eq!(engine_bitstring(0, 0).unwrap(), "");
    }

    #[test]
    fn test_engine_bitstring_range() {
        assert!(matches!(
            engine_bitstring(8, 3),
            Err(BridgeError::InvalidBitstring { value: 8, num_qubits: 3 })
        ));
        assert!(engine_bitstring(u64::MAX, 64).is_ok());
    }
}
