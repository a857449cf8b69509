//! Result types returned by the simulator.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array1, Array2};
use num_complex::Complex32;
use qsim_ir::{ParamResolver, Qubit};

/// Measurement outcomes by key.
///
/// Each key maps to a `(repetitions, width)` array of bits, one column per
/// measured qubit in operand order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementRecord {
    records: BTreeMap<String, Array2<u8>>,
}

impl MeasurementRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, bits: Array2<u8>) {
        self.records.insert(key.into(), bits);
    }

    /// Bits recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&Array2<u8>> {
        self.records.get(key)
    }

    /// Recorded keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Iterate over `(key, bits)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array2<u8>)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was measured.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of repetitions, or 0 if nothing was measured.
    pub fn repetitions(&self) -> usize {
        self.records.values().next().map_or(0, Array2::nrows)
    }

    /// Count how often each outcome occurred under `key`.
    ///
    /// Each row is packed into an integer with the first column as the most
    /// significant bit.
    pub fn histogram(&self, key: &str) -> Option<BTreeMap<u64, usize>> {
        let bits = self.records.get(key)?;
        let mut counts = BTreeMap::new();
        for row in bits.rows() {
            let value = row.iter().fold(0u64, |acc, &b| (acc << 1) | u64::from(b));
            *counts.entry(value).or_insert(0) += 1;
        }
        Some(counts)
    }
}

/// Outcome of one point of a sampling sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    /// Parameter values the circuit was resolved with.
    pub params: ParamResolver,
    /// Sampled measurements.
    pub measurements: MeasurementRecord,
}

/// A final state vector with the qubit layout it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorState {
    /// Amplitudes indexed by big-endian basis index.
    pub state_vector: Array1<Complex32>,
    /// Big-endian bit position of each qubit; position 0 is the most
    /// significant bit.
    pub qubit_map: BTreeMap<Qubit, usize>,
}

impl SimulatorState {
    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubit_map.len()
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Array1<f32> {
        self.state_vector.mapv(|a| a.norm_sqr())
    }

    /// Amplitude of a basis state given as a big-endian bitstring such as
    /// `"01"`.
    pub fn amplitude(&self, bitstring: &str) -> Option<Complex32> {
        if bitstring.len() != self.num_qubits() {
            return None;
        }
        let index = usize::from_str_radix(bitstring, 2).ok()?;
        self.state_vector.get(index).copied()
    }

    /// Render the state as a sum of basis kets, e.g. `0.71|00⟩ + 0.71|11⟩`.
    ///
    /// Amplitudes that round to zero at `decimals` places are omitted.
    pub fn dirac_notation(&self, decimals: usize) -> String {
        let n = self.num_qubits();
        let scale = 10f32.powi(decimals as i32);
        let round = |v: f32| (v * scale).round() / scale;

        let terms: Vec<String> = self
            .state_vector
            .iter()
            .enumerate()
            .filter_map(|(index, amp)| {
                let (re, im) = (round(amp.re), round(amp.im));
                if re == 0.0 && im == 0.0 {
                    return None;
                }
                let coeff = match (re == 0.0, im == 0.0) {
                    (_, true) => format!("{re:.decimals$}"),
                    (true, false) => format!("{im:.decimals$}j"),
                    (false, false) => {
                        let sign = if im < 0.0 { '-' } else { '+' };
                        format!("({re:.decimals$}{sign}{:.decimals$}j)", im.abs())
                    }
                };
                Some(format!("{coeff}|{index:0n$b}⟩"))
            })
            .collect();

        if terms.is_empty() {
            "0".into()
        } else {
            terms.join(" + ")
        }
    }
}

impl fmt::Display for SimulatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dirac_notation(2))
    }
}

/// Outcome of one point of a state-vector sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVectorTrialResult {
    /// Parameter values the circuit was resolved with.
    pub params: ParamResolver,
    /// Measurements taken along the way; empty for full-state simulation.
    pub measurements: MeasurementRecord,
    /// The final state.
    pub final_state: SimulatorState,
}
