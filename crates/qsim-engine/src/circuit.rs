//! Flat, time-stepped circuits in engine form.

use num_complex::Complex64;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::opcode::Opcode;

/// One gate of an engine circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineGate {
    /// Gate kind.
    pub opcode: Opcode,
    /// Time step the gate is applied at.
    pub time: u32,
    /// Engine qubit indices, in operand order.
    pub qubits: Vec<u32>,
    /// Named numeric parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
    /// Row-major unitary as interleaved `(re, im)` pairs, for matrix opcodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matrix: Vec<f32>,
}

impl EngineGate {
    /// Whether this gate is a measurement.
    pub fn is_measurement(&self) -> bool {
        self.opcode == Opcode::Measurement
    }
}

impl fmt::Display for EngineGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits: Vec<String> = self.qubits.iter().map(ToString::to_string).collect();
        write!(f, "{} {} {}", self.time, self.opcode, qubits.join(" "))?;
        for (name, value) in &self.params {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

/// A circuit in the engine's input representation.
///
/// Gates are stored in non-decreasing time order; gates sharing a time
/// step act on disjoint qubits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineCircuit {
    /// Number of qubits in the register.
    pub num_qubits: u32,
    /// Gates in time order.
    pub gates: Vec<EngineGate>,
}

impl EngineCircuit {
    /// Create an empty circuit on `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Add a non-matrix gate.
    pub fn add_gate(
        &mut self,
        opcode: Opcode,
        time: u32,
        qubits: Vec<u32>,
        params: BTreeMap<String, f64>,
    ) -> EngineResult<&mut Self> {
        if opcode.is_matrix() {
            return Err(EngineError::InvalidCircuit(format!(
                "{opcode} requires a unitary; use add_matrix1/add_matrix2"
            )));
        }
        self.push(EngineGate {
            opcode,
            time,
            qubits,
            params,
            matrix: Vec::new(),
        })
    }

    /// Add a single-qubit gate given by its 2x2 row-major unitary.
    pub fn add_matrix1(
        &mut self,
        time: u32,
        qubits: Vec<u32>,
        matrix: &[Complex64],
    ) -> EngineResult<&mut Self> {
        self.add_matrix(Opcode::Matrix1, time, qubits, matrix)
    }

    /// Add a two-qubit gate given by its 4x4 row-major unitary.
    pub fn add_matrix2(
        &mut self,
        time: u32,
        qubits: Vec<u32>,
        matrix: &[Complex64],
    ) -> EngineResult<&mut Self> {
        self.add_matrix(Opcode::Matrix2, time, qubits, matrix)
    }

    fn add_matrix(
        &mut self,
        opcode: Opcode,
        time: u32,
        qubits: Vec<u32>,
        matrix: &[Complex64],
    ) -> EngineResult<&mut Self> {
        let entries = 1usize
            .checked_shl(qubits.len() as u32)
            .and_then(|dim| dim.checked_mul(dim));
        if entries != Some(matrix.len()) {
            return Err(EngineError::InvalidCircuit(format!(
                "{opcode} on {} qubit(s) cannot take {} matrix entries",
                qubits.len(),
                matrix.len()
            )));
        }
        let matrix = matrix
            .iter()
            .flat_map(|c| [c.re as f32, c.im as f32])
            .collect();
        self.push(EngineGate {
            opcode,
            time,
            qubits,
            params: BTreeMap::new(),
            matrix,
        })
    }

    fn push(&mut self, gate: EngineGate) -> EngineResult<&mut Self> {
        match gate.opcode.num_qubits() {
            Some(n) if n != gate.qubits.len() => {
                return Err(EngineError::InvalidCircuit(format!(
                    "{} expects {n} qubit(s), got {}",
                    gate.opcode,
                    gate.qubits.len()
                )));
            }
            None if gate.qubits.is_empty() => {
                return Err(EngineError::InvalidCircuit(
                    "measurement without qubits".into(),
                ));
            }
            _ => {}
        }
        if let Some(q) = gate.qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(EngineError::InvalidCircuit(format!(
                "qubit index {q} out of range for {} qubit(s)",
                self.num_qubits
            )));
        }
        if let Some(last) = self.gates.last() {
            if gate.time < last.time {
                return Err(EngineError::InvalidCircuit(format!(
                    "gate at time {} added after time {}",
                    gate.time, last.time
                )));
            }
        }
        self.gates.push(gate);
        Ok(self)
    }

    /// The last time step used, or `None` for an empty circuit.
    pub fn max_time(&self) -> Option<u32> {
        self.gates.last().map(|g| g.time)
    }

    /// Measurement gates in time order.
    pub fn measurement_gates(&self) -> impl Iterator<Item = &EngineGate> {
        self.gates.iter().filter(|g| g.is_measurement())
    }

    /// Total number of qubits across all measurement gates.
    pub fn num_measured_qubits(&self) -> usize {
        self.measurement_gates().map(|g| g.qubits.len()).sum()
    }

    /// Check time ordering and that no two gates at one time step share a
    /// qubit.
    pub fn validate(&self) -> EngineResult<()> {
        let mut current = None;
        let mut busy = FxHashSet::default();
        for gate in &self.gates {
            if current != Some(gate.time) {
                if current.is_some_and(|t| gate.time < t) {
                    return Err(EngineError::InvalidCircuit(format!(
                        "gates out of time order at time {}",
                        gate.time
                    )));
                }
                current = Some(gate.time);
                busy.clear();
            }
            for &q in &gate.qubits {
                if q >= self.num_qubits {
                    return Err(EngineError::InvalidCircuit(format!(
                        "qubit index {q} out of range"
                    )));
                }
                if !busy.insert(q) {
                    return Err(EngineError::InvalidCircuit(format!(
                        "qubit {q} used twice at time {}",
                        gate.time
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for EngineCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.num_qubits)?;
        for gate in &self.gates {
            writeln!(f, "{gate}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_add_gates_in_time_order() {
        let mut c = EngineCircuit::new(2);
        c.add_gate(Opcode::H, 0, vec![1], BTreeMap::new())
            .unwrap()
            .add_gate(Opcode::CX, 1, vec![1, 0], BTreeMap::new())
            .unwrap()
            .add_gate(Opcode::Measurement, 2, vec![0, 1], BTreeMap::new())
            .unwrap();
        assert_eq!(c.max_time(), Some(2));
        assert_eq!(c.num_measured_qubits(), 2);
        c.validate().unwrap();

        let err = c.add_gate(Opcode::X, 1, vec![0], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCircuit(_)));
    }

    #[test]
    fn test_arity_and_range_checks() {
        let mut c = EngineCircuit::new(2);
        assert!(c.add_gate(Opcode::CZ, 0, vec![0], BTreeMap::new()).is_err());
        assert!(c.add_gate(Opcode::X, 0, vec![2], BTreeMap::new()).is_err());
        assert!(c.add_gate(Opcode::Measurement, 0, vec![], BTreeMap::new()).is_err());
        assert!(c.add_gate(Opcode::Matrix1, 0, vec![0], BTreeMap::new()).is_err());
        assert!(c.gates.is_empty());
    }

    #[test]
    fn test_matrix_is_interleaved() {
        let i = Complex64::new(0.0, 1.0);
        let z = Complex64::new(0.0, 0.0);
        let mut c = EngineCircuit::new(1);
        c.add_matrix1(0, vec![0], &[z, -i, i, z]).unwrap();
        assert_eq!(c.gates[0].opcode, Opcode::Matrix1);
        assert_eq!(c.gates[0].matrix, vec![0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0, 0.0]);

        let err = c.add_matrix2(1, vec![0, 1], &[z; 4]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCircuit(_)));
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let c = EngineCircuit {
            num_qubits: 2,
            gates: vec![
                EngineGate {
                    opcode: Opcode::X,
                    time: 0,
                    qubits: vec![0],
                    params: BTreeMap::new(),
                    matrix: vec![],
                },
                EngineGate {
                    opcode: Opcode::CZ,
                    time: 0,
                    qubits: vec![1, 0],
                    params: BTreeMap::new(),
                    matrix: vec![],
                },
            ],
        };
        assert!(matches!(c.validate(), Err(EngineError::InvalidCircuit(_))));
    }

    #[test]
    fn test_display_and_json() {
        let mut c = EngineCircuit::new(1);
        c.add_gate(
            Opcode::XPow,
            0,
            vec![0],
            params(&[("exponent", 0.5), ("global_shift", 0.0)]),
        )
        .unwrap();
        assert_eq!(c.to_string(), "1\n0 XPow 0 exponent=0.5 global_shift=0\n");

        let json = serde_json::to_string(&c).unwrap();
        let back: EngineCircuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
