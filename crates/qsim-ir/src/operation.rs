//! Operations (gates applied to qubits) and moments.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::parameter::ParamResolver;
use crate::qubit::Qubit;

/// A gate applied to an ordered list of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOperation")]
pub struct Operation {
    gate: Gate,
    qubits: Vec<Qubit>,
}

/// Unchecked wire form of [`Operation`].
#[derive(Deserialize)]
struct RawOperation {
    gate: Gate,
    qubits: Vec<Qubit>,
}

impl TryFrom<RawOperation> for Operation {
    type Error = IrError;

    fn try_from(raw: RawOperation) -> IrResult<Self> {
        Self::new(raw.gate, raw.qubits)
    }
}

impl Operation {
    /// Create an operation, checking arity and that the qubits are distinct.
    pub fn new(gate: Gate, qubits: impl IntoIterator<Item = Qubit>) -> IrResult<Self> {
        let qubits: Vec<Qubit> = qubits.into_iter().collect();
        if qubits.len() != gate.num_qubits() as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len() as u32,
            });
        }
        let mut seen = FxHashSet::default();
        for q in &qubits {
            if !seen.insert(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q.clone(),
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }
        Ok(Self { gate, qubits })
    }

    /// The gate.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// The operand qubits.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Whether the operation is a measurement.
    pub fn is_measurement(&self) -> bool {
        self.gate.is_measurement()
    }

    /// Substitute parameter values from a resolver.
    pub fn resolve_parameters(&self, resolver: &ParamResolver) -> Self {
        Self {
            gate: self.gate.resolve_parameters(resolver),
            qubits: self.qubits.clone(),
        }
    }

    /// Replace a measurement by single-qubit identities on its qubits.
    ///
    /// Dropping the measurement outright could remove the only reference
    /// to a qubit from the circuit. Non-measurements are returned as is.
    pub fn measurement_to_identities(&self) -> Vec<Operation> {
        if !self.is_measurement() {
            return vec![self.clone()];
        }
        self.qubits
            .iter()
            .map(|q| Operation {
                gate: Gate::i(),
                qubits: vec![q.clone()],
            })
            .collect()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits: Vec<String> = self.qubits.iter().map(ToString::to_string).collect();
        write!(f, "{}({})", self.gate, qubits.join(", "))
    }
}

impl Gate {
    /// Apply this gate to qubits.
    pub fn on(self, qubits: impl IntoIterator<Item = Qubit>) -> IrResult<Operation> {
        Operation::new(self, qubits)
    }
}

/// A set of operations that act on disjoint qubits during one time slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMoment")]
pub struct Moment {
    operations: Vec<Operation>,
}

#[derive(Deserialize)]
struct RawMoment {
    operations: Vec<Operation>,
}

impl TryFrom<RawMoment> for Moment {
    type Error = IrError;

    fn try_from(raw: RawMoment) -> IrResult<Self> {
        Self::from_operations(raw.operations)
    }
}

impl Moment {
    /// Create an empty moment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a moment from operations, rejecting overlapping qubits.
    pub fn from_operations(operations: impl IntoIterator<Item = Operation>) -> IrResult<Self> {
        let mut moment = Self::new();
        for op in operations {
            moment.push(op)?;
        }
        Ok(moment)
    }

    /// Add an operation, rejecting it if it touches an occupied qubit.
    pub fn push(&mut self, op: Operation) -> IrResult<()> {
        if let Some(q) = op.qubits().iter().find(|q| self.operates_on(q)) {
            return Err(IrError::OverlappingMoment(q.clone()));
        }
        self.operations.push(op);
        Ok(())
    }

    /// Whether some operation in this moment acts on `qubit`.
    pub fn operates_on(&self, qubit: &Qubit) -> bool {
        self.operations.iter().any(|op| op.qubits().contains(qubit))
    }

    /// Operations in insertion order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the moment holds no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterate over operations.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }
}

impl<'a> IntoIterator for &'a Moment {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_arity() {
        let err = Gate::cz().on([Qubit::line(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch { expected: 2, got: 1, .. }
        ));
    }

    #[test]
    fn test_operation_rejects_repeated_qubit() {
        let err = Gate::cz().on([Qubit::line(0), Qubit::line(0)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_moment_rejects_overlap() {
        let mut moment = Moment::new();
        moment.push(Gate::h().on([Qubit::line(0)]).unwrap()).unwrap();
        let err = moment
            .push(Gate::cz().on([Qubit::line(1), Qubit::line(0)]).unwrap())
            .unwrap_err();
        assert!(matches!(err, IrError::OverlappingMoment(q) if q == Qubit::line(0)));
        assert_eq!(moment.len(), 1);
    }

    #[test]
    fn test_measurement_to_identities() {
        let op = Gate::measure("m", 2)
            .on([Qubit::line(3), Qubit::line(1)])
            .unwrap();
        let ids = op.measurement_to_identities();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].gate(), &Gate::i());
        assert_eq!(ids[1].qubits(), &[Qubit::line(1)]);

        let h = Gate::h().on([Qubit::line(0)]).unwrap();
        assert_eq!(h.measurement_to_identities(), vec![h]);
    }

    #[test]
    fn test_deserialize_checks_arity() {
        let op = Gate::ccz()
            .on([Qubit::line(0), Qubit::line(1), Qubit::line(2)])
            .unwrap();
        let mut value = serde_json::to_value(&op).unwrap();
        value["qubits"] = serde_json::json!([Qubit::line(0)]);

        let err = serde_json::from_value::<Operation>(value).unwrap_err();
        assert!(err.to_string().contains("requires 3 qubits, got 1"), "{err}");
    }

    #[test]
    fn test_deserialize_rejects_repeated_qubit() {
        let op = Gate::cz().on([Qubit::line(0), Qubit::line(1)]).unwrap();
        let mut value = serde_json::to_value(&op).unwrap();
        value["qubits"] = serde_json::json!([Qubit::line(0), Qubit::line(0)]);
        assert!(serde_json::from_value::<Operation>(value).is_err());
    }

    #[test]
    fn test_deserialize_rejects_overlapping_moment() {
        let moment = serde_json::json!({
            "operations": [
                Gate::x().on([Qubit::line(0)]).unwrap(),
                Gate::y().on([Qubit::line(0)]).unwrap(),
            ]
        });
        assert!(serde_json::from_value::<Moment>(moment).is_err());
    }

    #[test]
    fn test_operation_display() {
        let op = Gate::cnot().on([Qubit::line(0), Qubit::line(1)]).unwrap();
        assert_eq!(op.to_string(), "CX(q(0), q(1))");
    }
}
