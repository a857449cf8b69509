//! Moment-ordered circuits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::IrResult;
use crate::gate::Gate;
use crate::operation::{Moment, Operation};
use crate::parameter::ParamResolver;
use crate::qubit::Qubit;

/// A quantum circuit: an ordered sequence of moments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    moments: Vec<Moment>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a circuit from existing moments.
    pub fn from_moments(moments: impl IntoIterator<Item = Moment>) -> Self {
        Self {
            moments: moments.into_iter().collect(),
        }
    }

    /// Build a circuit by appending operations one after another.
    pub fn from_operations(ops: impl IntoIterator<Item = Operation>) -> IrResult<Self> {
        let mut circuit = Self::new();
        for op in ops {
            circuit.append(op)?;
        }
        Ok(circuit)
    }

    /// Add a moment at the end.
    pub fn push_moment(&mut self, moment: Moment) -> &mut Self {
        self.moments.push(moment);
        self
    }

    /// Insert an operation into the earliest moment after the last moment
    /// that touches any of its qubits.
    pub fn append(&mut self, op: Operation) -> IrResult<&mut Self> {
        let last_touching = self
            .moments
            .iter()
            .rposition(|m| op.qubits().iter().any(|q| m.operates_on(q)));
        let index = last_touching.map_or(0, |i| i + 1);
        if index == self.moments.len() {
            self.moments.push(Moment::new());
        }
        self.moments[index].push(op)?;
        Ok(self)
    }

    /// Apply a gate to qubits and append the operation.
    pub fn apply(
        &mut self,
        gate: Gate,
        qubits: impl IntoIterator<Item = Qubit>,
    ) -> IrResult<&mut Self> {
        self.append(Operation::new(gate, qubits)?)
    }

    /// The moments in order.
    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// Mutable access to the moments.
    pub fn moments_mut(&mut self) -> &mut Vec<Moment> {
        &mut self.moments
    }

    /// Number of moments.
    pub fn depth(&self) -> usize {
        self.moments.len()
    }

    /// Total number of operations.
    pub fn num_operations(&self) -> usize {
        self.moments.iter().map(Moment::len).sum()
    }

    /// Iterate over all operations in moment order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.moments.iter().flat_map(Moment::iter)
    }

    /// All qubits the circuit acts on, in ascending order.
    pub fn all_qubits(&self) -> BTreeSet<Qubit> {
        self.operations()
            .flat_map(|op| op.qubits().iter().cloned())
            .collect()
    }

    /// Number of distinct qubits.
    pub fn num_qubits(&self) -> usize {
        self.all_qubits().len()
    }

    /// Measurement operations in moment order, then operation order.
    pub fn measurement_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations().filter(|op| op.is_measurement())
    }

    /// Whether no operation follows a measurement on any measured qubit.
    pub fn are_all_measurements_terminal(&self) -> bool {
        self.moments.iter().enumerate().all(|(i, moment)| {
            moment
                .iter()
                .filter(|op| op.is_measurement())
                .all(|op| !self.moments[i + 1..].iter().any(|later| {
                    op.qubits().iter().any(|q| later.operates_on(q))
                }))
        })
    }

    /// Check if any gate carries a symbolic parameter.
    pub fn is_parameterized(&self) -> bool {
        self.operations().any(|op| op.gate().is_parameterized())
    }

    /// Substitute parameter values throughout the circuit.
    pub fn resolve_parameters(&self, resolver: &ParamResolver) -> IrResult<Self> {
        self.map_operations(|op| vec![op.resolve_parameters(resolver)])
    }

    /// Rebuild the circuit, replacing each operation by zero or more
    /// operations in the same moment.
    ///
    /// Fails with [`IrError::OverlappingMoment`] if the replacements of one
    /// moment share a qubit.
    ///
    /// [`IrError::OverlappingMoment`]: crate::IrError::OverlappingMoment
    pub fn map_operations(
        &self,
        mut f: impl FnMut(&Operation) -> Vec<Operation>,
    ) -> IrResult<Self> {
        let moments = self
            .moments
            .iter()
            .map(|moment| Moment::from_operations(moment.iter().flat_map(&mut f)))
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Self { moments })
    }
}
