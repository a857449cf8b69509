//! Translation of moment-based circuits into engine circuits.
//!
//! The engine numbers qubits in the opposite order to the circuit model: the
//! first qubit of the resolved qubit order becomes the engine's highest
//! index. Every moment is flattened into one or more engine time steps, one
//! per step of its longest decomposition.

use std::collections::BTreeMap;

use qsim_engine::{EngineCircuit, Opcode};
use qsim_ir::{Circuit, Gate, IrError, Operation, Qubit, QubitOrder, decompose};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::classify::gate_opcode;
use crate::error::BridgeResult;

/// Mirror a qubit index within a register of `num_qubits`.
///
/// Applying it twice gives back the original index.
pub fn reverse_index(num_qubits: usize, index: usize) -> usize {
    num_qubits - 1 - index
}

/// Engine index of each qubit, given the qubits in circuit order.
pub fn engine_qubit_map(ordered: &[Qubit]) -> FxHashMap<Qubit, u32> {
    let n = ordered.len();
    ordered
        .iter()
        .enumerate()
        .map(|(i, q)| (q.clone(), reverse_index(n, i) as u32))
        .collect()
}

/// Whether an operation can be handed to the engine without decomposition.
fn has_opcode(op: &Operation) -> BridgeResult<bool> {
    Ok(gate_opcode(op.gate())?.is_some())
}

/// Translate a circuit into engine form.
///
/// Gates without an engine opcode are decomposed. All parameters must be
/// resolved beforehand.
pub fn translate(circuit: &Circuit, qubit_order: &QubitOrder) -> BridgeResult<EngineCircuit> {
    let ordered = qubit_order.order_for(&circuit.all_qubits())?;
    let index = engine_qubit_map(&ordered);
    let mut engine = EngineCircuit::new(ordered.len() as u32);

    let mut time_offset = 0u32;
    for moment in circuit.moments() {
        let ops_by_gate = moment
            .iter()
            .map(|op| decompose(op, &has_opcode))
            .collect::<BridgeResult<Vec<_>>>()?;
        let moment_length = ops_by_gate.iter().map(Vec::len).max().unwrap_or(0);

        // Gates must be added in time order.
        for gi in 0..moment_length {
            for gate_ops in &ops_by_gate {
                if let Some(op) = gate_ops.get(gi) {
                    emit(&mut engine, op, time_offset + gi as u32, &index)?;
                }
            }
        }
        time_offset += moment_length as u32;
    }

    debug!(
        "Translated {} moments into {} engine gates over {} time steps",
        circuit.depth(),
        engine.gates.len(),
        time_offset
    );
    Ok(engine)
}

fn emit(
    engine: &mut EngineCircuit,
    op: &Operation,
    time: u32,
    index: &FxHashMap<Qubit, u32>,
) -> BridgeResult<()> {
    let Some(opcode) = gate_opcode(op.gate())? else {
        // `decompose` only returns kept operations.
        return Ok(());
    };
    let qubits = op
        .qubits()
        .iter()
        .map(|q| {
            index
                .get(q)
                .copied()
                .ok_or_else(|| IrError::QubitNotInOrder(q.clone()))
        })
        .collect::<Result<Vec<u32>, _>>()?;
    trace!("t={time} {opcode} {:?}", qubits);

    match (opcode, op.gate()) {
        (Opcode::Matrix1, Gate::Matrix(m)) => {
            engine.add_matrix1(time, qubits, m.matrix())?;
        }
        (Opcode::Matrix2, Gate::Matrix(m)) => {
            engine.add_matrix2(time, qubits, m.matrix())?;
        }
        _ => {
            let params: BTreeMap<String, f64> = op
                .gate()
                .numeric_params()?
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect();
            engine.add_gate(opcode, time, qubits, params)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_ir::{Moment, ParameterExpression, PowGate};

    use crate::error::BridgeError;

    fn q(i: i32) -> Qubit {
        Qubit::line(i)
    }

    #[test]
    fn test_reverse_index() {
        assert_eq!(reverse_index(4, 0), 3);
        assert_eq!(reverse_index(4, 3), 0);
        assert_eq!(reverse_index(1, 0), 0);
    }

    #[test]
    fn test_qubits_are_reversed() {
        let mut circuit = Circuit::new();
        circuit.apply(Gate::cnot(), [q(0), q(2)]).unwrap();
        let engine = translate(&circuit, &QubitOrder::Default).unwrap();
        assert_eq!(engine.num_qubits, 2);
        assert_eq!(engine.gates[0].opcode, Opcode::CX);
        assert_eq!(engine.gates[0].qubits, vec![1, 0]);
    }

    #[test]
    fn test_explicit_order() {
        let mut circuit = Circuit::new();
        circuit.apply(Gate::h(), [q(0)]).unwrap();
        let order = QubitOrder::Explicit(vec![q(1), q(0), q(5)]);
        let engine = translate(&circuit, &order).unwrap();
        assert_eq!(engine.num_qubits, 3);
        assert_eq!(engine.gates[0].qubits, vec![1]);
    }

    #[test]
    fn test_moment_flattening_interleaves_steps() {
        let moment = Moment::from_operations([
            Gate::ccx().on([q(0), q(1), q(2)]).unwrap(),
            Gate::x().on([q(3)]).unwrap(),
        ])
        .unwrap();
        let mut circuit = Circuit::from_moments([moment]);
        circuit.apply(Gate::z(), [q(3)]).unwrap();

        let engine = translate(&circuit, &QubitOrder::Default).unwrap();
        // Toffoli expands into 17 steps; X rides along in the first.
        assert_eq!(engine.gates.len(), 19);
        assert_eq!(engine.gates[0].time, 0);
        assert_eq!(engine.gates[0].opcode, Opcode::H);
        assert_eq!(engine.gates[1].time, 0);
        assert_eq!(engine.gates[1].opcode, Opcode::X);
        assert_eq!(engine.gates[17].time, 16);
        assert_eq!(engine.gates[18].time, 17);
        assert_eq!(engine.gates[18].opcode, Opcode::Z);
        engine.validate().unwrap();
    }

    #[test]
    fn test_empty_moment_takes_no_time() {
        let mut circuit = Circuit::new();
        circuit.apply(Gate::x(), [q(0)]).unwrap();
        circuit.push_moment(Moment::new());
        circuit.push_moment(Moment::from_operations([Gate::y().on([q(0)]).unwrap()]).unwrap());
        let engine = translate(&circuit, &QubitOrder::Default).unwrap();
        assert_eq!(engine.gates[1].time, 1);
    }

    #[test]
    fn test_params_are_passed_by_name() {
        let mut circuit = Circuit::new();
        circuit
            .apply(Gate::XPow(PowGate::shifted(0.3, -0.5)), [q(0)])
            .unwrap()
            .apply(Gate::fsim(0.1, 0.2), [q(0), q(1)])
            .unwrap();
        let engine = translate(&circuit, &QubitOrder::Default).unwrap();
        assert_eq!(engine.gates[0].params["exponent"], 0.3);
        assert_eq!(engine.gates[0].params["global_shift"], -0.5);
        assert_eq!(engine.gates[1].params["theta"], 0.1);
        assert_eq!(engine.gates[1].params["phi"], 0.2);
    }

    #[test]
    fn test_unresolved_symbol_is_rejected() {
        let mut circuit = Circuit::new();
        circuit
            .apply(Gate::rz(ParameterExpression::symbol("theta")), [q(0)])
            .unwrap();
        let err = translate(&circuit, &QubitOrder::Default).unwrap_err();
        assert!(matches!(err, BridgeError::Ir(IrError::UnboundParameter(name)) if name == "theta"));
    }

    #[test]
    fn test_measurement_keeps_operand_order() {
        let mut circuit = Circuit::new();
        circuit.apply(Gate::measure("m", 3), [q(2), q(0), q(1)]).unwrap();
        let engine = translate(&circuit, &QubitOrder::Default).unwrap();
        assert_eq!(engine.gates[0].opcode, Opcode::Measurement);
        assert_eq!(engine.gates[0].qubits, vec![0, 2, 1]);
        assert_eq!(engine.num_measured_qubits(), 3);
    }
}
