//! Decomposition of gates into simpler gates.

use crate::error::{IrError, IrResult};
use crate::gate::{CustomGate, Gate, PowGate};
use crate::operation::Operation;
use crate::parameter::ParameterExpression;
use crate::qubit::Qubit;

/// Expand `op` until every resulting operation satisfies `keep`.
///
/// Operations that are kept are returned unchanged; the others are replaced
/// by their one-step decomposition, recursively. An operation that is not
/// kept and has no decomposition fails with [`IrError::CannotDecompose`].
/// Errors raised by `keep` are returned as is.
pub fn decompose<F, E>(op: &Operation, keep: &F) -> Result<Vec<Operation>, E>
where
    F: Fn(&Operation) -> Result<bool, E>,
    E: From<IrError>,
{
    let mut out = Vec::new();
    decompose_into(op, keep, &mut out)?;
    Ok(out)
}

fn decompose_into<F, E>(op: &Operation, keep: &F, out: &mut Vec<Operation>) -> Result<(), E>
where
    F: Fn(&Operation) -> Result<bool, E>,
    E: From<IrError>,
{
    if keep(op)? {
        out.push(op.clone());
        return Ok(());
    }
    let step = decompose_once(op)?
        .ok_or_else(|| IrError::CannotDecompose(op.gate().name().to_string()))?;
    for child in &step {
        decompose_into(child, keep, out)?;
    }
    Ok(())
}

/// One level of decomposition, or `None` if the gate has none.
pub fn decompose_once(op: &Operation) -> IrResult<Option<Vec<Operation>>> {
    let qs = op.qubits();
    if qs.len() != op.gate().num_qubits() as usize {
        return Err(IrError::QubitCountMismatch {
            gate_name: op.gate().name().to_string(),
            expected: op.gate().num_qubits(),
            got: qs.len() as u32,
        });
    }
    let ops = match op.gate() {
        Gate::CCZPow(p) => ccz_pow(p, &qs[0], &qs[1], &qs[2])?,
        Gate::CCXPow(p) => {
            let (a, b, c) = (&qs[0], &qs[1], &qs[2]);
            vec![
                Gate::h().on([c.clone()])?,
                Gate::CCZPow(p.clone()).on([a.clone(), b.clone(), c.clone()])?,
                Gate::h().on([c.clone()])?,
            ]
        }
        Gate::CSwap => {
            let (c, t1, t2) = (&qs[0], &qs[1], &qs[2]);
            vec![
                Gate::cnot().on([t2.clone(), t1.clone()])?,
                Gate::ccx().on([c.clone(), t1.clone(), t2.clone()])?,
                Gate::cnot().on([t2.clone(), t1.clone()])?,
            ]
        }
        Gate::Custom(CustomGate {
            decomposition: Some(parts),
            ..
        }) => parts
            .iter()
            .map(|(gate, local)| {
                let mapped = local
                    .iter()
                    .map(|&i| {
                        qs.get(i).cloned().ok_or_else(|| IrError::QubitCountMismatch {
                            gate_name: op.gate().name().to_string(),
                            expected: op.gate().num_qubits(),
                            got: i as u32 + 1,
                        })
                    })
                    .collect::<IrResult<Vec<_>>>()?;
                Operation::new(gate.clone(), mapped)
            })
            .collect::<IrResult<Vec<_>>>()?,
        _ => return Ok(None),
    };
    Ok(Some(ops))
}

/// Parity-phase construction of `CCZ^e` from `Z^(e/4)` phases and CNOTs.
///
/// Each `p` is applied to a wire currently holding a parity of the inputs:
/// `a, b, c` get `+`, the pairwise parities get `-`, the triple parity `+`.
fn ccz_pow(p: &PowGate, a: &Qubit, b: &Qubit, c: &Qubit) -> IrResult<Vec<Operation>> {
    let quarter = p.exponent.clone() / ParameterExpression::constant(4.0);
    let quarter = match quarter.as_f64() {
        Some(v) => ParameterExpression::Constant(v),
        None => quarter,
    };
    let inverse = match quarter.as_f64() {
        Some(v) => ParameterExpression::Constant(-v),
        None => -quarter.clone(),
    };
    let phase = |q: &Qubit| Gate::ZPow(PowGate::new(quarter.clone())).on([q.clone()]);
    let unphase = |q: &Qubit| Gate::ZPow(PowGate::new(inverse.clone())).on([q.clone()]);
    let sweep = || -> IrResult<[Operation; 2]> {
        Ok([
            Gate::cnot().on([a.clone(), b.clone()])?,
            Gate::cnot().on([b.clone(), c.clone()])?,
        ])
    };

    let mut ops = vec![phase(a)?, phase(b)?, phase(c)?];
    ops.extend(sweep()?);
    ops.push(unphase(b)?);
    ops.push(phase(c)?);
    ops.extend(sweep()?);
    ops.push(unphase(c)?);
    ops.extend(sweep()?);
    ops.push(unphase(c)?);
    ops.extend(sweep()?);
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: i32) -> Qubit {
        Qubit::line(i)
    }

    fn is_ccz_part(op: &Operation) -> IrResult<bool> {
        Ok(matches!(op.gate(), Gate::ZPow(_) | Gate::CXPow(_) | Gate::HPow(_)))
    }

    #[test]
    fn test_ccz_uses_quarter_phases() {
        let op = Gate::ccz().on([q(0), q(1), q(2)]).unwrap();
        let ops = decompose(&op, &is_ccz_part).unwrap();
        assert_eq!(ops.len(), 15);
        let phases: Vec<f64> = ops
            .iter()
            .filter(|o| matches!(o.gate(), Gate::ZPow(_)))
            .map(|o| o.gate().as_pow().unwrap().exponent.as_f64().unwrap())
            .collect();
        assert_eq!(phases, vec![0.25, 0.25, 0.25, -0.25, 0.25, -0.25, -0.25]);
        let cnots = ops.iter().filter(|o| matches!(o.gate(), Gate::CXPow(_))).count();
        assert_eq!(cnots, 8);
    }

    #[test]
    fn test_toffoli_wraps_ccz_in_hadamards() {
        let op = Gate::ccx().on([q(0), q(1), q(2)]).unwrap();
        let ops = decompose(&op, &is_ccz_part).unwrap();
        assert_eq!(ops.len(), 17);
        assert_eq!(ops[0].gate(), &Gate::h());
        assert_eq!(ops[0].qubits(), &[q(2)]);
        assert_eq!(ops[16].gate(), &Gate::h());
    }

    #[test]
    fn test_fredkin_expands_recursively() {
        let op = Gate::cswap().on([q(0), q(1), q(2)]).unwrap();
        let ops = decompose(&op, &is_ccz_part).unwrap();
        assert_eq!(ops.len(), 19);
        assert_eq!(ops[0].qubits(), &[q(2), q(1)]);
        assert_eq!(ops[18].qubits(), &[q(2), q(1)]);
    }

    #[test]
    fn test_kept_operation_is_untouched() {
        let op = Gate::h().on([q(4)]).unwrap();
        assert_eq!(decompose(&op, &is_ccz_part).unwrap(), vec![op]);
    }

    #[test]
    fn test_custom_decomposition_maps_local_qubits() {
        let bell = CustomGate::new("bell", 2)
            .with_decomposition(vec![(Gate::h(), vec![0]), (Gate::cnot(), vec![0, 1])]);
        let op = Gate::Custom(bell).on([q(7), q(3)]).unwrap();
        let ops = decompose(&op, &is_ccz_part).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].qubits(), &[q(7)]);
        assert_eq!(ops[1].qubits(), &[q(7), q(3)]);
    }

    #[test]
    fn test_opaque_gate_cannot_be_decomposed() {
        let op = Gate::Custom(CustomGate::new("oracle", 1)).on([q(0)]).unwrap();
        assert!(matches!(
            decompose(&op, &is_ccz_part),
            Err(IrError::CannotDecompose(name)) if name == "oracle"
        ));
    }
}
