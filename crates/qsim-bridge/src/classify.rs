//! Mapping from circuit gates to engine opcodes.

use qsim_engine::Opcode;
use qsim_ir::{Gate, PowGate};

use crate::error::{BridgeError, BridgeResult};

/// Pick the engine opcode for a gate.
///
/// Returns `Ok(None)` for gates the engine cannot apply directly; those have
/// to be decomposed first. Exponents are compared exactly, so a symbolic
/// exponent always selects the general power opcode. The global shift never
/// affects the choice.
pub fn gate_opcode(gate: &Gate) -> BridgeResult<Option<Opcode>> {
    let opcode = match gate {
        Gate::Identity { num_qubits: 1 } => Opcode::I1,
        Gate::Identity { num_qubits: 2 } => Opcode::I2,
        Gate::Identity { num_qubits } => {
            return Err(BridgeError::UnsupportedQubitCount {
                gate_name: gate.name().to_string(),
                num_qubits: *num_qubits,
            });
        }
        Gate::XPow(p) => pow(p, Opcode::X, Opcode::XPow),
        Gate::YPow(p) => pow(p, Opcode::Y, Opcode::YPow),
        Gate::ZPow(p) if p.exponent.is_exactly(0.5) => Opcode::S,
        Gate::ZPow(p) if p.exponent.is_exactly(0.25) => Opcode::T,
        Gate::ZPow(p) => pow(p, Opcode::Z, Opcode::ZPow),
        Gate::HPow(p) => pow(p, Opcode::H, Opcode::HPow),
        Gate::CZPow(p) => pow(p, Opcode::CZ, Opcode::CZPow),
        Gate::CXPow(p) => pow(p, Opcode::CX, Opcode::CXPow),
        Gate::XXPow(p) => pow(p, Opcode::XX, Opcode::XXPow),
        Gate::YYPow(p) => pow(p, Opcode::YY, Opcode::YYPow),
        Gate::ZZPow(p) => pow(p, Opcode::ZZ, Opcode::ZZPow),
        Gate::SwapPow(p) => pow(p, Opcode::Swap, Opcode::SwapPow),
        Gate::ISwapPow(p) => pow(p, Opcode::ISwap, Opcode::ISwapPow),
        Gate::PhasedXPow { .. } => Opcode::PhasedXPow,
        Gate::PhasedXZ { .. } => Opcode::PhasedXZ,
        Gate::PhasedISwapPow { .. } => Opcode::PhasedISwapPow,
        Gate::FSim { .. } => Opcode::FSim,
        Gate::Matrix(m) => match m.num_qubits() {
            1 => Opcode::Matrix1,
            2 => Opcode::Matrix2,
            n => {
                return Err(BridgeError::UnsupportedQubitCount {
                    gate_name: gate.name().to_string(),
                    num_qubits: n,
                });
            }
        },
        Gate::Measurement(_) => Opcode::Measurement,
        Gate::CCZPow(_) | Gate::CCXPow(_) | Gate::CSwap | Gate::Custom(_) => return Ok(None),
    };
    Ok(Some(opcode))
}

fn pow(gate: &PowGate, whole: Opcode, general: Opcode) -> Opcode {
    if gate.exponent.is_exactly(1.0) {
        whole
    } else {
        general
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use qsim_ir::{CustomGate, MatrixGate, ParameterExpression};

    #[test]
    fn test_whole_powers_use_plain_opcodes() {
        assert_eq!(gate_opcode(&Gate::x()).unwrap(), Some(Opcode::X));
        assert_eq!(gate_opcode(&Gate::h()).unwrap(), Some(Opcode::H));
        assert_eq!(gate_opcode(&Gate::cnot()).unwrap(), Some(Opcode::CX));
        assert_eq!(gate_opcode(&Gate::iswap()).unwrap(), Some(Opcode::ISwap));
    }

    #[test]
    fn test_z_special_exponents() {
        assert_eq!(gate_opcode(&Gate::z()).unwrap(), Some(Opcode::Z));
        assert_eq!(gate_opcode(&Gate::s()).unwrap(), Some(Opcode::S));
        assert_eq!(gate_opcode(&Gate::t()).unwrap(), Some(Opcode::T));
        let z3 = Gate::ZPow(PowGate::new(0.3));
        assert_eq!(gate_opcode(&z3).unwrap(), Some(Opcode::ZPow));
        // Only Z has quarter and half turn opcodes.
        let x_half = Gate::XPow(PowGate::new(0.5));
        assert_eq!(gate_opcode(&x_half).unwrap(), Some(Opcode::XPow));
    }

    #[test]
    fn test_global_shift_is_ignored() {
        let rx_pi = Gate::rx(std::f64::consts::PI);
        assert_eq!(gate_opcode(&rx_pi).unwrap(), Some(Opcode::X));
    }

    #[test]
    fn test_symbolic_exponent_uses_power_opcode() {
        let gate = Gate::ZPow(PowGate::new(ParameterExpression::symbol("t")));
        assert_eq!(gate_opcode(&gate).unwrap(), Some(Opcode::ZPow));
    }

    #[test]
    fn test_identity_and_matrix_arity() {
        assert_eq!(gate_opcode(&Gate::i()).unwrap(), Some(Opcode::I1));
        assert_eq!(
            gate_opcode(&Gate::Identity { num_qubits: 2 }).unwrap(),
            Some(Opcode::I2)
        );
        assert!(matches!(
            gate_opcode(&Gate::Identity { num_qubits: 3 }),
            Err(BridgeError::UnsupportedQubitCount { num_qubits: 3, .. })
        ));

        let zero = Complex64::new(0.0, 0.0);
        let m3 = MatrixGate::new(3, vec![zero; 64]).unwrap();
        assert!(matches!(
            gate_opcode(&Gate::Matrix(m3)),
            Err(BridgeError::UnsupportedQubitCount { num_qubits: 3, .. })
        ));
        let m2 = MatrixGate::new(2, vec![zero; 16]).unwrap();
        assert_eq!(gate_opcode(&Gate::Matrix(m2)).unwrap(), Some(Opcode::Matrix2));
    }

    #[test]
    fn test_gates_without_opcode() {
        assert_eq!(gate_opcode(&Gate::ccx()).unwrap(), None);
        assert_eq!(gate_opcode(&Gate::ccz()).unwrap(), None);
        assert_eq!(gate_opcode(&Gate::cswap()).unwrap(), None);
        let custom = Gate::Custom(CustomGate::new("oracle", 1));
        assert_eq!(gate_opcode(&custom).unwrap(), None);
    }
}
