//! Engine gate kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A gate kind the engine can apply directly.
///
/// The numeric identifiers are part of the engine ABI and must not be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum Opcode {
    /// Single-qubit identity.
    I1 = 0,
    /// Two-qubit identity.
    I2,
    /// Pauli X.
    X,
    /// Pauli Y.
    Y,
    /// Pauli Z.
    Z,
    /// Hadamard.
    H,
    /// Phase gate, `Z^0.5`.
    S,
    /// T gate, `Z^0.25`.
    T,
    /// Controlled Z.
    CZ,
    /// Controlled X.
    CX,
    /// X⊗X.
    XX,
    /// Y⊗Y.
    YY,
    /// Z⊗Z.
    ZZ,
    /// SWAP.
    Swap,
    /// iSWAP.
    ISwap,
    /// Power of X.
    XPow,
    /// Power of Y.
    YPow,
    /// Power of Z.
    ZPow,
    /// Power of Hadamard.
    HPow,
    /// Power of controlled Z.
    CZPow,
    /// Power of controlled X.
    CXPow,
    /// Power of X⊗X.
    XXPow,
    /// Power of Y⊗Y.
    YYPow,
    /// Power of Z⊗Z.
    ZZPow,
    /// Power of SWAP.
    SwapPow,
    /// Power of iSWAP.
    ISwapPow,
    /// Phased X power.
    PhasedXPow,
    /// Phased XZ gate.
    PhasedXZ,
    /// Phased iSWAP power.
    PhasedISwapPow,
    /// Fermionic simulation gate.
    FSim,
    /// Explicit single-qubit unitary.
    Matrix1,
    /// Explicit two-qubit unitary.
    Matrix2,
    /// Computational-basis measurement on any number of qubits.
    Measurement,
}

impl Opcode {
    /// Every opcode, in identifier order.
    pub const ALL: [Opcode; 33] = [
        Opcode::I1,
        Opcode::I2,
        Opcode::X,
        Opcode::Y,
        Opcode::Z,
        Opcode::H,
        Opcode::S,
        Opcode::T,
        Opcode::CZ,
        Opcode::CX,
        Opcode::XX,
        Opcode::YY,
        Opcode::ZZ,
        Opcode::Swap,
        Opcode::ISwap,
        Opcode::XPow,
        Opcode::YPow,
        Opcode::ZPow,
        Opcode::HPow,
        Opcode::CZPow,
        Opcode::CXPow,
        Opcode::XXPow,
        Opcode::YYPow,
        Opcode::ZZPow,
        Opcode::SwapPow,
        Opcode::ISwapPow,
        Opcode::PhasedXPow,
        Opcode::PhasedXZ,
        Opcode::PhasedISwapPow,
        Opcode::FSim,
        Opcode::Matrix1,
        Opcode::Matrix2,
        Opcode::Measurement,
    ];

    /// The stable numeric identifier.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Look up an opcode by identifier.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Get the name of this opcode.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::I1 => "I1",
            Opcode::I2 => "I2",
            Opcode::X => "X",
            Opcode::Y => "Y",
            Opcode::Z => "Z",
            Opcode::H => "H",
            Opcode::S => "S",
            Opcode::T => "T",
            Opcode::CZ => "CZ",
            Opcode::CX => "CX",
            Opcode::XX => "XX",
            Opcode::YY => "YY",
            Opcode::ZZ => "ZZ",
            Opcode::Swap => "Swap",
            Opcode::ISwap => "ISwap",
            Opcode::XPow => "XPow",
            Opcode::YPow => "YPow",
            Opcode::ZPow => "ZPow",
            Opcode::HPow => "HPow",
            Opcode::CZPow => "CZPow",
            Opcode::CXPow => "CXPow",
            Opcode::XXPow => "XXPow",
            Opcode::YYPow => "YYPow",
            Opcode::ZZPow => "ZZPow",
            Opcode::SwapPow => "SwapPow",
            Opcode::ISwapPow => "ISwapPow",
            Opcode::PhasedXPow => "PhasedXPow",
            Opcode::PhasedXZ => "PhasedXZ",
            Opcode::PhasedISwapPow => "PhasedISwapPow",
            Opcode::FSim => "FSim",
            Opcode::Matrix1 => "Matrix1",
            Opcode::Matrix2 => "Matrix2",
            Opcode::Measurement => "Measurement",
        }
    }

    /// Number of qubits the opcode acts on, or `None` for measurement.
    pub fn num_qubits(self) -> Option<usize> {
        match self {
            Opcode::Measurement => None,
            Opcode::I1
            | Opcode::X
            | Opcode::Y
            | Opcode::Z
            | Opcode::H
            | Opcode::S
            | Opcode::T
            | Opcode::XPow
            | Opcode::YPow
            | Opcode::ZPow
            | Opcode::HPow
            | Opcode::PhasedXPow
            | Opcode::PhasedXZ
            | Opcode::Matrix1 => Some(1),
            _ => Some(2),
        }
    }

    /// Whether the opcode carries an explicit unitary.
    pub fn is_matrix(self) -> bool {
        matches!(self, Opcode::Matrix1 | Opcode::Matrix2)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
